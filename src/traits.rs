use peniko::Color;

use crate::bond::{BondDisplay, BondOrder};

pub trait HasAtomicNum {
    fn atomic_num(&self) -> u8;
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i8;
}

pub trait HasIsotope {
    fn isotope(&self) -> u16;
}

pub trait HasHydrogenCount {
    fn hydrogen_count(&self) -> u8;
}

pub trait HasRadical {
    fn unpaired_electrons(&self) -> u8;
}

pub trait HasAromaticity {
    fn is_aromatic(&self) -> bool;
}

pub trait HasPosition2D {
    fn position_2d(&self) -> Option<[f64; 2]>;
}

/// Presentation-only atom properties. Every method has a neutral default so
/// plain chemistry types only implement what they carry.
pub trait HasAtomDisplay {
    fn label(&self) -> Option<&str> {
        None
    }

    fn attach_point(&self) -> u8 {
        0
    }

    fn note(&self) -> Option<&str> {
        None
    }

    fn highlight(&self) -> Option<Color> {
        None
    }
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}

pub trait HasBondDisplay {
    fn bond_display(&self) -> BondDisplay;
}

pub trait HasBondAromaticity {
    fn is_aromatic(&self) -> bool;
}

pub trait HasBondDecoration {
    fn note(&self) -> Option<&str> {
        None
    }

    fn highlight(&self) -> Option<Color> {
        None
    }
}

/// Everything the depiction engine reads from an atom.
pub trait DepictAtom:
    HasAtomicNum
    + HasFormalCharge
    + HasIsotope
    + HasHydrogenCount
    + HasRadical
    + HasAromaticity
    + HasPosition2D
    + HasAtomDisplay
{
}

impl<T> DepictAtom for T where
    T: HasAtomicNum
        + HasFormalCharge
        + HasIsotope
        + HasHydrogenCount
        + HasRadical
        + HasAromaticity
        + HasPosition2D
        + HasAtomDisplay
{
}

/// Everything the depiction engine reads from a bond.
pub trait DepictBond: HasBondOrder + HasBondDisplay + HasBondAromaticity + HasBondDecoration {}

impl<T> DepictBond for T where
    T: HasBondOrder + HasBondDisplay + HasBondAromaticity + HasBondDecoration
{
}
