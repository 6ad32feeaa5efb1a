use peniko::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Quadruple,
    /// No Kekulé order assigned, typically a delocalised aromatic bond.
    Unset,
}

/// How a bond line is styled, independent of its order.
///
/// `Begin`/`End` name the atom at the narrow end of a wedge, or the atom an
/// arrow points at: `WedgeBegin` is narrow at the begin atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondDisplay {
    #[default]
    Solid,
    WedgeBegin,
    WedgeEnd,
    HashedWedgeBegin,
    HashedWedgeEnd,
    Wavy,
    Dash,
    Dot,
    Bold,
    Hash,
    ArrowBegin,
    ArrowEnd,
    /// Crossed double bond, unknown E/Z configuration.
    Crossed,
    /// A style this crate does not draw. Rendered as a solid line.
    #[serde(other)]
    Unsupported,
}

impl BondDisplay {
    pub fn is_wedge(self) -> bool {
        matches!(
            self,
            BondDisplay::WedgeBegin
                | BondDisplay::WedgeEnd
                | BondDisplay::HashedWedgeBegin
                | BondDisplay::HashedWedgeEnd
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bond {
    pub order: BondOrder,
    pub display: BondDisplay,
    pub is_aromatic: bool,
    /// Free text annotation drawn beside the bond.
    pub note: Option<String>,
    #[serde(with = "crate::color::opt_rgba")]
    pub highlight: Option<Color>,
}

impl Bond {
    pub fn new(order: BondOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn styled(order: BondOrder, display: BondDisplay) -> Self {
        Self {
            order,
            display,
            ..Self::default()
        }
    }

    pub fn aromatic() -> Self {
        Self {
            order: BondOrder::Unset,
            is_aromatic: true,
            ..Self::default()
        }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}

impl crate::traits::HasBondDisplay for Bond {
    fn bond_display(&self) -> BondDisplay {
        self.display
    }
}

impl crate::traits::HasBondAromaticity for Bond {
    fn is_aromatic(&self) -> bool {
        self.is_aromatic
    }
}

impl crate::traits::HasBondDecoration for Bond {
    fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    fn highlight(&self) -> Option<Color> {
        self.highlight
    }
}
