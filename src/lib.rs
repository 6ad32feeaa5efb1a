//! Depiction geometry for 2D chemical structure diagrams.
//!
//! [`depict`] turns a molecule with layout coordinates into a tree of
//! [`RenderElement`]s: lines, filled and stroked paths, and ovals in the
//! molecule's own coordinate space. Turning that tree into SVG, PDF or
//! pixels is left to the caller.
//!
//! The engine is generic over the atom and bond types through the `Has*`
//! traits, so any graph that can answer those questions can be drawn.

pub mod atom;
pub mod bond;
pub mod color;
pub mod depict;
pub mod element;
pub mod font;
pub mod geom;
pub mod mol;
pub mod params;
pub mod render;
pub mod rings;
pub mod sgroup;
pub mod traits;

pub use atom::Atom;
pub use bond::{Bond, BondDisplay, BondOrder};
pub use color::AtomColors;
pub use depict::{depict, DepictError};
#[cfg(feature = "skrifa")]
pub use font::SkrifaMeasurer;
pub use font::{BoxMeasurer, FontSpec, FontStyle, GlyphMeasurer, GlyphRun};
pub use mol::Mol;
pub use params::{HighlightStyle, RenderParams, Selection, SymbolVisibility};
pub use render::{LineElement, Mark, OvalElement, PathElement, PathStyle, RenderElement};
pub use sgroup::{BracketStyle, Sgroup, SgroupBracket, SgroupKind};
pub use traits::{
    DepictAtom, DepictBond, HasAromaticity, HasAtomDisplay, HasAtomicNum, HasBondAromaticity,
    HasBondDecoration, HasBondDisplay, HasBondOrder, HasFormalCharge, HasHydrogenCount,
    HasIsotope, HasPosition2D, HasRadical,
};
