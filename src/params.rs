//! Rendering parameters.
//!
//! Every option has a default, so a JSON document only needs to name what
//! it changes:
//!
//! ```
//! use crabdepict::RenderParams;
//!
//! let params = RenderParams::from_json(r#"{"bond_length": 30.0, "delocalised_donuts": true}"#)
//!     .unwrap();
//! assert_eq!(params.bond_length, 30.0);
//! assert!(params.delocalised_donuts);
//! ```

use kurbo::Vec2;
use peniko::Color;
use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::bond::BondOrder;
use crate::color::{self, AtomColors};
use crate::depict::DepictError;
use crate::element;
use crate::geom;
use crate::traits::DepictAtom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightStyle {
    /// Highlight colours are ignored.
    #[default]
    None,
    /// A widened halo in the highlight colour behind the atom or bond.
    OuterGlow,
    /// The atom or bond itself is drawn in the highlight colour.
    Colored,
}

/// Atoms and bonds to highlight in addition to their own highlight colours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub atoms: Vec<usize>,
    pub bonds: Vec<usize>,
}

impl Selection {
    pub fn contains_atom(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom.index())
    }

    pub fn contains_bond(&self, bond: EdgeIndex) -> bool {
        self.bonds.contains(&bond.index())
    }
}

/// Which atoms get a text symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolVisibility {
    All,
    /// Skeletal formula conventions: carbons are implied unless they carry
    /// something worth reading.
    Iupac { terminal_carbons: bool },
}

impl Default for SymbolVisibility {
    fn default() -> Self {
        SymbolVisibility::Iupac {
            terminal_carbons: false,
        }
    }
}

impl SymbolVisibility {
    /// `bonds` holds the unit vector and order of each visible bond at the
    /// atom.
    pub fn shows<A: DepictAtom>(&self, atom: &A, bonds: &[(Vec2, BondOrder)]) -> bool {
        let terminal_carbons = match *self {
            SymbolVisibility::All => return true,
            SymbolVisibility::Iupac { terminal_carbons } => terminal_carbons,
        };
        if atom.atomic_num() != element::CARBON || atom.label().is_some() {
            return true;
        }
        if bonds.is_empty() {
            return true;
        }
        if atom.formal_charge() != 0 || atom.isotope() != 0 || atom.unpaired_electrons() != 0 {
            return true;
        }
        if terminal_carbons && bonds.len() == 1 {
            return true;
        }
        if let [(u, o1), (v, o2)] = bonds {
            if o1 == o2 && geom::angle_between(*u, *v) > std::f64::consts::PI - 0.05 {
                return true;
            }
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Model to output scale. When unset it is `bond_length` over the median
    /// bond length of the molecule.
    pub scale: Option<f64>,
    /// Desired bond length in output units.
    pub bond_length: f64,
    /// Symbol font size in output units.
    pub font_size: f64,
    /// Gap between the lines of a double bond, as a fraction of
    /// `bond_length`.
    pub bond_separation: f64,
    /// Stroke width as a multiple of the width of `|` in the symbol font.
    pub stroke_ratio: f64,
    /// Wide end of a wedge as a multiple of the stroke width.
    pub wedge_ratio: f64,
    /// Output units between the rungs of a hashed wedge.
    pub hash_spacing: f64,
    /// Output units per half wave of a wavy bond.
    pub wave_spacing: f64,
    /// Dashes drawn on a dashed bond.
    pub dash_sections: usize,
    /// Gap between a symbol and a bond end, as a multiple of the stroke.
    pub symbol_margin_ratio: f64,
    /// Annotation distance from its atom, as a fraction of `bond_length`.
    pub annotation_distance: f64,
    /// Annotation font size relative to `font_size`.
    pub annotation_font_scale: f64,
    #[serde(with = "color::rgba")]
    pub annotation_color: Color,
    pub highlighting: HighlightStyle,
    /// Outer glow width as a multiple of the stroke.
    pub outer_glow_width: f64,
    pub selection: Selection,
    #[serde(with = "color::rgba")]
    pub selection_color: Color,
    /// Draw every ring bond of an aromatic system as delocalised, even when
    /// a Kekulé order is assigned.
    pub force_delocalised: bool,
    /// Draw delocalised rings with an inner circle.
    pub delocalised_donuts: bool,
    pub visibility: SymbolVisibility,
    pub atom_colors: AtomColors,
    /// Reshape the wide end of bold wedges against the next bond.
    pub fancy_bold_wedges: bool,
    /// Slant the rungs of hashed wedges along the next bond.
    pub fancy_hashed_wedges: bool,
    /// Bracket depth as a fraction of `bond_length`.
    pub sgroup_bracket_depth: f64,
    /// Bracket label size relative to `font_size`.
    pub sgroup_font_scale: f64,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            scale: None,
            bond_length: 40.0,
            font_size: 13.0,
            bond_separation: 0.18,
            stroke_ratio: 1.0,
            wedge_ratio: 6.0,
            hash_spacing: 5.0,
            wave_spacing: 5.0,
            dash_sections: 8,
            symbol_margin_ratio: 2.0,
            annotation_distance: 0.25,
            annotation_font_scale: 0.5,
            annotation_color: color::RED,
            highlighting: HighlightStyle::None,
            outer_glow_width: 2.0,
            selection: Selection::default(),
            selection_color: color::HIGHLIGHT,
            force_delocalised: false,
            delocalised_donuts: false,
            visibility: SymbolVisibility::default(),
            atom_colors: AtomColors::default(),
            fancy_bold_wedges: true,
            fancy_hashed_wedges: true,
            sgroup_bracket_depth: 0.18,
            sgroup_font_scale: 0.6,
        }
    }
}

impl RenderParams {
    /// Reads parameters from JSON and validates them.
    pub fn from_json(json: &str) -> Result<Self, DepictError> {
        let params: RenderParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), DepictError> {
        let positive = [
            ("bond_length", self.bond_length),
            ("font_size", self.font_size),
            ("stroke_ratio", self.stroke_ratio),
            ("wedge_ratio", self.wedge_ratio),
            ("hash_spacing", self.hash_spacing),
            ("wave_spacing", self.wave_spacing),
            ("annotation_font_scale", self.annotation_font_scale),
            ("sgroup_font_scale", self.sgroup_font_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DepictError::InvalidParameter { name, value });
            }
        }
        let non_negative = [
            ("bond_separation", self.bond_separation),
            ("symbol_margin_ratio", self.symbol_margin_ratio),
            ("annotation_distance", self.annotation_distance),
            ("outer_glow_width", self.outer_glow_width),
            ("sgroup_bracket_depth", self.sgroup_bracket_depth),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DepictError::InvalidParameter { name, value });
            }
        }
        if self.dash_sections == 0 {
            return Err(DepictError::InvalidParameter {
                name: "dash_sections",
                value: 0.0,
            });
        }
        if let Some(scale) = self.scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(DepictError::InvalidParameter {
                    name: "scale",
                    value: scale,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Atom;

    #[test]
    fn partial_json_keeps_defaults() {
        let p = RenderParams::from_json(r#"{"wedge_ratio": 8.0}"#).unwrap();
        assert_eq!(p.wedge_ratio, 8.0);
        assert_eq!(p.bond_length, RenderParams::default().bond_length);
    }

    #[test]
    fn nested_options() {
        let p = RenderParams::from_json(
            r#"{
                "highlighting": "outer_glow",
                "visibility": {"iupac": {"terminal_carbons": true}},
                "atom_colors": "cdk2d",
                "selection": {"atoms": [1, 2]},
                "annotation_color": [0, 0, 255, 255]
            }"#,
        )
        .unwrap();
        assert_eq!(p.highlighting, HighlightStyle::OuterGlow);
        assert_eq!(
            p.visibility,
            SymbolVisibility::Iupac {
                terminal_carbons: true
            }
        );
        assert_eq!(p.atom_colors, AtomColors::Cdk2d);
        assert!(p.selection.contains_atom(NodeIndex::new(2)));
        assert_eq!(p.annotation_color.b, 255);
    }

    #[test]
    fn rejects_bad_values() {
        let err = RenderParams::from_json(r#"{"bond_length": -1.0}"#).unwrap_err();
        assert!(matches!(
            err,
            DepictError::InvalidParameter {
                name: "bond_length",
                ..
            }
        ));
        assert!(matches!(
            RenderParams::from_json("{"),
            Err(DepictError::Config(_))
        ));
        let p = RenderParams {
            scale: Some(0.0),
            ..RenderParams::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn iupac_hides_chain_carbons() {
        let vis = SymbolVisibility::default();
        let carbon = Atom {
            atomic_num: 6,
            ..Atom::default()
        };
        let bent = [
            (Vec2::new(1.0, 0.0), BondOrder::Single),
            (Vec2::new(-0.5, 0.86), BondOrder::Single),
        ];
        assert!(!vis.shows(&carbon, &bent));
        assert!(vis.shows(&carbon, &[]));
        assert!(!vis.shows(&carbon, &bent[..1]));
        let with_terminal = SymbolVisibility::Iupac {
            terminal_carbons: true,
        };
        assert!(with_terminal.shows(&carbon, &bent[..1]));
    }

    #[test]
    fn iupac_shows_allene_centre_and_heteroatoms() {
        let vis = SymbolVisibility::default();
        let carbon = Atom {
            atomic_num: 6,
            ..Atom::default()
        };
        let straight = [
            (Vec2::new(1.0, 0.0), BondOrder::Double),
            (Vec2::new(-1.0, 0.0), BondOrder::Double),
        ];
        assert!(vis.shows(&carbon, &straight));
        let nitrogen = Atom {
            atomic_num: 7,
            ..Atom::default()
        };
        assert!(vis.shows(&nitrogen, &straight[..1]));
        let charged = Atom {
            formal_charge: -1,
            ..carbon
        };
        assert!(vis.shows(&charged, &straight[..1]));
    }
}
