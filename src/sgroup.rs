use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};

/// Structural group annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SgroupKind {
    /// Superatom abbreviation (`SUP`), e.g. a contracted `OAc`.
    Abbreviation,
    /// Multiple group (`MUL`): `n` copies shown as one bracketed part.
    MultipleGroup,
    /// Structure repeat unit (`SRU`).
    StructureRepeatUnit,
    Monomer,
    Mer,
    Copolymer,
    CrossLink,
    Graft,
    Modified,
    AnyPolymer,
    /// Generic bracketed group, drawn like a polymer.
    Generic,
    /// Mixture component (`COM`).
    Component,
    /// Unordered mixture (`MIX`).
    Mixture,
    /// Ordered mixture (`FOR`).
    Formulation,
}

impl SgroupKind {
    pub fn is_polymer(self) -> bool {
        matches!(
            self,
            SgroupKind::StructureRepeatUnit
                | SgroupKind::Monomer
                | SgroupKind::Mer
                | SgroupKind::Copolymer
                | SgroupKind::CrossLink
                | SgroupKind::Graft
                | SgroupKind::Modified
                | SgroupKind::AnyPolymer
                | SgroupKind::Generic
        )
    }

    pub fn is_mixture(self) -> bool {
        matches!(
            self,
            SgroupKind::Component | SgroupKind::Mixture | SgroupKind::Formulation
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketStyle {
    #[default]
    Square,
    Round,
}

/// One bracket line in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SgroupBracket {
    pub first: [f64; 2],
    pub second: [f64; 2],
}

impl SgroupBracket {
    pub fn new(first: [f64; 2], second: [f64; 2]) -> Self {
        Self { first, second }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sgroup {
    pub kind: SgroupKind,
    #[serde(default)]
    pub atoms: Vec<NodeIndex>,
    /// Bonds crossing the group boundary.
    #[serde(default)]
    pub crossing_bonds: Vec<EdgeIndex>,
    /// Atoms of the displayed copy of a multiple group.
    #[serde(default)]
    pub parent_atoms: Vec<NodeIndex>,
    #[serde(default)]
    pub brackets: Vec<SgroupBracket>,
    #[serde(default)]
    pub bracket_style: BracketStyle,
    /// Abbreviation label, repeat count, or polymer subscript.
    #[serde(default)]
    pub subscript: Option<String>,
    /// Polymer connectivity: `hh`, `ht` or `eu`.
    #[serde(default)]
    pub connectivity: Option<String>,
    /// Copolymer subtype: `ALT`, `RAN` or `BLK`.
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub component_number: Option<u32>,
    /// An abbreviation that is shown expanded rather than contracted.
    #[serde(default)]
    pub expanded: bool,
}

impl Sgroup {
    pub fn new(kind: SgroupKind) -> Self {
        Self {
            kind,
            atoms: Vec::new(),
            crossing_bonds: Vec::new(),
            parent_atoms: Vec::new(),
            brackets: Vec::new(),
            bracket_style: BracketStyle::Square,
            subscript: None,
            connectivity: None,
            subtype: None,
            component_number: None,
            expanded: false,
        }
    }

    pub fn abbreviation(label: &str, atoms: Vec<NodeIndex>, crossing: Vec<EdgeIndex>) -> Self {
        Self {
            atoms,
            crossing_bonds: crossing,
            subscript: Some(label.to_string()),
            ..Self::new(SgroupKind::Abbreviation)
        }
    }

    pub fn contains_atom(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }
}
