use peniko::Color;
use serde::{Deserialize, Serialize};

/// Default atom type for a depiction input graph.
///
/// `Atom` stores what a structure diagram needs to know about a node: its
/// identity, the decorations that end up in its label, and its 2D layout
/// position. Layout is produced elsewhere; depiction only reads it.
///
/// # Examples
///
/// ```
/// use crabdepict::Atom;
///
/// let oxygen = Atom {
///     atomic_num: 8,
///     hydrogen_count: 1,
///     position: Some([0.0, 1.5]),
///     ..Atom::default()
/// };
/// assert_eq!(oxygen.atomic_num, 8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, …). `0` is a pseudo atom.
    pub atomic_num: u8,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Mass number. `0` means natural isotopic abundance.
    pub isotope: u16,
    /// Number of implicit (suppressed) hydrogens drawn in the label.
    pub hydrogen_count: u8,
    /// Unpaired electrons, drawn as a radical dot.
    pub unpaired_electrons: u8,
    /// Whether this atom is in an aromatic ring.
    pub is_aromatic: bool,
    /// 2D layout coordinate. Required for every atom that is depicted.
    pub position: Option<[f64; 2]>,
    /// Text label of a pseudo atom or superatom, e.g. `"OAc"`.
    pub label: Option<String>,
    /// Attachment point number (R-group `*` positions); `0` when not one.
    pub attach_point: u8,
    /// Free text annotation drawn next to the atom. A leading `|` requests
    /// italic text.
    pub note: Option<String>,
    /// Highlight colour.
    #[serde(with = "crate::color::opt_rgba")]
    pub highlight: Option<Color>,
}

impl Atom {
    pub fn new(atomic_num: u8, x: f64, y: f64) -> Self {
        Self {
            atomic_num,
            position: Some([x, y]),
            ..Self::default()
        }
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasIsotope for Atom {
    fn isotope(&self) -> u16 {
        self.isotope
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}

impl crate::traits::HasRadical for Atom {
    fn unpaired_electrons(&self) -> u8 {
        self.unpaired_electrons
    }
}

impl crate::traits::HasAromaticity for Atom {
    fn is_aromatic(&self) -> bool {
        self.is_aromatic
    }
}

impl crate::traits::HasPosition2D for Atom {
    fn position_2d(&self) -> Option<[f64; 2]> {
        self.position
    }
}

impl crate::traits::HasAtomDisplay for Atom {
    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn attach_point(&self) -> u8 {
        self.attach_point
    }

    fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    fn highlight(&self) -> Option<Color> {
        self.highlight
    }
}
