//! Periodic table symbols.
//!
//! Depiction only needs the element symbol of an atom (for its label) and
//! the full symbol list (for the abbreviation matcher), so this table is
//! deliberately small.

static SYMBOLS: [&str; 119] = [
    "*", // dummy / unknown
    "H", "He", //
    "Li", "Be", "B", "C", "N", "O", "F", "Ne", //
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", //
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
    "Br", "Kr", //
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te",
    "I", "Xe", //
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", //
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No",
    "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

pub const HYDROGEN: u8 = 1;
pub const CARBON: u8 = 6;
pub const NITROGEN: u8 = 7;
pub const OXYGEN: u8 = 8;
pub const FLUORINE: u8 = 9;
pub const PHOSPHORUS: u8 = 15;
pub const SULFUR: u8 = 16;
pub const CHLORINE: u8 = 17;
pub const SELENIUM: u8 = 34;
pub const BROMINE: u8 = 35;
pub const TELLURIUM: u8 = 52;
pub const IODINE: u8 = 53;

/// Symbol for an atomic number, `None` above 118. Atomic number 0 maps to `*`.
pub fn symbol(atomic_num: u8) -> Option<&'static str> {
    SYMBOLS.get(atomic_num as usize).copied()
}

/// Atomic number for a case-sensitive element symbol.
pub fn atomic_num(symbol: &str) -> Option<u8> {
    SYMBOLS
        .iter()
        .skip(1)
        .position(|&s| s == symbol)
        .map(|i| (i + 1) as u8)
}

/// All real element symbols, hydrogen first.
pub fn symbols() -> impl Iterator<Item = &'static str> {
    SYMBOLS.iter().skip(1).copied()
}

/// Metals and metalloids that should not steer double-bond placement.
pub fn is_metal(atomic_num: u8) -> bool {
    matches!(
        atomic_num,
        3 | 4 | 11 | 12 | 13 | 19..=31 | 37..=50 | 55..=84 | 87..=118
    )
}
