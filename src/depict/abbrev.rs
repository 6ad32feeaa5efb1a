//! Abbreviation labels such as `OAc`, `NHCH2Ph` or `C(CH3)3`.
//!
//! A label is split into tokens (an optional prefix such as `n-` or `tert`,
//! then an element or group symbol, then an optional count), can be
//! reversed for right-to-left placement, and is formatted into a
//! [`StyledRun`] with subscript counts, superscript charges and italic
//! prefixes.

use std::sync::OnceLock;

use crate::element;

const PREFIXES: &[&str] = &[
    "n", "norm", "n-", "c", "cy", "cyc", "cyclo", "c-", "cy-", "cyc-", "i", "iso", "i-", "t",
    "tert", "t-", "s", "sec", "s-", "o", "ortho", "o-", "m", "meta", "m-", "p", "para", "p-",
    "1-", "2-", "3-", "4-", "5-", "6-", "7-", "8-", "9-",
];

const ITALIC_PREFIXES: &[&str] = &[
    "n", "norm", "sec", "s", "tert", "t", "ortho", "o", "meta", "m", "para", "p",
];

/// Group symbols accepted alongside the periodic table.
const GROUPS: &[&str] = &[
    "acac", "Ac", "Ad", "All", "Alloc", "Am", "Amyl", "Ar", "Bn", "Boc", "BOC", "BOM", "Bs", "Bu",
    "Bz", "Bzh", "Bzl", "Cbz", "CoA", "Cp", "Cy", "DBU", "Dec", "DMB", "DMPM", "DMTr", "DNP",
    "DPM", "Et", "Fmoc", "Hept", "Hex", "Hx", "Mbs", "Me", "Mes", "Mmt", "MOM", "Ms", "Mtr",
    "Naph", "Nf", "Ns", "Oc", "Oct", "PEG", "Pent", "Ph", "Piv", "PMB", "PMBM", "PNB", "Pr",
    "PS", "Pyr", "SEM", "Sia", "TBDMS", "TBDPS", "TBS", "TES", "Tf", "THP", "TIPS", "TMS",
    "Tol", "Tos", "Tr", "Troc", "Trt", "Ts", "Xyl", "Ala", "Arg", "Asn", "Asp", "Cys", "Gln",
    "Glu", "Gly", "His", "Ile", "Leu", "Lys", "Met", "Phe", "Pro", "Ser", "Thr", "Trp", "Tyr",
    "Val",
];

pub const MINUS: char = '\u{2212}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Normal,
    Subscript,
    Superscript,
    Italic,
}

/// Text split into styled pieces. Neighbouring pieces never share a style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledRun {
    parts: Vec<(String, TextStyle)>,
}

impl StyledRun {
    pub fn push(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        match self.parts.last_mut() {
            Some((prev, s)) if *s == style => prev.push_str(text),
            _ => self.parts.push((text.to_string(), style)),
        }
    }

    pub fn parts(&self) -> &[(String, TextStyle)] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The text with styling dropped.
    pub fn plain_text(&self) -> String {
        self.parts.iter().map(|(t, _)| t.as_str()).collect()
    }
}

/// ASCII trie with a child slot per code point.
struct Trie {
    terminal: bool,
    children: [Option<Box<Trie>>; 128],
}

impl Trie {
    fn new() -> Self {
        Self {
            terminal: false,
            children: std::array::from_fn(|_| None),
        }
    }

    fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut root = Trie::new();
        for w in words {
            root.insert(w);
        }
        root
    }

    fn insert(&mut self, word: &str) {
        let mut node = self;
        for b in word.bytes() {
            if b >= 128 {
                return;
            }
            let slot = &mut node.children[usize::from(b)];
            node = &mut **slot.get_or_insert_with(|| Box::new(Trie::new()));
        }
        node.terminal = true;
    }

    /// End of the longest word starting at `start`.
    fn longest(&self, chars: &[char], start: usize) -> Option<usize> {
        let mut node = self;
        let mut best = None;
        for (i, &c) in chars.iter().enumerate().skip(start) {
            let code = c as u32;
            if code >= 128 {
                break;
            }
            match &node.children[code as usize] {
                Some(child) => node = &**child,
                None => break,
            }
            if node.terminal {
                best = Some(i + 1);
            }
        }
        best
    }
}

struct Tables {
    prefixes: Trie,
    symbols: Trie,
    italic: Trie,
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| Tables {
        prefixes: Trie::from_words(PREFIXES.iter().copied()),
        symbols: Trie::from_words(
            element::symbols()
                .filter(|s| *s != "*")
                .chain(GROUPS.iter().copied()),
        ),
        italic: Trie::from_words(ITALIC_PREFIXES.iter().copied()),
    })
}

/// Folds dash and plus look-alikes onto ASCII.
fn norm(c: char) -> char {
    match c {
        '\u{2212}' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}'
        | '\u{FE63}' | '\u{FF0D}' => '-',
        '\u{FF0B}' => '+',
        _ => c,
    }
}

fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn is_charge(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next().map(norm), Some('+' | '-')) && chars.all(|c| c.is_ascii_digit())
}

/// Splits `label` into tokens, or `None` when it is not an abbreviation
/// this module understands.
///
/// A failed parse yields no tokens at all rather than the whole label as a
/// single token; callers draw the label verbatim in that case, as
/// `atoms::Layout::abbreviated` does.
pub fn parse(label: &str) -> Option<Vec<String>> {
    let t = tables();
    let chars: Vec<char> = label.chars().collect();
    let len = chars.len();
    let text = |a: usize, b: usize| chars[a..b].iter().collect::<String>();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let st = i;
        let c = chars[i];

        if c == '(' || c == ')' {
            tokens.push(c.to_string());
            i += 1;
            if c == ')' {
                let num = i;
                while i < len && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i > num {
                    tokens.push(text(num, i));
                }
            }
            continue;
        }

        if matches!(c, '/' | '\u{b7}' | '.' | '\u{2022}' | '=') {
            tokens.push(c.to_string());
            i += 1;
            continue;
        }

        if let Some(end) = t.prefixes.longest(&chars, i) {
            i = end;
        }
        let sym_st = i;

        if let Some(end) = t.symbols.longest(&chars, i) {
            i = end;
            while i < len && chars[i].is_ascii_digit() {
                i += 1;
            }
        } else if i == st && st > 0 && matches!(norm(chars[i]), '+' | '-') {
            i += 1;
            while i < len && chars[i].is_ascii_digit() {
                i += 1;
            }
            // a charge must end the label
            if i < len {
                return None;
            }
        }

        if i == st || i == sym_st {
            return None;
        }
        tokens.push(text(st, i));
    }
    Some(tokens)
}

/// Reverses the token order for labels read right to left. Brackets swap
/// and a count that followed `)` moves to follow the new `)`.
pub fn reverse(tokens: &mut Vec<String>) {
    tokens.reverse();
    let mut counts: Vec<String> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i] == "(" {
            tokens[i] = ")".to_string();
            let count = counts.pop().unwrap_or_default();
            if !count.is_empty() {
                tokens.insert(i + 1, count);
                i += 1;
            }
        } else if tokens[i] == ")" {
            tokens[i] = "(".to_string();
            if i > 0 && is_number(&tokens[i - 1]) {
                counts.push(tokens.remove(i - 1));
                i -= 1;
            } else {
                counts.push(String::new());
            }
        }
        i += 1;
    }
}

/// Styles tokens for display.
pub fn format(tokens: &[String]) -> StyledRun {
    let t = tables();
    let mut run = StyledRun::default();
    for (i, token) in tokens.iter().enumerate() {
        if is_charge(token) {
            let mut chars = token.chars();
            let sign = match chars.next().map(norm) {
                Some('-') => MINUS,
                _ => '+',
            };
            let mut text: String = chars.collect();
            text.push(sign);
            run.push(&text, TextStyle::Superscript);
        } else if is_number(token) && i > 0 && tokens[i - 1] == ")" {
            run.push(token, TextStyle::Subscript);
        } else {
            let chars: Vec<char> = token.chars().collect();
            let mut suffix = chars.len();
            while suffix > 0 && chars[suffix - 1].is_ascii_digit() {
                suffix -= 1;
            }
            let mut prefix = t.italic.longest(&chars, 0).unwrap_or(0);
            if prefix > suffix {
                prefix = 0;
            }
            let piece = |a: usize, b: usize| chars[a..b].iter().collect::<String>();
            run.push(&piece(0, prefix), TextStyle::Italic);
            run.push(&piece(prefix, suffix), TextStyle::Normal);
            run.push(&piece(suffix, chars.len()), TextStyle::Subscript);
        }
    }
    run
}
