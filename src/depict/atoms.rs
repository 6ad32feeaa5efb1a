//! Atom symbol layout: element text with hydrogen, count, charge and mass
//! adjuncts, plus abbreviation and pseudo atom labels.

use std::collections::HashSet;

use kurbo::{Point, Vec2};
use petgraph::graph::NodeIndex;

use super::abbrev::{self, TextStyle, MINUS};
use super::hydrogen::HydrogenPosition;
use super::outline::TextOutline;
use super::symbol::{AtomSymbol, SymbolAlignment};
use super::{DepictContext, Symbols};
use crate::bond::BondOrder;
use crate::element;
use crate::font::FontStyle;
use crate::traits::{DepictAtom, DepictBond};

/// Size of subscripts and superscripts relative to the symbol font.
const SCRIPT_SIZE: f64 = 0.6;
/// Gap between adjacent parts of a symbol, relative to the font size.
const PADDING: f64 = 0.06;
const BULLET: char = '\u{2022}';

/// Lays out the symbol of every visible atom. Atoms drawn as bare bond
/// junctions get `None`.
pub(crate) fn generate<A, B>(ctx: &DepictContext<'_, A, B>, suppress_charge: &HashSet<NodeIndex>) -> Symbols
where
    A: DepictAtom,
    B: DepictBond,
{
    let mut symbols: Symbols = vec![None; ctx.mol.atom_count()];
    for atom in ctx.mol.atoms() {
        if ctx.is_atom_hidden(atom) {
            continue;
        }
        symbols[atom.index()] = symbol_of(ctx, atom, suppress_charge.contains(&atom));
    }
    symbols
}

/// Side of the symbol the hydrogen label goes on, from the visible bonds.
pub(crate) fn hydrogen_position<A, B>(ctx: &DepictContext<'_, A, B>, atom: NodeIndex) -> HydrogenPosition
where
    A: DepictAtom,
    B: DepictBond,
{
    let neighbors: Vec<Point> = ctx
        .visible_bonds(atom)
        .into_iter()
        .filter_map(|b| ctx.mol.other_atom(b, atom))
        .map(|n| ctx.pos(n))
        .collect();
    HydrogenPosition::of(ctx.mol.atom(atom).atomic_num(), ctx.pos(atom), &neighbors)
}

fn symbol_of<A, B>(ctx: &DepictContext<'_, A, B>, atom: NodeIndex, suppress_charge: bool) -> Option<AtomSymbol>
where
    A: DepictAtom,
    B: DepictBond,
{
    let a = ctx.mol.atom(atom);
    if a.attach_point() > 0 {
        return None;
    }

    let bonds = ctx.visible_bonds(atom);
    let hpos = hydrogen_position(ctx, atom);
    let layout = Layout { ctx };

    let symbol = if let Some(label) = ctx.display.symbol_remap.get(&atom) {
        layout.abbreviated(label, hpos)
    } else if let Some(label) = a.label().filter(|l| !l.is_empty()) {
        layout.abbreviated(label, hpos)
    } else {
        let vectors: Vec<(Vec2, BondOrder)> = bonds
            .iter()
            .map(|&b| (ctx.bond_vector(atom, b), ctx.mol.bond(b).bond_order()))
            .collect();
        if !ctx.params.visibility.shows(a, &vectors) {
            return None;
        }
        let charge = if suppress_charge { 0 } else { a.formal_charge() };
        layout.periodic(
            a.atomic_num(),
            a.hydrogen_count(),
            a.isotope(),
            charge,
            a.unpaired_electrons(),
            hpos,
        )
    };

    let alignment = match (bonds.len() < 4, hpos) {
        (false, _) => SymbolAlignment::Center,
        (true, HydrogenPosition::Left) => SymbolAlignment::Right,
        (true, _) => SymbolAlignment::Left,
    };
    let inv = 1.0 / ctx.scale;
    Some(
        symbol
            .align_to(alignment)
            .resize(inv, inv)
            .center_to(ctx.pos(atom)),
    )
}

/// Centred abbreviation label in font units, for labels that stand alone.
pub(crate) fn abbreviation_symbol<A, B>(ctx: &DepictContext<'_, A, B>, label: &str, hpos: HydrogenPosition) -> AtomSymbol
where
    A: DepictAtom,
    B: DepictBond,
{
    Layout { ctx }
        .abbreviated(label, hpos)
        .align_to(SymbolAlignment::Center)
}

/// Text for the charge and radical adjunct, e.g. `2+` or `•−`.
pub(crate) fn charge_text(charge: i8, unpaired: u8) -> String {
    let mut text = String::new();
    for _ in 0..unpaired {
        text.push(BULLET);
    }
    let magnitude = charge.unsigned_abs();
    if magnitude > 1 {
        text.push_str(&magnitude.to_string());
    }
    if magnitude > 0 {
        text.push(if charge < 0 { MINUS } else { '+' });
    }
    text
}

/// Places text parts relative to each other, in font units.
struct Layout<'c, 'a, A, B> {
    ctx: &'c DepictContext<'a, A, B>,
}

impl<A, B> Layout<'_, '_, A, B>
where
    A: DepictAtom,
    B: DepictBond,
{
    fn padding(&self) -> f64 {
        PADDING * self.ctx.params.font_size
    }

    fn text(&self, text: &str) -> TextOutline {
        self.ctx.text(text, FontStyle::Regular)
    }

    fn script(&self, text: &str) -> TextOutline {
        self.ctx.text_sized(text, FontStyle::Regular, SCRIPT_SIZE)
    }

    fn periodic(
        &self,
        atomic_num: u8,
        hydrogens: u8,
        mass: u16,
        charge: i8,
        unpaired: u8,
        hpos: HydrogenPosition,
    ) -> AtomSymbol {
        let symbol = if atomic_num == 0 {
            "*"
        } else {
            element::symbol(atomic_num).unwrap_or("*")
        };
        let element = self.text(symbol);

        let mut hydrogen = None;
        let mut count = None;
        if hydrogens > 0 {
            let h = self.position_hydrogen(hpos, &element, self.text("H"));
            if hydrogens > 1 {
                count = Some(self.position_subscript(&h, self.script(&hydrogens.to_string())));
            }
            hydrogen = Some(h);
        }

        let charge = charge_text(charge, unpaired);
        let charge = (!charge.is_empty()).then(|| {
            let reference = match (&hydrogen, hpos) {
                (Some(h), HydrogenPosition::Right) => h,
                _ => &element,
            };
            self.position_charge(reference, self.script(&charge))
        });

        // "H2N" not "HN2": move the hydrogen clear of its count
        if hpos == HydrogenPosition::Left {
            if let Some(shift) = count.as_ref().map(|c| c.bounds().width() + self.padding()) {
                hydrogen = hydrogen.map(|h| h.translate(-shift, 0.0));
                count = count.map(|c| c.translate(-shift, 0.0));
            }
        }

        let mass = (mass > 0).then(|| {
            let m = self.position_mass(&element, self.script(&mass.to_string()));
            match (&hydrogen, hpos) {
                (Some(h), HydrogenPosition::Left) => {
                    let dx = h.bounds().x0 - self.padding() - m.bounds().x1;
                    m.translate(dx, 0.0)
                }
                _ => m,
            }
        });

        let adjuncts = [hydrogen, count, charge, mass].into_iter().flatten().collect();
        AtomSymbol::new(element, adjuncts)
    }

    /// Abbreviation label such as `CO2H`, reversed when the bond comes in
    /// from the right. Labels that do not parse are drawn verbatim.
    fn abbreviated(&self, label: &str, hpos: HydrogenPosition) -> AtomSymbol {
        let Some(mut tokens) = abbrev::parse(label) else {
            return AtomSymbol::new(self.text(label), Vec::new());
        };
        if hpos == HydrogenPosition::Left {
            abbrev::reverse(&mut tokens);
        }
        let run = abbrev::format(&tokens);
        if run.is_empty() {
            return AtomSymbol::new(self.text(label), Vec::new());
        }

        let reference = self.text("H");
        let parts = run.parts();
        let mut outlines: Vec<TextOutline> = parts
            .iter()
            .map(|(text, style)| match style {
                TextStyle::Normal => self.text(text),
                TextStyle::Italic => self.ctx.text(text, FontStyle::Italic),
                TextStyle::Subscript => self.position_subscript(&reference, self.script(text)),
                TextStyle::Superscript => self.position_superscript(&reference, self.script(text)),
            })
            .collect();

        for i in 1..outlines.len() {
            // a charge stacks over the subscript before it
            let before = if i > 1
                && parts[i].1 == TextStyle::Superscript
                && parts[i - 1].1 == TextStyle::Subscript
            {
                i - 2
            } else {
                i - 1
            };
            outlines[i] = self.position_after(&outlines[before], &outlines[i]);
        }

        let is_normal = |i: &usize| parts[*i].1 == TextStyle::Normal;
        let primary = if hpos == HydrogenPosition::Left {
            (0..parts.len()).rev().find(is_normal)
        } else {
            (0..parts.len()).find(is_normal)
        }
        .unwrap_or(0);
        let element = outlines.remove(primary);
        AtomSymbol::new(element, outlines)
    }

    fn position_hydrogen(&self, hpos: HydrogenPosition, element: &TextOutline, hydrogen: TextOutline) -> TextOutline {
        let e = element.bounds();
        let h = hydrogen.bounds();
        let pad = self.padding();
        match hpos {
            HydrogenPosition::Right => hydrogen.translate(e.x1 + pad - h.x0, 0.0),
            HydrogenPosition::Left => hydrogen.translate(e.x0 - pad - h.x1, 0.0),
            HydrogenPosition::Above => hydrogen.translate(0.0, e.y1 + pad - h.y0),
            HydrogenPosition::Below => hydrogen.translate(0.0, e.y0 - pad - h.y1),
        }
    }

    /// Right of `label`, dropped half its height below the baseline.
    fn position_subscript(&self, label: &TextOutline, script: TextOutline) -> TextOutline {
        let l = label.bounds();
        let s = script.bounds();
        script.translate(l.x1 + self.padding() - s.x0, l.y0 - s.height() / 2.0 - s.y0)
    }

    /// Right of `label`, raised half its height above the cap line.
    fn position_superscript(&self, label: &TextOutline, script: TextOutline) -> TextOutline {
        let l = label.bounds();
        let s = script.bounds();
        script.translate(l.x1 + self.padding() - s.x0, l.y1 + s.height() / 2.0 - s.y1)
    }

    /// Top right of `reference`, centred on its top edge.
    fn position_charge(&self, reference: &TextOutline, charge: TextOutline) -> TextOutline {
        let r = reference.bounds();
        let c = charge.bounds();
        charge.translate(r.x1 + self.padding() - c.x0, r.y1 - c.center().y)
    }

    /// Top left of the element.
    fn position_mass(&self, element: &TextOutline, mass: TextOutline) -> TextOutline {
        let e = element.bounds();
        let m = mass.bounds();
        mass.translate(e.x0 - self.padding() - m.x1, e.y1 - m.center().y)
    }

    fn position_after(&self, before: &TextOutline, after: &TextOutline) -> TextOutline {
        let b = before.bounds();
        let a = after.bounds();
        after.translate(b.x1 + self.padding() - a.x0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depict::sgroups::SgroupDisplay;
    use crate::font::BoxMeasurer;
    use crate::params::{RenderParams, Selection};
    use crate::{Atom, Bond, Mol};

    #[test]
    fn unparsed_label_is_drawn_verbatim() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        mol.add_atom(Atom::new(6, 0.0, 0.0));
        let params = RenderParams::default();
        let display = SgroupDisplay::prepare(&mol, &Selection::default());
        let ctx = DepictContext::new(&mol, &params, &BoxMeasurer, display).unwrap();

        let symbol = abbreviation_symbol(&ctx, "Xyz123Q", HydrogenPosition::Right);
        assert_eq!(symbol.element_outline().text(), "Xyz123Q");
        assert!(symbol.adjunct_outlines().is_empty());
    }

    #[test]
    fn charge_texts() {
        assert_eq!(charge_text(0, 0), "");
        assert_eq!(charge_text(1, 0), "+");
        assert_eq!(charge_text(-1, 0), "\u{2212}");
        assert_eq!(charge_text(2, 0), "2+");
        assert_eq!(charge_text(-3, 0), "3\u{2212}");
        assert_eq!(charge_text(0, 1), "\u{2022}");
        assert_eq!(charge_text(-1, 1), "\u{2022}\u{2212}");
    }
}
