//! Sgroup display: contracted abbreviations, hidden copies of multiple
//! groups, and polymer and mixture brackets with their labels.

use std::collections::{HashMap, HashSet};

use kurbo::{BezPath, Point, Vec2};
use peniko::Color;
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::atoms;
use super::hydrogen::HydrogenPosition;
use super::outline::TextOutline;
use super::{DepictContext, Symbols};
use crate::font::FontStyle;
use crate::geom;
use crate::mol::Mol;
use crate::params::{HighlightStyle, Selection};
use crate::render::{Mark, RenderElement};
use crate::sgroup::{BracketStyle, Sgroup, SgroupBracket, SgroupKind};
use crate::traits::{DepictAtom, DepictBond};

/// Bracket ends closer than this are treated as level.
const EQUIV_THRESHOLD: f64 = 0.1;
/// Gap between a single atom symbol and its round brackets, as a fraction
/// of the model bond length.
const SYMBOL_BRACKET_GAP: f64 = 0.07;
/// Half the spread of round brackets around a bare atom, likewise.
const ATOM_BRACKET_GAP: f64 = 0.13;
const INTERPUNCT: &str = "\u{00B7}";

/// What sgroups hide or relabel before anything is drawn.
#[derive(Debug, Default)]
pub(crate) struct SgroupDisplay {
    pub hidden_atoms: HashSet<NodeIndex>,
    pub hidden_bonds: HashSet<EdgeIndex>,
    /// Atoms drawn with an abbreviation label instead of their element.
    pub symbol_remap: HashMap<NodeIndex, String>,
}

impl SgroupDisplay {
    pub fn prepare<A, B>(mol: &Mol<A, B>, selection: &Selection) -> Self
    where
        A: DepictAtom,
        B: DepictBond,
    {
        let mut display = SgroupDisplay::default();
        for sgroup in mol.sgroups() {
            if !is_well_formed(mol, sgroup) {
                log::warn!("sgroup {:?} refers to atoms or bonds not in the molecule", sgroup.kind);
                continue;
            }
            match sgroup.kind {
                SgroupKind::Abbreviation => display.contract_abbreviation(mol, sgroup, selection),
                SgroupKind::MultipleGroup => display.hide_multiple_parts(mol, sgroup),
                _ => {}
            }
        }
        display
    }

    fn contract_abbreviation<A, B>(&mut self, mol: &Mol<A, B>, sgroup: &Sgroup, selection: &Selection)
    where
        A: DepictAtom,
        B: DepictBond,
    {
        let Some(label) = sgroup.subscript.as_deref().filter(|l| !l.is_empty()) else {
            return;
        };
        if sgroup.expanded || sgroup.atoms.is_empty() {
            return;
        }
        if sgroup.crossing_bonds.len() > 1 {
            log::debug!("abbreviation {label} has several attachments, shown expanded");
            return;
        }
        if !has_uniform_highlight(mol, sgroup, selection) {
            log::debug!("abbreviation {label} is partly highlighted, shown expanded");
            return;
        }

        let atoms: HashSet<NodeIndex> = sgroup.atoms.iter().copied().collect();
        self.hidden_atoms.extend(atoms.iter().copied());
        for &atom in &atoms {
            self.hidden_bonds.extend(mol.bonds_of(atom));
        }

        if let Some(&xbond) = sgroup.crossing_bonds.first() {
            let Some((a, b)) = mol.bond_endpoints(xbond) else {
                return;
            };
            let attach = if atoms.contains(&a) { a } else { b };
            self.hidden_bonds.remove(&xbond);
            self.hidden_atoms.remove(&attach);
            self.symbol_remap.insert(attach, label.to_string());
        }
    }

    /// Only the parent copy of a multiple group is drawn.
    fn hide_multiple_parts<A, B>(&mut self, mol: &Mol<A, B>, sgroup: &Sgroup) {
        let atoms: HashSet<NodeIndex> = sgroup.atoms.iter().copied().collect();
        let parents: HashSet<NodeIndex> = sgroup.parent_atoms.iter().copied().collect();
        for bond in mol.bonds() {
            let Some((a, b)) = mol.bond_endpoints(bond) else {
                continue;
            };
            if parents.contains(&a) && parents.contains(&b) {
                continue;
            }
            if atoms.contains(&a) || atoms.contains(&b) {
                self.hidden_bonds.insert(bond);
            }
        }
        for &atom in atoms.difference(&parents) {
            self.hidden_atoms.insert(atom);
        }
        for &bond in &sgroup.crossing_bonds {
            if let Some((a, b)) = mol.bond_endpoints(bond) {
                if !self.hidden_atoms.contains(&a) && !self.hidden_atoms.contains(&b) {
                    self.hidden_bonds.remove(&bond);
                }
            }
        }
    }
}

fn is_well_formed<A, B>(mol: &Mol<A, B>, sgroup: &Sgroup) -> bool {
    let atom_ok = |a: &NodeIndex| a.index() < mol.atom_count();
    sgroup.atoms.iter().all(atom_ok)
        && sgroup.parent_atoms.iter().all(atom_ok)
        && sgroup
            .crossing_bonds
            .iter()
            .all(|b| b.index() < mol.bond_count())
}

/// An abbreviation only stands in for atoms and bonds that are all
/// unhighlighted or all highlighted alike, counting the selection as a
/// highlight of its own.
fn has_uniform_highlight<A, B>(mol: &Mol<A, B>, sgroup: &Sgroup, selection: &Selection) -> bool
where
    A: DepictAtom,
    B: DepictBond,
{
    let atoms: HashSet<NodeIndex> = sgroup.atoms.iter().copied().collect();
    let internal = mol.bonds().filter(|&b| {
        mol.bond_endpoints(b)
            .is_some_and(|(x, y)| atoms.contains(&x) && atoms.contains(&y))
    });
    let mut colors = sgroup
        .atoms
        .iter()
        .map(|&a| (mol.atom(a).highlight(), selection.contains_atom(a)))
        .chain(internal.map(|b| (mol.bond(b).highlight(), selection.contains_bond(b))));
    match colors.next() {
        Some(first) => colors.all(|c| c == first),
        None => true,
    }
}

/// Draws every sgroup, each marked with its index.
pub(crate) fn generate<A, B>(ctx: &DepictContext<'_, A, B>, symbols: &Symbols) -> RenderElement
where
    A: DepictAtom,
    B: DepictBond,
{
    let mut out = Vec::new();
    for (i, sgroup) in ctx.mol.sgroups().iter().enumerate() {
        if !is_well_formed(ctx.mol, sgroup) {
            continue;
        }
        let elem = match sgroup.kind {
            SgroupKind::Abbreviation => abbreviation_label(ctx, sgroup),
            SgroupKind::MultipleGroup => {
                let count = sgroup.subscript.clone();
                brackets(ctx, sgroup, Some(symbols), count, None)
            }
            kind if kind.is_polymer() => polymer_brackets(ctx, sgroup, symbols),
            _ => mixture_brackets(ctx, sgroup),
        };
        if !elem.is_empty() {
            out.push(RenderElement::marked(Mark::Sgroup(i), elem));
        }
    }
    RenderElement::Group(out)
}

/// Label of an abbreviation with no attachment, e.g. a counter ion, at the
/// centre of the atoms it hides.
fn abbreviation_label<A, B>(ctx: &DepictContext<'_, A, B>, sgroup: &Sgroup) -> RenderElement
where
    A: DepictAtom,
    B: DepictBond,
{
    let Some(label) = sgroup.subscript.as_deref().filter(|l| !l.is_empty()) else {
        return RenderElement::empty();
    };
    if sgroup.expanded
        || !sgroup.crossing_bonds.is_empty()
        || !has_uniform_highlight(ctx.mol, sgroup, &ctx.params.selection)
    {
        return RenderElement::empty();
    }
    let points: Vec<Point> = sgroup
        .atoms
        .iter()
        .filter(|&&a| ctx.has_pos(a))
        .map(|&a| ctx.pos(a))
        .collect();
    let Some(center) = geom::centroid(&points) else {
        return RenderElement::empty();
    };

    let inv = 1.0 / ctx.scale;
    let symbol = atoms::abbreviation_symbol(ctx, label, HydrogenPosition::Right)
        .resize(inv, inv)
        .center_to(center);
    let mut outlines: Vec<TextOutline> = symbol.outlines().cloned().collect();

    // separate a salt or solvent from the rest of the molecule
    let rest: Vec<Point> = ctx
        .mol
        .atoms()
        .filter(|a| !sgroup.contains_atom(*a) && !ctx.is_atom_hidden(*a))
        .map(|a| ctx.pos(a))
        .collect();
    if let (Some(rest), Some(bounds)) = (geom::centroid(&rest), symbol.hull().bounds()) {
        let dot = ctx.model_text(INTERPUNCT, FontStyle::Regular, 1.0);
        let d = dot.bounds();
        let y = symbol.element_outline().center().y - d.center().y;
        let pad = ctx.stroke;
        if center.x > rest.x + EQUIV_THRESHOLD {
            outlines.insert(0, dot.translate(bounds.x0 - pad - d.x1, y));
        } else if center.x < rest.x - EQUIV_THRESHOLD {
            outlines.push(dot.translate(bounds.x1 + pad - d.x0, y));
        }
    }

    let highlight = sgroup.atoms.first().and_then(|&a| ctx.atom_highlight(a));
    let color = match (highlight, ctx.params.highlighting) {
        (Some(c), HighlightStyle::Colored) => c,
        _ => ctx.foreground(),
    };
    let label = RenderElement::Group(
        outlines
            .iter()
            .map(|o| RenderElement::fill(o.path(), color))
            .collect(),
    );
    match (highlight, ctx.params.highlighting) {
        (Some(c), HighlightStyle::OuterGlow) => {
            RenderElement::Group(vec![label.outer_glow(c, 2.0 * ctx.glow_width()), label])
        }
        _ => label,
    }
}

fn polymer_brackets<A, B>(ctx: &DepictContext<'_, A, B>, sgroup: &Sgroup, symbols: &Symbols) -> RenderElement
where
    A: DepictAtom,
    B: DepictBond,
{
    let mut subscript = sgroup.subscript.clone();
    let mut connectivity = sgroup.connectivity.clone();
    let fixed = match sgroup.kind {
        SgroupKind::Copolymer => Some(match sgroup.subtype.as_deref() {
            Some("RAN") => "ran",
            Some("BLK") => "blk",
            Some("ALT") => "alt",
            _ => "co",
        }),
        SgroupKind::CrossLink => Some("xl"),
        SgroupKind::AnyPolymer => Some("any"),
        SgroupKind::Graft => Some("grf"),
        SgroupKind::Mer => Some("mer"),
        SgroupKind::Monomer => Some("mon"),
        SgroupKind::Modified => Some("mod"),
        SgroupKind::StructureRepeatUnit => {
            subscript.get_or_insert_with(|| "n".to_string());
            connectivity.get_or_insert_with(|| "eu".to_string());
            None
        }
        _ => None,
    };
    if let Some(text) = fixed {
        subscript = Some(text.to_string());
    }
    // head-to-tail is the default, and a single atom is symmetric anyway
    if connectivity.as_deref() == Some("ht") || sgroup.atoms.len() == 1 {
        connectivity = None;
    }
    brackets(ctx, sgroup, Some(symbols), subscript, connectivity)
}

fn mixture_brackets<A, B>(ctx: &DepictContext<'_, A, B>, sgroup: &Sgroup) -> RenderElement
where
    A: DepictAtom,
    B: DepictBond,
{
    let subscript = match sgroup.kind {
        SgroupKind::Component => match sgroup.component_number {
            Some(n) => format!("c{n}"),
            None => "c".to_string(),
        },
        SgroupKind::Mixture => "mix".to_string(),
        SgroupKind::Formulation => "f".to_string(),
        _ => "?".to_string(),
    };
    brackets(ctx, sgroup, None, Some(subscript), None)
}

/// Brackets with a subscript at the lower end and a superscript at the
/// upper end of the rightmost bracket.
fn brackets<A, B>(
    ctx: &DepictContext<'_, A, B>,
    sgroup: &Sgroup,
    symbols: Option<&Symbols>,
    subscript: Option<String>,
    superscript: Option<String>,
) -> RenderElement
where
    A: DepictAtom,
    B: DepictBond,
{
    let subscript = subscript.filter(|s| !s.is_empty());
    let superscript = superscript.filter(|s| !s.is_empty());

    if let ([atom], Some(symbols)) = (&sgroup.atoms[..], symbols) {
        let symbol = symbols.get(atom.index()).and_then(Option::as_ref);
        let is_count = subscript
            .as_deref()
            .is_some_and(|s| s.chars().all(|c| c.is_ascii_digit()));
        if is_count && sgroup.crossing_bonds.is_empty() {
            if let (Some(symbol), Some(count)) = (symbol, subscript.as_deref()) {
                return count_prefix(ctx, symbol, count);
            }
        } else if !sgroup.crossing_bonds.is_empty() {
            return atom_brackets(ctx, *atom, symbol, subscript.as_deref(), superscript.as_deref());
        }
    }

    if sgroup.brackets.is_empty() {
        return RenderElement::empty();
    }
    let Some(directed) = orient_brackets(ctx, sgroup) else {
        log::warn!(
            "could not pair {} brackets with {} crossing bonds, brackets not drawn",
            sgroup.brackets.len(),
            sgroup.crossing_bonds.len()
        );
        return RenderElement::empty();
    };

    let fg = ctx.foreground();
    let depth = ctx.bracket_depth();
    let mut out = Vec::new();
    let mut suffix: Option<(Point, Point, Vec2)> = None;
    for &(p1, p2, inward) in &directed {
        let perp = inward * depth;
        let path = match sgroup.bracket_style {
            BracketStyle::Square => square_bracket(p1, p2, perp),
            BracketStyle::Round => round_bracket(p1, p2, perp),
        };
        out.push(RenderElement::stroke(path, ctx.stroke, fg));

        // the most eastern bracket, or the most southern of those level
        let better = match suffix {
            None => true,
            Some((s1, s2, _)) => {
                let dx = p1.x.max(p2.x) - s1.x.max(s2.x);
                let dy = p1.y.max(p2.y) - s1.y.max(s2.y);
                dx > EQUIV_THRESHOLD || (dx > -EQUIV_THRESHOLD && dy < -EQUIV_THRESHOLD)
            }
        };
        if better {
            suffix = Some((p1, p2, inward));
        }
    }

    if let Some((mut sub_at, mut sup_at, inward)) = suffix {
        // subscript on the lower end
        let dx = sub_at.x - sup_at.x;
        let dy = sub_at.y - sup_at.y;
        if dy > EQUIV_THRESHOLD || (dy > -EQUIV_THRESHOLD && dx > EQUIV_THRESHOLD) {
            std::mem::swap(&mut sub_at, &mut sup_at);
        }
        if let Some(text) = &subscript {
            let label = suffix_label(ctx, text, sub_at, -inward, depth);
            out.push(RenderElement::fill(label.path(), fg));
        }
        if let Some(text) = &superscript {
            let label = suffix_label(ctx, text, sup_at, -inward, depth);
            out.push(RenderElement::fill(label.path(), fg));
        }
    }
    RenderElement::Group(out)
}

/// Each bracket as its two ends and a unit vector pointing into the group.
/// `None` when brackets and crossing bonds cannot be paired one to one.
fn orient_brackets<A, B>(ctx: &DepictContext<'_, A, B>, sgroup: &Sgroup) -> Option<Vec<(Point, Point, Vec2)>>
where
    A: DepictAtom,
    B: DepictBond,
{
    let ends = |b: &SgroupBracket| (geom::point(b.first), geom::point(b.second));
    let valid: Vec<(Point, Point)> = sgroup
        .brackets
        .iter()
        .map(ends)
        .filter(|(p1, p2)| geom::normalize(*p2 - *p1).is_some())
        .collect();

    if !sgroup.crossing_bonds.is_empty() {
        let pairs = pair_brackets(ctx, sgroup)?;
        let directed = pairs
            .into_iter()
            .filter_map(|(bracket, bond)| {
                let (p1, p2) = ends(bracket);
                let (a, b) = ctx.mol.bond_endpoints(bond)?;
                let inner = if sgroup.contains_atom(a) { a } else { b };
                let perp = geom::normalize(geom::perpendicular(p2 - p1))?;
                let toward = ctx.pos(inner) - p1.midpoint(p2);
                Some((p1, p2, if perp.dot(toward) < 0.0 { -perp } else { perp }))
            })
            .collect();
        return Some(directed);
    }

    if let [(a1, a2), (b1, b2)] = valid[..] {
        // no bonds to go by: point the pair at each other
        let pa = geom::normalize(geom::perpendicular(a2 - a1))?;
        let pb = geom::normalize(geom::perpendicular(b2 - b1))?;
        let pa = if pa.dot(b1 - a1) < 0.0 { -pa } else { pa };
        let pb = if pb.dot(a1 - b1) < 0.0 { -pb } else { pb };
        return Some(vec![(a1, a2, pa), (b1, b2, pb)]);
    }

    let points: Vec<Point> = sgroup
        .atoms
        .iter()
        .filter(|&&a| ctx.has_pos(a))
        .map(|&a| ctx.pos(a))
        .collect();
    let center = geom::centroid(&points)?;
    Some(
        valid
            .into_iter()
            .filter_map(|(p1, p2)| {
                let perp = geom::normalize(geom::perpendicular(p2 - p1))?;
                let toward = center - p1.midpoint(p2);
                Some((p1, p2, if perp.dot(toward) < 0.0 { -perp } else { perp }))
            })
            .collect(),
    )
}

/// One crossing bond per bracket, by segment intersection.
fn pair_brackets<'s, A, B>(
    ctx: &DepictContext<'_, A, B>,
    sgroup: &'s Sgroup,
) -> Option<Vec<(&'s SgroupBracket, EdgeIndex)>>
where
    A: DepictAtom,
    B: DepictBond,
{
    if sgroup.brackets.len() != sgroup.crossing_bonds.len() {
        return None;
    }
    let mut pairs = Vec::with_capacity(sgroup.brackets.len());
    for bracket in &sgroup.brackets {
        let (p1, p2) = (geom::point(bracket.first), geom::point(bracket.second));
        let mut crossing = sgroup.crossing_bonds.iter().filter(|&&bond| {
            ctx.mol
                .bond_endpoints(bond)
                .is_some_and(|(a, b)| geom::segments_intersect(p1, p2, ctx.pos(a), ctx.pos(b)))
        });
        let bond = *crossing.next()?;
        if crossing.next().is_some() {
            return None;
        }
        pairs.push((bracket, bond));
    }
    Some(pairs)
}

fn square_bracket(p1: Point, p2: Point, perp: Vec2) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(p1 + perp);
    path.line_to(p1);
    path.line_to(p2);
    path.line_to(p2 + perp);
    path
}

fn round_bracket(p1: Point, p2: Point, perp: Vec2) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(p1 + perp);
    path.quad_to(p1.midpoint(p2) - perp, p2 + perp);
    path
}

/// Lowercase bracket label with its first character `distance` from `at`
/// along `outward`.
fn suffix_label<A, B>(ctx: &DepictContext<'_, A, B>, text: &str, at: Point, outward: Vec2, distance: f64) -> TextOutline
where
    A: DepictAtom,
    B: DepictBond,
{
    let label = ctx.model_text(&text.to_lowercase(), FontStyle::Regular, ctx.params.sgroup_font_scale);
    let target = at + outward * distance;
    let first = label.first_glyph_center();
    label.translate(target.x - first.x, target.y - first.y)
}

/// Symbol bounds grown by two strokes each way.
fn padded_bounds<A, B>(ctx: &DepictContext<'_, A, B>, symbol: &super::symbol::AtomSymbol) -> Option<kurbo::Rect> {
    let pad = 2.0 * ctx.stroke;
    symbol.hull().bounds().map(|b| b.inflate(pad, pad))
}

/// `·2` in front of a repeated unattached atom, as in `·2 HCl`.
fn count_prefix<A, B>(ctx: &DepictContext<'_, A, B>, symbol: &super::symbol::AtomSymbol, count: &str) -> RenderElement
where
    A: DepictAtom,
    B: DepictBond,
{
    let Some(bounds) = padded_bounds(ctx, symbol) else {
        return RenderElement::empty();
    };
    let text = ctx.model_text(&format!("{INTERPUNCT}{count}"), FontStyle::Regular, 1.0);
    let t = text.bounds();
    let text = text.translate(bounds.x0 - t.x1, symbol.alignment_center().y - t.center().y);
    RenderElement::fill(text.path(), ctx.foreground())
}

/// Round brackets around a single bonded atom, as in `CC[O]CC` repeat
/// units, with the labels after the closing bracket.
fn atom_brackets<A, B>(
    ctx: &DepictContext<'_, A, B>,
    atom: NodeIndex,
    symbol: Option<&super::symbol::AtomSymbol>,
    subscript: Option<&str>,
    superscript: Option<&str>,
) -> RenderElement
where
    A: DepictAtom,
    B: DepictBond,
{
    let model_bond = ctx.params.bond_length / ctx.scale;
    let open = ctx.model_text("(", FontStyle::Regular, 1.0);
    let close = ctx.model_text(")", FontStyle::Regular, 1.0);
    let (oc, cc) = (open.center(), close.center());

    let (open, close) = match symbol.and_then(|s| Some((s, padded_bounds(ctx, s)?))) {
        Some((symbol, bounds)) => {
            let gap = SYMBOL_BRACKET_GAP * model_bond;
            let y = symbol.alignment_center().y;
            (
                open.translate(bounds.x0 - gap - oc.x, y - oc.y),
                close.translate(bounds.x1 + gap - cc.x, y - cc.y),
            )
        }
        None => {
            let p = ctx.pos(atom);
            let gap = ATOM_BRACKET_GAP * model_bond;
            (
                open.translate(p.x - gap - oc.x, p.y - oc.y),
                close.translate(p.x + gap - cc.x, p.y - cc.y),
            )
        }
    };

    let fg: Color = ctx.foreground();
    let cb = close.bounds();
    let nudge = SYMBOL_BRACKET_GAP * model_bond;
    let mut out = vec![
        RenderElement::fill(open.path(), fg),
        RenderElement::fill(close.path(), fg),
    ];
    if let Some(text) = subscript {
        let label = suffix_label(
            ctx,
            text,
            Point::new(cb.x1, cb.y0 - nudge),
            Vec2::new(-1.0, 0.0),
            0.5 * cb.width(),
        );
        out.push(RenderElement::fill(label.path(), fg));
    }
    if let Some(text) = superscript {
        let label = suffix_label(
            ctx,
            text,
            Point::new(cb.x1, cb.y1 + nudge),
            Vec2::new(-1.0, 0.0),
            cb.width(),
        );
        out.push(RenderElement::fill(label.path(), fg));
    }
    RenderElement::Group(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Atom, Bond};

    fn propyl_chloride() -> Mol<Atom, Bond> {
        let mut mol = Mol::new();
        let c1 = mol.add_atom(Atom::new(6, 0.0, 0.0));
        let c2 = mol.add_atom(Atom::new(6, 1.5, 0.0));
        let c3 = mol.add_atom(Atom::new(6, 3.0, 0.0));
        let cl = mol.add_atom(Atom::new(17, 4.5, 0.0));
        mol.add_bond(c1, c2, Bond::default());
        let x = mol.add_bond(c2, c3, Bond::default());
        mol.add_bond(c3, cl, Bond::default());
        mol.add_sgroup(Sgroup::abbreviation("CH2Cl", vec![c3, cl], vec![x]));
        mol
    }

    #[test]
    fn abbreviation_hides_members_but_keeps_attachment() {
        let mol = propyl_chloride();
        let display = SgroupDisplay::prepare(&mol, &Selection::default());
        let c3 = NodeIndex::new(2);
        let cl = NodeIndex::new(3);
        assert!(display.hidden_atoms.contains(&cl));
        assert!(!display.hidden_atoms.contains(&c3));
        assert_eq!(display.symbol_remap.get(&c3).map(String::as_str), Some("CH2Cl"));
        assert!(display.hidden_bonds.contains(&EdgeIndex::new(2)));
        assert!(!display.hidden_bonds.contains(&EdgeIndex::new(1)));
    }

    #[test]
    fn expanded_abbreviation_is_left_alone() {
        let mut mol = propyl_chloride();
        let mut sgroups = mol.sgroups().to_vec();
        sgroups[0].expanded = true;
        mol.set_sgroups(sgroups);
        let display = SgroupDisplay::prepare(&mol, &Selection::default());
        assert!(display.hidden_atoms.is_empty());
        assert!(display.symbol_remap.is_empty());
    }

    #[test]
    fn mixed_highlight_keeps_abbreviation_expanded() {
        let mut mol = propyl_chloride();
        mol.atom_mut(NodeIndex::new(3)).highlight = Some(crate::color::RED);
        let display = SgroupDisplay::prepare(&mol, &Selection::default());
        assert!(display.symbol_remap.is_empty());
    }

    #[test]
    fn partly_selected_abbreviation_stays_expanded() {
        let mol = propyl_chloride();
        let partial = Selection {
            atoms: vec![3],
            bonds: vec![],
        };
        let display = SgroupDisplay::prepare(&mol, &partial);
        assert!(display.symbol_remap.is_empty());
        assert!(display.hidden_atoms.is_empty());

        let whole = Selection {
            atoms: vec![2, 3],
            bonds: vec![2],
        };
        let display = SgroupDisplay::prepare(&mol, &whole);
        assert_eq!(display.symbol_remap.len(), 1);
    }

    #[test]
    fn out_of_range_sgroup_is_ignored() {
        let mut mol = propyl_chloride();
        mol.add_sgroup(Sgroup::abbreviation("X", vec![NodeIndex::new(40)], vec![]));
        let display = SgroupDisplay::prepare(&mol, &Selection::default());
        assert_eq!(display.symbol_remap.len(), 1);
    }

    #[test]
    fn multiple_group_hides_copies() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        let a = mol.add_atom(Atom::new(6, 0.0, 0.0));
        let b = mol.add_atom(Atom::new(6, 1.5, 0.0));
        let c = mol.add_atom(Atom::new(6, 3.0, 0.0));
        let ab = mol.add_bond(a, b, Bond::default());
        let bc = mol.add_bond(b, c, Bond::default());
        let mut sgroup = Sgroup::new(SgroupKind::MultipleGroup);
        sgroup.atoms = vec![b, c];
        sgroup.parent_atoms = vec![b];
        sgroup.crossing_bonds = vec![ab];
        sgroup.subscript = Some("2".into());
        mol.add_sgroup(sgroup);

        let display = SgroupDisplay::prepare(&mol, &Selection::default());
        assert!(display.hidden_atoms.contains(&c));
        assert!(!display.hidden_atoms.contains(&b));
        assert!(display.hidden_bonds.contains(&bc));
        assert!(!display.hidden_bonds.contains(&ab));
    }
}
