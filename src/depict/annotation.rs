//! Placement of atom and bond notes (atom maps, CIP labels and the like).
//!
//! A note starting with `|` is drawn in italics, without the bar.

use kurbo::{Point, Vec2};

use super::atoms;
use super::hull::ConvexHull;
use super::outline::TextOutline;
use super::{DepictContext, Symbols};
use crate::bond::{BondDisplay, BondOrder};
use crate::font::FontStyle;
use crate::geom;
use crate::render::RenderElement;
use crate::traits::{DepictAtom, DepictBond};

const ITALIC_PREFIX: char = '|';

/// Bonds wider apart than this push the note outside their angle.
const NOOK_ANGLE_DEGREES: f64 = 65.0;

/// A bond seen from one of its atoms.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BondDir {
    pub vector: Vec2,
    pub plain: bool,
    pub wedge: bool,
}

impl BondDir {
    pub fn new(vector: Vec2, order: BondOrder, display: BondDisplay) -> Self {
        let wedge = display.is_wedge();
        Self {
            vector,
            plain: order == BondOrder::Single && (display == BondDisplay::Solid || wedge),
            wedge,
        }
    }
}

/// Direction from an atom to its note. `aux` holds other directions to
/// avoid, such as the side its hydrogen label is on.
pub(crate) fn atom_annotation_vector(bonds: &[BondDir], aux: &[Vec2]) -> Vec2 {
    let vectors: Vec<Vec2> = bonds.iter().map(|b| b.vector).collect();
    match (vectors.len(), aux.len()) {
        (0, 0) => Vec2::new(0.0, -1.0),
        (0, 1) => -aux[0],
        (0, _) => geom::vector_in_largest_gap(aux),
        (1, 0) => -vectors[0],
        (2, 0) => between_two(bonds[0], bonds[1]).unwrap_or_else(|| geom::vector_in_largest_gap(&vectors)),
        (3, 0) => between_plain_pair(bonds).unwrap_or_else(|| geom::vector_in_largest_gap(&vectors)),
        _ => {
            let all: Vec<Vec2> = vectors.iter().chain(aux).copied().collect();
            geom::vector_in_largest_gap(&all)
        }
    }
}

fn between_two(a: BondDir, b: BondDir) -> Option<Vec2> {
    let bisector = geom::normalize(a.vector + b.vector)?;
    let nook = geom::angle_between(a.vector, b.vector) < NOOK_ANGLE_DEGREES.to_radians()
        || (a.wedge && b.wedge);
    Some(if nook { bisector } else { -bisector })
}

fn between_plain_pair(bonds: &[BondDir]) -> Option<Vec2> {
    let plain: Vec<&BondDir> = bonds.iter().filter(|b| b.plain).collect();
    let [p, q] = plain[..] else {
        return None;
    };
    let other = bonds.iter().find(|b| !b.plain)?;
    let bisector = geom::normalize(p.vector + q.vector)?;
    Some(if bisector.dot(other.vector) > 0.0 {
        -bisector
    } else {
        bisector
    })
}

/// Lays out `label` at `distance` from `base` along the unit `direction`.
/// With a hull, the distance is measured from where the direction leaves it.
pub(crate) fn place_annotation<A, B>(
    ctx: &DepictContext<'_, A, B>,
    base: Point,
    label: &str,
    direction: Vec2,
    distance: f64,
    hull: Option<&ConvexHull>,
) -> TextOutline
where
    A: DepictAtom,
    B: DepictBond,
{
    let (style, label) = match label.strip_prefix(ITALIC_PREFIX) {
        Some(rest) => (FontStyle::Italic, rest),
        None => (FontStyle::Regular, label),
    };
    let outline = ctx.model_text(label, style, ctx.params.annotation_font_scale);
    let anchor = if direction.x > 0.3 {
        outline.first_glyph_center()
    } else if direction.x < -0.3 {
        outline.last_glyph_center()
    } else {
        outline.center()
    };

    let base = hull
        .and_then(|h| h.intersect(base, base + direction))
        .unwrap_or(base);
    let target = base + direction * distance;
    outline.translate(target.x - anchor.x, target.y - anchor.y)
}

/// Places atom notes. Notes of atoms with a symbol travel with it; the rest
/// go straight to `out`.
pub(crate) fn annotate_atoms<A, B>(
    ctx: &DepictContext<'_, A, B>,
    symbols: &mut Symbols,
    out: &mut Vec<RenderElement>,
) where
    A: DepictAtom,
    B: DepictBond,
{
    for atom in ctx.mol.atoms() {
        if ctx.is_atom_hidden(atom) {
            continue;
        }
        let a = ctx.mol.atom(atom);
        let Some(note) = a.note().filter(|n| !n.is_empty()) else {
            continue;
        };

        let bonds: Vec<BondDir> = ctx
            .visible_bonds(atom)
            .into_iter()
            .map(|b| {
                let bond = ctx.mol.bond(b);
                BondDir::new(ctx.bond_vector(atom, b), bond.bond_order(), bond.bond_display())
            })
            .collect();
        let slot = &mut symbols[atom.index()];
        let mut aux = Vec::new();
        if slot.is_some() && a.hydrogen_count() > 0 {
            aux.push(atoms::hydrogen_position(ctx, atom).vector());
        }
        let direction = atom_annotation_vector(&bonds, &aux);

        match slot.take() {
            Some(symbol) => {
                let distance = ctx.annotation_distance() - ctx.stroke;
                let outline =
                    place_annotation(ctx, ctx.pos(atom), note, direction, distance, Some(symbol.hull()));
                *slot = Some(symbol.add_annotation(outline));
            }
            None => {
                let outline =
                    place_annotation(ctx, ctx.pos(atom), note, direction, ctx.annotation_distance(), None);
                out.push(RenderElement::fill(outline.path(), ctx.params.annotation_color));
            }
        }
    }
}

/// Places bond notes beside the bond midpoint, outside any ring it is in
/// and otherwise on the side with fewer neighbouring bonds.
pub(crate) fn annotate_bonds<A, B>(ctx: &DepictContext<'_, A, B>, out: &mut Vec<RenderElement>)
where
    A: DepictAtom,
    B: DepictBond,
{
    for bond in ctx.mol.bonds() {
        if ctx.is_bond_hidden(bond) {
            continue;
        }
        let Some(note) = ctx.mol.bond(bond).note().filter(|n| !n.is_empty()) else {
            continue;
        };
        let Some((a, b)) = ctx.mol.bond_endpoints(bond) else {
            continue;
        };
        let (pa, pb) = (ctx.pos(a), ctx.pos(b));
        let mid = pa.midpoint(pb);
        let mut perp = geom::perpendicular(geom::unit(pa, pb));

        let ring = ctx.rings.rings().iter().find(|r| r.contains_bond(bond));
        let flip = match ring {
            Some(ring) => {
                let points: Vec<Point> = ring.atoms().iter().map(|&x| ctx.pos(x)).collect();
                geom::centroid(&points).is_some_and(|c| perp.dot(mid - c) < 0.0)
            }
            None => {
                let crowding: f64 = [a, b]
                    .iter()
                    .flat_map(|&x| {
                        ctx.visible_bonds(x)
                            .into_iter()
                            .filter(move |&o| o != bond)
                            .map(move |o| ctx.bond_vector(x, o))
                    })
                    .map(|v| v.dot(perp))
                    .sum();
                crowding > 0.0
            }
        };
        if flip {
            perp = -perp;
        }

        let outline = place_annotation(ctx, mid, note, perp, ctx.annotation_distance(), None);
        out.push(RenderElement::fill(outline.path(), ctx.params.annotation_color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(deg: f64) -> Vec2 {
        let r = deg.to_radians();
        Vec2::new(r.cos(), r.sin())
    }

    fn plain(deg: f64) -> BondDir {
        BondDir::new(dir(deg), BondOrder::Single, BondDisplay::Solid)
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn lone_atom_note_goes_below() {
        assert!(close(atom_annotation_vector(&[], &[]), Vec2::new(0.0, -1.0)));
        assert!(close(
            atom_annotation_vector(&[], &[Vec2::new(1.0, 0.0)]),
            Vec2::new(-1.0, 0.0)
        ));
    }

    #[test]
    fn terminal_atom_note_faces_away() {
        let v = atom_annotation_vector(&[plain(30.0)], &[]);
        assert!(close(v, -dir(30.0)));
    }

    #[test]
    fn wide_pair_puts_note_outside() {
        let v = atom_annotation_vector(&[plain(-30.0), plain(-150.0)], &[]);
        assert!(close(v, Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn narrow_pair_keeps_note_in_nook() {
        let v = atom_annotation_vector(&[plain(0.0), plain(60.0)], &[]);
        assert!(close(v, dir(30.0)));
    }

    #[test]
    fn wedged_pair_keeps_note_in_nook() {
        let a = BondDir::new(dir(-30.0), BondOrder::Single, BondDisplay::WedgeBegin);
        let b = BondDir::new(dir(-150.0), BondOrder::Single, BondDisplay::HashedWedgeBegin);
        let v = atom_annotation_vector(&[a, b], &[]);
        assert!(close(v, Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn collinear_pair_uses_a_gap() {
        let v = atom_annotation_vector(&[plain(0.0), plain(180.0)], &[]);
        assert!(v.x.abs() < 1e-9);
        assert!((v.hypot() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn three_bonds_avoid_the_double_bond() {
        let double = BondDir::new(dir(90.0), BondOrder::Double, BondDisplay::Solid);
        let v = atom_annotation_vector(&[double, plain(210.0), plain(330.0)], &[]);
        assert!(close(v, Vec2::new(0.0, -1.0)));
    }
}
