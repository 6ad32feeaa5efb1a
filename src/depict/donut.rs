//! Aromatic rings drawn as a circle inside the ring instead of alternating
//! double bonds.

use std::collections::HashSet;
use std::f64::consts::PI;

use kurbo::Point;
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::abbrev::MINUS;
use super::DepictContext;
use crate::bond::BondOrder;
use crate::font::FontStyle;
use crate::geom;
use crate::render::{Mark, RenderElement};
use crate::rings::Ring;
use crate::traits::{DepictAtom, DepictBond};

/// Rings this size or larger keep their bonds.
const MAX_RING_SIZE: usize = 8;

/// Result of donut generation.
#[derive(Debug, Default)]
pub(crate) struct Donuts {
    /// Bonds drawn as plain single lines under a donut.
    pub bonds: HashSet<EdgeIndex>,
    /// Atoms whose charge is shown at the ring centre instead.
    pub charged_atoms: HashSet<NodeIndex>,
    pub elements: Vec<RenderElement>,
}

pub(crate) fn generate<A, B>(ctx: &DepictContext<'_, A, B>) -> Donuts
where
    A: DepictAtom,
    B: DepictBond,
{
    let mut donuts = Donuts::default();
    for ring in ctx.rings.rings() {
        if !is_delocalised(ctx, ring) {
            continue;
        }
        donuts.bonds.extend(ring.bonds().iter().copied());

        let mut charge = 0i32;
        for &atom in ring.atoms() {
            let q = ctx.mol.atom(atom).formal_charge();
            // fused ring atoms keep their own charge label
            if q != 0 && ctx.rings.rings_of_atom(atom).count() == 1 {
                charge += i32::from(q);
                donuts.charged_atoms.insert(atom);
            }
        }

        let points: Vec<Point> = ring.atoms().iter().map(|&a| ctx.pos(a)).collect();
        let Some(center) = geom::centroid(&points) else {
            continue;
        };
        let mut parts = Vec::new();
        if charge != 0 {
            let label = ctx.model_text(&charge_label(charge), FontStyle::Regular, 1.0);
            let c = label.center();
            let label = label.translate(center.x - c.x, center.y - c.y);
            parts.push(RenderElement::fill(label.path(), ctx.foreground()));
        }

        let Some(side) = ctx.median_bond_length(ring.bonds()) else {
            continue;
        };
        let n = ring.bonds().len() as f64;
        let radius = side / (2.0 * (PI / n).tan()) - 1.5 * ctx.separation();
        if radius > 0.0 {
            parts.push(RenderElement::oval(center, radius, false, ctx.stroke, ctx.foreground()));
        } else {
            log::debug!("ring of {} atoms too small for a donut", ring.len());
        }
        donuts
            .elements
            .push(RenderElement::marked(Mark::Donut, RenderElement::Group(parts)));
    }
    donuts
}

/// Small rings whose every bond is aromatic and, unless delocalisation is
/// forced, has no Kekulé order.
fn is_delocalised<A, B>(ctx: &DepictContext<'_, A, B>, ring: &Ring) -> bool
where
    A: DepictAtom,
    B: DepictBond,
{
    ring.len() < MAX_RING_SIZE
        && ring.bonds().iter().all(|&b| {
            let bond = ctx.mol.bond(b);
            !ctx.is_bond_hidden(b)
                && bond.is_aromatic()
                && (bond.bond_order() == BondOrder::Unset || ctx.params.force_delocalised)
        })
}

/// `+`, `−`, `+2`, `−3`.
fn charge_label(charge: i32) -> String {
    let sign = if charge < 0 { MINUS } else { '+' };
    let magnitude = charge.unsigned_abs();
    if magnitude > 1 {
        format!("{sign}{magnitude}")
    } else {
        sign.to_string()
    }
}
