//! Bond geometry.
//!
//! Every bond end is backed off the hull of a drawn symbol by a small margin.
//! Double bonds are drawn offset to one side when that side is clear (ring
//! interiors first), and centred otherwise.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use kurbo::{BezPath, Point, Vec2};
use peniko::Color;
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::{DepictContext, Symbols};
use crate::bond::{BondDisplay, BondOrder};
use crate::element;
use crate::geom;
use crate::render::RenderElement;
use crate::rings::Ring;
use crate::traits::{DepictAtom, DepictBond};

/// Bold wedges are not reshaped against bonds shallower than this.
const BOLD_WEDGE_THRESHOLD: f64 = 15.0 * PI / 180.0;
/// Hashed wedge rungs are not slanted against bonds shallower than this.
const HASH_WEDGE_THRESHOLD: f64 = 35.0 * PI / 180.0;
/// Output units a bond may exceed the set bond length by and still get
/// slanted hash rungs.
const LONG_BOND_SLACK: f64 = 4.0;

pub(crate) struct BondGenerator<'c, 'a, A, B> {
    ctx: &'c DepictContext<'a, A, B>,
    symbols: &'c mut Symbols,
    delocalised: &'c HashSet<EdgeIndex>,
    ring_map: HashMap<EdgeIndex, Ring>,
    foreground: Color,
    stroke: f64,
    separation: f64,
    wedge_width: f64,
    hash_spacing: f64,
    wave_spacing: f64,
    margin: f64,
}

impl<'c, 'a, A, B> BondGenerator<'c, 'a, A, B>
where
    A: DepictAtom,
    B: DepictBond,
{
    pub fn new(
        ctx: &'c DepictContext<'a, A, B>,
        symbols: &'c mut Symbols,
        delocalised: &'c HashSet<EdgeIndex>,
    ) -> Self {
        Self {
            ring_map: ring_preference_map(ctx),
            foreground: ctx.foreground(),
            stroke: ctx.stroke,
            separation: ctx.separation(),
            wedge_width: ctx.wedge_width(),
            hash_spacing: ctx.hash_spacing(),
            wave_spacing: ctx.wave_spacing(),
            margin: ctx.margin(),
            ctx,
            symbols,
            delocalised,
        }
    }

    pub fn generate(&mut self, bond: EdgeIndex) -> Option<RenderElement> {
        let (a1, a2) = self.ctx.mol.bond_endpoints(bond)?;
        let b = self.ctx.mol.bond(bond);
        let aromatic = b.is_aromatic();
        let delocalised = self.delocalised.contains(&bond);
        let forced = self.ctx.params.force_delocalised;

        let elem = match b.bond_order() {
            BondOrder::Single => {
                if aromatic && !delocalised && forced && self.ctx.rings.is_ring_bond(bond) {
                    self.double_bond(bond, a1, a2, true)
                } else {
                    self.single_bond(bond, a1, a2)
                }
            }
            BondOrder::Double => {
                if delocalised {
                    self.single_bond(bond, a1, a2)
                } else {
                    self.double_bond(bond, a1, a2, aromatic && forced)
                }
            }
            BondOrder::Triple => self.triple_bond(a1, a2),
            BondOrder::Unset if aromatic => {
                if delocalised {
                    self.single_bond(bond, a1, a2)
                } else {
                    self.double_bond(bond, a1, a2, true)
                }
            }
            order => {
                log::debug!("bond order {order:?} drawn as a dashed bond");
                self.dashed_bond(a1, a2)
            }
        };

        let mut parts = vec![elem];
        for atom in [a1, a2] {
            if self.ctx.mol.atom(atom).attach_point() > 0 {
                parts.push(self.attach_point(atom, bond));
            }
        }
        Some(if parts.len() == 1 {
            parts.remove(0)
        } else {
            RenderElement::Group(parts)
        })
    }

    fn single_bond(&self, bond: EdgeIndex, a1: NodeIndex, a2: NodeIndex) -> RenderElement {
        match self.ctx.mol.bond(bond).bond_display() {
            BondDisplay::Solid => self.plain_bond(a1, a2),
            BondDisplay::WedgeBegin => self.bold_wedge(bond, a1, a2),
            BondDisplay::WedgeEnd => self.bold_wedge(bond, a2, a1),
            BondDisplay::HashedWedgeBegin => self.hashed_wedge(bond, a1, a2),
            BondDisplay::HashedWedgeEnd => self.hashed_wedge(bond, a2, a1),
            BondDisplay::Wavy => self.wavy_bond(a1, a2),
            BondDisplay::Dash => self.dashed_bond(a1, a2),
            BondDisplay::Dot => self.dotted_bond(a1, a2),
            BondDisplay::Bold => self.bold_bond(a1, a2),
            BondDisplay::Hash => self.hash_bond(a1, a2),
            BondDisplay::ArrowEnd => self.arrow_bond(a1, a2),
            BondDisplay::ArrowBegin => self.arrow_bond(a2, a1),
            display @ (BondDisplay::Crossed | BondDisplay::Unsupported) => {
                log::warn!("bond style {display:?} not drawn on a single bond, using a plain line");
                self.plain_bond(a1, a2)
            }
        }
    }

    fn pos(&self, atom: NodeIndex) -> Point {
        self.ctx.pos(atom)
    }

    fn has_symbol(&self, atom: NodeIndex) -> bool {
        self.symbols
            .get(atom.index())
            .is_some_and(|s| s.is_some())
    }

    fn line(&self, a: Point, b: Point) -> RenderElement {
        RenderElement::line(a, b, self.stroke, self.foreground)
    }

    /// Where a bond from `from` toward `to` leaves the symbol of `from`.
    fn back_off_point(&self, from: NodeIndex, to: NodeIndex) -> Point {
        self.back_off_along(from, self.pos(from), self.pos(to))
    }

    /// Trims the start of the segment `start-end` to clear the symbol of
    /// `atom`, if it has one.
    fn back_off_along(&self, atom: NodeIndex, start: Point, end: Point) -> Point {
        let Some(Some(symbol)) = self.symbols.get(atom.index()) else {
            return start;
        };
        match symbol.hull().intersect(start, end) {
            Some(hit) => hit + geom::unit(start, end) * self.margin,
            None => start,
        }
    }

    /// Visible bonds at `atom` other than `bond`.
    fn other_bonds(&self, atom: NodeIndex, bond: EdgeIndex) -> Vec<EdgeIndex> {
        let mut bonds = self.ctx.visible_bonds(atom);
        bonds.retain(|&b| b != bond);
        bonds
    }

    fn vectors_from(&self, atom: NodeIndex, bonds: &[EdgeIndex]) -> Vec<Vec2> {
        bonds.iter().map(|&b| self.ctx.bond_vector(atom, b)).collect()
    }

    fn at_wide_end_of_wedge(&self, atom: NodeIndex, bond: EdgeIndex) -> bool {
        let Some((begin, end)) = self.ctx.mol.bond_endpoints(bond) else {
            return false;
        };
        match self.ctx.mol.bond(bond).bond_display() {
            BondDisplay::WedgeBegin | BondDisplay::HashedWedgeBegin => end == atom,
            BondDisplay::WedgeEnd | BondDisplay::HashedWedgeEnd => begin == atom,
            _ => false,
        }
    }

    fn is_plain_bond(&self, bond: EdgeIndex) -> bool {
        let b = self.ctx.mol.bond(bond);
        b.bond_order() == BondOrder::Single && b.bond_display() == BondDisplay::Solid
    }

    fn plain_bond(&self, a1: NodeIndex, a2: NodeIndex) -> RenderElement {
        self.line(self.back_off_point(a1, a2), self.back_off_point(a2, a1))
    }

    /// Filled wedge, narrow at `from`.
    fn bold_wedge(&self, bond: EdgeIndex, from: NodeIndex, to: NodeIndex) -> RenderElement {
        let (pf, pt) = (self.pos(from), self.pos(to));
        let fb = self.back_off_point(from, to);
        let tb = self.back_off_point(to, from);
        let unit = geom::unit(pf, pt);
        let perp = geom::perpendicular(unit);
        let half_narrow = self.stroke / 2.0;
        let half_wide = self.wedge_width / 2.0;

        let a = fb + perp * half_narrow;
        let b = fb - perp * half_narrow;
        let mut c = tb - perp * half_wide;
        let mut e = tb + perp * half_wide;

        let to_bonds = self.other_bonds(to, bond);
        if self.ctx.params.fancy_bold_wedges && !self.has_symbol(to) {
            if let [next] = to_bonds[..] {
                let mut reference = self.ctx.bond_vector(to, next);
                let wide_to_wide = self.at_wide_end_of_wedge(to, next);
                if wide_to_wide {
                    reference -= unit;
                }
                let theta = geom::angle_between(reference, unit);
                if theta > BOLD_WEDGE_THRESHOLD && theta + 2.0 * BOLD_WEDGE_THRESHOLD < PI {
                    if let (Some(c2), Some(e2)) = (
                        geom::line_intersection(b, c - b, pt, reference),
                        geom::line_intersection(a, e - a, pt, reference),
                    ) {
                        // flush with the far edge of the next bond's stroke
                        let nudge = if wide_to_wide {
                            0.0
                        } else {
                            half_narrow / theta.sin()
                        };
                        c = c2 + unit * nudge;
                        e = e2 + unit * nudge;
                    }
                }
            } else if to_bonds.len() > 1 {
                let vectors = self.vectors_from(to, &to_bonds);
                let ref_a = geom::nearest_vector(perp, &vectors);
                let ref_b = geom::nearest_vector(-perp, &vectors);
                if let Some(rb) = ref_b {
                    let theta = geom::angle_between(rb, unit);
                    if theta > BOLD_WEDGE_THRESHOLD {
                        if let Some(c2) = geom::line_intersection(b, c - b, pt, rb) {
                            c = c2 + unit * (half_narrow / theta.sin());
                        }
                    }
                }
                if let Some(ra) = ref_a {
                    let theta = geom::angle_between(ra, unit);
                    if theta > BOLD_WEDGE_THRESHOLD {
                        if let Some(e2) = geom::line_intersection(a, e - a, pt, ra) {
                            e = e2 + unit * (half_narrow / theta.sin());
                        }
                    }
                }
            }
        }

        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        path.line_to(c);
        path.line_to(e);
        path.close_path();
        RenderElement::fill(path, self.foreground)
    }

    fn can_draw_fancy_hashed_wedge(&self, to: NodeIndex, to_bonds: &[EdgeIndex], length: f64) -> bool {
        let long = length * self.ctx.scale - self.ctx.params.bond_length > LONG_BOND_SLACK;
        self.ctx.params.fancy_hashed_wedges && !long && !self.has_symbol(to) && to_bonds.len() == 1
    }

    /// Rungs widening from `from` to `to`.
    fn hashed_wedge(&self, bond: EdgeIndex, from: NodeIndex, to: NodeIndex) -> RenderElement {
        let (pf, pt) = (self.pos(from), self.pos(to));
        let fb = self.back_off_point(from, to);
        let tb = self.back_off_point(to, from);
        let unit = geom::unit(pf, pt);
        let perp = geom::perpendicular(unit);
        let half_narrow = self.stroke / 2.0;
        let half_wide = self.wedge_width / 2.0;
        let opposite = half_wide - half_narrow;
        let adjacent = (pt - pf).hypot();
        if adjacent <= f64::EPSILON {
            return RenderElement::empty();
        }

        let sections = ((adjacent / self.hash_spacing) as usize).max(2);
        let step = adjacent / (sections - 1) as f64;
        let start = if self.has_symbol(from) {
            (fb - pf).hypot()
        } else {
            f64::NEG_INFINITY
        };
        let end = if self.has_symbol(to) {
            (tb - pf).hypot()
        } else {
            f64::INFINITY
        };

        let mut hatch = perp;
        let mut hatch_scale = 1.0;
        let to_bonds = self.other_bonds(to, bond);
        if self.can_draw_fancy_hashed_wedge(to, &to_bonds, adjacent) {
            let next = to_bonds[0];
            let mut reference = self.ctx.bond_vector(to, next);
            if self.at_wide_end_of_wedge(to, next) {
                reference -= unit;
            }
            if let Some(reference) = geom::normalize(reference) {
                let theta = geom::angle_between(reference, unit);
                if theta > HASH_WEDGE_THRESHOLD && theta + HASH_WEDGE_THRESHOLD < PI {
                    hatch = reference;
                    hatch_scale = 1.0 / theta.sin();
                }
            }
        }

        let rungs = (0..sections)
            .map(|i| i as f64 * step)
            .filter(|&d| d >= start && d <= end)
            .map(|d| {
                let offset = (half_narrow + opposite / adjacent * d) * hatch_scale;
                let mid = pf + unit * d;
                self.line(mid + hatch * offset, mid - hatch * offset)
            })
            .collect();
        RenderElement::Group(rungs)
    }

    fn wavy_bond(&self, from: NodeIndex, to: NodeIndex) -> RenderElement {
        let (pf, pt) = (self.pos(from), self.pos(to));
        let fb = self.back_off_point(from, to);
        let tb = self.back_off_point(to, from);
        let unit = geom::unit(pf, pt);
        let perp = geom::perpendicular(unit);
        let length = (pt - pf).hypot();

        let curves = 2 * (length / self.wave_spacing).round() as usize;
        if curves == 0 {
            return self.line(fb, tb);
        }
        let step = length / curves as f64;
        let start = if fb == pf {
            f64::NEG_INFINITY
        } else {
            (fb - pf).hypot()
        };
        let end = if tb == pt {
            f64::INFINITY
        } else {
            (tb - pf).hypot()
        };
        let path = wave_path(pf, unit, perp * step, step, curves, start, end);
        RenderElement::stroke(path, self.stroke, self.foreground)
    }

    /// Dashes along the whole bond, each a third of its period.
    fn dashed_bond(&self, from: NodeIndex, to: NodeIndex) -> RenderElement {
        let (pf, pt) = (self.pos(from), self.pos(to));
        let fb = self.back_off_point(from, to);
        let tb = self.back_off_point(to, from);
        RenderElement::Group(self.dashes(pf, pt, fb, tb))
    }

    /// Dashes on `p-q`, clipped to `pc-qc`, a sub-segment of it.
    fn dashes(&self, p: Point, q: Point, pc: Point, qc: Point) -> Vec<RenderElement> {
        let n = self.ctx.params.dash_sections.max(1);
        let length = (q - p).hypot();
        let unit = geom::unit(p, q);
        let step = length / (3 * n).saturating_sub(2).max(1) as f64;
        let start = (pc - p).hypot();
        let end = (qc - p).hypot();

        let mut dashes = Vec::with_capacity(n);
        let mut d = 0.0;
        for _ in 0..n {
            let s = f64::max(d, start);
            let e = f64::min(d + step, end);
            if e > s {
                dashes.push(self.line(p + unit * s, p + unit * e));
            }
            d += 3.0 * step;
        }
        dashes
    }

    fn dotted_bond(&self, from: NodeIndex, to: NodeIndex) -> RenderElement {
        let fb = self.back_off_point(from, to);
        let tb = self.back_off_point(to, from);
        let length = (tb - fb).hypot();
        let n = ((length / self.hash_spacing).round() as usize).max(2);
        let dots = (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                RenderElement::oval(fb.lerp(tb, t), self.stroke, true, 0.0, self.foreground)
            })
            .collect();
        RenderElement::Group(dots)
    }

    fn bold_bond(&self, from: NodeIndex, to: NodeIndex) -> RenderElement {
        let fb = self.back_off_point(from, to);
        let tb = self.back_off_point(to, from);
        let side = geom::perpendicular(geom::unit(self.pos(from), self.pos(to))) * (self.wedge_width / 2.0);
        let mut path = BezPath::new();
        path.move_to(fb + side);
        path.line_to(tb + side);
        path.line_to(tb - side);
        path.line_to(fb - side);
        path.close_path();
        RenderElement::fill(path, self.foreground)
    }

    /// Evenly wide rungs, an undefined stereo bond in some conventions.
    fn hash_bond(&self, from: NodeIndex, to: NodeIndex) -> RenderElement {
        let (pf, pt) = (self.pos(from), self.pos(to));
        let fb = self.back_off_point(from, to);
        let tb = self.back_off_point(to, from);
        let unit = geom::unit(pf, pt);
        let side = geom::perpendicular(unit) * (self.wedge_width / 2.0);
        let length = (pt - pf).hypot();
        let sections = ((length / self.hash_spacing) as usize).max(2);
        let step = length / (sections - 1) as f64;
        let start = (fb - pf).hypot();
        let end = (tb - pf).hypot();
        let rungs = (0..sections)
            .map(|i| i as f64 * step)
            .filter(|&d| d >= start && d <= end)
            .map(|d| {
                let mid = pf + unit * d;
                self.line(mid + side, mid - side)
            })
            .collect();
        RenderElement::Group(rungs)
    }

    /// Line with a filled head at `to`.
    fn arrow_bond(&self, from: NodeIndex, to: NodeIndex) -> RenderElement {
        let fb = self.back_off_point(from, to);
        let tb = self.back_off_point(to, from);
        let unit = geom::unit(self.pos(from), self.pos(to));
        let side = geom::perpendicular(unit) * (self.wedge_width / 2.0);
        let head_base = tb - unit * (1.25 * self.wedge_width);

        let mut head = BezPath::new();
        head.move_to(tb);
        head.line_to(head_base + side);
        head.line_to(head_base - side);
        head.close_path();
        RenderElement::Group(vec![
            self.line(fb, head_base),
            RenderElement::fill(head, self.foreground),
        ])
    }

    fn triple_bond(&self, a1: NodeIndex, a2: NodeIndex) -> RenderElement {
        let b1 = self.back_off_point(a1, a2);
        let b2 = self.back_off_point(a2, a1);
        let side = geom::perpendicular(geom::unit(self.pos(a1), self.pos(a2))) * self.separation;
        RenderElement::Group(vec![
            self.line(b1, b2),
            self.line(b1 + side, b2 + side),
            self.line(b1 - side, b2 - side),
        ])
    }

    /// Picks offset or centred placement. `dashed` draws the second line
    /// dashed, for bonds of a Kekulé-free aromatic ring. Between two drawn
    /// symbols such a bond is a single dashed line instead.
    fn double_bond(&mut self, bond: EdgeIndex, a1: NodeIndex, a2: NodeIndex, dashed: bool) -> RenderElement {
        if self.ctx.mol.bond(bond).bond_display() == BondDisplay::Crossed {
            return self.crossed_double_bond(a1, a2);
        }

        if let Some(ring) = self.ring_map.get(&bond).cloned() {
            if let Some(elem) = self.ring_double_bond(&ring, bond, a1, a2, dashed) {
                return elem;
            }
        }

        let bonds1 = self.other_bonds(a1, bond);
        let bonds2 = self.other_bonds(a2, bond);
        let (s1, s2) = (self.has_symbol(a1), self.has_symbol(a2));
        if s1 && s2 {
            if dashed {
                return self.dashed_bond(a1, a2);
            }
            return self.centered_double_bond(a1, a2, &bonds1, &bonds2, false);
        }
        if let ([ref1], []) = (&bonds1[..], &bonds2[..]) {
            return self.offset_double_bond(bond, a1, a2, *ref1, &bonds2, false, dashed);
        }
        if let ([], [ref2]) = (&bonds1[..], &bonds2[..]) {
            return self.offset_double_bond(bond, a2, a1, *ref2, &bonds1, false, dashed);
        }
        if !s1 {
            if let Some(ref1) = self.plain_bond_next_to_wedge(a1, &bonds1) {
                return self.offset_double_bond(bond, a1, a2, ref1, &bonds2, false, dashed);
            }
        }
        if !s2 {
            if let Some(ref2) = self.plain_bond_next_to_wedge(a2, &bonds2) {
                return self.offset_double_bond(bond, a2, a1, ref2, &bonds1, false, dashed);
            }
        }
        self.centered_double_bond(a1, a2, &bonds1, &bonds2, dashed)
    }

    /// Ring bonds are offset toward the inside of their preferred ring.
    fn ring_double_bond(
        &mut self,
        ring: &Ring,
        bond: EdgeIndex,
        a1: NodeIndex,
        a2: NodeIndex,
        dashed: bool,
    ) -> Option<RenderElement> {
        let (i1, i2) = (ring.index_of(a1)?, ring.index_of(a2)?);
        // walk the bond in ring order
        let (atom1, atom2) = if i1 == (i2 + 1) % ring.len() {
            (a2, a1)
        } else {
            (a1, a2)
        };
        let ref1 = ring.bonds_at(atom1).map(|(inc, out)| if inc == bond { out } else { inc })?;
        let ref2 = ring.bonds_at(atom2).map(|(inc, out)| if inc == bond { out } else { inc })?;
        let prev = self.ctx.mol.other_atom(ref1, atom1)?;
        let next = self.ctx.mol.other_atom(ref2, atom2)?;

        let wind1 = geom::winding(self.pos(prev), self.pos(atom1), self.pos(atom2));
        let wind2 = geom::winding(self.pos(atom1), self.pos(atom2), self.pos(next));
        let (s1, s2) = (self.has_symbol(atom1), self.has_symbol(atom2));

        Some(if wind1 > 0 && !s1 {
            self.offset_double_bond(bond, atom1, atom2, ref1, &[ref2], false, dashed)
        } else if wind2 > 0 && !s2 {
            self.offset_double_bond(bond, atom2, atom1, ref2, &[ref1], false, dashed)
        } else if !s1 {
            // concave corner of a macrocycle, the inside is the other side
            self.offset_double_bond(bond, atom1, atom2, ref1, &[ref2], true, dashed)
        } else if !s2 {
            self.offset_double_bond(bond, atom2, atom1, ref2, &[ref1], true, dashed)
        } else {
            self.centered_double_bond(atom1, atom2, &[ref1], &[ref2], dashed)
        })
    }

    /// With a wedge and a plain bond at `atom`, the plain bond.
    fn plain_bond_next_to_wedge(&self, atom: NodeIndex, bonds: &[EdgeIndex]) -> Option<EdgeIndex> {
        let [x, y] = *bonds else {
            return None;
        };
        if self.at_wide_end_of_wedge(atom, x) && self.is_plain_bond(y) {
            Some(y)
        } else if self.at_wide_end_of_wedge(atom, y) && self.is_plain_bond(x) {
            Some(x)
        } else {
            None
        }
    }

    /// A full line between the atoms plus a shorter parallel line on the
    /// side of `reference`, the bond at `atom1` the offset follows.
    #[allow(clippy::too_many_arguments)]
    fn offset_double_bond(
        &mut self,
        bond: EdgeIndex,
        atom1: NodeIndex,
        atom2: NodeIndex,
        reference: EdgeIndex,
        atom2_bonds: &[EdgeIndex],
        invert: bool,
        dashed: bool,
    ) -> RenderElement {
        let (p1, p2) = (self.pos(atom1), self.pos(atom2));
        let b1 = self.back_off_point(atom1, atom2);
        let b2 = self.back_off_point(atom2, atom1);
        let unit = geom::unit(p1, p2);
        let reference = self.ctx.bond_vector(atom1, reference);
        let mut perp = geom::perpendicular(unit);
        if reference.dot(perp) < 0.0 {
            perp = -perp;
        }
        if invert {
            perp = -perp;
        }

        // a terminal label sits between the two lines
        if atom2_bonds.is_empty() {
            let nudge = perp * (self.separation / 2.0);
            if let Some(slot) = self.symbols.get_mut(atom2.index()) {
                if let Some(symbol) = slot.take() {
                    *slot = Some(symbol.translate(nudge.x, nudge.y));
                }
            }
        }

        let mut offset1 = 0.0;
        if dashed || !self.has_symbol(atom1) {
            offset1 = geom::adjacent_length(reference + unit, perp, self.separation);
        }
        if reference.dot(perp) < 0.0 {
            offset1 = -offset1;
        }
        let mut offset2 = 0.0;
        if !atom2_bonds.is_empty() && (dashed || !self.has_symbol(atom2)) {
            let vectors = self.vectors_from(atom2, atom2_bonds);
            if let Some(closest) = geom::nearest_vector(perp, &vectors) {
                offset2 = geom::adjacent_length(closest - unit, perp, self.separation);
                if closest.dot(perp) < 0.0 {
                    offset2 = -offset2;
                }
            }
        }
        let half = (b2 - p1).hypot() / 2.0;
        let offset1 = offset1.clamp(0.0, half);
        let offset2 = offset2.clamp(0.0, half);

        let primary = match self.ctx.mol.bond(bond).bond_display() {
            BondDisplay::Bold => self.bold_bond(atom1, atom2),
            BondDisplay::Hash => self.hash_bond(atom1, atom2),
            BondDisplay::Dot => self.dotted_bond(atom1, atom2),
            BondDisplay::Dash => self.dashed_bond(atom1, atom2),
            _ => self.line(b1, b2),
        };

        let beg = p1 + perp * self.separation + unit * offset1;
        let end = p2 + perp * self.separation - unit * offset2;
        let beg_clip = self.back_off_along(atom1, beg, end);
        let end_clip = self.back_off_along(atom2, end, beg);
        let secondary = if dashed {
            RenderElement::Group(self.dashes(beg, end, beg_clip, end_clip))
        } else {
            self.line(beg_clip, end_clip)
        };
        RenderElement::Group(vec![primary, secondary])
    }

    /// Two lines either side of the bond axis, trimmed or extended to meet
    /// the neighbouring bonds flush.
    fn centered_double_bond(
        &self,
        atom1: NodeIndex,
        atom2: NodeIndex,
        bonds1: &[EdgeIndex],
        bonds2: &[EdgeIndex],
        dashed: bool,
    ) -> RenderElement {
        let (p1, p2) = (self.pos(atom1), self.pos(atom2));
        let b1 = self.back_off_point(atom1, atom2);
        let b2 = self.back_off_point(atom2, atom1);
        let unit = geom::unit(p1, p2);
        let perp1 = geom::perpendicular(unit);
        let perp2 = -perp1;
        let half_len = (b2 - b1).hypot() / 2.0;
        let half_sep = self.separation / 2.0;

        let mut l1a = self.back_off_along(atom1, p1 + perp1 * half_sep, p2 + perp1 * half_sep);
        let mut l1b = self.back_off_along(atom2, p2 + perp1 * half_sep, p1 + perp1 * half_sep);
        let mut l2a = self.back_off_along(atom1, p1 + perp2 * half_sep, p2 + perp2 * half_sep);
        let mut l2b = self.back_off_along(atom2, p2 + perp2 * half_sep, p1 + perp2 * half_sep);

        let flush = |near: Vec2, perp: Vec2| {
            let adjust = geom::adjacent_length(near, perp, half_sep);
            if adjust > half_len || adjust < 0.0 {
                0.0
            } else {
                adjust
            }
        };

        if !self.has_symbol(atom1) && bonds1.len() > 1 {
            let vectors = self.vectors_from(atom1, bonds1);
            if let (Some(n1), Some(n2)) = (
                geom::nearest_vector(perp1, &vectors),
                geom::nearest_vector(perp2, &vectors),
            ) {
                let mut adj1 = flush(n1, perp1);
                let mut adj2 = flush(n2, perp2);
                // acute neighbours shorten rather than extend
                if n1.dot(unit) > 0.0 {
                    adj1 = -adj1;
                }
                if n2.dot(unit) > 0.0 {
                    adj2 = -adj2;
                }
                l1a -= unit * adj1;
                l2a -= unit * adj2;
            }
        }
        if !self.has_symbol(atom2) && bonds2.len() > 1 {
            let vectors = self.vectors_from(atom2, bonds2);
            if let (Some(n1), Some(n2)) = (
                geom::nearest_vector(perp1, &vectors),
                geom::nearest_vector(perp2, &vectors),
            ) {
                let mut adj1 = flush(n1, perp1);
                let mut adj2 = flush(n2, perp2);
                if n1.dot(unit) < 0.0 {
                    adj1 = -adj1;
                }
                if n2.dot(unit) < 0.0 {
                    adj2 = -adj2;
                }
                l1b += unit * adj1;
                l2b += unit * adj2;
            }
        }

        let second = if dashed {
            RenderElement::Group(self.dashes(l2a, l2b, l2a, l2b))
        } else {
            self.line(l2a, l2b)
        };
        RenderElement::Group(vec![self.line(l1a, l1b), second])
    }

    /// Unknown double bond configuration: the two lines cross.
    fn crossed_double_bond(&self, a1: NodeIndex, a2: NodeIndex) -> RenderElement {
        let b1 = self.back_off_point(a1, a2);
        let b2 = self.back_off_point(a2, a1);
        let side = geom::perpendicular(geom::unit(self.pos(a1), self.pos(a2))) * (self.separation / 2.0);
        RenderElement::Group(vec![
            self.line(b1 + side, b2 - side),
            self.line(b1 - side, b2 + side),
        ])
    }

    /// Wavy cap across the bond at an attachment point atom.
    fn attach_point(&self, atom: NodeIndex, bond: EdgeIndex) -> RenderElement {
        let Some(other) = self.ctx.mol.other_atom(bond, atom) else {
            return RenderElement::empty();
        };
        let p = self.pos(atom);
        let length = (self.pos(other) - p).hypot();
        let along = geom::unit(p, self.pos(other));
        let across = geom::perpendicular(along) * (length / 2.0);
        let (beg, end) = (p + across, p - across);

        let curves = (2.0 * (length / self.wave_spacing).ceil()) as usize;
        if curves == 0 {
            return RenderElement::empty();
        }
        let step = length / curves as f64;
        let path = wave_path(
            beg,
            geom::unit(beg, end),
            along * step,
            step,
            curves,
            f64::NEG_INFINITY,
            f64::INFINITY,
        );
        RenderElement::stroke(path, self.stroke, self.foreground)
    }
}

/// Alternating half waves from `origin` along `unit`, each `step` long with
/// amplitude `peak`. Only the part between distances `start` and `end` is
/// drawn.
fn wave_path(origin: Point, unit: Vec2, peak: Vec2, step: f64, curves: usize, start: f64, end: f64) -> BezPath {
    let at = |d: f64| origin + unit * d;
    let mut path = BezPath::new();
    let mut started = false;
    if start == f64::NEG_INFINITY {
        path.move_to(origin);
        started = true;
    }

    let mut peak = peak;
    let mut i = 1;
    while i < curves {
        peak = -peak;
        let fi = i as f64;

        // away from the axis
        let dist = fi * step;
        if dist >= start && dist <= end {
            let to = at(dist) + peak;
            if started {
                path.curve_to(at((fi - 1.0) * step) + peak * 0.5, at((fi - 0.5) * step) + peak, to);
            } else {
                path.move_to(to);
                started = true;
            }
        }

        // back to the axis
        let dist = (fi + 1.0) * step;
        if dist >= start && dist <= end {
            let to = at(dist);
            if started {
                path.curve_to(at((fi + 0.5) * step) + peak, at(dist - 0.5 * step) + peak * 0.5, to);
            } else {
                path.move_to(to);
                started = true;
            }
        }
        i += 2;
    }
    path
}

/// Elements whose counts break ties between equally sized rings, in order.
const TIE_BREAK_ELEMENTS: [u8; 5] = [
    element::CARBON,
    element::NITROGEN,
    element::OXYGEN,
    element::SULFUR,
    element::PHOSPHORUS,
];

/// Which ring each ring bond takes its offset side from. Rings are ranked
/// by size (six first, then five, seven, four, three, then larger), then by
/// double bond count, then by the counts of `TIE_BREAK_ELEMENTS`, and wound
/// counter-clockwise.
fn ring_preference_map<A, B>(ctx: &DepictContext<'_, A, B>) -> HashMap<EdgeIndex, Ring>
where
    A: DepictAtom,
    B: DepictBond,
{
    let mut rings: Vec<&Ring> = ctx.rings.rings().iter().collect();
    rings.sort_by_key(|r| {
        let doubles = r
            .bonds()
            .iter()
            .filter(|&&b| ctx.mol.bond(b).bond_order() == BondOrder::Double)
            .count();
        let counts = element_counts(r.atoms().iter().map(|&a| ctx.mol.atom(a).atomic_num()));
        (size_preference(r.len()), Reverse(doubles), counts)
    });

    let mut map = HashMap::new();
    for ring in rings {
        let ring = counter_clockwise(ctx, ring);
        for &bond in ring.bonds() {
            map.entry(bond).or_insert_with(|| ring.clone());
        }
    }
    map
}

fn size_preference(size: usize) -> usize {
    match size {
        6 => 0,
        5 => 1,
        7 => 2,
        4 => 3,
        3 => 4,
        n => n,
    }
}

/// Higher counts sort first.
fn element_counts(atomic_nums: impl Iterator<Item = u8>) -> [Reverse<usize>; 5] {
    let mut counts = [0usize; 5];
    for num in atomic_nums {
        if let Some(i) = TIE_BREAK_ELEMENTS.iter().position(|&e| e == num) {
            counts[i] += 1;
        }
    }
    counts.map(Reverse)
}

fn counter_clockwise<A, B>(ctx: &DepictContext<'_, A, B>, ring: &Ring) -> Ring
where
    A: DepictAtom,
    B: DepictBond,
{
    let atoms = ring.atoms();
    let n = atoms.len();
    let winding: i32 = (0..n)
        .map(|i| {
            let prev = atoms[(i + n - 1) % n];
            let next = atoms[(i + 1) % n];
            geom::winding(ctx.pos(prev), ctx.pos(atoms[i]), ctx.pos(next))
        })
        .sum();
    if winding < 0 {
        ring.reversed()
    } else {
        ring.clone()
    }
}
