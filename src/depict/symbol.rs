//! Atom symbols: an element label with its adjuncts and annotations,
//! moved as one unit.

use kurbo::{Affine, Point};

use super::hull::ConvexHull;
use super::outline::TextOutline;

/// Which part of the element label sits on the atom coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolAlignment {
    /// The first character, e.g. the `N` of `NH2`.
    Left,
    #[default]
    Center,
    /// The last character, e.g. the `N` of `H2N`.
    Right,
}

/// A drawn atom label: the element text plus adjuncts (hydrogens, counts,
/// charge, mass) and free annotations. Adjuncts contribute to the hull that
/// bonds are trimmed against; annotations do not.
#[derive(Debug, Clone)]
pub struct AtomSymbol {
    element: TextOutline,
    adjuncts: Vec<TextOutline>,
    annotations: Vec<TextOutline>,
    alignment: SymbolAlignment,
    hull: ConvexHull,
}

impl AtomSymbol {
    pub fn new(element: TextOutline, adjuncts: Vec<TextOutline>) -> Self {
        let hull = ConvexHull::of_outlines(std::iter::once(&element).chain(&adjuncts));
        Self {
            element,
            adjuncts,
            annotations: Vec::new(),
            alignment: SymbolAlignment::Center,
            hull,
        }
    }

    pub fn align_to(self, alignment: SymbolAlignment) -> Self {
        Self { alignment, ..self }
    }

    pub fn add_annotation(mut self, annotation: TextOutline) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn alignment(&self) -> SymbolAlignment {
        self.alignment
    }

    pub fn element_outline(&self) -> &TextOutline {
        &self.element
    }

    pub fn adjunct_outlines(&self) -> &[TextOutline] {
        &self.adjuncts
    }

    pub fn annotation_outlines(&self) -> &[TextOutline] {
        &self.annotations
    }

    /// Element and adjunct outlines, the part drawn in the atom colour.
    pub fn outlines(&self) -> impl Iterator<Item = &TextOutline> {
        std::iter::once(&self.element).chain(&self.adjuncts)
    }

    pub fn hull(&self) -> &ConvexHull {
        &self.hull
    }

    /// The point that is placed on the atom coordinate.
    pub fn alignment_center(&self) -> Point {
        match self.alignment {
            SymbolAlignment::Left => self.element.first_glyph_center(),
            SymbolAlignment::Center => self.element.center(),
            SymbolAlignment::Right => self.element.last_glyph_center(),
        }
    }

    pub fn transform(&self, t: Affine) -> Self {
        Self {
            element: self.element.transform(t),
            adjuncts: self.adjuncts.iter().map(|o| o.transform(t)).collect(),
            annotations: self.annotations.iter().map(|o| o.transform(t)).collect(),
            alignment: self.alignment,
            hull: self.hull.transform(t),
        }
    }

    /// Scales every part about the element center.
    pub fn resize(&self, sx: f64, sy: f64) -> Self {
        let c = self.element.center().to_vec2();
        self.transform(
            Affine::translate(c) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-c),
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        self.transform(Affine::translate((dx, dy)))
    }

    /// Moves the symbol so its alignment center lands on `p`.
    pub fn center_to(&self, p: Point) -> Self {
        let d = p - self.alignment_center();
        self.translate(d.x, d.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{BoxMeasurer, FontSpec};

    fn text(s: &str) -> TextOutline {
        TextOutline::new(s, &FontSpec::new(10.0), &BoxMeasurer)
    }

    #[test]
    fn hull_covers_adjuncts() {
        let n = text("N");
        let h = text("H").translate(n.bounds().width() + 1.0, 0.0);
        let sym = AtomSymbol::new(n.clone(), vec![h.clone()]);
        let hb = sym.hull().bounds().unwrap();
        assert!(hb.x1 >= h.bounds().x1 - 1e-9);
        assert!(hb.x0 <= n.bounds().x0 + 1e-9);
    }

    #[test]
    fn left_alignment_centers_first_glyph() {
        let sym = AtomSymbol::new(text("NH"), Vec::new()).align_to(SymbolAlignment::Left);
        let placed = sym.center_to(Point::new(10.0, 10.0));
        let c = placed.element_outline().first_glyph_center();
        assert!((c - Point::new(10.0, 10.0)).hypot() < 1e-9);
    }

    #[test]
    fn transform_returns_new_value() {
        let sym = AtomSymbol::new(text("O"), Vec::new());
        let before = sym.element_outline().center();
        let moved = sym.translate(2.0, 0.0);
        assert_eq!(sym.element_outline().center(), before);
        assert!((moved.element_outline().center().x - before.x - 2.0).abs() < 1e-9);
        let hb = moved.hull().bounds().unwrap();
        assert!((hb.center().x - moved.element_outline().center().x).abs() < 1e-9);
    }

    #[test]
    fn annotations_are_not_in_hull() {
        let sym = AtomSymbol::new(text("O"), Vec::new());
        let before = sym.hull().clone();
        let sym = sym.add_annotation(text("1").translate(50.0, 0.0));
        assert_eq!(sym.hull(), &before);
        assert_eq!(sym.annotation_outlines().len(), 1);
    }
}
