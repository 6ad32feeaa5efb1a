//! Immutable, transformable text outlines.

use std::sync::Arc;

use kurbo::{Affine, BezPath, PathEl, Point, Rect};

use crate::font::{FontSpec, GlyphMeasurer};

/// The outline of a run of text, laid out once.
///
/// The glyph geometry is shared; each transform only composes a new affine
/// on top of it, so resizing and moving never re-layout the text.
#[derive(Debug, Clone)]
pub struct TextOutline {
    text: Arc<str>,
    path: Arc<BezPath>,
    bounds: Rect,
    glyph_centers: Arc<[Point]>,
    transform: Affine,
}

impl TextOutline {
    pub fn new(text: &str, font: &FontSpec, measurer: &dyn GlyphMeasurer) -> Self {
        let run = measurer.layout(text, font);
        let glyph_centers = glyph_centers(text, font, measurer, run.bounds);
        Self {
            text: Arc::from(text),
            path: Arc::new(run.path),
            bounds: run.bounds,
            glyph_centers: glyph_centers.into(),
            transform: Affine::IDENTITY,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// Axis aligned bounds after the transform.
    pub fn bounds(&self) -> Rect {
        self.transform.transform_rect_bbox(self.bounds)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Center of the `i`th character.
    pub fn glyph_center(&self, i: usize) -> Option<Point> {
        if self.glyph_centers.len() == 1 && i == 0 {
            return Some(self.center());
        }
        self.glyph_centers.get(i).map(|&p| self.transform * p)
    }

    pub fn first_glyph_center(&self) -> Point {
        self.glyph_center(0).unwrap_or_else(|| self.center())
    }

    pub fn last_glyph_center(&self) -> Point {
        self.glyph_centers
            .len()
            .checked_sub(1)
            .and_then(|i| self.glyph_center(i))
            .unwrap_or_else(|| self.center())
    }

    /// Scales about the current center.
    pub fn resize(&self, sx: f64, sy: f64) -> Self {
        let c = self.center().to_vec2();
        self.transform(
            Affine::translate(c) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-c),
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        self.transform(Affine::translate((dx, dy)))
    }

    /// Applies `t` after the current transform.
    pub fn transform(&self, t: Affine) -> Self {
        Self {
            transform: t * self.transform,
            ..self.clone()
        }
    }

    /// The transformed outline.
    pub fn path(&self) -> BezPath {
        let mut path = (*self.path).clone();
        path.apply_affine(self.transform);
        path
    }

    /// Every on-curve and control point of the transformed outline.
    pub fn points(&self) -> Vec<Point> {
        let mut out = Vec::new();
        for el in self.path.elements() {
            match *el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => out.push(p),
                PathEl::QuadTo(p1, p2) => out.extend([p1, p2]),
                PathEl::CurveTo(p1, p2, p3) => out.extend([p1, p2, p3]),
                PathEl::ClosePath => {}
            }
        }
        for p in &mut out {
            *p = self.transform * *p;
        }
        out
    }
}

/// Character centers from the growth of the bounds as each character is
/// appended. Labels are short so re-measuring every prefix is cheap enough.
fn glyph_centers(
    text: &str,
    font: &FontSpec,
    measurer: &dyn GlyphMeasurer,
    whole: Rect,
) -> Vec<Point> {
    let ends: Vec<usize> = text
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .collect();
    if ends.len() <= 1 {
        return vec![whole.center(); ends.len()];
    }
    let mut centers = Vec::with_capacity(ends.len());
    let mut prev: Option<Rect> = None;
    let mut start = 0;
    for &end in &ends {
        let grown = measurer.layout(&text[..end], font).bounds;
        let single = measurer.layout(&text[start..end], font).bounds;
        let x0 = match prev {
            Some(p) if p.width() > 0.0 => p.x1,
            _ => grown.x0,
        };
        let x = (x0 + grown.x1) / 2.0;
        let y = if single.height() > 0.0 {
            single.center().y
        } else {
            grown.center().y
        };
        centers.push(Point::new(x, y));
        prev = Some(grown);
        start = end;
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BoxMeasurer;

    fn outline(text: &str) -> TextOutline {
        TextOutline::new(text, &FontSpec::new(10.0), &BoxMeasurer)
    }

    #[test]
    fn translate_moves_center() {
        let o = outline("N");
        let c = o.center();
        let moved = o.translate(3.0, -2.0);
        assert!((moved.center().x - c.x - 3.0).abs() < 1e-9);
        assert!((moved.center().y - c.y + 2.0).abs() < 1e-9);
        assert_eq!(o.center(), c);
    }

    #[test]
    fn resize_keeps_center() {
        let o = outline("Cl");
        let r = o.resize(0.5, 0.5);
        assert!((r.center() - o.center()).hypot() < 1e-9);
        assert!((r.bounds().width() - o.bounds().width() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn flipped_bounds_stay_ordered() {
        let o = outline("OH").resize(-1.0, -1.0);
        let b = o.bounds();
        assert!(b.x0 <= b.x1 && b.y0 <= b.y1);
    }

    #[test]
    fn glyph_centers_left_to_right() {
        let o = outline("NH2");
        let a = o.first_glyph_center();
        let b = o.glyph_center(1).unwrap();
        let c = o.last_glyph_center();
        assert!(a.x < b.x && b.x < c.x);
        assert!(o.glyph_center(3).is_none());
    }

    #[test]
    fn single_char_glyph_center_is_center() {
        let o = outline("O").translate(1.0, 1.0);
        assert_eq!(o.first_glyph_center(), o.center());
        assert_eq!(o.last_glyph_center(), o.center());
    }

    #[test]
    fn points_follow_transform() {
        let o = outline("C");
        let moved = o.translate(5.0, 0.0);
        let a = o.points();
        let b = moved.points();
        assert_eq!(a.len(), b.len());
        assert!(a.iter().zip(&b).all(|(p, q)| (q.x - p.x - 5.0).abs() < 1e-9));
    }
}
