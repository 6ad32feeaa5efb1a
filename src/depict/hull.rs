//! Convex hulls of symbol outlines, used to trim bonds clear of text.

use std::cmp::Ordering;

use kurbo::{Affine, Point, Rect};

use super::outline::TextOutline;
use crate::geom;

/// Boundary points in counter-clockwise order (y-up).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvexHull {
    points: Vec<Point>,
}

impl ConvexHull {
    pub fn of_outline(outline: &TextOutline) -> Self {
        Self::of_points(outline.points())
    }

    pub fn of_outlines<'a>(outlines: impl IntoIterator<Item = &'a TextOutline>) -> Self {
        Self::of_points(outlines.into_iter().flat_map(TextOutline::points).collect())
    }

    /// Graham scan. Three points or fewer are returned as given.
    pub fn of_points(mut points: Vec<Point>) -> Self {
        points.retain(|p| p.x.is_finite() && p.y.is_finite());
        if points.len() <= 3 {
            return Self { points };
        }

        points.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        let pivot = points[0];
        let rest = &mut points[1..];
        rest.sort_by(|a, b| {
            let ta = (a.y - pivot.y).atan2(a.x - pivot.x);
            let tb = (b.y - pivot.y).atan2(b.x - pivot.x);
            ta.total_cmp(&tb).then_with(|| {
                let da = (*a - pivot).hypot2();
                let db = (*b - pivot).hypot2();
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            })
        });

        let mut stack: Vec<Point> = Vec::with_capacity(points.len());
        for &p in &points {
            while stack.len() >= 2
                && (stack[stack.len() - 1] - stack[stack.len() - 2]).cross(p - stack[stack.len() - 2])
                    <= 0.0
            {
                stack.pop();
            }
            stack.push(p);
        }
        Self { points: stack }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keeps counter-clockwise order even when `t` mirrors.
    pub fn transform(&self, t: Affine) -> Self {
        let mut points: Vec<Point> = self.points.iter().map(|&p| t * p).collect();
        if t.determinant() < 0.0 {
            points.reverse();
        }
        Self { points }
    }

    pub fn bounds(&self) -> Option<Rect> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p)),
        )
    }

    pub fn centroid(&self) -> Option<Point> {
        geom::centroid(&self.points)
    }

    /// First hull edge crossed by the segment `p1-p2`, in hull order.
    pub fn intersect(&self, p1: Point, p2: Point) -> Option<Point> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            if geom::segments_intersect(a, b, p1, p2) {
                if let Some(x) = geom::line_intersection(a, b - a, p1, p2 - p1) {
                    return Some(x);
                }
            }
        }
        None
    }

    /// Point-in-polygon test, boundary inclusive.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        (0..n).all(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            (b - a).cross(p - a) >= -1e-9
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Xorshift64(u64);

    impl Xorshift64 {
        fn next(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }

        /// Uniform in `[-10, 10)`.
        fn coord(&mut self) -> f64 {
            (self.next() >> 11) as f64 / (1u64 << 53) as f64 * 20.0 - 10.0
        }
    }

    fn random_point_sets(count: usize, size: usize) -> Vec<Vec<Point>> {
        let mut rng = Xorshift64(0xDEAD_BEEF_CAFE_BABE);
        (0..count)
            .map(|_| (0..size).map(|_| Point::new(rng.coord(), rng.coord())).collect())
            .collect()
    }

    fn on_segment(p: Point, a: Point, b: Point) -> bool {
        let d = b - a;
        let off_line = (d.cross(p - a) / d.hypot()).abs();
        let t = (p - a).dot(d) / d.hypot2();
        off_line < 1e-7 && (-1e-7..=1.0 + 1e-7).contains(&t)
    }

    fn square_with_inner() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
            Point::new(1.0, 1.0),
            Point::new(0.5, 1.5),
            Point::new(1.0, 0.0),
        ]
    }

    #[test]
    fn interior_points_dropped() {
        let hull = ConvexHull::of_points(square_with_inner());
        assert_eq!(hull.points().len(), 4);
        assert!(!hull.points().contains(&Point::new(1.0, 1.0)));
        assert!(!hull.points().contains(&Point::new(1.0, 0.0)));
    }

    #[test]
    fn hull_is_counter_clockwise() {
        let hull = ConvexHull::of_points(square_with_inner());
        let p = hull.points();
        for i in 0..p.len() {
            let w = geom::winding(p[i], p[(i + 1) % p.len()], p[(i + 2) % p.len()]);
            assert_eq!(w, 1);
        }
    }

    #[test]
    fn small_inputs_unchanged() {
        let pts = vec![Point::new(1.0, 0.0), Point::new(0.0, 0.0)];
        assert_eq!(ConvexHull::of_points(pts.clone()).points(), &pts[..]);
    }

    #[test]
    fn segment_from_centroid_hits_edge() {
        let hull = ConvexHull::of_points(square_with_inner());
        let hit = hull
            .intersect(Point::new(1.0, 1.0), Point::new(5.0, 1.0))
            .unwrap();
        assert!((hit.x - 2.0).abs() < 1e-9 && (hit.y - 1.0).abs() < 1e-9);
        assert!(hull
            .intersect(Point::new(3.0, 3.0), Point::new(4.0, 4.0))
            .is_none());
    }

    #[test]
    fn mirrored_hull_stays_ccw() {
        let hull = ConvexHull::of_points(square_with_inner()).transform(Affine::FLIP_X);
        let p = hull.points();
        assert_eq!(geom::winding(p[0], p[1], p[2]), 1);
        assert!(hull.contains(Point::new(-1.0, 1.0)));
    }

    #[test]
    fn random_hulls_are_convex_and_cover_their_input() {
        for (i, pts) in random_point_sets(500, 12).into_iter().enumerate() {
            let hull = ConvexHull::of_points(pts.clone());
            let hp = hull.points();
            assert!(hp.len() >= 3, "set {i}: degenerate hull");
            assert!(hp.iter().all(|p| pts.contains(p)), "set {i}: hull point not in input");

            let n = hp.len();
            for k in 0..n {
                let (a, b, c) = (hp[k], hp[(k + 1) % n], hp[(k + 2) % n]);
                assert!((b - a).cross(c - b) > 0.0, "set {i}: turn at {b:?} is not counter-clockwise");
            }
            for p in &pts {
                assert!(hull.contains(*p), "set {i}: {p:?} outside its hull");
            }
        }
    }

    #[test]
    fn random_hulls_stop_rays_from_the_centroid() {
        for (i, pts) in random_point_sets(500, 12).into_iter().enumerate() {
            let hull = ConvexHull::of_points(pts);
            let center = hull.centroid().unwrap();
            let hp = hull.points();
            let n = hp.len();
            for step in 0..16 {
                let angle = step as f64 * std::f64::consts::PI / 8.0 + 0.1;
                // every hull point is within 10 * sqrt(2) of the origin
                let outside = center + kurbo::Vec2::new(angle.cos(), angle.sin()) * 40.0;
                let hit = hull
                    .intersect(center, outside)
                    .unwrap_or_else(|| panic!("set {i}: ray {step} missed the hull"));
                assert!(
                    (0..n).any(|k| on_segment(hit, hp[k], hp[(k + 1) % n])),
                    "set {i}: {hit:?} is not on a hull edge"
                );
            }
        }
    }
}
