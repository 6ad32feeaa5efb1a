//! Vector helpers over [`kurbo`] points used throughout the depiction engine.
//!
//! All coordinates are y-up model space. Nothing here returns NaN: degenerate
//! input (zero-length vectors, parallel lines) produces `None` or a
//! documented fallback.

use std::f64::consts::{PI, TAU};

use kurbo::{Point, Vec2};

const EPS: f64 = 1e-10;

pub fn point(p: [f64; 2]) -> Point {
    Point::new(p[0], p[1])
}

/// Unit vector of `v`, or `None` for a zero vector.
pub fn normalize(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    if len < EPS || !len.is_finite() {
        None
    } else {
        Some(v / len)
    }
}

/// Unit vector from `from` to `to`; zero when the points coincide.
pub fn unit(from: Point, to: Point) -> Vec2 {
    normalize(to - from).unwrap_or(Vec2::ZERO)
}

/// `v` rotated a quarter turn counter-clockwise.
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Unsigned angle between two vectors in `[0, pi]`. Zero vectors give 0.
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    let denom = a.hypot() * b.hypot();
    if denom < EPS {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Direction of `v` as an angle in `[0, tau)`.
pub fn extent(v: Vec2) -> f64 {
    let theta = v.y.atan2(v.x);
    if theta < 0.0 {
        theta + TAU
    } else {
        theta
    }
}

/// Sign of the turn `a -> b -> c`: `1` counter-clockwise, `-1` clockwise,
/// `0` collinear.
pub fn winding(a: Point, b: Point, c: Point) -> i32 {
    sign((b - a).cross(c - a))
}

fn sign(x: f64) -> i32 {
    if x > EPS {
        1
    } else if x < -EPS {
        -1
    } else {
        0
    }
}

/// Intersection of the line through `p1` with direction `d1` and the line
/// through `p2` with direction `d2`.
pub fn line_intersection(p1: Point, d1: Vec2, p2: Point, d2: Vec2) -> Option<Point> {
    let denom = d1.cross(d2);
    if denom.abs() < EPS {
        return None;
    }
    let t = (p2 - p1).cross(d2) / denom;
    Some(p1 + d1 * t)
}

/// Whether the closed segments `a1-a2` and `b1-b2` touch or cross.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = (b2 - b1).cross(a1 - b1);
    let d2 = (b2 - b1).cross(a2 - b1);
    let d3 = (a2 - a1).cross(b1 - a1);
    let d4 = (a2 - a1).cross(b2 - a1);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1.abs() < EPS && on_segment(b1, b2, a1))
        || (d2.abs() < EPS && on_segment(b1, b2, a2))
        || (d3.abs() < EPS && on_segment(a1, a2, b1))
        || (d4.abs() < EPS && on_segment(a1, a2, b2))
}

fn on_segment(s1: Point, s2: Point, p: Point) -> bool {
    p.x >= s1.x.min(s2.x) - EPS
        && p.x <= s1.x.max(s2.x) + EPS
        && p.y >= s1.y.min(s2.y) - EPS
        && p.y <= s1.y.max(s2.y) + EPS
}

/// Unit vector pointing into the middle of the widest angular gap between
/// `vectors`. A single vector yields its opposite and no vectors yield
/// straight down.
pub fn vector_in_largest_gap(vectors: &[Vec2]) -> Vec2 {
    let mut extents: Vec<f64> = vectors
        .iter()
        .filter_map(|&v| normalize(v))
        .map(extent)
        .collect();
    match extents.len() {
        0 => return Vec2::new(0.0, -1.0),
        1 => return Vec2::new(-extents[0].cos(), -extents[0].sin()),
        _ => {}
    }
    extents.sort_by(f64::total_cmp);

    let mut best = 0;
    let mut widest = -1.0;
    for i in 0..extents.len() {
        let after = extents[(i + 1) % extents.len()];
        let mut gap = after - extents[i];
        if gap <= 0.0 {
            gap += TAU;
        }
        if gap > widest {
            widest = gap;
            best = i;
        }
    }
    let theta = extents[best] + widest / 2.0;
    Vec2::new(theta.cos(), theta.sin())
}

/// Of `vectors`, the one making the smallest angle with `reference`.
pub fn nearest_vector(reference: Vec2, vectors: &[Vec2]) -> Option<Vec2> {
    vectors
        .iter()
        .copied()
        .min_by(|a, b| angle_between(reference, *a).total_cmp(&angle_between(reference, *b)))
}

/// Length of the side adjacent to the angle between `hypotenuse` and
/// `adjacent`, for a right triangle whose opposite side is
/// `opposite_length` long. Near-parallel input gives 0.
pub fn adjacent_length(hypotenuse: Vec2, adjacent: Vec2, opposite_length: f64) -> f64 {
    let theta = angle_between(hypotenuse, adjacent);
    if theta < EPS || (PI / 2.0 - theta).abs() < EPS {
        return 0.0;
    }
    theta.tan() * opposite_length
}

pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / points.len() as f64).to_point())
}

/// Median of `values`, averaging the middle pair for even counts.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    values.retain(|v| v.is_finite());
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unit_of_coincident_points_is_zero() {
        let p = Point::new(1.0, 1.0);
        assert_eq!(unit(p, p), Vec2::ZERO);
        assert!(normalize(Vec2::ZERO).is_none());
    }

    #[test]
    fn extent_wraps_to_positive() {
        assert!(close(extent(Vec2::new(1.0, 0.0)), 0.0));
        assert!(close(extent(Vec2::new(0.0, -1.0)), 1.5 * PI));
    }

    #[test]
    fn winding_direction() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert_eq!(winding(a, b, Point::new(1.0, 1.0)), 1);
        assert_eq!(winding(a, b, Point::new(1.0, -1.0)), -1);
        assert_eq!(winding(a, b, Point::new(2.0, 0.0)), 0);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let d = Vec2::new(1.0, 0.0);
        assert!(line_intersection(Point::ZERO, d, Point::new(0.0, 1.0), d).is_none());
        let p = line_intersection(Point::ZERO, d, Point::new(2.0, -1.0), Vec2::new(0.0, 1.0));
        assert_eq!(p, Some(Point::new(2.0, 0.0)));
    }

    #[test]
    fn segment_crossing() {
        let o = Point::ZERO;
        assert!(segments_intersect(
            o,
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 0.0)
        ));
        assert!(!segments_intersect(
            o,
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0)
        ));
    }

    #[test]
    fn largest_gap_between_two_bonds() {
        let v = vector_in_largest_gap(&[Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);
        assert!(close(v.x, -(0.5f64.sqrt())));
        assert!(close(v.y, -(0.5f64.sqrt())));
    }

    #[test]
    fn largest_gap_fallbacks() {
        assert_eq!(vector_in_largest_gap(&[]), Vec2::new(0.0, -1.0));
        let v = vector_in_largest_gap(&[Vec2::new(0.0, 2.0)]);
        assert!(close(v.x, 0.0) && close(v.y, -1.0));
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(vec![]), None);
    }

    #[test]
    fn adjacent_length_of_right_angle_is_zero() {
        let l = adjacent_length(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 1.0);
        assert_eq!(l, 0.0);
        let l = adjacent_length(Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0), 2.0);
        assert!(close(l, 2.0));
    }
}
