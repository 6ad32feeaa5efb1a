//! Where to put the implicit hydrogen label of an atom.

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use kurbo::{Point, Vec2};

use crate::element;
use crate::geom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HydrogenPosition {
    Right,
    Left,
    Above,
    Below,
}

/// Preference order when two sides are otherwise equally good.
const PRIORITY: [HydrogenPosition; 4] = [
    HydrogenPosition::Right,
    HydrogenPosition::Left,
    HydrogenPosition::Above,
    HydrogenPosition::Below,
];

const VERTICAL_THRESHOLD: f64 = 0.1;
const EXTENT_TOLERANCE: f64 = 0.05;

impl HydrogenPosition {
    pub fn vector(self) -> Vec2 {
        match self {
            HydrogenPosition::Right => Vec2::new(1.0, 0.0),
            HydrogenPosition::Left => Vec2::new(-1.0, 0.0),
            HydrogenPosition::Above => Vec2::new(0.0, 1.0),
            HydrogenPosition::Below => Vec2::new(0.0, -1.0),
        }
    }

    /// Picks a side from the atom's position and its neighbours' positions.
    pub fn of(atomic_num: u8, center: Point, neighbors: &[Point]) -> Self {
        let vectors: Vec<Vec2> = neighbors
            .iter()
            .filter_map(|&n| geom::normalize(n - center))
            .collect();
        if vectors.len() < neighbors.len() {
            log::debug!("coincident neighbour ignored for hydrogen placement");
        }
        Self::from_vectors(atomic_num, &vectors)
    }

    /// Picks a side from unit vectors toward the neighbours.
    pub fn from_vectors(atomic_num: u8, vectors: &[Vec2]) -> Self {
        match vectors.len() {
            0 => Self::default_for(atomic_num),
            1 => {
                if vectors[0].x > VERTICAL_THRESHOLD {
                    HydrogenPosition::Left
                } else {
                    HydrogenPosition::Right
                }
            }
            2 => {
                let sum = -(vectors[0] + vectors[1]);
                if sum.hypot() < EXTENT_TOLERANCE {
                    Self::using_angular_extent(vectors)
                } else {
                    Self::using_cardinal_direction(sum)
                }
            }
            _ => Self::using_angular_extent(vectors),
        }
    }

    /// "H2O" rather than "OH2": chalcogens and halogens put H on the left.
    fn default_for(atomic_num: u8) -> Self {
        match atomic_num {
            element::OXYGEN
            | element::SULFUR
            | element::SELENIUM
            | element::TELLURIUM
            | element::FLUORINE
            | element::CHLORINE
            | element::BROMINE
            | element::IODINE => HydrogenPosition::Left,
            _ => HydrogenPosition::Right,
        }
    }

    fn using_cardinal_direction(direction: Vec2) -> Self {
        let theta = direction.y.atan2(direction.x);
        match (theta / (PI / 4.0)).round() as i32 {
            -4 | -3 | 3 | 4 => HydrogenPosition::Left,
            2 => HydrogenPosition::Above,
            -2 => HydrogenPosition::Below,
            _ => HydrogenPosition::Right,
        }
    }

    fn using_angular_extent(vectors: &[Vec2]) -> Self {
        let mut extents: Vec<f64> = vectors.iter().map(|&v| geom::extent(v)).collect();
        extents.sort_by(f64::total_cmp);

        // per side: (total extent of the gap it sits in, distance from gap middle)
        let mut best: HashMap<HydrogenPosition, (f64, f64)> = HashMap::new();
        for i in 0..extents.len() {
            let before = extents[i];
            let after = extents[(i + 1) % extents.len()];
            for position in PRIORITY {
                let bias = TAU - geom::extent(position.vector());
                let after_bias = wrap(after + bias);
                let before_bias = wrap(before + bias);
                let before_extent = TAU - before_bias;
                let total = after_bias + before_extent;
                let offset = (total / 2.0 - before_extent).abs();
                let entry = best.entry(position).or_insert((total, offset));
                if total < entry.0 {
                    *entry = (total, offset);
                }
            }
        }

        let mut choice: Option<(HydrogenPosition, (f64, f64))> = None;
        for position in PRIORITY {
            let Some(&cand) = best.get(&position) else {
                continue;
            };
            match choice {
                Some((_, cur)) if !roomier(cand, cur) => {}
                _ => choice = Some((position, cand)),
            }
        }
        choice.map_or(HydrogenPosition::Right, |(p, _)| p)
    }
}

/// Larger gap wins, then the better centred one. Otherwise keep the earlier
/// side in priority order.
fn roomier(a: (f64, f64), b: (f64, f64)) -> bool {
    if (a.0 - b.0).abs() > EXTENT_TOLERANCE {
        a.0 > b.0
    } else if (a.1 - b.1).abs() > EXTENT_TOLERANCE {
        a.1 < b.1
    } else {
        false
    }
}

fn wrap(theta: f64) -> f64 {
    if theta >= TAU {
        theta - TAU
    } else {
        theta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(deg: f64) -> Vec2 {
        let r = deg.to_radians();
        Vec2::new(r.cos(), r.sin())
    }

    #[test]
    fn isolated_atoms() {
        assert_eq!(HydrogenPosition::from_vectors(8, &[]), HydrogenPosition::Left);
        assert_eq!(HydrogenPosition::from_vectors(17, &[]), HydrogenPosition::Left);
        assert_eq!(HydrogenPosition::from_vectors(7, &[]), HydrogenPosition::Right);
    }

    #[test]
    fn terminal_atoms_face_away() {
        assert_eq!(HydrogenPosition::from_vectors(7, &[v(0.0)]), HydrogenPosition::Left);
        assert_eq!(HydrogenPosition::from_vectors(7, &[v(180.0)]), HydrogenPosition::Right);
        // nearly vertical bonds keep the default right side
        assert_eq!(HydrogenPosition::from_vectors(7, &[v(89.0)]), HydrogenPosition::Right);
    }

    #[test]
    fn two_bonds_use_opposite_of_average() {
        // bonds down-left and down-right: hydrogens go on top
        let pos = HydrogenPosition::from_vectors(7, &[v(-150.0), v(-30.0)]);
        assert_eq!(pos, HydrogenPosition::Above);
        let pos = HydrogenPosition::from_vectors(7, &[v(150.0), v(30.0)]);
        assert_eq!(pos, HydrogenPosition::Below);
        let pos = HydrogenPosition::from_vectors(7, &[v(60.0), v(-60.0)]);
        assert_eq!(pos, HydrogenPosition::Left);
    }

    #[test]
    fn collinear_bonds_do_not_produce_nan() {
        let pos = HydrogenPosition::of(
            7,
            Point::new(0.0, 0.0),
            &[Point::new(1.0, 0.0), Point::new(-1.0, 0.0)],
        );
        // both vertical gaps are equally wide and centred, so above wins
        assert_eq!(pos, HydrogenPosition::Above);
    }

    #[test]
    fn three_bonds_pick_widest_gap() {
        let pos = HydrogenPosition::from_vectors(7, &[v(90.0), v(180.0), v(270.0)]);
        assert_eq!(pos, HydrogenPosition::Right);
        let pos = HydrogenPosition::from_vectors(7, &[v(0.0), v(90.0), v(180.0)]);
        assert_eq!(pos, HydrogenPosition::Below);
    }
}
