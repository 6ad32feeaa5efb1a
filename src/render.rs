//! The abstract drawing primitives produced by a depiction.
//!
//! A depiction is a tree: leaves are lines, filled or stroked paths, and
//! ovals; inner nodes are plain groups or [`Mark`]ed groups recording which
//! part of the molecule produced them. No painting happens here.

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::Color;
use petgraph::graph::{EdgeIndex, NodeIndex};

#[derive(Debug, Clone, PartialEq)]
pub struct LineElement {
    pub start: Point,
    pub end: Point,
    pub width: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathStyle {
    Fill,
    Stroke(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub path: BezPath,
    pub color: Color,
    pub style: PathStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OvalElement {
    pub center: Point,
    pub radius: f64,
    /// Filled disc when true, otherwise a circle stroked with `width`.
    pub fill: bool,
    pub width: f64,
    pub color: Color,
}

/// What a marked subtree depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Molecule,
    Atom(NodeIndex),
    Bond(EdgeIndex),
    /// Index into the molecule's sgroup list.
    Sgroup(usize),
    Annotation,
    OuterGlow,
    Donut,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderElement {
    Line(LineElement),
    Path(PathElement),
    Oval(OvalElement),
    Group(Vec<RenderElement>),
    Marked {
        mark: Mark,
        element: Box<RenderElement>,
    },
}

impl RenderElement {
    pub fn line(start: Point, end: Point, width: f64, color: Color) -> Self {
        RenderElement::Line(LineElement {
            start,
            end,
            width,
            color,
        })
    }

    pub fn fill(path: BezPath, color: Color) -> Self {
        RenderElement::Path(PathElement {
            path,
            color,
            style: PathStyle::Fill,
        })
    }

    pub fn stroke(path: BezPath, width: f64, color: Color) -> Self {
        RenderElement::Path(PathElement {
            path,
            color,
            style: PathStyle::Stroke(width),
        })
    }

    pub fn oval(center: Point, radius: f64, fill: bool, width: f64, color: Color) -> Self {
        RenderElement::Oval(OvalElement {
            center,
            radius,
            fill,
            width,
            color,
        })
    }

    pub fn empty() -> Self {
        RenderElement::Group(Vec::new())
    }

    pub fn marked(mark: Mark, element: RenderElement) -> Self {
        RenderElement::Marked {
            mark,
            element: Box::new(element),
        }
    }

    /// True when the subtree holds no leaf primitives.
    pub fn is_empty(&self) -> bool {
        match self {
            RenderElement::Group(children) => children.iter().all(RenderElement::is_empty),
            RenderElement::Marked { element, .. } => element.is_empty(),
            _ => false,
        }
    }

    /// A copy with every primitive painted in `color`.
    pub fn recolor(&self, color: Color) -> Self {
        match self {
            RenderElement::Line(l) => RenderElement::Line(LineElement { color, ..l.clone() }),
            RenderElement::Path(p) => RenderElement::Path(PathElement { color, ..p.clone() }),
            RenderElement::Oval(o) => RenderElement::Oval(OvalElement { color, ..o.clone() }),
            RenderElement::Group(children) => {
                RenderElement::Group(children.iter().map(|c| c.recolor(color)).collect())
            }
            RenderElement::Marked { mark, element } => {
                RenderElement::marked(*mark, element.recolor(color))
            }
        }
    }

    /// A widened copy in `color`, meant to be drawn behind the original.
    /// Every primitive grows by `extra` in total width.
    pub fn outer_glow(&self, color: Color, extra: f64) -> Self {
        let glow = match self {
            RenderElement::Line(l) => RenderElement::Line(LineElement {
                width: l.width + extra,
                color,
                ..l.clone()
            }),
            RenderElement::Path(p) => match p.style {
                PathStyle::Fill => RenderElement::Group(vec![
                    RenderElement::fill(p.path.clone(), color),
                    RenderElement::stroke(p.path.clone(), extra, color),
                ]),
                PathStyle::Stroke(w) => RenderElement::stroke(p.path.clone(), w + extra, color),
            },
            RenderElement::Oval(o) => RenderElement::Oval(OvalElement {
                radius: o.radius + extra / 2.0,
                color,
                ..o.clone()
            }),
            RenderElement::Group(children) => {
                return RenderElement::Group(
                    children.iter().map(|c| c.outer_glow(color, extra)).collect(),
                )
            }
            RenderElement::Marked { element, .. } => return element.outer_glow(color, extra),
        };
        RenderElement::marked(Mark::OuterGlow, glow)
    }

    /// Pre-order visit of every node.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a RenderElement)) {
        f(self);
        match self {
            RenderElement::Group(children) => {
                for c in children {
                    c.walk(f);
                }
            }
            RenderElement::Marked { element, .. } => element.walk(f),
            _ => {}
        }
    }

    pub fn lines(&self) -> Vec<&LineElement> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let RenderElement::Line(l) = e {
                out.push(l);
            }
        });
        out
    }

    pub fn paths(&self) -> Vec<&PathElement> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let RenderElement::Path(p) = e {
                out.push(p);
            }
        });
        out
    }

    pub fn ovals(&self) -> Vec<&OvalElement> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let RenderElement::Oval(o) = e {
                out.push(o);
            }
        });
        out
    }

    /// Every subtree carrying `mark`.
    pub fn find(&self, mark: Mark) -> Vec<&RenderElement> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let RenderElement::Marked { mark: m, element } = e {
                if *m == mark {
                    out.push(&**element);
                }
            }
        });
        out
    }

    /// Bounding box of all primitives, `None` for an empty tree.
    pub fn bounds(&self) -> Option<Rect> {
        let mut acc: Option<Rect> = None;
        self.walk(&mut |e| {
            let r = match e {
                RenderElement::Line(l) => Some(
                    Rect::from_points(l.start, l.end).inflate(l.width / 2.0, l.width / 2.0),
                ),
                RenderElement::Path(p) if !p.path.elements().is_empty() => {
                    let b = p.path.bounding_box();
                    Some(match p.style {
                        PathStyle::Fill => b,
                        PathStyle::Stroke(w) => b.inflate(w / 2.0, w / 2.0),
                    })
                }
                RenderElement::Oval(o) => Some(Rect::from_center_size(
                    o.center,
                    (2.0 * o.radius, 2.0 * o.radius),
                )),
                _ => None,
            };
            if let Some(r) = r {
                acc = Some(acc.map_or(r, |a| a.union(r)));
            }
        });
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, RED};

    fn sample() -> RenderElement {
        RenderElement::marked(
            Mark::Molecule,
            RenderElement::Group(vec![
                RenderElement::marked(
                    Mark::Bond(EdgeIndex::new(0)),
                    RenderElement::line(Point::ZERO, Point::new(1.0, 0.0), 0.1, BLACK),
                ),
                RenderElement::oval(Point::new(0.0, 1.0), 0.5, false, 0.1, BLACK),
            ]),
        )
    }

    #[test]
    fn collectors_see_nested_leaves() {
        let tree = sample();
        assert_eq!(tree.lines().len(), 1);
        assert_eq!(tree.ovals().len(), 1);
        assert!(tree.paths().is_empty());
        assert_eq!(tree.find(Mark::Bond(EdgeIndex::new(0))).len(), 1);
    }

    #[test]
    fn recolor_reaches_every_leaf() {
        let tree = sample().recolor(RED);
        assert!(tree.lines().iter().all(|l| l.color == RED));
        assert!(tree.ovals().iter().all(|o| o.color == RED));
    }

    #[test]
    fn glow_widens() {
        let tree = sample().outer_glow(RED, 0.4);
        let line = tree.lines()[0];
        assert!((line.width - 0.5).abs() < 1e-12);
        assert!((tree.ovals()[0].radius - 0.7).abs() < 1e-12);
        assert!(!tree.find(Mark::OuterGlow).is_empty());
    }

    #[test]
    fn bounds_cover_everything() {
        let b = sample().bounds().unwrap();
        assert!(b.y1 >= 1.5 && b.x1 >= 1.0);
        assert!(RenderElement::empty().bounds().is_none());
        assert!(RenderElement::empty().is_empty());
    }
}
