//! Structure diagram generation.
//!
//! [`depict`] turns a molecule with 2D coordinates into a
//! [`RenderElement`] tree. The work happens in stages:
//!
//! 1. sgroup display shortcuts decide which atoms and bonds are hidden and
//!    which atoms show an abbreviation instead of their element,
//! 2. aromatic rings eligible for a donut are found,
//! 3. atom symbols are laid out (hydrogens, charges, annotations),
//! 4. bonds are drawn, trimmed clear of the symbols,
//! 5. everything is layered by highlight state, then sgroup brackets and
//!    free annotations are drawn on top.
//!
//! All geometry is in the molecule's coordinate space (y up). Text sizes
//! and spacings given in output units by [`RenderParams`] are divided by the
//! scale, which is `bond_length / median bond length` unless set
//! explicitly.

pub mod abbrev;
mod annotation;
mod atoms;
mod bonds;
mod donut;
mod error;
pub mod hull;
pub mod hydrogen;
pub mod outline;
mod sgroups;
pub mod symbol;

use std::collections::HashSet;

use kurbo::{Point, Vec2};
use peniko::Color;
use petgraph::graph::{EdgeIndex, NodeIndex};

pub use self::error::DepictError;
use self::outline::TextOutline;
use self::sgroups::SgroupDisplay;
use self::symbol::AtomSymbol;
use crate::font::{FontSpec, FontStyle, GlyphMeasurer};
use crate::geom;
use crate::mol::Mol;
use crate::params::{HighlightStyle, RenderParams};
use crate::render::{Mark, RenderElement};
use crate::rings::RingSet;
use crate::traits::{DepictAtom, DepictBond};

/// Model bond length assumed when a molecule has no bonds to measure.
const DEFAULT_MODEL_BOND_LENGTH: f64 = 1.5;

/// Draws `mol`.
///
/// Every atom that ends up visible, and every atom at the end of a visible
/// bond, must have a 2D position.
///
/// ```
/// use crabdepict::{depict, Atom, Bond, BoxMeasurer, Mol, RenderParams};
///
/// let mut mol = Mol::new();
/// let c = mol.add_atom(Atom::new(6, 0.0, 0.0));
/// let o = mol.add_atom(Atom::new(8, 1.5, 0.0));
/// mol.add_bond(c, o, Bond::default());
///
/// let tree = depict(&mol, &RenderParams::default(), &BoxMeasurer).unwrap();
/// assert_eq!(tree.lines().len(), 1);
/// ```
pub fn depict<A, B>(
    mol: &Mol<A, B>,
    params: &RenderParams,
    measurer: &dyn GlyphMeasurer,
) -> Result<RenderElement, DepictError>
where
    A: DepictAtom,
    B: DepictBond,
{
    params.validate()?;
    if mol.atom_count() == 0 {
        return Ok(RenderElement::marked(Mark::Molecule, RenderElement::empty()));
    }

    let display = SgroupDisplay::prepare(mol, &params.selection);
    let ctx = DepictContext::new(mol, params, measurer, display)?;

    let donuts = if params.delocalised_donuts {
        donut::generate(&ctx)
    } else {
        donut::Donuts::default()
    };

    let mut symbols = atoms::generate(&ctx, &donuts.charged_atoms);
    let mut annotations = Vec::new();
    annotation::annotate_atoms(&ctx, &mut symbols, &mut annotations);

    let mut bond_elements: Vec<(EdgeIndex, RenderElement)> = Vec::new();
    {
        let mut gen = bonds::BondGenerator::new(&ctx, &mut symbols, &donuts.bonds);
        for bond in mol.bonds() {
            if ctx.is_bond_hidden(bond) {
                continue;
            }
            if let Some(elem) = gen.generate(bond) {
                bond_elements.push((bond, elem));
            }
        }
    }
    annotation::annotate_bonds(&ctx, &mut annotations);

    let glow_extra = 2.0 * ctx.glow_width();
    let mut back = Vec::new();
    let mut middle = Vec::new();
    let mut front = Vec::new();

    for (bond, elem) in bond_elements {
        let highlight = ctx.bond_highlight(bond);
        place(&ctx, Mark::Bond(bond), elem, highlight, glow_extra, &mut back, &mut middle, &mut front);
    }

    for atom in mol.atoms() {
        if ctx.is_atom_hidden(atom) {
            continue;
        }
        let highlight = ctx.atom_highlight(atom);
        let Some(symbol) = &symbols[atom.index()] else {
            if let (Some(color), HighlightStyle::OuterGlow) = (highlight, params.highlighting) {
                let disc = RenderElement::oval(
                    ctx.pos(atom),
                    1.75 * ctx.glow_width(),
                    true,
                    0.0,
                    color,
                );
                back.push(RenderElement::marked(Mark::OuterGlow, disc));
            }
            continue;
        };
        let color = params.atom_colors.color_of(mol.atom(atom).atomic_num());
        let elem = symbol_element(&ctx, symbol, color);
        place(&ctx, Mark::Atom(atom), elem, highlight, glow_extra, &mut back, &mut middle, &mut front);
    }

    if !donuts.elements.is_empty() {
        front.push(RenderElement::Group(donuts.elements));
    }

    let sgroup_layer = sgroups::generate(&ctx, &symbols);

    let layers = vec![
        RenderElement::Group(back),
        RenderElement::Group(middle),
        RenderElement::Group(front),
        sgroup_layer,
        RenderElement::marked(Mark::Annotation, RenderElement::Group(annotations)),
    ];
    Ok(RenderElement::marked(Mark::Molecule, RenderElement::Group(layers)))
}

/// Puts an element in the layer its highlight state calls for.
#[allow(clippy::too_many_arguments)]
fn place<A, B>(
    ctx: &DepictContext<'_, A, B>,
    mark: Mark,
    elem: RenderElement,
    highlight: Option<Color>,
    glow_extra: f64,
    back: &mut Vec<RenderElement>,
    middle: &mut Vec<RenderElement>,
    front: &mut Vec<RenderElement>,
) {
    match (highlight, ctx.params.highlighting) {
        (Some(color), HighlightStyle::OuterGlow) => {
            back.push(elem.outer_glow(color, glow_extra));
            middle.push(RenderElement::marked(mark, elem));
        }
        (Some(color), HighlightStyle::Colored) => {
            front.push(RenderElement::marked(mark, elem.recolor(color)));
        }
        _ => middle.push(RenderElement::marked(mark, elem)),
    }
}

/// Filled outlines of a symbol; annotations keep the annotation colour.
fn symbol_element<A, B>(
    ctx: &DepictContext<'_, A, B>,
    symbol: &AtomSymbol,
    color: Color,
) -> RenderElement {
    let mut parts: Vec<RenderElement> = symbol
        .outlines()
        .filter(|o| !o.is_empty())
        .map(|o| RenderElement::fill(o.path(), color))
        .collect();
    let notes: Vec<RenderElement> = symbol
        .annotation_outlines()
        .iter()
        .map(|o| RenderElement::fill(o.path(), ctx.params.annotation_color))
        .collect();
    if !notes.is_empty() {
        parts.push(RenderElement::marked(
            Mark::Annotation,
            RenderElement::Group(notes),
        ));
    }
    RenderElement::Group(parts)
}

/// Shared, read-only state of one depiction.
pub(crate) struct DepictContext<'a, A, B> {
    pub mol: &'a Mol<A, B>,
    pub params: &'a RenderParams,
    pub measurer: &'a dyn GlyphMeasurer,
    pub scale: f64,
    pub stroke: f64,
    pub rings: RingSet,
    pub display: SgroupDisplay,
    positions: Vec<Option<Point>>,
}

impl<'a, A, B> DepictContext<'a, A, B>
where
    A: DepictAtom,
    B: DepictBond,
{
    fn new(
        mol: &'a Mol<A, B>,
        params: &'a RenderParams,
        measurer: &'a dyn GlyphMeasurer,
        display: SgroupDisplay,
    ) -> Result<Self, DepictError> {
        let positions: Vec<Option<Point>> = mol
            .atoms()
            .map(|a| mol.atom(a).position_2d().map(geom::point))
            .collect();

        let mut required: HashSet<NodeIndex> =
            mol.atoms().filter(|a| !display.hidden_atoms.contains(a)).collect();
        for bond in mol.bonds() {
            if display.hidden_bonds.contains(&bond) {
                continue;
            }
            if let Some((a, b)) = mol.bond_endpoints(bond) {
                required.insert(a);
                required.insert(b);
            }
        }
        let mut required: Vec<NodeIndex> = required.into_iter().collect();
        required.sort();
        if let Some(&atom) = required.iter().find(|a| positions[a.index()].is_none()) {
            return Err(DepictError::MissingCoordinates { atom });
        }

        let scale = match params.scale {
            Some(s) => s,
            None => {
                let lengths = mol
                    .bonds()
                    .filter_map(|b| mol.bond_endpoints(b))
                    .filter_map(|(a, b)| Some((positions[a.index()]? - positions[b.index()]?).hypot()))
                    .collect();
                let median = geom::median(lengths)
                    .filter(|m| *m > 1e-6)
                    .unwrap_or(DEFAULT_MODEL_BOND_LENGTH);
                params.bond_length / median
            }
        };

        let pipe = measurer.layout("|", &FontSpec::new(params.font_size));
        let stroke = params.stroke_ratio * pipe.bounds.width().max(1e-3) / scale;
        if pipe.bounds.width() <= 0.0 {
            log::warn!("font has no width for '|', stroke width falls back to a minimum");
        }

        Ok(Self {
            mol,
            params,
            measurer,
            scale,
            stroke,
            rings: RingSet::edge_short(mol),
            display,
            positions,
        })
    }

    pub fn pos(&self, atom: NodeIndex) -> Point {
        self.positions
            .get(atom.index())
            .copied()
            .flatten()
            .unwrap_or(Point::ZERO)
    }

    pub fn has_pos(&self, atom: NodeIndex) -> bool {
        matches!(self.positions.get(atom.index()), Some(Some(_)))
    }

    /// Unit vector along a bond from `from` to the other atom.
    pub fn bond_vector(&self, from: NodeIndex, bond: EdgeIndex) -> Vec2 {
        match self.mol.other_atom(bond, from) {
            Some(to) => geom::unit(self.pos(from), self.pos(to)),
            None => Vec2::ZERO,
        }
    }

    pub fn is_atom_hidden(&self, atom: NodeIndex) -> bool {
        self.display.hidden_atoms.contains(&atom)
    }

    pub fn is_bond_hidden(&self, bond: EdgeIndex) -> bool {
        self.display.hidden_bonds.contains(&bond)
    }

    /// Bonds at `atom` that are drawn.
    pub fn visible_bonds(&self, atom: NodeIndex) -> Vec<EdgeIndex> {
        let mut bonds: Vec<EdgeIndex> = self
            .mol
            .bonds_of(atom)
            .filter(|&b| !self.is_bond_hidden(b))
            .collect();
        bonds.sort();
        bonds
    }

    pub fn foreground(&self) -> Color {
        self.params.atom_colors.foreground()
    }

    pub fn separation(&self) -> f64 {
        self.params.bond_separation * self.params.bond_length / self.scale
    }

    pub fn wedge_width(&self) -> f64 {
        self.params.wedge_ratio * self.stroke
    }

    pub fn hash_spacing(&self) -> f64 {
        self.params.hash_spacing / self.scale
    }

    pub fn wave_spacing(&self) -> f64 {
        self.params.wave_spacing / self.scale
    }

    /// Gap left between a symbol hull and a bond end.
    pub fn margin(&self) -> f64 {
        self.params.symbol_margin_ratio * self.stroke
    }

    pub fn annotation_distance(&self) -> f64 {
        self.params.annotation_distance * self.params.bond_length / self.scale
    }

    pub fn bracket_depth(&self) -> f64 {
        self.params.sgroup_bracket_depth * self.params.bond_length / self.scale
    }

    pub fn glow_width(&self) -> f64 {
        self.params.outer_glow_width * self.stroke
    }

    /// Text at the symbol font size, in output units. Callers resize by
    /// `1 / scale` once laid out.
    pub fn text(&self, text: &str, style: FontStyle) -> TextOutline {
        self.text_sized(text, style, 1.0)
    }

    pub fn text_sized(&self, text: &str, style: FontStyle, rel_size: f64) -> TextOutline {
        let font = FontSpec::new(self.params.font_size * rel_size).with_style(style);
        TextOutline::new(text, &font, self.measurer)
    }

    /// Text laid out and scaled to model units.
    pub fn model_text(&self, text: &str, style: FontStyle, rel_size: f64) -> TextOutline {
        let inv = 1.0 / self.scale;
        self.text_sized(text, style, rel_size).resize(inv, inv)
    }

    pub fn atom_highlight(&self, atom: NodeIndex) -> Option<Color> {
        if self.params.highlighting == HighlightStyle::None {
            return None;
        }
        if self.params.selection.contains_atom(atom) {
            return Some(self.params.selection_color);
        }
        self.mol.atom(atom).highlight()
    }

    pub fn bond_highlight(&self, bond: EdgeIndex) -> Option<Color> {
        if self.params.highlighting == HighlightStyle::None {
            return None;
        }
        if self.params.selection.contains_bond(bond) {
            return Some(self.params.selection_color);
        }
        self.mol.bond(bond).highlight()
    }

    /// Median length of the visible bonds among `bonds`.
    pub fn median_bond_length(&self, bonds: &[EdgeIndex]) -> Option<f64> {
        let lengths = bonds
            .iter()
            .filter_map(|&b| self.mol.bond_endpoints(b))
            .map(|(a, b)| (self.pos(a) - self.pos(b)).hypot())
            .collect();
        geom::median(lengths)
    }
}

/// Per-atom symbol table, indexed by atom index.
pub(crate) type Symbols = Vec<Option<AtomSymbol>>;
