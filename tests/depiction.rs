use crabdepict::render::PathStyle;
use crabdepict::{
    color, depict, Atom, Bond, BondOrder, BoxMeasurer, DepictError, HighlightStyle, Mark, Mol,
    RenderElement, RenderParams, Sgroup,
};
use kurbo::{Point, Shape};
use petgraph::graph::{EdgeIndex, NodeIndex};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn load(json: &str) -> Mol<Atom, Bond> {
    Mol::from_json(json).unwrap()
}

fn draw(mol: &Mol<Atom, Bond>, params: &RenderParams) -> RenderElement {
    depict(mol, params, &BoxMeasurer).unwrap()
}

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

/// `C-O` along the x axis, bond length 1.5.
fn methanol() -> (Mol<Atom, Bond>, NodeIndex, NodeIndex, EdgeIndex) {
    let mut mol = Mol::new();
    let c = mol.add_atom(Atom::new(6, 0.0, 0.0));
    let o = mol.add_atom(Atom {
        hydrogen_count: 1,
        ..Atom::new(8, 1.5, 0.0)
    });
    let b = mol.add_bond(c, o, Bond::default());
    (mol, c, o, b)
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn distance_to_line(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    (d.cross(p - a) / d.hypot()).abs()
}

// ---------------------------------------------------------------------------
// Molecule level
// ---------------------------------------------------------------------------

#[test]
fn empty_molecule_draws_nothing() {
    let mol = Mol::<Atom, Bond>::new();
    let tree = draw(&mol, &RenderParams::default());
    assert!(tree.bounds().is_none());
    assert_eq!(tree.find(Mark::Molecule).len(), 1);
}

#[test]
fn missing_coordinates_are_reported() {
    let mut mol = Mol::new();
    let a = mol.add_atom(Atom::new(6, 0.0, 0.0));
    let b = mol.add_atom(Atom {
        atomic_num: 8,
        ..Atom::default()
    });
    mol.add_bond(a, b, Bond::default());

    let err = depict(&mol, &RenderParams::default(), &BoxMeasurer).unwrap_err();
    assert!(matches!(err, DepictError::MissingCoordinates { atom } if atom == b));
}

#[test]
fn invalid_parameters_are_rejected() {
    let (mol, ..) = methanol();
    let params = RenderParams {
        bond_length: 0.0,
        ..RenderParams::default()
    };
    let err = depict(&mol, &params, &BoxMeasurer).unwrap_err();
    assert!(matches!(
        err,
        DepictError::InvalidParameter {
            name: "bond_length",
            ..
        }
    ));
}

#[test]
fn params_from_json_fill_defaults() {
    let params = RenderParams::from_json(r#"{"bond_length": 25.0, "highlighting": "colored"}"#).unwrap();
    assert_eq!(params.bond_length, 25.0);
    assert_eq!(params.highlighting, HighlightStyle::Colored);
    assert_eq!(params.font_size, RenderParams::default().font_size);
    assert!(RenderParams::from_json(r#"{"font_size": -1.0}"#).is_err());
}

#[test]
fn every_atom_lies_inside_the_drawing() {
    let mol = load(include_str!("data/benzene_kekule.json"));
    let tree = draw(&mol, &RenderParams::default());
    let bounds = tree.bounds().unwrap().inflate(1e-9, 1e-9);
    for atom in mol.atoms() {
        let [x, y] = mol.atom(atom).position.unwrap();
        assert!(bounds.contains(Point::new(x, y)), "atom {} outside", atom.index());
    }
}

// ---------------------------------------------------------------------------
// Bonds
// ---------------------------------------------------------------------------

#[test]
fn bond_stops_short_of_a_label() {
    let (mol, _, _, b) = methanol();
    let tree = draw(&mol, &RenderParams::default());
    let bond = tree.find(Mark::Bond(b));
    assert_eq!(bond.len(), 1);
    let lines = bond[0].lines();
    assert_eq!(lines.len(), 1);

    // the carbon is implicit, the oxygen is a label
    assert!(approx_eq(lines[0].start.x, 0.0, 1e-9));
    assert!(lines[0].end.x < 1.5 - 0.1);
    assert!(approx_eq(lines[0].end.y, 0.0, 1e-9));
}

#[test]
fn terminal_double_bond_is_offset_by_the_separation() {
    let mut mol = Mol::new();
    let c0 = mol.add_atom(Atom::new(6, 0.0, 0.0));
    let c1 = mol.add_atom(Atom::new(6, 1.299, 0.75));
    let c2 = mol.add_atom(Atom::new(6, 2.598, 0.0));
    mol.add_bond(c0, c1, Bond::default());
    let double = mol.add_bond(c1, c2, Bond::new(BondOrder::Double));

    let params = RenderParams::default();
    let tree = draw(&mol, &params);
    let lines = tree.find(Mark::Bond(double))[0].lines();
    assert_eq!(lines.len(), 2);

    let (a, b) = (Point::new(1.299, 0.75), Point::new(2.598, 0.0));
    let mut distances: Vec<f64> = lines
        .iter()
        .map(|l| distance_to_line(l.start.midpoint(l.end), a, b))
        .collect();
    distances.sort_by(f64::total_cmp);

    // separation is a fraction of the bond length
    let expected = params.bond_separation * 1.5;
    assert!(approx_eq(distances[0], 0.0, 1e-6));
    assert!(approx_eq(distances[1], expected, 1e-3), "{distances:?}");
}

/// Gap between the two lines of a double bond.
fn double_bond_gap(mol: &Mol<Atom, Bond>, bond: EdgeIndex, separation: f64) -> f64 {
    let params = RenderParams {
        bond_separation: separation,
        ..RenderParams::default()
    };
    let tree = draw(mol, &params);
    let lines = tree.find(Mark::Bond(bond))[0].lines();
    assert_eq!(lines.len(), 2);
    distance_to_line(lines[0].start.midpoint(lines[0].end), lines[1].start, lines[1].end)
}

#[test]
fn wider_separation_spreads_double_bonds() {
    // centred between two labels
    let mut dioxygen = Mol::new();
    let a = dioxygen.add_atom(Atom::new(8, 0.0, 0.0));
    let b = dioxygen.add_atom(Atom::new(8, 1.5, 0.0));
    let centred = dioxygen.add_bond(a, b, Bond::new(BondOrder::Double));

    // offset at a terminal carbon
    let mut propene = Mol::new();
    let c0 = propene.add_atom(Atom::new(6, 0.0, 0.0));
    let c1 = propene.add_atom(Atom::new(6, 1.299, 0.75));
    let c2 = propene.add_atom(Atom::new(6, 2.598, 0.0));
    propene.add_bond(c0, c1, Bond::default());
    let offset = propene.add_bond(c1, c2, Bond::new(BondOrder::Double));

    for (mol, bond) in [(&dioxygen, centred), (&propene, offset)] {
        let gaps: Vec<f64> = [0.1, 0.18, 0.3]
            .iter()
            .map(|&s| double_bond_gap(mol, bond, s))
            .collect();
        assert!(gaps[0] < gaps[1] && gaps[1] < gaps[2], "{gaps:?}");
    }
}

#[test]
fn kekule_benzene_has_three_inner_lines() {
    let mol = load(include_str!("data/benzene_kekule.json"));
    let tree = draw(&mol, &RenderParams::default());
    assert_eq!(tree.lines().len(), 9);
    assert!(tree.ovals().is_empty());

    // inner lines sit inside the ring
    for bond in [0, 2, 4] {
        for line in tree.find(Mark::Bond(EdgeIndex::new(bond)))[0].lines() {
            assert!(line.start.to_vec2().hypot() < 1.5 + 1e-6);
            assert!(line.end.to_vec2().hypot() < 1.5 + 1e-6);
        }
    }
}

#[test]
fn aromatic_benzene_donut() {
    let mol = load(include_str!("data/benzene_aromatic.json"));
    let params = RenderParams {
        delocalised_donuts: true,
        ..RenderParams::default()
    };
    let tree = draw(&mol, &params);

    assert_eq!(tree.find(Mark::Donut).len(), 1);
    let ovals = tree.ovals();
    assert_eq!(ovals.len(), 1);
    assert!(!ovals[0].fill);
    assert!(ovals[0].center.to_vec2().hypot() < 1e-3);
    assert!(ovals[0].radius > 0.0 && ovals[0].radius < 1.3);
    // one plain line per ring bond
    assert_eq!(tree.lines().len(), 6);
}

#[test]
fn aromatic_benzene_without_donut_is_dashed() {
    let mol = load(include_str!("data/benzene_aromatic.json"));
    let tree = draw(&mol, &RenderParams::default());
    assert!(tree.ovals().is_empty());
    assert!(tree.lines().len() > 6);
}

#[test]
fn aromatic_bond_between_labels_is_one_dashed_line() {
    let mut mol = Mol::new();
    let a = mol.add_atom(Atom::new(7, 0.0, 0.0));
    let b = mol.add_atom(Atom::new(7, 1.5, 0.0));
    let bond = mol.add_bond(a, b, Bond::aromatic());

    let tree = draw(&mol, &RenderParams::default());
    let lines = tree.find(Mark::Bond(bond))[0].lines();
    assert!(lines.len() > 1, "expected dashes, got {} lines", lines.len());
    for line in lines {
        assert!(approx_eq(line.start.y, 0.0, 1e-9) && approx_eq(line.end.y, 0.0, 1e-9));
        assert!(line.start.x > 0.0 && line.end.x < 1.5);
    }
}

// ---------------------------------------------------------------------------
// Atom symbols
// ---------------------------------------------------------------------------

#[test]
fn hydrogen_goes_away_from_the_bond() {
    let (mol, _, o, _) = methanol();
    let tree = draw(&mol, &RenderParams::default());
    let symbol = tree.find(Mark::Atom(o))[0].bounds().unwrap();
    assert!(symbol.center().x > 1.5);

    let mut flipped = Mol::new();
    let o = flipped.add_atom(Atom {
        hydrogen_count: 1,
        ..Atom::new(8, 0.0, 0.0)
    });
    let c = flipped.add_atom(Atom::new(6, 1.5, 0.0));
    flipped.add_bond(o, c, Bond::default());
    let tree = draw(&flipped, &RenderParams::default());
    let symbol = tree.find(Mark::Atom(o))[0].bounds().unwrap();
    assert!(symbol.center().x < 0.0);
}

#[test]
fn implicit_carbons_have_no_symbol() {
    let (mol, c, o, _) = methanol();
    let tree = draw(&mol, &RenderParams::default());
    assert!(tree.find(Mark::Atom(c)).is_empty());
    assert_eq!(tree.find(Mark::Atom(o)).len(), 1);
}

#[test]
fn atom_notes_use_the_annotation_color() {
    let (mut mol, c, ..) = methanol();
    mol.atom_mut(c).note = Some("1".into());
    let params = RenderParams::default();
    let tree = draw(&mol, &params);

    let notes: Vec<_> = tree
        .find(Mark::Annotation)
        .into_iter()
        .flat_map(|e| e.paths())
        .collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].color, params.annotation_color);
    assert_eq!(notes[0].style, PathStyle::Fill);
}

// ---------------------------------------------------------------------------
// Highlighting
// ---------------------------------------------------------------------------

#[test]
fn colored_highlight_recolors_the_symbol() {
    let (mut mol, _, o, _) = methanol();
    mol.atom_mut(o).highlight = Some(color::RED);

    let params = RenderParams {
        highlighting: HighlightStyle::Colored,
        ..RenderParams::default()
    };
    let tree = draw(&mol, &params);
    let paths = tree.find(Mark::Atom(o))[0].paths();
    assert!(!paths.is_empty());
    assert!(paths.iter().all(|p| p.color == color::RED));

    // ignored unless asked for
    let tree = draw(&mol, &RenderParams::default());
    assert!(tree.find(Mark::Atom(o))[0]
        .paths()
        .iter()
        .all(|p| p.color == color::BLACK));
}

#[test]
fn outer_glow_sits_behind_the_bond() {
    let (mut mol, _, _, b) = methanol();
    mol.bond_mut(b).highlight = Some(color::HIGHLIGHT);

    let params = RenderParams {
        highlighting: HighlightStyle::OuterGlow,
        ..RenderParams::default()
    };
    let tree = draw(&mol, &params);
    let glows = tree.find(Mark::OuterGlow);
    assert!(!glows.is_empty());
    let glow_lines: Vec<_> = glows.iter().flat_map(|g| g.lines()).collect();
    assert!(glow_lines.iter().all(|l| l.color == color::HIGHLIGHT));

    let bond_lines = tree.find(Mark::Bond(b))[0].lines();
    assert!(bond_lines.iter().all(|l| l.color == color::BLACK));
    assert!(glow_lines[0].width > bond_lines[0].width);
}

#[test]
fn selected_implicit_atom_gets_a_glow_disc() {
    let (mol, c, ..) = methanol();
    let mut params = RenderParams {
        highlighting: HighlightStyle::OuterGlow,
        ..RenderParams::default()
    };
    params.selection.atoms = vec![c.index()];
    let tree = draw(&mol, &params);

    let discs: Vec<_> = tree
        .find(Mark::OuterGlow)
        .into_iter()
        .flat_map(|g| g.ovals())
        .collect();
    assert_eq!(discs.len(), 1);
    assert!(discs[0].fill);
    assert_eq!(discs[0].color, params.selection_color);
    assert_eq!(discs[0].center, Point::new(0.0, 0.0));
}

// ---------------------------------------------------------------------------
// Sgroups
// ---------------------------------------------------------------------------

#[test]
fn abbreviation_replaces_its_atoms() {
    let mut mol = Mol::new();
    let c1 = mol.add_atom(Atom::new(6, 0.0, 0.0));
    let c2 = mol.add_atom(Atom::new(6, 1.299, 0.75));
    let c3 = mol.add_atom(Atom::new(6, 2.598, 0.0));
    let cl = mol.add_atom(Atom::new(17, 3.897, 0.75));
    mol.add_bond(c1, c2, Bond::default());
    let attach = mol.add_bond(c2, c3, Bond::default());
    let inner = mol.add_bond(c3, cl, Bond::default());
    mol.add_sgroup(Sgroup::abbreviation("CH2Cl", vec![c3, cl], vec![attach]));

    let tree = draw(&mol, &RenderParams::default());
    assert!(tree.find(Mark::Atom(cl)).is_empty());
    assert!(tree.find(Mark::Bond(inner)).is_empty());
    assert_eq!(tree.find(Mark::Bond(attach)).len(), 1);

    let label = tree.find(Mark::Atom(c3));
    assert_eq!(label.len(), 1);
    assert!(label[0].paths().len() > 1);
}

#[test]
fn detached_abbreviation_is_labelled_with_a_dot() {
    let mut mol = Mol::new();
    let c = mol.add_atom(Atom::new(6, 0.0, 0.0));
    let o = mol.add_atom(Atom::new(8, 1.5, 0.0));
    let cl = mol.add_atom(Atom::new(17, 4.0, 0.0));
    mol.add_bond(c, o, Bond::default());
    mol.add_sgroup(Sgroup::abbreviation("HCl", vec![cl], vec![]));

    let tree = draw(&mol, &RenderParams::default());
    assert!(tree.find(Mark::Atom(cl)).is_empty());
    let group = tree.find(Mark::Sgroup(0));
    assert_eq!(group.len(), 1);

    let paths = group[0].paths();
    assert!(paths.len() >= 2);
    // salt to the right of the molecule: the dot comes first
    let dot = paths[0].path.bounding_box();
    let text = paths[1].path.bounding_box();
    assert!(dot.x1 < text.x0);
}

#[test]
fn repeat_unit_brackets_and_labels() {
    let mol = load(include_str!("data/repeat_unit.json"));
    let tree = draw(&mol, &RenderParams::default());
    let group = tree.find(Mark::Sgroup(0));
    assert_eq!(group.len(), 1);

    let paths = group[0].paths();
    let strokes = paths
        .iter()
        .filter(|p| matches!(p.style, PathStyle::Stroke(_)))
        .count();
    let labels = paths.iter().filter(|p| p.style == PathStyle::Fill).count();
    assert_eq!(strokes, 2);
    // "n" and "eu"
    assert_eq!(labels, 2);

    // labels hang off the right bracket
    for p in paths.iter().filter(|p| p.style == PathStyle::Fill) {
        assert!(p.path.bounding_box().x0 > 3.75);
    }
}

#[test]
fn unpaired_brackets_are_skipped() {
    let mut mol = load(include_str!("data/repeat_unit.json"));
    let mut sgroups = mol.sgroups().to_vec();
    sgroups[0].crossing_bonds.truncate(1);
    mol.set_sgroups(sgroups);

    let tree = draw(&mol, &RenderParams::default());
    assert!(tree.find(Mark::Sgroup(0)).is_empty());
}
