use std::collections::{HashSet, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;

/// A cycle with its atoms in path order. Bond `i` joins atom `i` and atom
/// `i + 1`; the last bond closes the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    atoms: Vec<NodeIndex>,
    bonds: Vec<EdgeIndex>,
}

impl Ring {
    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[EdgeIndex] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains_atom(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn contains_bond(&self, bond: EdgeIndex) -> bool {
        self.bonds.contains(&bond)
    }

    pub fn index_of(&self, atom: NodeIndex) -> Option<usize> {
        self.atoms.iter().position(|&a| a == atom)
    }

    /// The ring traversed in the opposite direction.
    pub fn reversed(&self) -> Ring {
        let mut atoms = self.atoms.clone();
        atoms.reverse();
        let mut bonds = self.bonds.clone();
        bonds.reverse();
        if !bonds.is_empty() {
            bonds.rotate_left(1);
        }
        Ring { atoms, bonds }
    }

    /// The two ring bonds at `atom`, as `(incoming, outgoing)` in path order.
    pub fn bonds_at(&self, atom: NodeIndex) -> Option<(EdgeIndex, EdgeIndex)> {
        let i = self.index_of(atom)?;
        let n = self.bonds.len();
        Some((self.bonds[(i + n - 1) % n], self.bonds[i]))
    }
}

/// Edge-short cycles: for every bond, the shortest cycle passing through it.
#[derive(Debug, Clone, Default)]
pub struct RingSet {
    rings: Vec<Ring>,
}

impl RingSet {
    pub fn edge_short<A, B>(mol: &Mol<A, B>) -> Self {
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut rings = Vec::new();

        for bond in mol.bonds() {
            let Some(ring) = shortest_cycle_through(mol, bond) else {
                continue;
            };
            let mut key: Vec<usize> = ring.bonds.iter().map(|b| b.index()).collect();
            key.sort_unstable();
            if seen.insert(key) {
                rings.push(ring);
            }
        }

        rings.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.atoms.cmp(&b.atoms)));
        Self { rings }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn rings_of_atom(&self, atom: NodeIndex) -> impl Iterator<Item = &Ring> + '_ {
        self.rings.iter().filter(move |r| r.contains_atom(atom))
    }

    pub fn is_ring_bond(&self, bond: EdgeIndex) -> bool {
        self.rings.iter().any(|r| r.contains_bond(bond))
    }
}

/// Breadth-first search from one end of `bond` to the other with the bond
/// itself removed.
fn shortest_cycle_through<A, B>(mol: &Mol<A, B>, bond: EdgeIndex) -> Option<Ring> {
    let (src, dst) = mol.bond_endpoints(bond)?;
    if src == dst {
        return None;
    }
    let n = mol.atom_count();
    let mut pred: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; n];
    let mut visited = vec![false; n];
    visited[src.index()] = true;
    let mut queue = VecDeque::from([src]);

    'search: while let Some(cur) = queue.pop_front() {
        for e in mol.bonds_of(cur) {
            if e == bond {
                continue;
            }
            let Some(nb) = mol.other_atom(e, cur) else {
                continue;
            };
            if visited[nb.index()] {
                continue;
            }
            visited[nb.index()] = true;
            pred[nb.index()] = Some((cur, e));
            if nb == dst {
                break 'search;
            }
            queue.push_back(nb);
        }
    }

    if !visited[dst.index()] {
        return None;
    }

    let mut atoms = vec![dst];
    let mut bonds = Vec::new();
    let mut cur = dst;
    while cur != src {
        let (p, e) = pred[cur.index()]?;
        bonds.push(e);
        atoms.push(p);
        cur = p;
    }
    atoms.reverse();
    bonds.reverse();
    bonds.push(bond);
    Some(Ring { atoms, bonds })
}
