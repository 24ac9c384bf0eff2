use crate::geometry::{Direction, Hex, HexCoord, Point, EDGE_COUNT};
use std::collections::BTreeSet;

/// The set of occupied cells of one palette layout. Ordered so that every
/// derived computation scans cells deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    cells: BTreeSet<HexCoord>,
}

impl Cluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coord: HexCoord) -> bool {
        self.cells.insert(coord)
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.cells.contains(&coord)
    }

    /// Whether the cell across the given edge is occupied.
    pub fn has_neighbor(&self, coord: HexCoord, direction: Direction) -> bool {
        self.contains(direction.offset(coord))
    }

    pub fn iter(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<HexCoord> for Cluster {
    fn from_iter<I: IntoIterator<Item = HexCoord>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// One edge of a placed cell: endpoints relative to the cell center, the
/// travel angle, the two edges it shares a corner with, and whether a
/// neighboring cell sits across it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub direction: Direction,
    pub points: [Point; 2],
    pub angle: f64,
    pub connected: [Direction; 2],
    pub has_neighbor: bool,
}

/// Edge records for one cell, indexed by [`Direction::index`]. Adjacency
/// comes from the cluster; corner positions come from `hex`, which may be
/// a larger halo hexagon than the one used for placement.
pub fn edge_profile(cluster: &Cluster, coord: HexCoord, hex: Hex) -> [Edge; EDGE_COUNT] {
    Direction::ALL.map(|direction| Edge {
        direction,
        points: hex.edge_points(direction),
        angle: direction.angle(),
        connected: direction.connected(),
        has_neighbor: cluster.has_neighbor(coord, direction),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_neighbor_is_symmetric() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(1, 0);
        let cluster: Cluster = [a, b].into_iter().collect();

        assert!(cluster.has_neighbor(a, Direction::SE));
        assert!(cluster.has_neighbor(b, Direction::NW));
        assert!(!cluster.has_neighbor(a, Direction::N));
        assert!(!cluster.has_neighbor(b, Direction::S));
    }

    #[test]
    fn test_lone_cell_has_no_neighbors() {
        let coord = HexCoord::new(2, 3);
        let cluster: Cluster = [coord].into_iter().collect();
        for direction in Direction::ALL {
            assert!(!cluster.has_neighbor(coord, direction));
        }
    }

    #[test]
    fn test_edge_profile_marks_shared_edge() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(0, 1);
        let cluster: Cluster = [a, b].into_iter().collect();

        let edges = edge_profile(&cluster, a, Hex::new(46.0));
        for edge in &edges {
            assert_eq!(edge.has_neighbor, edge.direction == Direction::S);
            assert_eq!(edge.angle, edge.direction.angle());
        }
        // edge records line up with their direction index
        assert_eq!(edges[Direction::S.index()].direction, Direction::S);
    }
}
