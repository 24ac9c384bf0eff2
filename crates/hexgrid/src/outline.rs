use crate::cluster::{edge_profile, Cluster};
use crate::geometry::{Hex, Point};
use thiserror::Error;

/// Default distance under which two segment endpoints are considered the
/// same point when stitching.
pub const DEFAULT_EPSILON: f64 = 0.01;

/// Sizing of the outline relative to cell placement. `placement` drives
/// centers and adjacency; `edge` is the larger halo hexagon whose corners
/// form the outline. The margin nudge is their radius difference, which
/// is exactly what makes neighboring cells' outline segments meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub placement: Hex,
    pub edge: Hex,
    pub epsilon: f64,
}

impl Metrics {
    pub fn new(placement_size: f64, edge_size: f64) -> Self {
        Self {
            placement: Hex::new(placement_size),
            edge: Hex::new(edge_size),
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn margin(&self) -> f64 {
        self.edge.size - self.placement.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("cannot outline an empty cluster")]
    EmptyCluster,
    #[error("outline left {remaining} segments unconnected; the cluster is disconnected or holed")]
    MalformedCluster { remaining: usize },
}

/// Candidate outline segments: every edge of every cell with no neighbor
/// across it, translated to the cell's pixel position. An endpoint whose
/// connected edge does have a neighbor is pulled inward along the edge
/// angle by the margin, so segments of adjacent cells end on the same
/// point.
pub fn boundary_segments(cluster: &Cluster, metrics: &Metrics) -> Vec<Segment> {
    let margin = metrics.margin();
    let mut segments = Vec::new();

    for coord in cluster.iter() {
        let center = metrics.placement.center(coord);
        let edges = edge_profile(cluster, coord, metrics.edge);

        for edge in &edges {
            if edge.has_neighbor {
                continue;
            }
            let mut start = edge.points[0].translate(center.x, center.y);
            let mut end = edge.points[1].translate(center.x, center.y);

            let [previous, next] = edge.connected;
            if edges[previous.index()].has_neighbor {
                start = start.advance(edge.angle, margin);
            }
            if edges[next.index()].has_neighbor {
                end = end.advance(edge.angle, -margin);
            }
            segments.push(Segment { start, end });
        }
    }
    segments
}

/// Chain segments into one polyline by repeatedly appending the first
/// remaining segment whose start lies within `epsilon` of the current
/// endpoint. When several candidates fall inside the tolerance window the
/// first one in scan order wins; degenerate geometry is not resolved
/// further. Unconsumed segments mean the input violated the
/// simply-connected precondition.
pub fn stitch(segments: &[Segment], epsilon: f64) -> Result<Vec<Point>, OutlineError> {
    let Some((first, rest)) = segments.split_first() else {
        return Err(OutlineError::EmptyCluster);
    };

    let mut pool: Vec<Segment> = rest.to_vec();
    let mut polyline = vec![first.start, first.end];

    while !pool.is_empty() {
        let tip = polyline[polyline.len() - 1];
        let found = pool.iter().position(|segment| {
            (segment.start.x - tip.x).abs() < epsilon && (segment.start.y - tip.y).abs() < epsilon
        });
        match found {
            Some(index) => {
                let segment = pool.remove(index);
                polyline.push(segment.end);
            }
            None => {
                return Err(OutlineError::MalformedCluster {
                    remaining: pool.len(),
                })
            }
        }
    }
    Ok(polyline)
}

/// The outer boundary polygon of a simply-connected cluster. The returned
/// polyline is closed: its last point coincides with its first.
pub fn trace(cluster: &Cluster, metrics: &Metrics) -> Result<Vec<Point>, OutlineError> {
    let segments = boundary_segments(cluster, metrics);
    log::debug!(
        "tracing outline of {} cells from {} boundary segments",
        cluster.len(),
        segments.len()
    );
    stitch(&segments, metrics.epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::HexCoord;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    fn unique_points(polyline: &[Point]) -> usize {
        let mut unique: Vec<Point> = Vec::new();
        for point in polyline {
            if !unique.iter().any(|u| close(*u, *point)) {
                unique.push(*point);
            }
        }
        unique.len()
    }

    #[test]
    fn test_single_cell_traces_closed_hexagon() {
        let cluster: Cluster = [HexCoord::new(0, 0)].into_iter().collect();
        let metrics = Metrics::new(46.0, 46.0);

        let segments = boundary_segments(&cluster, &metrics);
        assert_eq!(segments.len(), 6);

        let polyline = trace(&cluster, &metrics).unwrap();
        assert_eq!(polyline.len(), 7);
        assert!(close(polyline[0], polyline[6]));
        assert_eq!(unique_points(&polyline), 6);
    }

    #[test]
    fn test_adjacent_pair_drops_shared_edge() {
        let cluster: Cluster = [HexCoord::new(0, 0), HexCoord::new(1, 0)]
            .into_iter()
            .collect();
        let metrics = Metrics::new(46.0, 46.0);

        // five boundary edges per cell once the shared edge is excluded
        let segments = boundary_segments(&cluster, &metrics);
        assert_eq!(segments.len(), 10);

        let polyline = trace(&cluster, &metrics).unwrap();
        assert_eq!(polyline.len(), 11);
        assert!(close(polyline[0], polyline[10]));
        assert_eq!(unique_points(&polyline), 10);
    }

    #[test]
    fn test_margin_nudge_keeps_junctions_stitchable() {
        // halo hexes larger than the placement hexes, as drawn by the
        // palette (46 placement, 50 outline)
        let cluster: Cluster = [
            HexCoord::new(0, 0),
            HexCoord::new(1, 0),
            HexCoord::new(0, 1),
        ]
        .into_iter()
        .collect();
        let metrics = Metrics::new(46.0, 50.0);

        let polyline = trace(&cluster, &metrics).unwrap();
        assert!(close(polyline[0], polyline[polyline.len() - 1]));
        // three cells, three shared edges, each removing two corner points
        assert_eq!(unique_points(&polyline), 12);
    }

    #[test]
    fn test_disjoint_cells_are_malformed() {
        let cluster: Cluster = [HexCoord::new(0, 0), HexCoord::new(4, 4)]
            .into_iter()
            .collect();
        let metrics = Metrics::new(46.0, 46.0);

        match trace(&cluster, &metrics) {
            Err(OutlineError::MalformedCluster { remaining }) => assert_eq!(remaining, 6),
            other => panic!("expected MalformedCluster, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_cluster_is_an_error() {
        let cluster = Cluster::new();
        let metrics = Metrics::new(46.0, 46.0);
        assert!(matches!(
            trace(&cluster, &metrics),
            Err(OutlineError::EmptyCluster)
        ));
    }
}
