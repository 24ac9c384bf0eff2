use super::{CONTAINER_HEX_SIZE, EDGE_HEX_SIZE, GLOBAL_MARGIN};
use crate::profiles::{ControlCode, Layout};
use crate::trackables::TrackableId;
use hexgrid::cluster::Cluster;
use hexgrid::geometry::{Hex, HexCoord, Point};
use hexgrid::outline::{self, Metrics, OutlineError};

/// One cell ready for rendering: who it is, where it sits on the grid,
/// and its derived pixel center.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPlacement {
    pub id: TrackableId,
    pub coord: HexCoord,
    pub center: Point,
    pub code: ControlCode,
}

/// Extent of the palette in pixel space, for viewport sizing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteGeometry {
    pub cells: Vec<CellPlacement>,
    pub outline: Vec<Point>,
    pub bounds: Bounds,
}

/// Compute placement and the outer border for a layout. Everything is
/// translated so the outline hugs the global margin; geometry is derived
/// fresh on every call and holds no state.
pub fn bake(layout: &Layout) -> Result<PaletteGeometry, OutlineError> {
    let placement = Hex::new(CONTAINER_HEX_SIZE);
    let metrics = Metrics::new(CONTAINER_HEX_SIZE, EDGE_HEX_SIZE);

    let cluster: Cluster = layout.values().map(|entry| entry.coord).collect();
    let outline = outline::trace(&cluster, &metrics)?;

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for point in &outline {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    let (dx, dy) = (GLOBAL_MARGIN - min_x, GLOBAL_MARGIN - min_y);

    let cells = layout
        .iter()
        .map(|(id, entry)| {
            let center = placement.center(entry.coord);
            CellPlacement {
                id: id.clone(),
                coord: entry.coord,
                center: center.translate(dx, dy),
                code: entry.code.clone(),
            }
        })
        .collect();

    Ok(PaletteGeometry {
        cells,
        outline: outline
            .into_iter()
            .map(|point| point.translate(dx, dy))
            .collect(),
        bounds: Bounds {
            width: max_x - min_x + GLOBAL_MARGIN * 2.0,
            height: max_y - min_y + GLOBAL_MARGIN * 2.0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::LayoutEntry;

    fn layout_of(coords: &[(i32, i32)]) -> Layout {
        coords
            .iter()
            .enumerate()
            .map(|(i, (col, row))| {
                (
                    TrackableId::new(format!("cell-{i}")),
                    LayoutEntry {
                        coord: HexCoord::new(*col, *row),
                        code: ControlCode::new(format!("Digit{i}")),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_bake_offsets_outline_to_margin() {
        let geometry = bake(&layout_of(&[(0, 0), (1, 0), (0, 1)])).unwrap();

        let min_x = geometry.outline.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = geometry.outline.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert!((min_x - GLOBAL_MARGIN).abs() < 1e-9);
        assert!((min_y - GLOBAL_MARGIN).abs() < 1e-9);
        assert_eq!(geometry.cells.len(), 3);

        // bounds cover the outline plus the margin on both sides
        let max_x = geometry.outline.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert!((geometry.bounds.width - (max_x + GLOBAL_MARGIN)).abs() < 1e-9);
    }

    #[test]
    fn test_bake_single_cell() {
        let geometry = bake(&layout_of(&[(0, 0)])).unwrap();
        assert_eq!(geometry.outline.len(), 7);
        let cell = &geometry.cells[0];
        // the halo hexagon around a lone cell reaches the margin on the left
        assert!((cell.center.x - (GLOBAL_MARGIN + EDGE_HEX_SIZE)).abs() < 1e-9);
    }

    #[test]
    fn test_bake_rejects_split_layout() {
        assert!(matches!(
            bake(&layout_of(&[(0, 0), (3, 3)])),
            Err(OutlineError::MalformedCluster { .. })
        ));
    }
}
