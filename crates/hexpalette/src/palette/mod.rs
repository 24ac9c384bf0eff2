pub mod cells;
pub mod text;

pub use cells::{bake, Bounds, CellPlacement, PaletteGeometry};
pub use text::value_text;

/// Corner radius of the halo hexagon that forms the palette outline.
pub const EDGE_HEX_SIZE: f64 = 50.0;
/// Corner radius of the placement hexagon; drives cell spacing and
/// adjacency.
pub const CONTAINER_HEX_SIZE: f64 = 46.0;
/// Corner radius of the visible cell hexagon inside its container.
pub const CELL_HEX_SIZE: f64 = 42.0;
/// Inward nudge where the outline meets an edge shared with a neighbor.
pub const EDGE_MARGIN: f64 = EDGE_HEX_SIZE - CONTAINER_HEX_SIZE;
/// Margin keeping every palette coordinate positive for the viewport.
pub const GLOBAL_MARGIN: f64 = 5.0;
