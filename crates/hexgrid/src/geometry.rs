use derive_more::From;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum::{Display as StrumDisplay, EnumString};

pub const EDGE_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Step `distance` along a direction given in radians.
    pub fn advance(self, angle: f64, distance: f64) -> Self {
        Self::new(
            self.x + angle.cos() * distance,
            self.y + angle.sin() * distance,
        )
    }
}

/// Offset grid coordinate of a cell. Flat-top hexagons, odd columns
/// shifted down half a row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, From,
)]
pub struct HexCoord {
    pub col: i32,
    pub row: i32,
}

impl HexCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    fn odd_column(self) -> bool {
        self.col.rem_euclid(2) == 1
    }
}

/// The six edges of a flat-top hexagon, in corner order: edge `i` runs
/// from corner `i - 1` to corner `i`, with corner 0 at angle 0 from the
/// center and corners advancing clockwise in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    NE,
    SE,
    S,
    SW,
    NW,
    N,
}

impl Direction {
    pub const ALL: [Direction; EDGE_COUNT] = [
        Direction::NE,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::NW,
        Direction::N,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        Self::ALL[index % EDGE_COUNT]
    }

    /// Direction of travel along the edge, clockwise from north.
    pub fn angle(self) -> f64 {
        match self {
            Direction::N => 0.0,
            Direction::NE => PI / 3.0,
            Direction::SE => PI * 2.0 / 3.0,
            Direction::S => PI,
            Direction::SW => -PI * 2.0 / 3.0,
            Direction::NW => -PI / 3.0,
        }
    }

    /// The two edges sharing a corner with this one, in corner order.
    pub fn connected(self) -> [Direction; 2] {
        let i = self.index();
        [
            Self::from_index(i + EDGE_COUNT - 1),
            Self::from_index(i + 1),
        ]
    }

    /// Grid coordinate of the cell across this edge.
    pub fn offset(self, coord: HexCoord) -> HexCoord {
        let HexCoord { col, row } = coord;
        let shift = if coord.odd_column() { 1 } else { 0 };
        match self {
            Direction::N => HexCoord::new(col, row - 1),
            Direction::S => HexCoord::new(col, row + 1),
            Direction::NE => HexCoord::new(col + 1, row - 1 + shift),
            Direction::SE => HexCoord::new(col + 1, row + shift),
            Direction::SW => HexCoord::new(col - 1, row + shift),
            Direction::NW => HexCoord::new(col - 1, row - 1 + shift),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::N => Direction::S,
            Direction::NE => Direction::SW,
            Direction::SE => Direction::NW,
            Direction::S => Direction::N,
            Direction::SW => Direction::NE,
            Direction::NW => Direction::SE,
        }
    }
}

/// A flat-top hexagon of a given corner radius. All geometry is a pure
/// function of the radius and a grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hex {
    pub size: f64,
}

impl Hex {
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    pub fn width(&self) -> f64 {
        self.size * 2.0
    }

    pub fn height(&self) -> f64 {
        self.size * 3f64.sqrt()
    }

    pub fn corner(&self, index: usize) -> Point {
        let angle = PI / 3.0 * (index % EDGE_COUNT) as f64;
        Point::new(self.size * angle.cos(), self.size * angle.sin())
    }

    pub fn corners(&self) -> [Point; EDGE_COUNT] {
        std::array::from_fn(|i| self.corner(i))
    }

    /// Pixel center of a cell: columns advance by 1.5 radii, rows by the
    /// full hexagon height, odd columns dropped half a row.
    pub fn center(&self, coord: HexCoord) -> Point {
        let row_offset = if coord.odd_column() { 0.5 } else { 0.0 };
        Point::new(
            self.size * 1.5 * coord.col as f64,
            self.height() * (coord.row as f64 + row_offset),
        )
    }

    /// Endpoints of one edge, relative to the center, in corner order.
    pub fn edge_points(&self, direction: Direction) -> [Point; 2] {
        let i = direction.index();
        [self.corner((i + EDGE_COUNT - 1) % EDGE_COUNT), self.corner(i)]
    }
}
