//! Hexagonal palette tracker: a reactive model of numeric progress
//! values (spell levels, stat boosts, goal flags) laid out on a hex grid,
//! with profile definitions, configuration, and save-data persistence.
//! Rendering and input capture live outside this crate; it exposes
//! geometry, values, and goal status for them to consume.

pub mod config;
pub mod events;
mod macros;
pub mod model;
pub mod palette;
pub mod profiles;
pub mod store;
pub mod trackables;
