//! Level catalog: grid size, pair count and symbols per level.
//!
//! The catalog is static and immutable. The state machine consults it to
//! deal each level's deck; the presentation layer consults it for grid
//! dimensions.

pub mod catalog;

pub use catalog::{LevelCatalog, LevelDefinition};
