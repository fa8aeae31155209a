// src/lib.rs
//! Procedural 2D dungeon generation.
//!
//! Grids of wall/floor tiles are produced by one of six algorithms, then
//! analyzed and populated with mission objectives. [`level::build_level`]
//! runs the whole pipeline; the pieces are usable on their own.

pub mod analysis;
pub mod bsp;
pub mod config;
pub mod error;
pub mod generator;
pub mod level;
pub mod map;
pub mod mission;
pub mod utils;

pub use config::{CellularParams, DrunkardParams, GenerationConfig, LayoutParams, StartPos};
pub use error::{AnalysisError, ConfigError, LevelError, PlacementFailure};
pub use generator::{generate_level, Algorithm};
pub use level::{build_level, build_level_from_json, GeneratedLevel};
pub use map::{Grid, Pos, Tile};
pub use mission::{Mission, MissionType, Objective, ObjectiveType, PlacementRule};
