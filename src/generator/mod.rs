// src/generator/mod.rs
//! Level generation.
//!
//! Six independent algorithms share the [`Grid`] model. [`generate_level`]
//! picks one by name and runs it; each algorithm pulls the layout keys it
//! needs and fails with [`ConfigError`] when one is missing.

pub mod bsp_dungeon;
pub mod carve;
pub mod cellular;
pub mod drunkard;
pub mod hybrid;
pub mod postprocess;
pub mod rooms;

use std::fmt;

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{GenerationConfig, LayoutParams};
use crate::error::ConfigError;
use crate::map::Grid;

/// The generation algorithms, by their configuration identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    RandomRoomPlacement,
    Bsp,
    DrunkardsWalk,
    CellularAutomata,
    HybridRoomsCaves,
    CellularRooms,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::RandomRoomPlacement,
        Algorithm::Bsp,
        Algorithm::DrunkardsWalk,
        Algorithm::CellularAutomata,
        Algorithm::HybridRoomsCaves,
        Algorithm::CellularRooms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::RandomRoomPlacement => "random_room_placement",
            Algorithm::Bsp => "bsp",
            Algorithm::DrunkardsWalk => "drunkards_walk",
            Algorithm::CellularAutomata => "cellular_automata",
            Algorithm::HybridRoomsCaves => "hybrid_rooms_caves",
            Algorithm::CellularRooms => "cellular_rooms",
        }
    }

    /// Exact identifier lookup; `None` for anything unrecognized.
    pub fn from_name(name: &str) -> Option<Self> {
        Algorithm::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Identifier lookup with the dispatcher's fallback: unknown names warn
    /// and resolve to [`Algorithm::RandomRoomPlacement`].
    pub fn resolve(name: &str) -> Self {
        Algorithm::from_name(name).unwrap_or_else(|| {
            warn!(
                "Unknown algorithm '{}'. Using default {}.",
                name,
                Algorithm::RandomRoomPlacement
            );
            Algorithm::RandomRoomPlacement
        })
    }

    /// Runs this algorithm against `layout`.
    pub fn generate<R: Rng + ?Sized>(self, layout: &LayoutParams, rng: &mut R) -> Result<Grid, ConfigError> {
        match self {
            Algorithm::RandomRoomPlacement => rooms::generate(layout, rng),
            Algorithm::Bsp => bsp_dungeon::generate(layout, rng),
            Algorithm::DrunkardsWalk => drunkard::generate(layout, rng),
            Algorithm::CellularAutomata => cellular::generate_automata(layout, rng),
            Algorithm::HybridRoomsCaves => hybrid::generate(layout, rng),
            Algorithm::CellularRooms => cellular::generate_rooms(layout, rng),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds a complete grid from `config`, dispatching on `config.algorithm`.
///
/// The grid is exactly `map_width × map_height`. Content, aesthetic and
/// mission sections are ignored here.
pub fn generate_level<R: Rng + ?Sized>(config: &GenerationConfig, rng: &mut R) -> Result<Grid, ConfigError> {
    let algorithm = Algorithm::resolve(&config.algorithm);
    let grid = algorithm.generate(&config.layout, rng)?;
    info!(
        "{}: generated {}x{} grid with {} floor tiles ({:.1}%)",
        algorithm,
        grid.width(),
        grid.height(),
        grid.floor_count(),
        grid.floor_fraction() * 100.0
    );
    Ok(grid)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::{CellularParams, DrunkardParams, LayoutParams, StartPos};
    use crate::generator::Algorithm;
    use crate::map::Grid;

    /// A layout carrying every key any algorithm asks for.
    pub fn layout_for(algorithm: Algorithm, width: i32, height: i32) -> LayoutParams {
        let base = LayoutParams::with_size(width, height);
        match algorithm {
            Algorithm::RandomRoomPlacement | Algorithm::Bsp | Algorithm::HybridRoomsCaves => {
                base.rooms(15, 4, 10, 1)
            }
            Algorithm::DrunkardsWalk => base.drunkard(DrunkardParams::new(0.25, 0.7, StartPos::CENTER)),
            Algorithm::CellularAutomata | Algorithm::CellularRooms => base.cellular(CellularParams::default()),
        }
    }

    /// Shape and connectivity invariants every algorithm promises.
    pub fn assert_well_formed(grid: &Grid, width: i32, height: i32) {
        assert_eq!(grid.width(), width);
        assert_eq!(grid.height(), height);
        assert_eq!(grid.to_rows().len(), height as usize);
        assert!(grid.is_border_all_wall(), "border was carved");
        assert!(
            crate::generator::postprocess::floor_region_count(grid) <= 1,
            "floor is not a single region"
        );
    }
}
