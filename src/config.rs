// src/config.rs
//! Generation configuration.
//!
//! The shape mirrors the JSON documents produced by the external
//! text-to-parameters service or loaded from disk by the host application:
//!
//! ```json
//! {
//!   "algorithm": "drunkards_walk",
//!   "layout": {
//!     "map_width": 50, "map_height": 40,
//!     "drunkard_params": { "target_floor_percent": 0.25, "start_pos": "center", "straight_bias": 0.7 }
//!   },
//!   "content": { "enemy_density": 0.1 },
//!   "aesthetic": { "theme": "cave" }
//! }
//! ```
//!
//! Every layout key is optional at this level. Each algorithm asks for the
//! keys it needs through the `require_*` accessors, which is where a missing
//! key turns into [`ConfigError::MissingKey`].

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, LevelError};
use crate::mission::Mission;

pub const DEFAULT_ALGORITHM: &str = "random_room_placement";

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

/// Top-level configuration consumed by the generation dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    pub layout: LayoutParams,
    /// Enemy/treasure/trap tuning. Opaque to generation; passed through.
    #[serde(default)]
    pub content: serde_json::Value,
    /// Theme and lighting. Opaque to generation; passed through.
    #[serde(default)]
    pub aesthetic: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<Mission>,
}

impl GenerationConfig {
    pub fn new(algorithm: impl Into<String>, layout: LayoutParams) -> Self {
        GenerationConfig {
            algorithm: algorithm.into(),
            layout,
            content: serde_json::Value::Null,
            aesthetic: serde_json::Value::Null,
            mission: None,
        }
    }

    pub fn with_mission(mut self, mission: Mission) -> Self {
        self.mission = Some(mission);
        self
    }

    /// Parses a configuration document.
    pub fn from_json(document: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(document)?)
    }
}

/// Algorithm-specific layout parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rooms: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_size_min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_size_max: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corridor_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drunkard_params: Option<DrunkardParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cellular_params: Option<CellularParams>,
}

fn required<T: Copy>(value: Option<T>, key: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::MissingKey(key))
}

impl LayoutParams {
    pub fn with_size(map_width: i32, map_height: i32) -> Self {
        LayoutParams {
            map_width: Some(map_width),
            map_height: Some(map_height),
            ..LayoutParams::default()
        }
    }

    pub fn rooms(mut self, max_rooms: i32, room_size_min: i32, room_size_max: i32, corridor_width: i32) -> Self {
        self.max_rooms = Some(max_rooms);
        self.room_size_min = Some(room_size_min);
        self.room_size_max = Some(room_size_max);
        self.corridor_width = Some(corridor_width);
        self
    }

    pub fn drunkard(mut self, params: DrunkardParams) -> Self {
        self.drunkard_params = Some(params);
        self
    }

    pub fn cellular(mut self, params: CellularParams) -> Self {
        self.cellular_params = Some(params);
        self
    }

    /// `(width, height)`, both required and at least 3 so an interior exists.
    /// The tile count must fit in an `i32`, since tiles are indexed by
    /// `y * width + x`.
    pub fn require_map_size(&self) -> Result<(i32, i32), ConfigError> {
        let width = required(self.map_width, "map_width")?;
        let height = required(self.map_height, "map_height")?;
        if width < 3 {
            return Err(ConfigError::invalid("map_width", format!("{width} is smaller than 3")));
        }
        if height < 3 {
            return Err(ConfigError::invalid("map_height", format!("{height} is smaller than 3")));
        }
        if width.checked_mul(height).is_none() {
            return Err(ConfigError::invalid(
                "map_height",
                format!("{width}x{height} holds more tiles than a grid can index"),
            ));
        }
        Ok((width, height))
    }

    pub fn require_max_rooms(&self) -> Result<i32, ConfigError> {
        required(self.max_rooms, "max_rooms")
    }

    /// `(room_size_min, room_size_max)` with `1 <= min <= max`.
    pub fn require_room_sizes(&self) -> Result<(i32, i32), ConfigError> {
        let min = required(self.room_size_min, "room_size_min")?;
        let max = required(self.room_size_max, "room_size_max")?;
        if min < 1 {
            return Err(ConfigError::invalid("room_size_min", format!("{min} is smaller than 1")));
        }
        if min > max {
            return Err(ConfigError::invalid(
                "room_size_min",
                format!("{min} exceeds room_size_max {max}"),
            ));
        }
        Ok((min, max))
    }

    pub fn require_corridor_width(&self) -> Result<i32, ConfigError> {
        let width = required(self.corridor_width, "corridor_width")?;
        if width < 1 {
            return Err(ConfigError::invalid("corridor_width", format!("{width} is smaller than 1")));
        }
        Ok(width)
    }

    pub fn require_drunkard_params(&self) -> Result<&DrunkardParams, ConfigError> {
        self.drunkard_params
            .as_ref()
            .ok_or(ConfigError::MissingKey("drunkard_params"))
    }

    pub fn require_cellular_params(&self) -> Result<&CellularParams, ConfigError> {
        self.cellular_params
            .as_ref()
            .ok_or(ConfigError::MissingKey("cellular_params"))
    }
}

/// Where the first drunkard starts walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartPos {
    Named(StartKeyword),
    At(i32, i32),
}

impl Default for StartPos {
    fn default() -> Self {
        StartPos::CENTER
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartKeyword {
    Center,
    Random,
}

impl StartPos {
    pub const CENTER: StartPos = StartPos::Named(StartKeyword::Center);
    pub const RANDOM: StartPos = StartPos::Named(StartKeyword::Random);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrunkardParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_floor_percent: Option<f64>,
    #[serde(default)]
    pub start_pos: StartPos,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub straight_bias: Option<f64>,
    /// Overrides the walker count derived from `target_floor_percent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_walkers: Option<u32>,
    /// Overrides whether the cave-smoothing pass runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smooth: Option<bool>,
    /// Overrides whether pillars are inserted into open areas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_pillars: Option<bool>,
}

impl DrunkardParams {
    pub fn new(target_floor_percent: f64, straight_bias: f64, start_pos: StartPos) -> Self {
        DrunkardParams {
            target_floor_percent: Some(target_floor_percent),
            start_pos,
            straight_bias: Some(straight_bias),
            ..DrunkardParams::default()
        }
    }

    pub fn require_target_floor_percent(&self) -> Result<f64, ConfigError> {
        let value = required(self.target_floor_percent, "drunkard_params.target_floor_percent")?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::invalid(
                "drunkard_params.target_floor_percent",
                format!("{value} is outside [0, 1]"),
            ));
        }
        Ok(value)
    }

    pub fn require_straight_bias(&self) -> Result<f64, ConfigError> {
        let value = required(self.straight_bias, "drunkard_params.straight_bias")?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::invalid(
                "drunkard_params.straight_bias",
                format!("{value} is outside [0, 1]"),
            ));
        }
        Ok(value)
    }
}

fn default_wall_probability() -> f64 {
    0.45
}

fn default_iterations() -> u32 {
    5
}

fn default_birth_limit() -> u32 {
    4
}

fn default_death_limit() -> u32 {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellularParams {
    #[serde(default = "default_wall_probability")]
    pub initial_wall_probability: f64,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_birth_limit")]
    pub birth_limit: u32,
    #[serde(default = "default_death_limit")]
    pub death_limit: u32,
}

impl Default for CellularParams {
    fn default() -> Self {
        CellularParams {
            initial_wall_probability: default_wall_probability(),
            iterations: default_iterations(),
            birth_limit: default_birth_limit(),
            death_limit: default_death_limit(),
        }
    }
}
