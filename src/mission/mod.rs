// src/mission/mod.rs
//! Mission descriptions and the two consumers of them: the geometry
//! adjuster (mission → layout parameters) and the objective placer
//! (mission + grid → placements).

pub mod geometry;
pub mod placement;

use serde::{Deserialize, Serialize};

pub use geometry::{adjust_layout_for_mission, validate_mission_feasibility, AlgorithmFamily};
pub use placement::{place_objectives, Placement, PlacementResult};

/// The overall shape of the experience a level is built around.
///
/// Any unrecognized value reads as [`MissionType::Exploration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MissionType {
    LinearProgression,
    #[default]
    Exploration,
    KeyHunt,
    Survival,
    MultiObjective,
}

impl MissionType {
    pub fn as_str(self) -> &'static str {
        match self {
            MissionType::LinearProgression => "linear_progression",
            MissionType::Exploration => "exploration",
            MissionType::KeyHunt => "key_hunt",
            MissionType::Survival => "survival",
            MissionType::MultiObjective => "multi_objective",
        }
    }
}

impl From<&str> for MissionType {
    fn from(value: &str) -> Self {
        match value {
            "linear_progression" => MissionType::LinearProgression,
            "key_hunt" => MissionType::KeyHunt,
            "survival" => MissionType::Survival,
            "multi_objective" => MissionType::MultiObjective,
            _ => MissionType::Exploration,
        }
    }
}

impl From<String> for MissionType {
    fn from(value: String) -> Self {
        MissionType::from(value.as_str())
    }
}

impl From<MissionType> for String {
    fn from(value: MissionType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    Boss,
    Treasure,
    Key,
    SafeRoom,
    Puzzle,
    Miniboss,
    Secret,
}

/// Where in the level an objective should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementRule {
    /// Furthest reachable tile from the start.
    EndOfLongestPath,
    /// A floor tile with a single floor neighbor.
    DeadEnd,
    /// Inside the largest room.
    CentralRoom,
    /// A tucked-away tile with at least two wall neighbors.
    Hidden,
    /// Roughly halfway along the longest path.
    Checkpoint,
    /// Anywhere in any room.
    RandomRoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyProgression {
    #[default]
    Flat,
    Increasing,
    SpikeAtEnd,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub objective_type: ObjectiveType,
    pub placement_rule: PlacementRule,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub description: String,
}

impl Objective {
    pub fn new(
        objective_type: ObjectiveType,
        placement_rule: PlacementRule,
        count: u32,
        description: impl Into<String>,
    ) -> Self {
        Objective {
            objective_type,
            placement_rule,
            count,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    #[serde(default)]
    pub mission_type: MissionType,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub difficulty_progression: DifficultyProgression,
    #[serde(default)]
    pub description: String,
}

impl Mission {
    pub fn new(mission_type: MissionType, objectives: Vec<Objective>) -> Self {
        Mission {
            mission_type,
            objectives,
            difficulty_progression: DifficultyProgression::default(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Total instances requested across all objectives.
    pub fn total_instances(&self) -> u32 {
        self.objectives.iter().map(|o| o.count).sum()
    }

    pub fn has_objective(&self, objective_type: ObjectiveType) -> bool {
        self.objectives.iter().any(|o| o.objective_type == objective_type)
    }

    pub fn has_rule(&self, rule: PlacementRule) -> bool {
        self.objectives.iter().any(|o| o.placement_rule == rule)
    }

    /// Instances requested of one objective type.
    pub fn count_of_type(&self, objective_type: ObjectiveType) -> u32 {
        self.objectives
            .iter()
            .filter(|o| o.objective_type == objective_type)
            .map(|o| o.count)
            .sum()
    }

    /// Instances requested under one placement rule.
    pub fn count_of_rule(&self, rule: PlacementRule) -> u32 {
        self.objectives
            .iter()
            .filter(|o| o.placement_rule == rule)
            .map(|o| o.count)
            .sum()
    }
}
