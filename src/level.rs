// src/level.rs
//! End-to-end level building: mission feasibility check, layout tuning,
//! generation and objective placement in one call.

use log::debug;
use rand::Rng;

use crate::config::{GenerationConfig, LayoutParams};
use crate::error::{LevelError, PlacementFailure};
use crate::generator::{generate_level, Algorithm};
use crate::map::Grid;
use crate::mission::{adjust_layout_for_mission, place_objectives, validate_mission_feasibility, PlacementResult};

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedLevel {
    /// The algorithm that actually ran (after unknown-name fallback).
    pub algorithm: Algorithm,
    /// The layout as used, i.e. after mission tuning.
    pub layout: LayoutParams,
    pub grid: Grid,
    pub feasibility_warnings: Vec<String>,
    /// `None` when the configuration carries no mission.
    pub placement: Option<Result<PlacementResult, PlacementFailure>>,
}

/// Runs the whole pipeline for `config`.
///
/// A placement failure is not an error of the pipeline; it is reported in
/// [`GeneratedLevel::placement`] alongside the grid.
pub fn build_level<R: Rng + ?Sized>(config: &GenerationConfig, rng: &mut R) -> Result<GeneratedLevel, LevelError> {
    let algorithm = Algorithm::from_name(&config.algorithm).unwrap_or(Algorithm::RandomRoomPlacement);

    let mut tuned = config.clone();
    let mut feasibility_warnings = Vec::new();
    if let Some(mission) = &config.mission {
        feasibility_warnings = validate_mission_feasibility(&config.layout, mission);
        tuned.layout = adjust_layout_for_mission(&config.layout, mission, &config.algorithm);
        debug!("layout tuned for {} mission: {:?}", mission.mission_type.as_str(), tuned.layout);
    }

    let grid = generate_level(&tuned, rng)?;
    let placement = config
        .mission
        .as_ref()
        .map(|mission| place_objectives(&grid, mission, rng));

    Ok(GeneratedLevel {
        algorithm,
        layout: tuned.layout,
        grid,
        feasibility_warnings,
        placement,
    })
}

/// Parses a configuration document and runs [`build_level`] on it.
pub fn build_level_from_json<R: Rng + ?Sized>(document: &str, rng: &mut R) -> Result<GeneratedLevel, LevelError> {
    let config = GenerationConfig::from_json(document)?;
    build_level(&config, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::mission::{Mission, MissionType, Objective, ObjectiveType, PlacementRule};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn boss_mission() -> Mission {
        Mission::new(
            MissionType::LinearProgression,
            vec![Objective::new(
                ObjectiveType::Boss,
                PlacementRule::EndOfLongestPath,
                1,
                "final boss",
            )],
        )
    }

    #[test]
    fn test_without_mission_layout_is_untouched() {
        let layout = LayoutParams::with_size(50, 40).rooms(10, 5, 10, 1);
        let config = GenerationConfig::new("random_room_placement", layout.clone());
        let level = build_level(&config, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(level.layout, layout);
        assert!(level.placement.is_none());
        assert!(level.feasibility_warnings.is_empty());
    }

    #[test]
    fn test_mission_tunes_layout_and_places() {
        let layout = LayoutParams::with_size(60, 40).rooms(15, 4, 10, 1);
        let config = GenerationConfig::new("bsp", layout).with_mission(boss_mission());
        let level = build_level(&config, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(level.algorithm, Algorithm::Bsp);
        assert!(level.layout.room_size_max.unwrap() >= 18);
        let result = level.placement.unwrap().unwrap();
        assert_eq!(result.placements.len(), 1);
        assert!(level.grid.is_floor(result.placements[0].position.x, result.placements[0].position.y));
    }

    #[test]
    fn test_unknown_algorithm_reports_fallback() {
        let layout = LayoutParams::with_size(50, 40).rooms(10, 5, 10, 1);
        let config = GenerationConfig::new("marching_squares", layout);
        let level = build_level(&config, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(level.algorithm, Algorithm::RandomRoomPlacement);
    }

    #[test]
    fn test_feasibility_warnings_are_reported() {
        let layout = LayoutParams::with_size(60, 40).rooms(4, 4, 8, 1);
        let mission = Mission::new(
            MissionType::Exploration,
            vec![Objective::new(ObjectiveType::Treasure, PlacementRule::DeadEnd, 4, "loot")],
        );
        let config = GenerationConfig::new("random_room_placement", layout).with_mission(mission);
        let level = build_level(&config, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(
            level.feasibility_warnings,
            vec!["Need 4 dead-ends but only 4 rooms - may be insufficient".to_string()]
        );
        // The dead-end demand raised the room budget before generation.
        assert_eq!(level.layout.max_rooms, Some(16));
        assert!(level.placement.unwrap().is_ok());
    }

    #[test]
    fn test_config_errors_propagate() {
        let config = GenerationConfig::new("drunkards_walk", LayoutParams::with_size(50, 40));
        let err = build_level(&config, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, LevelError::Config(ConfigError::MissingKey("drunkard_params"))));
    }

    #[test]
    fn test_from_json_document() {
        let document = r#"{
            "algorithm": "cellular_automata",
            "layout": {"map_width": 60, "map_height": 40, "cellular_params": {}},
            "mission": {
                "mission_type": "survival",
                "objectives": [
                    {"objective_type": "safe_room", "placement_rule": "checkpoint", "count": 2, "description": "rest"}
                ]
            }
        }"#;
        let level = build_level_from_json(document, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(level.algorithm, Algorithm::CellularAutomata);
        let params = level.layout.cellular_params.unwrap();
        assert!((params.initial_wall_probability - 0.50).abs() < 1e-9);
        assert!(level.placement.is_some());

        assert!(matches!(
            build_level_from_json("{not json", &mut StdRng::seed_from_u64(5)),
            Err(LevelError::Json(_))
        ));
    }
}
