//! End-to-end scenarios through the public API.
//!
//! Exercises: JSON config → dispatcher → grid → analyzer → objective placer.

use dungeon_forge::analysis::{DistanceField, LevelAnalysis};
use dungeon_forge::generator::postprocess::floor_region_count;
use dungeon_forge::mission::place_objectives;
use dungeon_forge::{
    build_level, generate_level, Algorithm, GenerationConfig, Grid, LayoutParams, Mission, MissionType, Objective,
    ObjectiveType, PlacementRule,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ────────────────────────────────────────────────────────────

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rooms_config() -> GenerationConfig {
    GenerationConfig::from_json(
        r#"{
            "algorithm": "random_room_placement",
            "layout": {
                "map_width": 50, "map_height": 40,
                "max_rooms": 10, "room_size_min": 5, "room_size_max": 10,
                "corridor_width": 1
            }
        }"#,
    )
    .expect("valid config")
}

fn boss_mission() -> Mission {
    serde_json::from_str(
        r#"{
            "mission_type": "linear_progression",
            "objectives": [
                {"objective_type": "boss", "placement_rule": "end_of_longest_path", "count": 1, "description": "final boss"}
            ]
        }"#,
    )
    .expect("valid mission")
}

// ── Generation ─────────────────────────────────────────────────────────

#[test]
fn random_rooms_scenario() {
    init_logger();
    for seed in 0..10 {
        let grid = generate_level(&rooms_config(), &mut StdRng::seed_from_u64(seed)).unwrap();
        let rows = grid.to_rows();
        assert_eq!(rows.len(), 40);
        assert!(rows.iter().all(|row| row.len() == 50));
        let fraction = grid.floor_fraction();
        assert!(fraction > 0.1 && fraction < 0.7, "seed {seed}: {fraction}");
        assert_eq!(floor_region_count(&grid), 1);
    }
}

#[test]
fn drunkard_scenario_tracks_target() {
    init_logger();
    let config = GenerationConfig::from_json(
        r#"{
            "algorithm": "drunkards_walk",
            "layout": {
                "map_width": 50, "map_height": 40,
                "drunkard_params": {"target_floor_percent": 0.25, "start_pos": "random", "straight_bias": 0.6}
            }
        }"#,
    )
    .unwrap();
    for seed in 0..5 {
        let grid = generate_level(&config, &mut StdRng::seed_from_u64(seed)).unwrap();
        let fraction = grid.floor_fraction();
        assert!((0.15..=0.35).contains(&fraction), "seed {seed}: {fraction}");
    }
}

// ── Analysis ───────────────────────────────────────────────────────────

#[test]
fn analysis_is_idempotent() {
    let grid = generate_level(&rooms_config(), &mut StdRng::seed_from_u64(21)).unwrap();
    let first = LevelAnalysis::run(&grid).unwrap();
    let second = LevelAnalysis::run(&grid).unwrap();
    assert_eq!(first, second);
}

// ── Placement ──────────────────────────────────────────────────────────

#[test]
fn boss_lands_at_maximum_distance() {
    init_logger();
    let mission = boss_mission();
    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = generate_level(&rooms_config(), &mut rng).unwrap();
        let result = place_objectives(&grid, &mission, &mut rng).unwrap();

        assert_eq!(result.placements.len(), 1);
        let boss = &result.placements[0];
        assert_eq!(boss.objective_type, ObjectiveType::Boss);

        let start = grid.first_floor().unwrap();
        assert_eq!(result.start_pos, start);
        let field = DistanceField::build(&grid, start);
        assert_eq!(field.get(boss.position), Some(field.max_distance()));
        assert_eq!(result.max_distance, field.max_distance());
    }
}

#[test]
fn placements_never_share_tiles() {
    let mission = Mission::new(
        MissionType::MultiObjective,
        vec![
            Objective::new(ObjectiveType::Boss, PlacementRule::EndOfLongestPath, 2, "twins"),
            Objective::new(ObjectiveType::Treasure, PlacementRule::DeadEnd, 5, "loot"),
            Objective::new(ObjectiveType::Key, PlacementRule::RandomRoom, 6, "keys"),
            Objective::new(ObjectiveType::Secret, PlacementRule::Hidden, 4, "stash"),
            Objective::new(ObjectiveType::SafeRoom, PlacementRule::Checkpoint, 3, "rest"),
            Objective::new(ObjectiveType::Puzzle, PlacementRule::CentralRoom, 2, "riddle"),
        ],
    );
    for algorithm in Algorithm::ALL {
        let config = GenerationConfig::new(algorithm.name(), full_layout()).with_mission(mission.clone());
        let level = build_level(&config, &mut StdRng::seed_from_u64(8)).unwrap();
        let result = level.placement.unwrap().unwrap();
        let mut seen = std::collections::HashSet::new();
        for placement in &result.placements {
            assert!(seen.insert(placement.position), "{algorithm}: duplicate {:?}", placement.position);
            assert!(level.grid.is_floor(placement.position.x, placement.position.y));
        }
        assert!(result.placements.len() as u32 <= mission.total_instances());
    }
}

#[test]
fn oversubscribed_mission_places_fewer() {
    let grid = Grid::from_ascii(
        "
        #######
        #.....#
        #.....#
        #######
        ",
    );
    let mission = Mission::new(
        MissionType::Exploration,
        vec![Objective::new(ObjectiveType::Treasure, PlacementRule::RandomRoom, 50, "")],
    );
    let result = place_objectives(&grid, &mission, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(result.placements.len(), 10);
}

#[test]
fn empty_grid_is_a_structured_failure() {
    let grid = Grid::new(20, 20);
    let failure = place_objectives(&grid, &boss_mission(), &mut StdRng::seed_from_u64(1)).unwrap_err();
    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json, serde_json::json!({"error": "No floor tiles found", "placements": []}));
}

fn full_layout() -> LayoutParams {
    serde_json::from_str(
        r#"{
            "map_width": 60, "map_height": 40,
            "max_rooms": 15, "room_size_min": 4, "room_size_max": 10, "corridor_width": 1,
            "drunkard_params": {"target_floor_percent": 0.3, "start_pos": "center", "straight_bias": 0.7},
            "cellular_params": {}
        }"#,
    )
    .unwrap()
}
