// src/mission/geometry.rs
//! Mission-driven layout tuning.
//!
//! [`adjust_layout_for_mission`] nudges layout parameters so the generated
//! geometry can actually host the mission: linear runs get fewer, larger
//! rooms; exploration gets more branches; boss fights get a big arena. Each
//! mission type is its own function over a [`Tuning`] that holds only the
//! parameters the chosen algorithm family reads. Every numeric write goes
//! through [`clamp`] against the bounds declared below.

use log::warn;

use crate::config::{CellularParams, DrunkardParams, LayoutParams, StartPos};
use crate::generator::Algorithm;
use crate::mission::{Mission, MissionType, ObjectiveType, PlacementRule};
use crate::utils::util::clamp;

pub const MAX_ROOMS_BOUNDS: (i32, i32) = (1, 40);
pub const ROOM_SIZE_BOUNDS: (i32, i32) = (3, 20);
pub const TARGET_FLOOR_BOUNDS: (f64, f64) = (0.2, 0.45);
pub const STRAIGHT_BIAS_BOUNDS: (f64, f64) = (0.0, 1.0);
pub const WALKER_BOUNDS: (u32, u32) = (1, 8);
pub const WALL_PROBABILITY_BOUNDS: (f64, f64) = (0.45, 0.60);
pub const ITERATION_BOUNDS: (u32, u32) = (1, 6);

/// `room_size_max` guaranteed whenever a boss is present.
pub const BOSS_ROOM_SIZE: i32 = 18;
/// Baseline room count guaranteed when dead ends are requested.
pub const DEAD_END_ROOM_BASE: i32 = 12;
pub const LARGE_ROOM_MIN: i32 = 6;
pub const LARGE_ROOM_MAX: i32 = 14;

/// Assumed when a room layout has no `max_rooms` (feasibility check and
/// most mission types).
pub const DEFAULT_MAX_ROOMS: i32 = 15;
const DEFAULT_ROOM_SIZE_MIN: i32 = 4;
const DEFAULT_ROOM_SIZE_MAX: i32 = 12;
const DEFAULT_TARGET_FLOOR: f64 = 0.27;
const DEFAULT_STRAIGHT_BIAS: f64 = 0.7;
/// Baseline for a cave layout that carries no `cellular_params` yet.
const DEFAULT_CAVE_WALL_PROBABILITY: f64 = 0.50;
const DEFAULT_CAVE_ITERATIONS: u32 = 4;

/// How an algorithm responds to layout tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// Random rooms, BSP and hybrid: tuned through room count and sizes.
    Rooms,
    Drunkard,
    /// Plain cellular automata only.
    Cellular,
    /// Cellular rooms: fixed profile, nothing to tune.
    Other,
}

impl AlgorithmFamily {
    /// Unknown names are generated as random rooms, so they tune as rooms.
    pub fn of(algorithm: &str) -> Self {
        match Algorithm::from_name(algorithm) {
            Some(Algorithm::RandomRoomPlacement | Algorithm::Bsp | Algorithm::HybridRoomsCaves) | None => {
                AlgorithmFamily::Rooms
            }
            Some(Algorithm::DrunkardsWalk) => AlgorithmFamily::Drunkard,
            Some(Algorithm::CellularAutomata) => AlgorithmFamily::Cellular,
            Some(Algorithm::CellularRooms) => AlgorithmFamily::Other,
        }
    }
}

/// What the mission asks of the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Demand {
    boss: bool,
    dead_ends: i32,
    checkpoints: i32,
    keys: i32,
    large_rooms: bool,
}

impl Demand {
    fn of(mission: &Mission) -> Self {
        Demand {
            boss: mission.has_objective(ObjectiveType::Boss),
            dead_ends: mission.count_of_rule(PlacementRule::DeadEnd) as i32,
            checkpoints: mission.count_of_rule(PlacementRule::Checkpoint) as i32,
            keys: mission.count_of_type(ObjectiveType::Key) as i32,
            large_rooms: mission.has_rule(PlacementRule::CentralRoom) || mission.has_rule(PlacementRule::Checkpoint),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RoomBudget {
    max_rooms: i32,
    size_min: i32,
    size_max: i32,
}

/// The parameters one algorithm family reads, with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
enum Tuning {
    Rooms(RoomBudget),
    Drunkard(DrunkardParams),
    Cellular(CellularParams),
    Untouched,
}

impl Tuning {
    fn read(layout: &LayoutParams, family: AlgorithmFamily, mission_type: MissionType) -> Self {
        match family {
            AlgorithmFamily::Rooms => Tuning::Rooms(RoomBudget {
                max_rooms: layout.max_rooms.unwrap_or(default_max_rooms(mission_type)),
                size_min: layout.room_size_min.unwrap_or(DEFAULT_ROOM_SIZE_MIN),
                size_max: layout.room_size_max.unwrap_or(DEFAULT_ROOM_SIZE_MAX),
            }),
            AlgorithmFamily::Drunkard => Tuning::Drunkard(
                layout
                    .drunkard_params
                    .clone()
                    .unwrap_or_else(|| DrunkardParams::new(DEFAULT_TARGET_FLOOR, DEFAULT_STRAIGHT_BIAS, StartPos::CENTER)),
            ),
            AlgorithmFamily::Cellular => {
                Tuning::Cellular(layout.cellular_params.clone().unwrap_or_else(default_cave_params))
            }
            AlgorithmFamily::Other => Tuning::Untouched,
        }
    }

    fn write(self, layout: &mut LayoutParams) {
        match self {
            Tuning::Rooms(budget) => {
                layout.max_rooms = Some(budget.max_rooms);
                layout.room_size_min = Some(budget.size_min);
                layout.room_size_max = Some(budget.size_max);
            }
            Tuning::Drunkard(params) => layout.drunkard_params = Some(params),
            Tuning::Cellular(params) => layout.cellular_params = Some(params),
            Tuning::Untouched => {}
        }
    }
}

fn default_cave_params() -> CellularParams {
    CellularParams {
        initial_wall_probability: DEFAULT_CAVE_WALL_PROBABILITY,
        iterations: DEFAULT_CAVE_ITERATIONS,
        ..CellularParams::default()
    }
}

fn default_max_rooms(mission_type: MissionType) -> i32 {
    match mission_type {
        MissionType::LinearProgression => 10,
        MissionType::Survival => 12,
        _ => DEFAULT_MAX_ROOMS,
    }
}

fn target(params: &DrunkardParams) -> f64 {
    params.target_floor_percent.unwrap_or(DEFAULT_TARGET_FLOOR)
}

fn bias(params: &DrunkardParams) -> f64 {
    params.straight_bias.unwrap_or(DEFAULT_STRAIGHT_BIAS)
}

/// Returns a copy of `layout` tuned for `mission` under `algorithm`.
///
/// Keys the chosen algorithm family does not read are left as they were.
/// Missing room keys are filled from defaults; missing `drunkard_params` or
/// `cellular_params` objects are created.
pub fn adjust_layout_for_mission(layout: &LayoutParams, mission: &Mission, algorithm: &str) -> LayoutParams {
    let family = AlgorithmFamily::of(algorithm);
    let demand = Demand::of(mission);
    let mut tuning = Tuning::read(layout, family, mission.mission_type);

    match mission.mission_type {
        MissionType::LinearProgression => linear_progression(&mut tuning, &demand),
        MissionType::Exploration => exploration(&mut tuning, &demand),
        MissionType::Survival => survival(&mut tuning, &demand),
        MissionType::KeyHunt => key_hunt(&mut tuning, &demand),
        MissionType::MultiObjective => multi_objective(&mut tuning),
    }
    if let Tuning::Rooms(budget) = &mut tuning {
        guarantee_rooms(budget, &demand);
    }

    let mut adjusted = layout.clone();
    tuning.write(&mut adjusted);
    adjusted
}

fn linear_progression(tuning: &mut Tuning, demand: &Demand) {
    match tuning {
        Tuning::Rooms(b) => {
            b.max_rooms = clamp(b.max_rooms - 4, 6, 25);
            b.size_min = clamp(b.size_min + 2, LARGE_ROOM_MIN, ROOM_SIZE_BOUNDS.1);
            b.size_max = clamp(b.size_max + 4, ROOM_SIZE_BOUNDS.0, 18);
            if demand.boss {
                b.size_max = clamp(b.size_max + 3, ROOM_SIZE_BOUNDS.0, ROOM_SIZE_BOUNDS.1);
            }
        }
        Tuning::Drunkard(p) => {
            p.straight_bias = Some(clamp(bias(p) - 0.2, 0.5, STRAIGHT_BIAS_BOUNDS.1));
            if demand.boss {
                // Open arena: several walkers spreading from the center, smoothed.
                p.target_floor_percent = Some(clamp(target(p) + 0.18, TARGET_FLOOR_BOUNDS.0, TARGET_FLOOR_BOUNDS.1));
                let walkers = p.num_walkers.unwrap_or(1) + 2;
                p.num_walkers = Some(clamp(walkers.max(3), 3, WALKER_BOUNDS.1));
                p.smooth = Some(true);
                p.add_pillars = Some(true);
                p.start_pos = StartPos::CENTER;
            } else {
                p.target_floor_percent = Some(clamp(target(p) + 0.03, TARGET_FLOOR_BOUNDS.0, 0.30));
            }
        }
        Tuning::Cellular(p) => {
            p.initial_wall_probability = clamp(p.initial_wall_probability - 0.02, 0.48, WALL_PROBABILITY_BOUNDS.1);
        }
        Tuning::Untouched => {}
    }
}

fn exploration(tuning: &mut Tuning, demand: &Demand) {
    match tuning {
        Tuning::Rooms(b) => {
            b.max_rooms = clamp(b.max_rooms + 5, MAX_ROOMS_BOUNDS.0, 25);
            if demand.dead_ends > 0 {
                b.max_rooms = clamp(b.max_rooms + demand.dead_ends, MAX_ROOMS_BOUNDS.0, 30);
            }
        }
        Tuning::Drunkard(p) => {
            p.target_floor_percent = Some(clamp(target(p) + 0.03, TARGET_FLOOR_BOUNDS.0, 0.30));
            p.straight_bias = Some(clamp(bias(p) - 0.10, 0.60, STRAIGHT_BIAS_BOUNDS.1));
            // Extra walkers branch out toward the dead ends.
            if p.num_walkers.unwrap_or(1) < 3 {
                p.num_walkers = Some(clamp(2 + demand.dead_ends as u32 / 2, 3, 4));
            }
        }
        Tuning::Cellular(p) => {
            p.initial_wall_probability = clamp(p.initial_wall_probability + 0.08, WALL_PROBABILITY_BOUNDS.0, 0.58);
            p.iterations = clamp(p.iterations + 2, ITERATION_BOUNDS.0, ITERATION_BOUNDS.1);
            p.birth_limit = 5;
            p.death_limit = 2;
        }
        Tuning::Untouched => {}
    }
}

fn survival(tuning: &mut Tuning, demand: &Demand) {
    match tuning {
        Tuning::Rooms(b) => {
            b.max_rooms = clamp(b.max_rooms + demand.checkpoints, 8, 20);
            b.size_min = clamp(b.size_min + 1, 5, ROOM_SIZE_BOUNDS.1);
        }
        Tuning::Drunkard(p) => {
            p.target_floor_percent = Some(clamp(target(p) - 0.05, 0.22, TARGET_FLOOR_BOUNDS.1));
            p.straight_bias = Some(clamp(bias(p) + 0.15, STRAIGHT_BIAS_BOUNDS.0, 0.85));
        }
        Tuning::Cellular(p) => {
            p.initial_wall_probability = clamp(p.initial_wall_probability + 0.05, WALL_PROBABILITY_BOUNDS.0, 0.55);
        }
        Tuning::Untouched => {}
    }
}

fn key_hunt(tuning: &mut Tuning, demand: &Demand) {
    match tuning {
        Tuning::Rooms(b) => {
            b.max_rooms = clamp(b.max_rooms + 2 * demand.keys, MAX_ROOMS_BOUNDS.0, 25);
            b.size_max = clamp(b.size_max + 2, LARGE_ROOM_MAX, ROOM_SIZE_BOUNDS.1);
        }
        Tuning::Drunkard(p) => {
            p.num_walkers = Some(clamp(2 + demand.keys as u32, WALKER_BOUNDS.0, 5));
            p.target_floor_percent = Some(clamp(target(p) + 0.03, TARGET_FLOOR_BOUNDS.0, 0.30));
        }
        Tuning::Cellular(p) => {
            p.initial_wall_probability = clamp(p.initial_wall_probability + 0.04, WALL_PROBABILITY_BOUNDS.0, 0.54);
        }
        Tuning::Untouched => {}
    }
}

fn multi_objective(tuning: &mut Tuning) {
    match tuning {
        Tuning::Rooms(b) => {
            b.max_rooms = clamp(b.max_rooms + 3, MAX_ROOMS_BOUNDS.0, 22);
            b.size_max = clamp(b.size_max + 2, LARGE_ROOM_MAX, ROOM_SIZE_BOUNDS.1);
        }
        Tuning::Drunkard(p) => {
            p.target_floor_percent = Some(clamp(target(p) + 0.03, TARGET_FLOOR_BOUNDS.0, 0.30));
        }
        Tuning::Cellular(p) => {
            p.initial_wall_probability = clamp(p.initial_wall_probability + 0.03, WALL_PROBABILITY_BOUNDS.0, 0.53);
        }
        Tuning::Untouched => {}
    }
}

/// Post-rules that hold for room layouts whatever the mission type.
fn guarantee_rooms(budget: &mut RoomBudget, demand: &Demand) {
    if demand.boss {
        budget.size_max = budget.size_max.max(BOSS_ROOM_SIZE);
    }
    if demand.dead_ends > 0 {
        let wanted = (DEAD_END_ROOM_BASE + demand.dead_ends).min(MAX_ROOMS_BOUNDS.1);
        budget.max_rooms = budget.max_rooms.max(wanted);
    }
    if demand.large_rooms {
        budget.size_min = budget.size_min.max(LARGE_ROOM_MIN);
        budget.size_max = budget.size_max.max(LARGE_ROOM_MAX);
    }
    budget.size_max = budget.size_max.max(budget.size_min);
}

/// Non-fatal warnings about objectives the layout may not be able to host.
/// Each warning is also logged.
pub fn validate_mission_feasibility(layout: &LayoutParams, mission: &Mission) -> Vec<String> {
    let max_rooms = layout.max_rooms.unwrap_or(DEFAULT_MAX_ROOMS);
    let total = mission.total_instances() as i32;
    let dead_ends = mission.count_of_rule(PlacementRule::DeadEnd) as i32;

    let mut warnings = Vec::new();
    if max_rooms < total {
        warnings.push(format!("Only {max_rooms} rooms but {total} objectives - may not all place"));
    }
    if dead_ends > max_rooms / 2 {
        warnings.push(format!(
            "Need {dead_ends} dead-ends but only {max_rooms} rooms - may be insufficient"
        ));
    }
    for warning in &warnings {
        warn!("{}", warning);
    }
    warnings
}
