// src/mission/placement.rs
//! Objective placement.
//!
//! The grid is analyzed once, then every objective instance is resolved in
//! mission order against a single used-set, so no two placements ever share
//! a tile. An instance whose rule finds no free candidate is skipped; there
//! is no retry and no fallback to another rule.

use std::collections::HashSet;

use log::{info, warn};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::{LevelAnalysis, Room};
use crate::error::{AnalysisError, PlacementFailure};
use crate::map::{Grid, Pos};
use crate::mission::{DifficultyProgression, Mission, MissionType, ObjectiveType, PlacementRule};

/// Wall neighbors (of 4) that make a tile count as tucked away.
pub const HIDDEN_MIN_WALL_NEIGHBORS: usize = 2;
/// Checkpoints land strictly closer than this to half the longest path.
pub const CHECKPOINT_WINDOW: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub objective_type: ObjectiveType,
    pub position: Pos,
    pub placement_rule: PlacementRule,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub placements: Vec<Placement>,
    pub start_pos: Pos,
    pub mission_type: MissionType,
    pub mission_description: String,
    pub difficulty_progression: DifficultyProgression,
    pub num_rooms: usize,
    pub max_distance: u32,
    pub dead_end_count: usize,
}

struct Placer<'a> {
    grid: &'a Grid,
    analysis: &'a LevelAnalysis,
    rooms_by_size: Vec<&'a Room>,
    furthest: Vec<(Pos, u32)>,
    used: HashSet<Pos>,
}

impl<'a> Placer<'a> {
    fn new(grid: &'a Grid, analysis: &'a LevelAnalysis) -> Self {
        let mut rooms_by_size: Vec<&Room> = analysis.rooms.iter().collect();
        rooms_by_size.sort_by(|a, b| b.size.cmp(&a.size));
        Placer {
            grid,
            analysis,
            rooms_by_size,
            furthest: analysis.distances.furthest_first(),
            used: HashSet::new(),
        }
    }

    fn free(&self, pos: &Pos) -> bool {
        !self.used.contains(pos)
    }

    fn pick<R: Rng + ?Sized>(&self, rule: PlacementRule, rng: &mut R) -> Option<Pos> {
        match rule {
            PlacementRule::EndOfLongestPath => self
                .furthest
                .iter()
                .map(|(pos, _)| *pos)
                .find(|pos| self.free(pos)),
            PlacementRule::DeadEnd => {
                let candidates: Vec<Pos> = self
                    .analysis
                    .dead_ends
                    .iter()
                    .copied()
                    .filter(|pos| self.free(pos))
                    .collect();
                candidates.choose(rng).copied()
            }
            PlacementRule::CentralRoom => self.rooms_by_size.iter().find_map(|room| {
                let candidates: Vec<Pos> = room.tiles.iter().copied().filter(|pos| self.free(pos)).collect();
                candidates.choose(rng).copied()
            }),
            PlacementRule::Hidden => {
                let candidates: Vec<Pos> = self
                    .analysis
                    .rooms
                    .iter()
                    .flat_map(|room| room.tiles.iter().copied())
                    .filter(|pos| self.free(pos))
                    .filter(|pos| self.grid.wall_neighbors4(pos.x, pos.y) >= HIDDEN_MIN_WALL_NEIGHBORS)
                    .collect();
                candidates.choose(rng).copied()
            }
            PlacementRule::Checkpoint => {
                let mid = self.analysis.distances.max_distance() / 2;
                let candidates: Vec<Pos> = self
                    .analysis
                    .distances
                    .iter()
                    .filter(|(_, dist)| dist.abs_diff(mid) < CHECKPOINT_WINDOW)
                    .map(|(pos, _)| pos)
                    .filter(|pos| self.free(pos))
                    .collect();
                candidates.choose(rng).copied()
            }
            PlacementRule::RandomRoom => {
                let open_rooms: Vec<&Room> = self
                    .analysis
                    .rooms
                    .iter()
                    .filter(|room| room.tiles.iter().any(|pos| self.free(pos)))
                    .collect();
                let room = open_rooms.choose(rng)?;
                let candidates: Vec<Pos> = room.tiles.iter().copied().filter(|pos| self.free(pos)).collect();
                candidates.choose(rng).copied()
            }
        }
    }
}

/// Places every objective of `mission` on `grid`.
///
/// Fails with a [`PlacementFailure`] (`"No floor tiles found"` or
/// `"No rooms found"`) instead of panicking when the grid is unusable.
pub fn place_objectives<R: Rng + ?Sized>(
    grid: &Grid,
    mission: &Mission,
    rng: &mut R,
) -> Result<PlacementResult, PlacementFailure> {
    let analysis = LevelAnalysis::run(grid)?;
    if analysis.rooms.is_empty() {
        return Err(AnalysisError::NoRooms.into());
    }

    let mut placer = Placer::new(grid, &analysis);
    let mut placements = Vec::new();

    for objective in &mission.objectives {
        for _ in 0..objective.count {
            match placer.pick(objective.placement_rule, rng) {
                Some(position) => {
                    placer.used.insert(position);
                    placements.push(Placement {
                        objective_type: objective.objective_type,
                        position,
                        placement_rule: objective.placement_rule,
                        description: objective.description.clone(),
                    });
                }
                None => warn!(
                    "no free {:?} tile for {:?} objective; instance skipped",
                    objective.placement_rule, objective.objective_type
                ),
            }
        }
    }

    info!(
        "placed {}/{} objective instances ({} rooms, max distance {})",
        placements.len(),
        mission.total_instances(),
        analysis.rooms.len(),
        analysis.distances.max_distance()
    );

    Ok(PlacementResult {
        placements,
        start_pos: analysis.start,
        mission_type: mission.mission_type,
        mission_description: mission.description.clone(),
        difficulty_progression: mission.difficulty_progression,
        num_rooms: analysis.rooms.len(),
        max_distance: analysis.distances.max_distance(),
        dead_end_count: analysis.dead_ends.len(),
    })
}
