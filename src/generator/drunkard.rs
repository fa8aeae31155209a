// src/generator/drunkard.rs
//! Drunkard's walk caves.
//!
//! Walkers carve single tiles until the floor target is met. Low targets
//! (< 30%) use one or two walkers and stay raw, which reads as a tight maze;
//! higher targets use three to five walkers and get a smoothing pass plus
//! pillars, which reads as open cave.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::{LayoutParams, StartKeyword, StartPos};
use crate::error::ConfigError;
use crate::generator::postprocess::{add_pillars, remove_isolated_areas, smooth_cave};
use crate::map::{Grid, Pos, CARDINALS};

/// Floor targets at or above this produce open caves.
pub const OPEN_CAVE_THRESHOLD: f64 = 0.30;
pub const MAX_WALKERS: u32 = 8;

/// Resolved walk settings after defaults and overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WalkPlan {
    target_tiles: usize,
    walkers: u32,
    straight_bias: f64,
    start: Pos,
    smooth: bool,
    pillars: bool,
}

pub fn generate<R: Rng + ?Sized>(layout: &LayoutParams, rng: &mut R) -> Result<Grid, ConfigError> {
    let (width, height) = layout.require_map_size()?;
    let params = layout.require_drunkard_params()?;
    let target_percent = params.require_target_floor_percent()?;
    let straight_bias = params.require_straight_bias()?;

    let mut grid = Grid::new(width, height);
    let open_cave = target_percent >= OPEN_CAVE_THRESHOLD;
    // The border can never be carved, so the interior caps the target.
    let interior = (width - 2) as usize * (height - 2) as usize;
    let plan = WalkPlan {
        target_tiles: ((grid.area() as f64 * target_percent) as usize).min(interior),
        walkers: walker_count(params.num_walkers, open_cave, rng),
        straight_bias,
        start: start_position(params.start_pos, width, height, rng),
        smooth: params.smooth.unwrap_or(open_cave),
        pillars: params.add_pillars.unwrap_or(open_cave),
    };
    debug!("drunkards_walk: {:?}", plan);

    walk(&mut grid, &plan, rng);

    if plan.smooth {
        smooth_cave(&mut grid, 1);
    }
    if plan.pillars {
        add_pillars(&mut grid, rng);
    }
    remove_isolated_areas(&mut grid);
    Ok(grid)
}

/// An explicit count clamped to `[1, MAX_WALKERS]`, otherwise 3-5 walkers
/// for open caves and 1-2 for tight mazes.
fn walker_count<R: Rng + ?Sized>(requested: Option<u32>, open_cave: bool, rng: &mut R) -> u32 {
    match requested {
        Some(n) => n.clamp(1, MAX_WALKERS),
        None if open_cave => rng.random_range(3..=5),
        None => rng.random_range(1..=2),
    }
}

fn start_position<R: Rng + ?Sized>(start: StartPos, width: i32, height: i32, rng: &mut R) -> Pos {
    let (x, y) = match start {
        StartPos::Named(StartKeyword::Center) => (width / 2, height / 2),
        StartPos::Named(StartKeyword::Random) => (
            rng.random_range(width / 4..=3 * width / 4),
            rng.random_range(height / 4..=3 * height / 4),
        ),
        StartPos::At(x, y) => (x, y),
    };
    // Keyword starts can also land on the border of very small maps.
    Pos::new(x.clamp(1, width - 2), y.clamp(1, height - 2))
}

fn walk<R: Rng + ?Sized>(grid: &mut Grid, plan: &WalkPlan, rng: &mut R) {
    let per_walker = plan.target_tiles / plan.walkers as usize;

    for walker in 0..plan.walkers {
        let mut current = if walker == 0 {
            plan.start
        } else {
            let carved: Vec<Pos> = grid.floor_positions().collect();
            carved.choose(rng).copied().unwrap_or(plan.start)
        };
        let mut last_direction = rng.random_range(0..CARDINALS.len());
        let mut carved = 0;

        while carved < per_walker {
            if !grid.is_floor(current.x, current.y) && grid.carve(current.x, current.y) {
                carved += 1;
            }
            if carved >= per_walker {
                break;
            }

            let direction = if rng.random::<f64>() < plan.straight_bias {
                last_direction
            } else {
                rng.random_range(0..CARDINALS.len())
            };
            let (dx, dy) = CARDINALS[direction];
            let next = current.offset(dx, dy);
            if grid.is_interior(next) {
                current = next;
                last_direction = direction;
            } else {
                last_direction = rng.random_range(0..CARDINALS.len());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrunkardParams;
    use crate::generator::postprocess::floor_region_count;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout(target: f64, bias: f64) -> LayoutParams {
        LayoutParams::with_size(50, 40).drunkard(DrunkardParams::new(target, bias, StartPos::CENTER))
    }

    #[test]
    fn test_tight_maze_floor_fraction_tracks_target() {
        for target in [0.20, 0.25, 0.29] {
            for seed in 0..10 {
                let grid = generate(&layout(target, 0.7), &mut StdRng::seed_from_u64(seed)).unwrap();
                let fraction = grid.floor_fraction();
                assert!((fraction - target).abs() <= 0.10, "target {target} seed {seed}: {fraction}");
                assert_eq!(floor_region_count(&grid), 1);
                assert!(grid.is_border_all_wall());
            }
        }
    }

    #[test]
    fn test_open_cave_lands_at_or_below_target() {
        // Smoothing, pillars and pruning mostly remove floor, so open caves
        // land at or below their raw target rather than within a fixed band.
        for seed in 0..10 {
            let grid = generate(&layout(0.40, 0.6), &mut StdRng::seed_from_u64(seed)).unwrap();
            let fraction = grid.floor_fraction();
            assert!((0.15..=0.45).contains(&fraction), "seed {seed}: {fraction}");
            assert_eq!(floor_region_count(&grid), 1);
        }
    }

    #[test]
    fn test_walker_count_follows_cave_style() {
        let mut rng = StdRng::seed_from_u64(11);
        let tight: Vec<u32> = (0..100).map(|_| walker_count(None, false, &mut rng)).collect();
        let open: Vec<u32> = (0..100).map(|_| walker_count(None, true, &mut rng)).collect();
        assert!(tight.iter().all(|n| (1..=2).contains(n)));
        assert!(tight.contains(&1) && tight.contains(&2));
        assert!(open.iter().all(|n| (3..=5).contains(n)));
        assert!(open.contains(&3) && open.contains(&5));

        assert_eq!(walker_count(Some(12), false, &mut rng), MAX_WALKERS);
        assert_eq!(walker_count(Some(0), true, &mut rng), 1);
        assert_eq!(walker_count(Some(2), true, &mut rng), 2);
    }

    #[test]
    fn test_tight_maze_carves_exact_target() {
        // No smoothing below the threshold, and every walker starts on carved floor.
        let grid = generate(&layout(0.25, 0.8), &mut StdRng::seed_from_u64(17)).unwrap();
        assert_eq!(grid.floor_count(), 500);
    }

    #[test]
    fn test_explicit_start_is_clamped() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(start_position(StartPos::At(-5, 100), 50, 40, &mut rng), Pos::new(1, 38));
        assert_eq!(start_position(StartPos::At(10, 12), 50, 40, &mut rng), Pos::new(10, 12));
        assert_eq!(start_position(StartPos::CENTER, 50, 40, &mut rng), Pos::new(25, 20));
        let random = start_position(StartPos::RANDOM, 50, 40, &mut rng);
        assert!((12..=37).contains(&random.x) && (10..=30).contains(&random.y));
    }

    #[test]
    fn test_walker_override_is_used() {
        let mut params = DrunkardParams::new(0.25, 0.7, StartPos::At(3, 3));
        params.num_walkers = Some(4);
        params.smooth = Some(false);
        params.add_pillars = Some(false);
        let layout = LayoutParams::with_size(50, 40).drunkard(params);
        let grid = generate(&layout, &mut StdRng::seed_from_u64(5)).unwrap();
        // 500 tiles split four ways carves exactly 500.
        assert_eq!(grid.floor_count(), 500);
    }

    #[test]
    fn test_full_target_fills_interior() {
        let grid = generate(&layout(1.0, 0.5), &mut StdRng::seed_from_u64(2));
        let grid = grid.unwrap();
        assert!(grid.is_border_all_wall());
        assert!(grid.floor_count() > 0);
    }

    #[test]
    fn test_missing_straight_bias() {
        let params = DrunkardParams {
            target_floor_percent: Some(0.3),
            ..DrunkardParams::default()
        };
        let layout = LayoutParams::with_size(50, 40).drunkard(params);
        assert_eq!(
            generate(&layout, &mut StdRng::seed_from_u64(0)),
            Err(ConfigError::MissingKey("drunkard_params.straight_bias"))
        );
    }
}
