// src/generator/rooms.rs
//! Random room placement.
//!
//! Rooms are rejection-sampled (three attempts per requested room), then
//! each new room is joined to its nearest already-connected room by an
//! L-shaped corridor. A few extra corridors add loops.

use log::{debug, warn};
use rand::Rng;

use crate::bsp::Rect;
use crate::config::LayoutParams;
use crate::error::ConfigError;
use crate::generator::carve::{carve_l_corridor, carve_room};
use crate::generator::postprocess::remove_isolated_areas;
use crate::map::Grid;

/// Sampling attempts per requested room.
pub const ATTEMPTS_PER_ROOM: i32 = 3;
/// Upper bound on loop-forming extra corridors.
pub const MAX_EXTRA_CONNECTIONS: usize = 3;

pub fn generate<R: Rng + ?Sized>(layout: &LayoutParams, rng: &mut R) -> Result<Grid, ConfigError> {
    let (width, height) = layout.require_map_size()?;
    let max_rooms = layout.require_max_rooms()?;
    let (size_min, size_max) = layout.require_room_sizes()?;
    let corridor_width = layout.require_corridor_width()?;

    // A room of side `s` needs `1..=dim - s - 2` as its origin range.
    if size_min > width - 3 || size_min > height - 3 {
        return Err(ConfigError::invalid(
            "room_size_min",
            format!("{size_min} does not fit inside a {width}x{height} map"),
        ));
    }

    let mut grid = Grid::new(width, height);
    let rooms = place_rooms(&mut grid, max_rooms, size_min, size_max, rng);
    if rooms.is_empty() {
        warn!("random_room_placement: no rooms placed, returning solid grid");
        return Ok(grid);
    }
    debug!("random_room_placement: placed {}/{} rooms", rooms.len(), max_rooms);

    connect_nearest(&mut grid, &rooms, corridor_width, rng);
    add_loops(&mut grid, &rooms, corridor_width, rng);

    remove_isolated_areas(&mut grid);
    Ok(grid)
}

fn place_rooms<R: Rng + ?Sized>(
    grid: &mut Grid,
    max_rooms: i32,
    size_min: i32,
    size_max: i32,
    rng: &mut R,
) -> Vec<Rect> {
    let mut rooms: Vec<Rect> = Vec::new();
    for _ in 0..max_rooms.max(0) * ATTEMPTS_PER_ROOM {
        if rooms.len() as i32 >= max_rooms {
            break;
        }
        let w = rng.random_range(size_min..=size_max);
        let h = rng.random_range(size_min..=size_max);
        // Oversized draws count as failed attempts.
        if w > grid.width() - 3 || h > grid.height() - 3 {
            continue;
        }
        let x = rng.random_range(1..=grid.width() - w - 2);
        let y = rng.random_range(1..=grid.height() - h - 2);
        let candidate = Rect::new(x, y, w, h);

        if rooms.iter().any(|other| candidate.intersects(other)) {
            continue;
        }
        carve_room(grid, &candidate);
        rooms.push(candidate);
    }
    rooms
}

/// Joins every room after the first to the closest room already joined.
fn connect_nearest<R: Rng + ?Sized>(grid: &mut Grid, rooms: &[Rect], corridor_width: i32, rng: &mut R) {
    for i in 1..rooms.len() {
        // Rooms 0..i are connected at this point.
        let mut nearest = 0;
        let mut nearest_dist = f64::INFINITY;
        for (j, other) in rooms[..i].iter().enumerate() {
            let dist = rooms[i].center_distance(other);
            if dist < nearest_dist {
                nearest_dist = dist;
                nearest = j;
            }
        }
        let horizontal_first = rng.random_bool(0.5);
        carve_l_corridor(
            grid,
            rooms[nearest].center(),
            rooms[i].center(),
            corridor_width,
            horizontal_first,
        );
    }
}

fn add_loops<R: Rng + ?Sized>(grid: &mut Grid, rooms: &[Rect], corridor_width: i32, rng: &mut R) {
    if rooms.len() < 2 {
        return;
    }
    let extra = MAX_EXTRA_CONNECTIONS.min(rooms.len() / 4);
    for _ in 0..extra {
        let a = rng.random_range(0..rooms.len());
        let b = rng.random_range(0..rooms.len());
        if a != b {
            carve_l_corridor(grid, rooms[a].center(), rooms[b].center(), corridor_width, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::postprocess::floor_region_count;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout() -> LayoutParams {
        LayoutParams::with_size(50, 40).rooms(10, 5, 10, 1)
    }

    #[test]
    fn test_floor_fraction_in_range() {
        for seed in 0..20 {
            let grid = generate(&layout(), &mut StdRng::seed_from_u64(seed)).unwrap();
            let fraction = grid.floor_fraction();
            assert!(fraction > 0.1 && fraction < 0.7, "seed {seed}: {fraction}");
            assert_eq!(floor_region_count(&grid), 1);
            assert!(grid.is_border_all_wall());
        }
    }

    #[test]
    fn test_rooms_never_touch() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(80, 50);
        let rooms = place_rooms(&mut grid, 20, 4, 10, &mut rng);
        assert!(!rooms.is_empty());
        for (i, a) in rooms.iter().enumerate() {
            for b in &rooms[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn test_wide_corridors_stay_inside_border() {
        let layout = LayoutParams::with_size(50, 40).rooms(12, 4, 8, 3);
        for seed in 0..5 {
            let grid = generate(&layout, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert!(grid.is_border_all_wall());
        }
    }

    #[test]
    fn test_zero_rooms_returns_solid_grid() {
        let layout = LayoutParams::with_size(50, 40).rooms(0, 5, 10, 1);
        let grid = generate(&layout, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(grid.floor_count(), 0);
        assert_eq!((grid.width(), grid.height()), (50, 40));
    }

    #[test]
    fn test_room_too_large_for_map() {
        let layout = LayoutParams::with_size(10, 10).rooms(4, 8, 9, 1);
        assert!(matches!(
            generate(&layout, &mut StdRng::seed_from_u64(1)),
            Err(ConfigError::InvalidValue { key: "room_size_min", .. })
        ));
    }

    #[test]
    fn test_oversized_maximum_is_tolerated() {
        // room_size_max larger than the map only wastes attempts.
        let layout = LayoutParams::with_size(40, 30).rooms(10, 4, 40, 1);
        let grid = generate(&layout, &mut StdRng::seed_from_u64(2)).unwrap();
        assert!(grid.is_border_all_wall());
    }
}
