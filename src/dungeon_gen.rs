use crate::config::{ConfigError, DungeonConfig, EDGE_MARGIN_MAX, EDGE_MARGIN_MIN};
use crate::grid::Grid;
use crate::room::Rect;
use crate::tile::Tile;
use log::{debug, warn};
use rand::Rng;

/// Result of dungeon generation: the carved grid plus the accepted rooms in
/// placement order. Room 0 is the connection seed (and the natural spawn
/// room for callers).
#[derive(Debug, Clone, PartialEq)]
pub struct Dungeon {
    pub grid: Grid,
    pub rooms: Vec<Rect>,
}

impl Dungeon {
    pub fn floor_count(&self) -> usize {
        self.grid.count(Tile::Floor)
    }
}

pub struct DungeonGenerator;

impl DungeonGenerator {
    /// Run one full generation pass: wall-filled grid, room placement,
    /// corridor connection. Deterministic for a seeded `rng`.
    pub fn generate(config: &DungeonConfig, rng: &mut impl Rng) -> Result<Dungeon, ConfigError> {
        config.validate()?;

        let mut grid = Grid::new(config.width, config.height);
        let rooms = place_rooms(&mut grid, config, rng);
        connect_rooms(&mut grid, &rooms, rng);

        debug!(
            "generated {}x{} dungeon with {} rooms",
            config.width,
            config.height,
            rooms.len()
        );
        Ok(Dungeon { grid, rooms })
    }

    /// Convenience entry for callers that just want a fresh random layout.
    pub fn generate_random(config: &DungeonConfig) -> Result<Dungeon, ConfigError> {
        Self::generate(config, &mut rand::thread_rng())
    }
}

/// Place up to `config.room_count` non-overlapping rooms by rejection
/// sampling, carving each accepted room into the grid. Stops early once
/// `config.attempt_cap` candidates have been sampled; returning fewer rooms
/// than requested is valid degraded output, not a failure.
pub fn place_rooms(grid: &mut Grid, config: &DungeonConfig, rng: &mut impl Rng) -> Vec<Rect> {
    let mut rooms: Vec<Rect> = Vec::new();
    let mut attempts = 0;

    while rooms.len() < config.room_count && attempts < config.attempt_cap {
        attempts += 1;

        let Some(candidate) = sample_candidate(grid, config, rng) else {
            continue;
        };

        if rooms.iter().any(|room| room.intersects_padded(&candidate)) {
            continue;
        }

        carve_room(grid, &candidate);
        rooms.push(candidate);
    }

    if rooms.len() < config.room_count {
        warn!(
            "placed {} of {} requested rooms after {} attempts",
            rooms.len(),
            config.room_count,
            attempts
        );
    }
    rooms
}

/// Sample one candidate room whose footprint respects the edge margins.
/// Returns None when the sampled size has no in-margin position at all.
fn sample_candidate(grid: &Grid, config: &DungeonConfig, rng: &mut impl Rng) -> Option<Rect> {
    let width = rng.gen_range(config.room_width.0..=config.room_width.1);
    let height = rng.gen_range(config.room_height.0..=config.room_height.1);

    let max_x = grid.width as i32 - EDGE_MARGIN_MAX - width;
    let max_y = grid.height as i32 - EDGE_MARGIN_MAX - height;
    if max_x < EDGE_MARGIN_MIN || max_y < EDGE_MARGIN_MIN {
        return None;
    }

    let x = rng.gen_range(EDGE_MARGIN_MIN..=max_x);
    let y = rng.gen_range(EDGE_MARGIN_MIN..=max_y);
    Some(Rect::new(x, y, width, height))
}

fn carve_room(grid: &mut Grid, room: &Rect) {
    for y in room.y..room.y + room.height {
        for x in room.x..room.x + room.width {
            grid.set(x, y, Tile::Floor);
        }
    }
}

/// Carve an L-shaped corridor of floor between two points: one horizontal
/// run and one vertical run, never diagonal. The run order is chosen at
/// random so corridors across a dungeon do not all bend the same way.
/// Re-carving floor is a no-op, and runs clip at the grid edge.
pub fn carve_corridor(grid: &mut Grid, p1: (i32, i32), p2: (i32, i32), rng: &mut impl Rng) {
    let (x1, y1) = p1;
    let (x2, y2) = p2;

    if rng.gen_bool(0.5) {
        carve_h_run(grid, x1, x2, y1);
        carve_v_run(grid, y1, y2, x2);
    } else {
        carve_v_run(grid, y1, y2, x1);
        carve_h_run(grid, x1, x2, y2);
    }
}

fn carve_h_run(grid: &mut Grid, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        grid.set(x, y, Tile::Floor);
    }
}

fn carve_v_run(grid: &mut Grid, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        grid.set(x, y, Tile::Floor);
    }
}

/// Incremental nearest-neighbor connection state: room centers plus a
/// connected flag per room. Room 0 seeds the connected set.
struct ConnectState {
    centers: Vec<(i32, i32)>,
    connected: Vec<bool>,
}

impl ConnectState {
    fn new(rooms: &[Rect]) -> Self {
        let centers = rooms.iter().map(|room| room.center()).collect();
        let mut connected = vec![false; rooms.len()];
        connected[0] = true;
        Self { centers, connected }
    }

    /// The closest (connected, unconnected) pair by Manhattan distance
    /// between room centers. Ties go to the first pair found in index order.
    fn nearest_edge(&self) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize, i32)> = None;

        for a in 0..self.centers.len() {
            if !self.connected[a] {
                continue;
            }
            for b in 0..self.centers.len() {
                if self.connected[b] {
                    continue;
                }
                let distance = manhattan(self.centers[a], self.centers[b]);
                if best.map_or(true, |(_, _, d)| distance < d) {
                    best = Some((a, b, distance));
                }
            }
        }

        best.map(|(a, b, _)| (a, b))
    }
}

fn manhattan(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Carve corridors until every room is reachable from room 0: a Prim-style
/// spanning tree over room centers, one corridor per selected edge, so
/// exactly `rooms.len() - 1` corridors for a non-empty room set.
pub fn connect_rooms(grid: &mut Grid, rooms: &[Rect], rng: &mut impl Rng) {
    if rooms.is_empty() {
        return;
    }

    let mut state = ConnectState::new(rooms);
    let mut corridors = 0;

    while let Some((a, b)) = state.nearest_edge() {
        carve_corridor(grid, state.centers[a], state.centers[b], rng);
        state.connected[b] = true;
        corridors += 1;
    }

    debug!("connected {} rooms with {} corridors", rooms.len(), corridors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Flood fill over walkable tiles, 4-neighbor expansion.
    fn reachable_from(grid: &Grid, start: (i32, i32)) -> HashSet<(i32, i32)> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();

        if grid.get(start.0, start.1).is_some_and(|t| t.is_walkable()) {
            seen.insert(start);
            queue.push_back(start);
        }

        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
                let next = (x + dx, y + dy);
                if seen.contains(&next) {
                    continue;
                }
                if grid.get(next.0, next.1).is_some_and(|t| t.is_walkable()) {
                    seen.insert(next);
                    queue.push_back(next);
                }
            }
        }

        seen
    }

    fn generate(seed: u64, config: &DungeonConfig) -> Dungeon {
        let _ = env_logger::builder().is_test(true).try_init();
        DungeonGenerator::generate(config, &mut rng(seed)).unwrap()
    }

    #[test]
    fn test_rooms_do_not_overlap() {
        for seed in 0..20 {
            let dungeon = generate(seed, &DungeonConfig::default());
            for (i, a) in dungeon.rooms.iter().enumerate() {
                for b in &dungeon.rooms[i + 1..] {
                    assert!(
                        !a.intersects_padded(b),
                        "seed {}: rooms {:?} and {:?} overlap\n{}",
                        seed,
                        a,
                        b,
                        dungeon.grid
                    );
                }
            }
        }
    }

    #[test]
    fn test_rooms_respect_edge_margins() {
        let config = DungeonConfig::default();
        for seed in 0..20 {
            let dungeon = generate(seed, &config);
            for room in &dungeon.rooms {
                assert!(room.x >= EDGE_MARGIN_MIN);
                assert!(room.y >= EDGE_MARGIN_MIN);
                assert!(room.x + room.width <= config.width as i32 - EDGE_MARGIN_MAX);
                assert!(room.y + room.height <= config.height as i32 - EDGE_MARGIN_MAX);
            }
        }
    }

    #[test]
    fn test_all_rooms_connected_to_first() {
        for seed in 0..20 {
            let dungeon = generate(seed, &DungeonConfig::default());
            assert!(!dungeon.rooms.is_empty());

            let reached = reachable_from(&dungeon.grid, dungeon.rooms[0].center());
            for room in &dungeon.rooms {
                assert!(
                    reached.contains(&room.center()),
                    "seed {}: room {:?} unreachable from room 0\n{}",
                    seed,
                    room,
                    dungeon.grid
                );
            }
        }
    }

    #[test]
    fn test_every_cell_is_wall_or_floor() {
        let dungeon = generate(3, &DungeonConfig::default());
        let total = dungeon.grid.count(Tile::Wall) + dungeon.grid.count(Tile::Floor);
        assert_eq!(total, dungeon.grid.width * dungeon.grid.height);
    }

    #[test]
    fn test_attempt_cap_bounds_placement() {
        let config = DungeonConfig {
            room_count: 100,
            attempt_cap: 5,
            ..Default::default()
        };
        let mut grid = Grid::new(config.width, config.height);
        let rooms = place_rooms(&mut grid, &config, &mut rng(1));
        assert!(rooms.len() <= 5);
    }

    #[test]
    fn test_zero_attempt_cap_places_nothing() {
        let config = DungeonConfig {
            attempt_cap: 0,
            ..Default::default()
        };
        let mut grid = Grid::new(config.width, config.height);
        let rooms = place_rooms(&mut grid, &config, &mut rng(1));
        assert!(rooms.is_empty());
        assert_eq!(grid.count(Tile::Floor), 0);
    }

    #[test]
    fn test_carving_a_corridor_twice_is_idempotent() {
        let mut once = Grid::new(32, 32);
        carve_corridor(&mut once, (4, 4), (20, 25), &mut rng(9));

        let mut twice = Grid::new(32, 32);
        carve_corridor(&mut twice, (4, 4), (20, 25), &mut rng(9));
        carve_corridor(&mut twice, (4, 4), (20, 25), &mut rng(9));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_corridor_clips_at_grid_edge() {
        let mut grid = Grid::new(8, 8);
        carve_corridor(&mut grid, (-5, 3), (12, 3), &mut rng(0));
        // In-bounds part of the runs is carved, nothing panics.
        assert!(grid.count(Tile::Floor) > 0);
    }

    #[test]
    fn test_corridor_visits_both_endpoints() {
        for seed in 0..4 {
            let mut grid = Grid::new(32, 32);
            carve_corridor(&mut grid, (3, 5), (17, 22), &mut rng(seed));
            assert_eq!(grid.get(3, 5), Some(Tile::Floor));
            assert_eq!(grid.get(17, 22), Some(Tile::Floor));
        }
    }

    #[test]
    fn test_connect_empty_room_set_is_noop() {
        let mut grid = Grid::new(16, 16);
        connect_rooms(&mut grid, &[], &mut rng(0));
        assert_eq!(grid.count(Tile::Floor), 0);
    }

    #[test]
    fn test_nearest_edge_prefers_closest_room() {
        let rooms = [
            Rect::new(2, 2, 4, 4),
            Rect::new(40, 40, 4, 4),
            Rect::new(10, 2, 4, 4),
        ];
        let state = ConnectState::new(&rooms);
        // Room 2 is far closer to room 0 than room 1 is.
        assert_eq!(state.nearest_edge(), Some((0, 2)));
    }

    #[test]
    fn test_generate_is_deterministic_for_fixed_seed() {
        let config = DungeonConfig::default();
        let a = generate(42, &config);
        let b = generate(42, &config);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.rooms, b.rooms);
    }

    #[test]
    fn test_generate_zero_rooms() {
        let config = DungeonConfig {
            room_count: 0,
            ..Default::default()
        };
        let dungeon = generate(5, &config);
        assert!(dungeon.rooms.is_empty());
        assert_eq!(dungeon.floor_count(), 0);
    }

    #[test]
    fn test_generate_single_room_has_no_corridors() {
        let config = DungeonConfig {
            room_count: 1,
            ..Default::default()
        };
        let dungeon = generate(5, &config);
        assert_eq!(dungeon.rooms.len(), 1);

        // All floor belongs to the one room footprint.
        let room = dungeon.rooms[0];
        assert_eq!(dungeon.floor_count(), (room.width * room.height) as usize);
    }

    #[test]
    fn test_generate_reference_configuration() {
        let config = DungeonConfig::default();
        let dungeon = generate(7, &config);
        assert!(!dungeon.rooms.is_empty());
        assert!(dungeon.rooms.len() <= config.room_count);
    }

    #[test]
    fn test_placement_on_grid_too_small_for_any_room() {
        // Too narrow for even the minimum room inside the margins; the
        // attempt cap drains with zero acceptances and no panic.
        let config = DungeonConfig::default();
        let mut grid = Grid::new(3, config.height);
        let rooms = place_rooms(&mut grid, &config, &mut rng(1));
        assert!(rooms.is_empty());
        assert_eq!(grid.count(Tile::Floor), 0);
    }

    #[test]
    fn test_generate_rejects_impossible_config() {
        let config = DungeonConfig {
            width: 3,
            ..Default::default()
        };
        let result = DungeonGenerator::generate(&config, &mut rng(1));
        assert!(matches!(result, Err(ConfigError::RoomTooLarge { .. })));
    }
}
