//! Procedural dungeon generation on a 2-D tile grid.
//!
//! One generation pass fills a wall-only grid with non-overlapping
//! rectangular rooms (rejection sampling under an attempt cap), then carves
//! L-shaped corridors along a Prim-style spanning tree over room centers so
//! every room is reachable from the first. Randomness is injected as a
//! `rand::Rng`, so a seeded generator reproduces a layout exactly.
//!
//! ```
//! use grid_dungeon::{DungeonConfig, DungeonGenerator};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let dungeon = DungeonGenerator::generate(&DungeonConfig::default(), &mut rng).unwrap();
//! assert!(!dungeon.rooms.is_empty());
//! ```

pub mod config;
pub mod dungeon_gen;
pub mod grid;
pub mod room;
pub mod tile;

pub use config::{ConfigError, DungeonConfig};
pub use dungeon_gen::{carve_corridor, connect_rooms, place_rooms, Dungeon, DungeonGenerator};
pub use grid::Grid;
pub use room::Rect;
pub use tile::Tile;
