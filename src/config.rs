use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cells kept clear between a room and the west/north grid edges
pub const EDGE_MARGIN_MIN: i32 = 2;
/// Cells kept clear between a room and the east/south grid edges
pub const EDGE_MARGIN_MAX: i32 = 3;

/// Default dungeon width
pub const DUNGEON_DEFAULT_WIDTH: usize = 64;
/// Default dungeon height
pub const DUNGEON_DEFAULT_HEIGHT: usize = 64;
/// Default room width range (inclusive)
pub const DUNGEON_ROOM_WIDTH: (i32, i32) = (4, 10);
/// Default room height range (inclusive)
pub const DUNGEON_ROOM_HEIGHT: (i32, i32) = (3, 8);
/// Default number of rooms requested per floor
pub const DUNGEON_DEFAULT_ROOM_COUNT: usize = 10;
/// Candidate rooms sampled before placement gives up
pub const DUNGEON_ATTEMPT_CAP: usize = 200;

/// Generation parameters. Grid dimensions and room size bounds are fixed for
/// the duration of one generation pass; callers tweak a config and regenerate
/// rather than mutating a dungeon in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonConfig {
    /// Grid columns
    pub width: usize,
    /// Grid rows
    pub height: usize,
    /// Inclusive (min, max) room width
    pub room_width: (i32, i32),
    /// Inclusive (min, max) room height
    pub room_height: (i32, i32),
    /// Target number of rooms; fewer may be placed if attempts run out
    pub room_count: usize,
    /// Hard bound on candidate rooms sampled, accepted or not
    pub attempt_cap: usize,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: DUNGEON_DEFAULT_WIDTH,
            height: DUNGEON_DEFAULT_HEIGHT,
            room_width: DUNGEON_ROOM_WIDTH,
            room_height: DUNGEON_ROOM_HEIGHT,
            room_count: DUNGEON_DEFAULT_ROOM_COUNT,
            attempt_cap: DUNGEON_ATTEMPT_CAP,
        }
    }
}

/// Configuration that can never place a single room. Caught up front so the
/// caller gets a clear signal instead of a silently empty dungeon.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions {width}x{height} are degenerate")]
    EmptyGrid { width: usize, height: usize },
    #[error("room size range ({min}, {max}) has min greater than max")]
    InvertedRange { min: i32, max: i32 },
    #[error("room sizes must be positive, got minimum {width}x{height}")]
    NonPositiveRoomSize { width: i32, height: i32 },
    #[error("minimum room size {width}x{height} cannot fit a {grid_width}x{grid_height} grid inside the edge margins")]
    RoomTooLarge {
        width: i32,
        height: i32,
        grid_width: usize,
        grid_height: usize,
    },
}

impl DungeonConfig {
    /// Reject geometry under which no room candidate can ever be accepted.
    /// Configs that are merely unlikely to fill (tiny grid, huge room count)
    /// still pass; those degrade through the attempt cap instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        for (min, max) in [self.room_width, self.room_height] {
            if min > max {
                return Err(ConfigError::InvertedRange { min, max });
            }
        }
        if self.room_width.0 <= 0 || self.room_height.0 <= 0 {
            return Err(ConfigError::NonPositiveRoomSize {
                width: self.room_width.0,
                height: self.room_height.0,
            });
        }

        // The smallest room must admit at least one in-margin position:
        // x in [EDGE_MARGIN_MIN, width - EDGE_MARGIN_MAX - room_width].
        let max_x = self.width as i32 - EDGE_MARGIN_MAX - self.room_width.0;
        let max_y = self.height as i32 - EDGE_MARGIN_MAX - self.room_height.0;
        if max_x < EDGE_MARGIN_MIN || max_y < EDGE_MARGIN_MIN {
            return Err(ConfigError::RoomTooLarge {
                width: self.room_width.0,
                height: self.room_height.0,
                grid_width: self.width,
                grid_height: self.height,
            });
        }

        Ok(())
    }
}
