//! Zig Zag - a tap-to-turn ball arcade game
//!
//! Core modules:
//! - `sim`: Simulation (path generation, collisions, scoring, tick)
//! - `controller`: Game lifecycle and event routing to collaborators
//! - `report`: Pickup report queue and worker
//! - `ledger`: Mocked score ledger client
//! - `audio`: Sound cues
//! - `settings`: Configuration
//! - `theme`: Score-based colour palettes

pub mod audio;
pub mod controller;
pub mod ledger;
pub mod report;
pub mod settings;
pub mod sim;
pub mod theme;

pub use controller::{ControllerError, GameController};
pub use settings::Settings;
pub use theme::Theme;

/// Game configuration constants
pub mod consts {
    /// Grid unit for every path offset
    pub const TILE_SIZE: f32 = 2.2;

    /// Ball speed at the start of a run
    pub const START_SPEED: f32 = 0.12;
    /// Speed cap for the difficulty ramp
    pub const MAX_SPEED: f32 = 0.22;
    /// Speed added every tick
    pub const SPEED_RAMP: f32 = 0.000008;
    /// Converts speed into world units per second
    pub const SPEED_SCALE: f32 = TILE_SIZE * 50.0;

    /// Largest frame delta fed into a single tick
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Score at which runs get shorter
    pub const LEVEL_THRESHOLD: u32 = 50;

    /// Straight tiles laid before the first generated tile
    pub const INITIAL_STRAIGHT_TILES: usize = 25;
    /// Generated tiles appended to the straight run on (re)start
    pub const INITIAL_GENERATED_TILES: usize = 80;
    /// Run countdown the generator starts from
    pub const INITIAL_RUN_LENGTH: u32 = 8;

    /// Path is pruned once it holds more than this many tiles...
    pub const MAX_PATH_LEN: usize = 150;
    /// ...down to this many of the most recent ones
    pub const PRUNED_PATH_LEN: usize = 100;

    /// Generation keeps the tail within this distance of the ball
    pub const LOOKAHEAD_DISTANCE: f32 = 60.0 * TILE_SIZE;
    /// Tiles further than this (and behind the ball) start falling
    pub const FALL_DISTANCE: f32 = 2.5 * TILE_SIZE;

    /// Per-axis tolerance for standing on a tile
    pub const TILE_TOLERANCE: f32 = 0.6 * TILE_SIZE;
    /// Per-axis tolerance for collecting a diamond (absolute units)
    pub const PICKUP_TOLERANCE: f32 = 1.0;
    /// Percent chance that a new tile carries a diamond
    pub const COLLECTIBLE_CHANCE_PERCENT: u32 = 30;

    /// Score is tracked in hundredths of a point
    pub const SCORE_SCALE: u64 = 100;
    /// Passive score per tick (0.05 points)
    pub const PASSIVE_SCORE_CENTI: u64 = 5;
    /// Points awarded per diamond
    pub const PICKUP_BONUS: u32 = 5;
}
