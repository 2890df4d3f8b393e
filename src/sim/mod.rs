//! Simulation module
//!
//! All gameplay logic lives here. It has no rendering, audio or network
//! dependencies:
//! - Randomness only through `RandomSource`
//! - Tiles and collectibles keep generation order (by id)
//! - Side effects leave as `GameEvent`s for the controller to route

pub mod autopilot;
pub mod collision;
pub mod path;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{find_collectible, is_on_path};
pub use path::{Direction, GeneratorState, PathGenerator, Tile, TileArena, next_tile};
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use state::{Ball, Collectible, GameEvent, GameState, GameStatus, Snapshot};
pub use tick::{tap, tick};
