//! Game state and core simulation types

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::path::{PathGenerator, Tile, TileArena, seed_initial_path};
use super::rng::RandomSource;
use crate::consts::*;
use crate::theme::Theme;

/// Lifecycle status; ticks only act while `Playing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Ball parked at the origin, waiting for the first tap
    #[default]
    Start,
    /// Ball moving, path extending, score accruing
    Playing,
    /// Ball left the path; frozen until restart
    GameOver,
}

/// The player's ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec3,
    /// Unit step: forward, turn, or zero while idle
    pub velocity: Vec3,
}

impl Ball {
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, -1.0);
    pub const TURN: Vec3 = Vec3::new(1.0, 0.0, 0.0);

    pub fn moving_forward(&self) -> bool {
        self.velocity.z < 0.0
    }

    pub fn moving_laterally(&self) -> bool {
        self.velocity.x > 0.0
    }

    /// Swap between the forward and lateral directions
    pub fn turn(&mut self) {
        self.velocity = if self.velocity.z != 0.0 {
            Self::TURN
        } else {
            Self::FORWARD
        };
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }
}

/// A diamond sitting on a tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub x: f32,
    pub z: f32,
}

/// Things that happened during a tap or tick, for the controller to route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First tap of a run
    Started,
    /// Ball swapped direction
    Turned,
    /// Diamond picked up
    PickupCollected { id: u32, points: u32 },
    /// Whole-point score changed
    ScoreChanged { score: u32 },
    /// Ball left the path
    Crashed { final_score: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub ball: Ball,
    pub speed: f32,
    pub path: TileArena,
    pub generator: PathGenerator,
    pub collectibles: Vec<Collectible>,
    /// Score in hundredths of a point
    pub score_centi: u64,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_collectible_id: u32,
}

impl GameState {
    /// Fresh run: ball at origin, seeded path, zero score
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        let (path, generator) = seed_initial_path(rng);
        Self {
            status: GameStatus::Start,
            ball: Ball::default(),
            speed: START_SPEED,
            path,
            generator,
            collectibles: Vec::new(),
            score_centi: 0,
            time_ticks: 0,
            events: Vec::new(),
            next_collectible_id: 1,
        }
    }

    /// Whole points, floored
    pub fn score(&self) -> u32 {
        (self.score_centi / SCORE_SCALE) as u32
    }

    pub fn add_points(&mut self, points: u32) {
        self.score_centi += points as u64 * SCORE_SCALE;
    }

    pub fn next_collectible_id(&mut self) -> u32 {
        let id = self.next_collectible_id;
        self.next_collectible_id += 1;
        id
    }

    pub fn spawn_collectible(&mut self, tile: &Tile) -> u32 {
        let id = self.next_collectible_id();
        self.collectibles.push(Collectible {
            id,
            x: tile.x,
            z: tile.z,
        });
        id
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        let score = self.score();
        Snapshot {
            ball_position: self.ball.position,
            tiles: self.path.iter().copied().collect(),
            collectibles: self.collectibles.clone(),
            score,
            status: self.status,
            theme: Theme::index_for_score(score),
        }
    }
}

/// Read-only view handed to renderers and HUDs after each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ball_position: Vec3,
    pub tiles: Vec<Tile>,
    pub collectibles: Vec<Collectible>,
    pub score: u32,
    pub status: GameStatus,
    /// Index into `Theme::ALL`
    pub theme: usize,
}
