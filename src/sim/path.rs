//! Procedural tile path
//!
//! The path is an unbounded snake of square tiles. It alternates between
//! runs along the forward axis (z decreasing) and runs along the lateral
//! axis (x increasing). Run lengths shrink once the score passes
//! `LEVEL_THRESHOLD`, so turns come faster.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::consts::*;

/// Axis the generator is currently laying tiles along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Along -z
    #[default]
    Forward,
    /// Along +x
    Turn,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Turn,
            Direction::Turn => Direction::Forward,
        }
    }
}

/// A single path tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    pub x: f32,
    pub z: f32,
    /// Retired from collision; stays in the arena until pruned
    pub falling: bool,
}

impl Tile {
    pub fn new(id: u32, x: f32, z: f32) -> Self {
        Self {
            id,
            x,
            z,
            falling: false,
        }
    }

    /// World-space center on the ground plane
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    /// Ground-plane distance to a world position (y ignored)
    pub fn distance_to(&self, pos: Vec3) -> f32 {
        let dx = self.x - pos.x;
        let dz = self.z - pos.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Generator bookkeeping carried between calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorState {
    pub direction: Direction,
    /// Tiles left in the current run (counted down before each tile)
    pub remaining_run: u32,
    /// Score seen by the most recent call
    pub elapsed_score: u32,
    /// Id handed to the next generated tile
    pub next_tile_id: u32,
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self {
            direction: Direction::Forward,
            remaining_run: INITIAL_RUN_LENGTH,
            elapsed_score: 0,
            next_tile_id: INITIAL_STRAIGHT_TILES as u32,
        }
    }
}

/// Inclusive run-length range for a given score
pub fn run_length_range(score: u32) -> (u32, u32) {
    if score < LEVEL_THRESHOLD {
        (4, 9)
    } else {
        (2, 7)
    }
}

/// Compute the tile following `last`.
///
/// Pure apart from the single draw taken from `rng` when a run ends.
pub fn next_tile(
    last: &Tile,
    state: &GeneratorState,
    score: u32,
    rng: &mut dyn RandomSource,
) -> (Tile, GeneratorState) {
    let mut next = *state;
    next.elapsed_score = score;
    next.remaining_run = next.remaining_run.saturating_sub(1);

    if next.remaining_run == 0 {
        let (lo, hi) = run_length_range(score);
        next.direction = next.direction.flipped();
        next.remaining_run = rng.next_in_range(lo, hi);
    }

    let (x, z) = match next.direction {
        Direction::Forward => (last.x, last.z - TILE_SIZE),
        Direction::Turn => (last.x + TILE_SIZE, last.z),
    };

    let tile = Tile::new(next.next_tile_id, x, z);
    next.next_tile_id += 1;

    (tile, next)
}

/// Stateful wrapper around `next_tile`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathGenerator {
    state: GeneratorState,
}

impl PathGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    pub fn generate_next(&mut self, last: &Tile, score: u32, rng: &mut dyn RandomSource) -> Tile {
        let (tile, state) = next_tile(last, &self.state, score, rng);
        self.state = state;
        tile
    }
}

/// Tiles in generation order, addressable by id.
///
/// Ids in the arena are always consecutive, so an id maps to an offset
/// from the head tile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileArena {
    tiles: VecDeque<Tile>,
}

impl TileArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Append at the tail
    pub fn push(&mut self, tile: Tile) {
        debug_assert!(
            self.tiles.back().is_none_or(|t| t.id + 1 == tile.id),
            "tile ids must stay consecutive"
        );
        self.tiles.push_back(tile);
    }

    /// Most recently generated tile
    pub fn tail(&self) -> Option<&Tile> {
        self.tiles.back()
    }

    pub fn head(&self) -> Option<&Tile> {
        self.tiles.front()
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        let head = self.tiles.front()?.id;
        let offset = id.checked_sub(head)? as usize;
        (offset < self.tiles.len()).then_some(offset)
    }

    pub fn get(&self, id: u32) -> Option<&Tile> {
        self.index_of(id).and_then(|i| self.tiles.get(i))
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Tile> {
        self.index_of(id).and_then(|i| self.tiles.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Drop head tiles so that at most `keep` remain, once the arena holds
    /// more than `max`. Returns the number of tiles dropped.
    pub fn prune(&mut self, max: usize, keep: usize) -> usize {
        if self.tiles.len() <= max {
            return 0;
        }
        let excess = self.tiles.len() - keep;
        self.tiles.drain(..excess);
        excess
    }
}

/// Lay the opening straight run and the generated lookahead buffer.
pub fn seed_initial_path(rng: &mut dyn RandomSource) -> (TileArena, PathGenerator) {
    let mut arena = TileArena::new();
    for i in 0..INITIAL_STRAIGHT_TILES {
        arena.push(Tile::new(i as u32, 0.0, -(i as f32 * TILE_SIZE)));
    }

    let mut generator = PathGenerator::new();
    let mut last = arena.tail().copied().unwrap_or(Tile::new(0, 0.0, 0.0));
    for _ in 0..INITIAL_GENERATED_TILES {
        last = generator.generate_next(&last, 0, rng);
        arena.push(last);
    }

    (arena, generator)
}
