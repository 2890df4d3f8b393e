//! Proximity checks between the ball and the path
//!
//! Both checks are axis-aligned: a position matches when it is within the
//! tolerance on x and on z independently, not by Euclidean distance.

use glam::Vec3;

use super::path::Tile;
use super::state::Collectible;
use crate::consts::{PICKUP_TOLERANCE, TILE_TOLERANCE};

#[inline]
fn within(ax: f32, az: f32, pos: Vec3, tolerance: f32) -> bool {
    (ax - pos.x).abs() < tolerance && (az - pos.z).abs() < tolerance
}

/// Whether `pos` stands on any non-falling tile
pub fn is_on_path<'a>(pos: Vec3, tiles: impl IntoIterator<Item = &'a Tile>) -> bool {
    tiles
        .into_iter()
        .any(|t| !t.falling && within(t.x, t.z, pos, TILE_TOLERANCE))
}

/// First collectible close enough to `pos` to be picked up
pub fn find_collectible<'a>(
    pos: Vec3,
    collectibles: impl IntoIterator<Item = &'a Collectible>,
) -> Option<&'a Collectible> {
    collectibles
        .into_iter()
        .find(|c| within(c.x, c.z, pos, PICKUP_TOLERANCE))
}
