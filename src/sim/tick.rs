//! Per-frame simulation tick
//!
//! Driven by the host's frame callback. The tick never waits on anything;
//! side effects leave as events on `GameState::events`.

use super::collision::{find_collectible, is_on_path};
use super::rng::RandomSource;
use super::state::{Ball, GameEvent, GameState, GameStatus};
use crate::consts::*;

/// Player input: start the run, or turn the ball 90°.
///
/// Turning is never rejected. A badly timed turn is punished by the next
/// tick's on-path check.
pub fn tap(state: &mut GameState) {
    match state.status {
        GameStatus::Start => {
            state.ball.velocity = Ball::FORWARD;
            state.status = GameStatus::Playing;
            state.events.push(GameEvent::Started);
        }
        GameStatus::Playing => {
            state.ball.turn();
            state.events.push(GameEvent::Turned);
        }
        GameStatus::GameOver => {}
    }
}

/// Speed after the next tick's ramp
pub fn next_speed(speed: f32) -> f32 {
    (speed + SPEED_RAMP).min(MAX_SPEED)
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, rng: &mut dyn RandomSource, dt: f32) {
    if state.status != GameStatus::Playing {
        return;
    }

    state.time_ticks += 1;
    state.speed = next_speed(state.speed);

    let step = state.speed * SPEED_SCALE * dt;
    let pos = state.ball.position + state.ball.velocity * step;
    state.ball.position = pos;

    if !is_on_path(pos, state.path.iter()) {
        let final_score = state.score();
        log::info!(
            "Ball left the path at ({:.2}, {:.2}) after {} ticks, score {}",
            pos.x,
            pos.z,
            state.time_ticks,
            final_score
        );
        state.status = GameStatus::GameOver;
        state.events.push(GameEvent::Crashed { final_score });
        return;
    }

    // Retire tiles the ball has left behind
    let forward = state.ball.moving_forward();
    let lateral = state.ball.moving_laterally();
    for tile in state.path.iter_mut() {
        if tile.falling || tile.distance_to(pos) <= FALL_DISTANCE {
            continue;
        }
        let behind =
            (forward && tile.z > pos.z + TILE_SIZE) || (lateral && tile.x < pos.x - TILE_SIZE);
        if behind {
            tile.falling = true;
        }
    }

    // Keep the path ahead of the ball
    let Some(tail) = state.path.tail().copied() else {
        debug_assert!(false, "tile path emptied while playing");
        log::error!("Tile path emptied while playing");
        return;
    };
    if tail.distance_to(pos) < LOOKAHEAD_DISTANCE {
        let score = state.score();
        let tile = state.generator.generate_next(&tail, score, rng);
        state.path.push(tile);
        if rng.next_in_range(0, 99) < COLLECTIBLE_CHANCE_PERCENT {
            state.spawn_collectible(&tile);
        }
    }

    let pruned = state.path.prune(MAX_PATH_LEN, PRUNED_PATH_LEN);
    if pruned > 0 {
        log::debug!("Pruned {} tiles, {} remain", pruned, state.path.len());
    }

    let before = state.score();

    if let Some(id) = find_collectible(pos, &state.collectibles).map(|c| c.id) {
        state.collectibles.retain(|c| c.id != id);
        state.add_points(PICKUP_BONUS);
        state.events.push(GameEvent::PickupCollected {
            id,
            points: PICKUP_BONUS,
        });
    }

    state.score_centi += PASSIVE_SCORE_CENTI;

    let after = state.score();
    if after != before {
        state.events.push(GameEvent::ScoreChanged { score: after });
    }
}
