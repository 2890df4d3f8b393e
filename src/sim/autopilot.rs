//! Idle/demo mode player
//!
//! Taps on a corner tile once the next step would carry the ball further
//! from its center than it is now. The lateral offset after a turn is then
//! at most half a step.

use super::path::Tile;
use super::state::{GameState, GameStatus};
use super::tick::next_speed;
use crate::consts::SPEED_SCALE;

/// Non-falling tile nearest to the ball (per-axis distance)
fn current_tile(state: &GameState) -> Option<&Tile> {
    let pos = state.ball.position;
    state
        .path
        .iter()
        .filter(|t| !t.falling)
        .map(|t| (t, (t.x - pos.x).abs().max((t.z - pos.z).abs())))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(t, _)| t)
}

/// Whether the autopilot wants to tap before a tick of `dt` seconds
pub fn should_tap(state: &GameState, dt: f32) -> bool {
    match state.status {
        GameStatus::Start => true,
        GameStatus::GameOver => false,
        GameStatus::Playing => {
            let Some(current) = current_tile(state) else {
                return false;
            };
            let Some(next) = state.path.get(current.id + 1) else {
                return false;
            };
            let pos = state.ball.position;
            let half_step = next_speed(state.speed) * SPEED_SCALE * dt / 2.0;
            let next_is_lateral = next.x > current.x;

            if state.ball.moving_forward() {
                next_is_lateral && pos.z - current.z <= half_step
            } else if state.ball.moving_laterally() {
                !next_is_lateral && current.x - pos.x <= half_step
            } else {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_FRAME_DT, MAX_PATH_LEN, MAX_SPEED, SCORE_SCALE};
    use crate::sim::rng::PcgSource;
    use crate::sim::tick::{tap, tick};
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn run(seed: u64, ticks: u32, frame_dt: impl Fn(u32) -> f32) -> GameState {
        let mut rng = PcgSource::new(seed);
        let mut state = GameState::new(&mut rng);
        for i in 0..ticks {
            let dt = frame_dt(i);
            if should_tap(&state, dt) {
                tap(&mut state);
            }
            tick(&mut state, &mut rng, dt);
            state.events.clear();
            assert_eq!(
                state.status,
                GameStatus::Playing,
                "crashed at tick {}",
                state.time_ticks
            );
            assert!(state.path.len() <= MAX_PATH_LEN);
        }
        state
    }

    #[test]
    fn test_autopilot_starts_run() {
        let mut rng = PcgSource::new(1);
        let state = GameState::new(&mut rng);
        assert!(should_tap(&state, DT));
    }

    #[test]
    fn test_autopilot_holds_on_straight() {
        let mut rng = PcgSource::new(1);
        let mut state = GameState::new(&mut rng);
        tap(&mut state);
        for _ in 0..30 {
            assert!(!should_tap(&state, DT));
            tick(&mut state, &mut rng, DT);
        }
    }

    #[test]
    fn test_long_frame_taps_before_center() {
        let mut rng = PcgSource::new(1);
        let mut state = GameState::new(&mut rng);
        tap(&mut state);
        state.speed = MAX_SPEED;

        // The first corner always follows seven generated forward tiles
        let corner = *state.path.get(31).unwrap();
        assert!(state.path.get(32).is_some_and(|t| t.x > corner.x));
        state.ball.position = Vec3::new(corner.x, 0.0, corner.z + 1.0);

        assert!(!should_tap(&state, DT));
        assert!(should_tap(&state, MAX_FRAME_DT));
    }

    #[test]
    fn test_autopilot_survives_long_runs() {
        for seed in [1, 42, 9001] {
            let state = run(seed, 6000, |_| DT);
            // Passive score alone is 0.05 per tick
            assert!(state.score_centi >= 6000 * 5);
            assert!(state.score() as u64 >= 6000 * 5 / SCORE_SCALE);
            assert!(state.path.head().is_some_and(|t| t.id > 0));
        }
    }

    #[test]
    fn test_autopilot_survives_stalled_frames() {
        // Every 20th frame hits the clamp
        let frame_dt = |i: u32| if i % 20 == 0 { MAX_FRAME_DT } else { DT };
        for seed in [1, 42, 9001] {
            run(seed, 3000, frame_dt);
        }
    }
}
