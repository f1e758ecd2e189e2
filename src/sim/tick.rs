//! Per-frame simulation tick
//!
//! Advances score, speed, spawning, player physics, obstacle scrolling and the
//! star field, then checks for collisions. A collision ends the run and every
//! later tick is a no-op.

use super::collision::first_collision;
use super::spawn::maybe_spawn;
use super::state::{GamePhase, GameState, ObstacleKind};
use crate::consts::*;
use crate::tuning::{PhysicsTuning, Tuning};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump request; consumed this tick whether or not it takes effect
    pub jump: bool,
    /// Crouch held
    pub crouch: bool,
    /// Demo mode - the autopilot plays the game
    pub autopilot: bool,
}

/// Accumulate score and ramp scroll speed toward its cap
pub fn advance_clock(state: &mut GameState, physics: &PhysicsTuning, dt: f32) {
    state.score += dt * physics.score_rate;
    state.speed = (state.speed + physics.speed_increase * dt * TUNED_FPS).min(physics.speed_cap);
}

/// Advance the game state by `dt` seconds (already clamped by the caller)
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    // Nothing moves outside a running session
    if state.phase != GamePhase::Running {
        return;
    }

    let input = if input.autopilot {
        autopilot(state, tuning)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    let scale = dt * TUNED_FPS;

    advance_clock(state, &tuning.physics, dt);

    let (spawned, timer) = maybe_spawn(
        &mut state.rng,
        state.spawn_timer,
        dt,
        state.speed,
        state.viewport.width,
        &tuning.physics,
        &tuning.spawn,
    );
    state.spawn_timer = timer;
    if let Some(obstacle) = spawned {
        state.obstacles.push(obstacle);
    }

    state.player.step(
        input.jump,
        input.crouch,
        tuning.physics.gravity,
        tuning.physics.jump_velocity,
        scale,
    );

    let shift = state.speed * scale;
    for obstacle in &mut state.obstacles {
        obstacle.x -= shift;
    }
    state.obstacles.retain(|o| !o.is_offscreen());

    let drift = state.speed * 0.08 * scale;
    let viewport = state.viewport;
    for star in &mut state.stars {
        star.drift(drift, &mut state.rng, viewport);
    }

    let ground_y = state.ground_y(tuning);
    if let Some(index) = first_collision(&state.player, &tuning.player, &state.obstacles, ground_y)
    {
        state.phase = GamePhase::Ended;
        log::info!(
            "Collision with {:?} obstacle, final score {}",
            state.obstacles[index].kind,
            state.display_score()
        );
    }
}

/// Frames of lead before a high obstacle reaches the player
const JUMP_LEAD_FRAMES: f32 = 6.0;
/// Frames of lead before crouching for a low obstacle
const CROUCH_LEAD_FRAMES: f32 = 12.0;

/// Demo mode: jump over high obstacles, crouch under low ones
pub fn autopilot(state: &GameState, tuning: &Tuning) -> TickInput {
    let player_left = tuning.player.x;
    let player_right = player_left + tuning.player.width;

    // Nearest obstacle not yet fully behind the player
    let Some(next) = state
        .obstacles
        .iter()
        .filter(|o| o.x + o.width > player_left)
        .min_by(|a, b| a.x.total_cmp(&b.x))
    else {
        return TickInput {
            autopilot: true,
            ..Default::default()
        };
    };

    let gap = next.x - player_right;
    let mut input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    match next.kind {
        ObstacleKind::High => {
            input.jump = gap > 0.0 && gap <= state.speed * JUMP_LEAD_FRAMES;
        }
        ObstacleKind::Low => {
            input.crouch = gap <= state.speed * CROUCH_LEAD_FRAMES;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, Viewport};

    const DT: f32 = 1.0 / 60.0;

    fn running_state(seed: u64) -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(seed, &tuning, Viewport::new(1000.0, 600.0));
        state.reset(&tuning);
        (state, tuning)
    }

    #[test]
    fn test_idle_state_does_not_tick() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning, Viewport::default());
        tick(&mut state, &TickInput::default(), &tuning, DT);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_speed_caps_after_a_minute() {
        let (mut state, tuning) = running_state(5);
        for _ in 0..3600 {
            advance_clock(&mut state, &tuning.physics, DT);
        }
        assert_eq!(state.speed, 11.5);
        assert!((state.score - 600.0).abs() < 0.5);
    }

    #[test]
    fn test_speed_ramp_is_monotonic() {
        let (mut state, tuning) = running_state(5);
        let mut last = state.speed;
        for _ in 0..120 {
            advance_clock(&mut state, &tuning.physics, DT);
            assert!(state.speed >= last);
            last = state.speed;
        }
        assert!((state.speed - (5.0 + 0.0025 * 120.0)).abs() < 1e-3);
    }

    #[test]
    fn test_obstacles_scroll_and_prune() {
        let (mut state, tuning) = running_state(9);
        state.spawn_timer = 100.0;
        state.speed = 5.0;
        state.obstacles.push(Obstacle {
            kind: ObstacleKind::High,
            x: -77.0,
            width: 40.0,
            height: 50.0,
            y_offset: 0.0,
        });
        state.obstacles.push(Obstacle {
            kind: ObstacleKind::High,
            x: 800.0,
            width: 40.0,
            height: 50.0,
            y_offset: 0.0,
        });
        tick(&mut state, &TickInput::default(), &tuning, DT);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.obstacles[0].x < 800.0);
    }

    #[test]
    fn test_collision_freezes_the_world() {
        let (mut state, tuning) = running_state(11);
        state.spawn_timer = 100.0;
        state.obstacles.push(Obstacle {
            kind: ObstacleKind::High,
            x: tuning.player.x + 10.0,
            width: 40.0,
            height: 60.0,
            y_offset: 0.0,
        });
        tick(&mut state, &TickInput::default(), &tuning, DT);
        assert_eq!(state.phase, GamePhase::Ended);

        let frozen: Vec<f32> = state.obstacles.iter().map(|o| o.x).collect();
        let score = state.score;
        tick(&mut state, &TickInput::default(), &tuning, DT);
        let after: Vec<f32> = state.obstacles.iter().map(|o| o.x).collect();
        assert_eq!(frozen, after);
        assert_eq!(score, state.score);
    }

    #[test]
    fn test_spawn_timer_produces_obstacle() {
        let (mut state, tuning) = running_state(13);
        state.spawn_timer = DT / 2.0;
        tick(&mut state, &TickInput::default(), &tuning, DT);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.obstacles[0].x > 1000.0 - state.speed);
        assert!(state.spawn_timer > 0.0);
    }

    #[test]
    fn test_autopilot_jumps_and_crouches() {
        let (mut state, tuning) = running_state(17);
        let right = tuning.player.x + tuning.player.width;
        state.obstacles.push(Obstacle {
            kind: ObstacleKind::High,
            x: right + 10.0,
            width: 40.0,
            height: 60.0,
            y_offset: 0.0,
        });
        assert!(autopilot(&state, &tuning).jump);

        state.obstacles[0].kind = ObstacleKind::Low;
        let input = autopilot(&state, &tuning);
        assert!(input.crouch);
        assert!(!input.jump);

        state.obstacles.clear();
        assert_eq!(
            autopilot(&state, &tuning),
            TickInput {
                autopilot: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_determinism() {
        let (mut a, tuning) = running_state(99999);
        let (mut b, _) = running_state(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input, &tuning, DT);
            tick(&mut b, &input, &tuning, DT);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.y, b.player.y);
    }
}
