//! Timed obstacle generation with difficulty scaling
//!
//! Spawns happen off the right edge so pop-in is never visible. Spacing
//! tightens linearly as scroll speed approaches its cap.

use rand::Rng;

use super::state::{Obstacle, ObstacleKind};
use crate::consts::DIFFICULTY_EPSILON;
use crate::rand_range;
use crate::tuning::{PhysicsTuning, SpawnTuning};

/// Multiplier in (0, 1] applied to the spawn interval bounds
pub fn difficulty_factor(speed: f32, physics: &PhysicsTuning) -> f32 {
    let span = physics.speed_cap - physics.initial_speed + DIFFICULTY_EPSILON;
    1.0 - (speed - physics.initial_speed) / span
}

/// Seconds until the next spawn at the given speed
pub fn next_interval<R: Rng + ?Sized>(
    rng: &mut R,
    speed: f32,
    physics: &PhysicsTuning,
    spawn: &SpawnTuning,
) -> f32 {
    let factor = difficulty_factor(speed, physics);
    rand_range(rng, spawn.interval_min * factor, spawn.interval_max * factor)
}

/// Roll a new obstacle just past the right edge of the viewport
pub fn spawn_obstacle<R: Rng + ?Sized>(
    rng: &mut R,
    viewport_width: f32,
    spawn: &SpawnTuning,
) -> Obstacle {
    let kind = if rng.random::<f32>() < spawn.low_chance {
        ObstacleKind::Low
    } else {
        ObstacleKind::High
    };
    let width = rand_range(rng, spawn.width.0, spawn.width.1);
    let (height, y_offset) = match kind {
        ObstacleKind::Low => (
            rand_range(rng, spawn.low_height.0, spawn.low_height.1),
            rand_range(rng, spawn.low_offset.0, spawn.low_offset.1),
        ),
        ObstacleKind::High => (rand_range(rng, spawn.high_height.0, spawn.high_height.1), 0.0),
    };
    let x = viewport_width + rand_range(rng, spawn.lead.0, spawn.lead.1);

    Obstacle {
        kind,
        x,
        width,
        height,
        y_offset,
    }
}

/// Count the timer down and spawn when it expires
///
/// Returns the new obstacle (if any) and the timer value to store.
pub fn maybe_spawn<R: Rng + ?Sized>(
    rng: &mut R,
    timer: f32,
    dt: f32,
    speed: f32,
    viewport_width: f32,
    physics: &PhysicsTuning,
    spawn: &SpawnTuning,
) -> (Option<Obstacle>, f32) {
    let timer = timer - dt;
    if timer > 0.0 {
        return (None, timer);
    }
    let obstacle = spawn_obstacle(rng, viewport_width, spawn);
    let next = next_interval(rng, speed, physics, spawn);
    log::debug!(
        "Spawned {:?} obstacle at x={:.0}, next in {:.2}s",
        obstacle.kind,
        obstacle.x,
        next
    );
    (Some(obstacle), next)
}
