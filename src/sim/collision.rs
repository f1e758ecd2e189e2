//! Axis-aligned box collision between the player and obstacles
//!
//! Obstacle counts stay in the single digits, so a linear scan is enough.

use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Player};
use crate::tuning::PlayerTuning;

/// Axis-aligned bounding box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap on both axes; shared edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Index of the first obstacle the player overlaps
pub fn first_collision(
    player: &Player,
    dims: &PlayerTuning,
    obstacles: &[Obstacle],
    ground_y: f32,
) -> Option<usize> {
    let player_box = player.hitbox(dims, ground_y);
    obstacles
        .iter()
        .position(|obs| player_box.overlaps(&obs.hitbox(ground_y)))
}

/// True if the player overlaps any obstacle
pub fn any_collision(
    player: &Player,
    dims: &PlayerTuning,
    obstacles: &[Obstacle],
    ground_y: f32,
) -> bool {
    first_collision(player, dims, obstacles, ground_y).is_some()
}
