//! Read-only view of the simulation for renderers

use super::collision::Aabb;
use super::state::{GameState, Obstacle, ObstacleKind, Star, Viewport};
use crate::tuning::Tuning;

/// Everything a renderer needs for one frame, borrowed from [`GameState`]
#[derive(Debug, Clone, Copy)]
pub struct RenderSnapshot<'a> {
    pub viewport: Viewport,
    pub ground_y: f32,
    pub ground_height: f32,
    pub player: Aabb,
    pub crouching: bool,
    pub obstacles: &'a [Obstacle],
    pub stars: &'a [Star],
    pub score: u64,
}

impl<'a> RenderSnapshot<'a> {
    pub fn capture(state: &'a GameState, tuning: &Tuning) -> Self {
        let ground_y = state.ground_y(tuning);
        Self {
            viewport: state.viewport,
            ground_y,
            ground_height: tuning.physics.ground_height,
            player: state.player.hitbox(&tuning.player, ground_y),
            crouching: state.player.crouching,
            obstacles: &state.obstacles,
            stars: &state.stars,
            score: state.display_score(),
        }
    }

    /// Obstacle hitboxes with their kinds, in spawn order
    pub fn obstacle_boxes(&self) -> impl Iterator<Item = (ObstacleKind, Aabb)> + '_ {
        self.obstacles
            .iter()
            .map(|o| (o.kind, o.hitbox(self.ground_y)))
    }
}
