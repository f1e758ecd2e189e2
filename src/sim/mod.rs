//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Caller-supplied, clamped timesteps only
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, any_collision, first_collision};
pub use snapshot::RenderSnapshot;
pub use spawn::{difficulty_factor, maybe_spawn, spawn_obstacle};
pub use state::{GamePhase, GameState, Obstacle, ObstacleKind, Player, Star, Viewport};
pub use tick::{TickInput, advance_clock, autopilot, tick};
