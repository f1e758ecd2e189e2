//! Hand Dash - An endless runner played with the keyboard or hand gestures
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `gesture`: Hand keypoint classification and debouncing
//! - `game`: Frame-driven orchestrator tying input, gestures and simulation together
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Camera acquisition and detector frame sources
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod gesture;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::{ControlMode, FrameOutcome, Game, KeyEvent};
pub use highscores::SessionScores;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Largest simulation step per frame (seconds); hitches beyond this are dropped
    pub const MAX_FRAME_DT: f32 = 0.033;
    /// Frame rate the physics constants were tuned at
    pub const TUNED_FPS: f32 = 60.0;

    /// Default viewport used before the host reports a real size
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

    /// Obstacles are pruned once their right edge passes this far left of the screen
    pub const DESPAWN_MARGIN: f32 = 40.0;
    /// Guards the difficulty factor denominator when speed reaches the cap
    pub const DIFFICULTY_EPSILON: f32 = 0.01;

    /// One star per this many horizontal pixels
    pub const STAR_SPACING: f32 = 20.0;

    /// Rolling window of raw gesture samples
    pub const GESTURE_WINDOW: usize = 10;
    /// Number of keypoints delivered by the hand detector
    pub const HAND_LANDMARKS: usize = 21;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Uniform sample in `[min, max)`; returns `min` when the range is empty
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}
