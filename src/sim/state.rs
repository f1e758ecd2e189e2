//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; there are no
//! globals, so a session can be simulated without a DOM or render surface.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::rand_range;
use crate::tuning::{PlayerTuning, Tuning};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the start screen
    Idle,
    /// Active gameplay
    Running,
    /// Player hit an obstacle
    Ended,
}

/// Visible area in CSS pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen y of the ground line
    #[inline]
    pub fn ground_y(&self, ground_height: f32) -> f32 {
        self.height - ground_height
    }
}

/// Player kinematics
///
/// `y` is the height above the ground line and never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub y: f32,
    pub vy: f32,
    pub on_ground: bool,
    pub crouching: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            y: 0.0,
            vy: 0.0,
            on_ground: true,
            crouching: false,
        }
    }
}

impl Player {
    /// Integrate one step. `scale` is `dt * 60`.
    ///
    /// A jump request is only honored on the ground; airborne requests are
    /// dropped. Crouch can only start on the ground but is released anywhere.
    pub fn step(&mut self, jump: bool, crouch: bool, gravity: f32, jump_velocity: f32, scale: f32) {
        if crouch && self.on_ground {
            self.crouching = true;
        } else if !crouch {
            self.crouching = false;
        }

        if jump && self.on_ground {
            self.vy = jump_velocity;
            self.on_ground = false;
        }

        self.vy -= gravity * scale;
        self.y += self.vy * scale;

        // A jump taken on a zero-length step is still rising
        if self.y <= 0.0 && self.vy <= 0.0 {
            self.y = 0.0;
            self.vy = 0.0;
            self.on_ground = true;
        }
    }

    /// Current hitbox height
    #[inline]
    pub fn height(&self, dims: &PlayerTuning) -> f32 {
        if self.crouching {
            dims.crouch_height
        } else {
            dims.height
        }
    }

    /// Screen-space hitbox
    pub fn hitbox(&self, dims: &PlayerTuning, ground_y: f32) -> Aabb {
        let h = self.height(dims);
        Aabb::new(dims.x, ground_y - h - self.y, dims.width, h)
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Short and elevated: crouch under it
    Low,
    /// Tall and grounded: jump over it
    High,
}

/// A scrolling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Left edge in screen space
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Gap between the ground line and the obstacle's bottom edge
    pub y_offset: f32,
}

impl Obstacle {
    /// Screen-space hitbox
    pub fn hitbox(&self, ground_y: f32) -> Aabb {
        Aabb::new(
            self.x,
            ground_y - self.height - self.y_offset,
            self.width,
            self.height,
        )
    }

    /// True once the right edge has passed the despawn margin
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.x + self.width <= -DESPAWN_MARGIN
    }
}

/// Background star (decoration only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Parallax factor
    pub speed: f32,
}

impl Star {
    fn random(rng: &mut Pcg32, viewport: Viewport) -> Self {
        Self {
            x: rand_range(rng, 0.0, viewport.width),
            y: rand_range(rng, 0.0, viewport.height * 0.5),
            radius: rand_range(rng, 0.5, 2.0),
            speed: rand_range(rng, 0.2, 0.6),
        }
    }

    /// Drift left; wrap to just past the right edge once off screen
    pub fn drift(&mut self, amount: f32, rng: &mut Pcg32, viewport: Viewport) {
        self.x -= amount * self.speed;
        if self.x < -10.0 {
            self.x = viewport.width + rand_range(rng, 0.0, 40.0);
            self.y = rand_range(rng, 0.0, viewport.height * 0.55);
        }
    }
}

/// Complete session state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Continuous score accumulator
    pub score: f32,
    /// Scroll speed (px per 60 Hz frame)
    pub speed: f32,
    /// Seconds until the next spawn
    pub spawn_timer: f32,
    pub player: Player,
    /// Obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub stars: Vec<Star>,
    pub viewport: Viewport,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create an idle state; call [`GameState::reset`] to begin a run
    pub fn new(seed: u64, tuning: &Tuning, viewport: Viewport) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0.0,
            speed: tuning.physics.initial_speed,
            spawn_timer: 0.0,
            player: Player::default(),
            obstacles: Vec::new(),
            stars: Vec::new(),
            viewport,
            time_ticks: 0,
        };
        state.init_stars();
        state
    }

    /// Reset the session to its initial values and enter `Running`
    pub fn reset(&mut self, tuning: &Tuning) {
        self.score = 0.0;
        self.speed = tuning.physics.initial_speed;
        self.spawn_timer = rand_range(
            &mut self.rng,
            tuning.spawn.interval_min,
            tuning.spawn.interval_max,
        );
        self.obstacles.clear();
        self.player = Player::default();
        self.time_ticks = 0;
        self.phase = GamePhase::Running;
    }

    /// Replace the viewport and re-seed the star field
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.init_stars();
    }

    fn init_stars(&mut self) {
        let count = (self.viewport.width / STAR_SPACING).floor().max(0.0) as usize;
        let viewport = self.viewport;
        let rng = &mut self.rng;
        self.stars = (0..count).map(|_| Star::random(rng, viewport)).collect();
    }

    /// Score as displayed
    #[inline]
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Screen y of the ground line
    #[inline]
    pub fn ground_y(&self, tuning: &Tuning) -> f32 {
        self.viewport.ground_y(tuning.physics.ground_height)
    }
}
