//! Frame-driven game orchestrator
//!
//! Owns the session: turns wall-clock timestamps into clamped ticks, merges
//! keyboard and gesture intents, and exposes HUD and render snapshots. The
//! host calls [`Game::frame`] from its animation-frame callback and stops
//! scheduling once a frame reports [`FrameOutcome::Ended`].
//!
//! The detector callback and the frame callback interleave in any order, so
//! every tick reads the gesture state as it is at that moment.

use crate::consts::MAX_FRAME_DT;
use crate::gesture::{GestureControl, HandLandmarks, parse_detector_result};
use crate::highscores::SessionScores;
use crate::sim::{GamePhase, GameState, RenderSnapshot, TickInput, Viewport, tick};
use crate::tuning::Tuning;
use crate::ui::{CameraStatus, HudSnapshot, gesture_label};

/// Where jump/crouch come from (keyboard always works)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Keyboard,
    /// Keyboard plus debounced hand gestures
    Camera,
}

/// Keyboard events the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Jump,
    CrouchDown,
    CrouchUp,
    ToggleAutopilot,
}

impl KeyEvent {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str, pressed: bool) -> Option<Self> {
        match (code, pressed) {
            ("Space" | "ArrowUp", true) => Some(KeyEvent::Jump),
            ("ArrowDown", true) => Some(KeyEvent::CrouchDown),
            ("ArrowDown", false) => Some(KeyEvent::CrouchUp),
            ("KeyI", true) => Some(KeyEvent::ToggleAutopilot),
            _ => None,
        }
    }
}

/// Result of one animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not running; nothing simulated
    Stopped,
    /// Simulated a tick, schedule the next frame
    Continue,
    /// This frame's tick ended the run
    Ended { final_score: u64, new_best: bool },
}

#[derive(Debug, Clone, Copy, Default)]
struct KeyState {
    /// Edge-triggered, consumed by the next tick
    jump_queued: bool,
    /// Level-triggered
    crouch_held: bool,
}

/// Game instance holding all session state
#[derive(Debug)]
pub struct Game {
    pub tuning: Tuning,
    pub state: GameState,
    pub gestures: GestureControl,
    pub scores: SessionScores,
    control: ControlMode,
    camera_status: CameraStatus,
    keys: KeyState,
    autopilot: bool,
    /// Timestamp (ms) of the last simulated frame
    last_time: f64,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let state = GameState::new(seed, &tuning, viewport);
        Self {
            tuning,
            state,
            gestures: GestureControl::new(),
            scores: SessionScores::new(),
            control: ControlMode::Keyboard,
            camera_status: CameraStatus::Idle,
            keys: KeyState::default(),
            autopilot: false,
            last_time: 0.0,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    #[inline]
    pub fn control(&self) -> ControlMode {
        self.control
    }

    #[inline]
    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Choose the input mode and status shown to the player
    pub fn set_control(&mut self, control: ControlMode, status: CameraStatus) {
        log::info!("Control mode: {:?} ({})", control, status.message());
        self.control = control;
        self.camera_status = status;
    }

    pub fn set_camera_status(&mut self, status: CameraStatus) {
        self.camera_status = status;
    }

    /// Start a fresh run from Idle or Ended. Returns false if already running.
    pub fn start(&mut self, now: f64, seed: u64) -> bool {
        if self.state.is_running() {
            return false;
        }
        let viewport = self.state.viewport;
        self.state = GameState::new(seed, &self.tuning, viewport);
        self.state.reset(&self.tuning);
        self.gestures.reset();
        self.keys = KeyState::default();
        self.last_time = now;
        log::info!("Run started with seed {} ({:?})", seed, self.control);
        true
    }

    /// Simulate one animation frame at timestamp `now` (ms)
    pub fn frame(&mut self, now: f64) -> FrameOutcome {
        if !self.state.is_running() {
            return FrameOutcome::Stopped;
        }

        let dt = (((now - self.last_time) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT);
        self.last_time = now;
        if dt == 0.0 {
            return FrameOutcome::Continue;
        }

        let mut input = TickInput {
            jump: std::mem::take(&mut self.keys.jump_queued),
            crouch: self.keys.crouch_held,
            autopilot: self.autopilot,
        };
        if self.control == ControlMode::Camera {
            let on_ground = self.state.player.on_ground;
            let intent = self.gestures.poll(on_ground, now, &self.tuning.gesture);
            input.jump |= intent.jump;
            input.crouch |= intent.crouch;
        }

        tick(&mut self.state, &input, &self.tuning, dt);

        if self.state.phase == GamePhase::Ended {
            let final_score = self.state.display_score();
            let new_best = self.scores.record(final_score);
            return FrameOutcome::Ended {
                final_score,
                new_best,
            };
        }
        FrameOutcome::Continue
    }

    pub fn on_key(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Jump => self.keys.jump_queued = true,
            KeyEvent::CrouchDown => self.keys.crouch_held = true,
            KeyEvent::CrouchUp => self.keys.crouch_held = false,
            KeyEvent::ToggleAutopilot => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
            }
        }
    }

    /// Detector callback with parsed keypoints (`None`: no hand)
    pub fn on_detection(&mut self, hand: Option<&HandLandmarks>, now: f64) {
        if self.control != ControlMode::Camera {
            return;
        }
        self.camera_status = if hand.is_some() {
            CameraStatus::Detecting
        } else {
            CameraStatus::NoHand
        };
        self.gestures.on_detection(hand, now, &self.tuning.gesture);
    }

    /// Detector callback with the raw JSON payload
    pub fn on_detector_payload(&mut self, json: &str, now: f64) {
        let hand = parse_detector_result(json).unwrap_or_else(|e| {
            log::warn!("Malformed detector payload: {}", e);
            None
        });
        self.on_detection(hand.as_ref(), now);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.state.resize(viewport);
    }

    pub fn hud(&self) -> HudSnapshot {
        let score = self.state.display_score();
        HudSnapshot {
            score,
            final_score: (self.state.phase == GamePhase::Ended).then_some(score),
            best: self.scores.best,
            gesture: gesture_label(self.gestures.stable(), self.gestures.has_reading()),
            status: self.camera_status.message(),
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot::capture(&self.state, &self.tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::classify::fixtures::{fist, open_hand};
    use crate::gesture::Gesture;
    use crate::sim::{Obstacle, ObstacleKind};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn new_game() -> Game {
        Game::new(7, Tuning::default(), Viewport::new(1000.0, 600.0))
    }

    fn started() -> Game {
        let mut game = new_game();
        assert!(game.start(0.0, 7));
        game.state.spawn_timer = 1000.0;
        game
    }

    #[test]
    fn test_idle_until_started() {
        let mut game = new_game();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.frame(16.0), FrameOutcome::Stopped);
        assert!(game.start(16.0, 1));
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(!game.start(20.0, 2));
    }

    #[test]
    fn test_frame_dt_is_clamped() {
        let mut game = started();
        // Two-second hitch (e.g. a suspended tab) counts as one capped step
        assert_eq!(game.frame(2000.0), FrameOutcome::Continue);
        assert!((game.state.score - MAX_FRAME_DT * 10.0).abs() < 1e-5);

        // Clock going backwards is a zero step
        let before = game.state.score;
        game.frame(1000.0);
        assert_eq!(game.state.score, before);
    }

    #[test]
    fn test_keyboard_jump_and_crouch() {
        let mut game = started();
        game.on_key(KeyEvent::Jump);
        game.frame(FRAME_MS);
        assert!(!game.state.player.on_ground);

        // Airborne press is dropped rather than buffered until landing
        let mut t = FRAME_MS;
        game.on_key(KeyEvent::Jump);
        while !game.state.player.on_ground {
            t += FRAME_MS;
            game.frame(t);
        }
        t += FRAME_MS;
        game.frame(t);
        assert!(game.state.player.on_ground);

        game.on_key(KeyEvent::CrouchDown);
        t += FRAME_MS;
        game.frame(t);
        assert!(game.state.player.crouching);
        game.on_key(KeyEvent::CrouchUp);
        t += FRAME_MS;
        game.frame(t);
        assert!(!game.state.player.crouching);
    }

    #[test]
    fn test_gestures_ignored_in_keyboard_mode() {
        let mut game = started();
        assert_eq!(game.control(), ControlMode::Keyboard);
        game.set_camera_status(CameraStatus::Keyboard);
        let hand = open_hand();
        for i in 0..10 {
            game.on_detection(Some(&hand), i as f64);
        }
        game.on_detection(None, 11.0);
        assert_eq!(game.gestures.stable(), Gesture::None);
        assert!(!game.gestures.has_reading());
        assert_eq!(game.hud().status, "Keyboard control");
        assert_eq!(game.hud().gesture, "Waiting");
        game.frame(FRAME_MS);
        assert!(game.state.player.on_ground);
    }

    #[test]
    fn test_zero_length_frame_keeps_jump() {
        let mut game = new_game();
        assert!(game.start(100.0, 7));
        game.state.spawn_timer = 1000.0;
        game.on_key(KeyEvent::Jump);

        // rAF can report a timestamp at or before the start time
        assert_eq!(game.frame(90.0), FrameOutcome::Continue);
        assert!(game.state.player.on_ground);
        assert!(game.keys.jump_queued);

        game.frame(90.0 + FRAME_MS);
        assert!(!game.state.player.on_ground);
        assert!(game.state.player.y > 0.0);
    }

    #[test]
    fn test_zero_length_frame_keeps_gesture_cooldown() {
        let mut game = new_game();
        game.set_control(ControlMode::Camera, CameraStatus::Active);
        assert!(game.start(100.0, 7));
        game.state.spawn_timer = 1000.0;
        let hand = open_hand();
        for i in 0..10 {
            game.on_detection(Some(&hand), 90.0 + i as f64);
        }

        game.frame(100.0);
        assert!(game.state.player.on_ground);
        game.frame(100.0 + FRAME_MS);
        assert!(!game.state.player.on_ground);
    }

    #[test]
    fn test_camera_mode_gestures_drive_player() {
        let mut game = new_game();
        game.set_control(ControlMode::Camera, CameraStatus::Active);
        game.start(0.0, 3);
        game.state.spawn_timer = 1000.0;

        let hand = fist();
        for i in 0..10 {
            game.on_detection(Some(&hand), i as f64);
        }
        game.frame(FRAME_MS);
        assert!(game.state.player.crouching);
        assert_eq!(game.hud().gesture, "Closed fist");
        assert_eq!(game.hud().status, "Detecting");

        let hand = open_hand();
        for i in 0..10 {
            game.on_detection(Some(&hand), 20.0 + i as f64);
        }
        game.frame(2.0 * FRAME_MS);
        assert!(!game.state.player.on_ground);
        assert!(!game.state.player.crouching);
    }

    #[test]
    fn test_collision_ends_and_records() {
        let mut game = started();
        game.state.score = 12.7;
        game.state.obstacles.push(Obstacle {
            kind: ObstacleKind::High,
            x: game.tuning.player.x + 5.0,
            width: 40.0,
            height: 60.0,
            y_offset: 0.0,
        });
        let outcome = game.frame(FRAME_MS);
        assert_eq!(
            outcome,
            FrameOutcome::Ended {
                final_score: 12,
                new_best: true
            }
        );
        assert_eq!(game.hud().final_score, Some(12));
        assert_eq!(game.frame(2.0 * FRAME_MS), FrameOutcome::Stopped);

        // Restart goes back through the reset path
        assert!(game.start(100.0, 8));
        assert_eq!(game.state.score, 0.0);
        assert!(game.state.obstacles.is_empty());
        assert_eq!(game.hud().best, 12);
        assert_eq!(game.hud().final_score, None);
    }

    #[test]
    fn test_restart_clears_gesture_state() {
        let mut game = new_game();
        game.set_control(ControlMode::Camera, CameraStatus::Active);
        game.start(0.0, 1);
        let hand = open_hand();
        for i in 0..10 {
            game.on_detection(Some(&hand), i as f64);
        }
        game.state.phase = GamePhase::Ended;
        game.start(50.0, 2);
        assert_eq!(game.gestures.stable(), Gesture::None);
        assert_eq!(game.hud().gesture, "Waiting");
    }

    #[test]
    fn test_bad_payload_counts_as_no_hand() {
        let mut game = started();
        game.set_control(ControlMode::Camera, CameraStatus::Active);
        game.on_detector_payload("[1, 2", 5.0);
        assert_eq!(game.gestures.raw(), Gesture::None);
        assert_eq!(game.hud().status, "No hand");
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(KeyEvent::from_code("Space", true), Some(KeyEvent::Jump));
        assert_eq!(KeyEvent::from_code("ArrowUp", true), Some(KeyEvent::Jump));
        assert_eq!(KeyEvent::from_code("ArrowUp", false), None);
        assert_eq!(KeyEvent::from_code("ArrowDown", false), Some(KeyEvent::CrouchUp));
        assert_eq!(KeyEvent::from_code("KeyA", true), None);
    }
}
