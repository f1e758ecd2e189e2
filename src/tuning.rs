//! Game balance parameters
//!
//! Defaults reproduce the shipped balance. A partial JSON override can be
//! supplied (LocalStorage on web, a file path on native); missing fields keep
//! their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::GESTURE_WINDOW;

/// Fingers the classifier looks at (thumb excluded)
const FINGER_COUNT: usize = 4;

/// Errors raised while loading a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{name} range is inverted ({min} > {max})")]
    InvertedRange { name: &'static str, min: f32, max: f32 },
    #[error("{name} must be positive (got {value})")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be within [0, 1] (got {value})")]
    NotAProbability { name: &'static str, value: f32 },
    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be within [{min}, {max}] (got {value})")]
    CountOutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

/// Player kinematics and scroll speed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration per 60 Hz frame
    pub gravity: f32,
    /// Upward velocity applied on jump
    pub jump_velocity: f32,
    /// Height of the ground strip at the bottom of the viewport
    pub ground_height: f32,
    /// Scroll speed at game start (px per 60 Hz frame)
    pub initial_speed: f32,
    pub speed_cap: f32,
    /// Speed gained per 60 Hz frame
    pub speed_increase: f32,
    /// Score gained per second
    pub score_rate: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 0.9,
            jump_velocity: 15.0,
            ground_height: 120.0,
            initial_speed: 5.0,
            speed_cap: 11.5,
            speed_increase: 0.0025,
            score_rate: 10.0,
        }
    }
}

/// Player hitbox
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Kept below the lowest low-obstacle gap so crouching clears every low obstacle
    pub crouch_height: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            x: 140.0,
            width: 56.0,
            height: 78.0,
            crouch_height: 30.0,
        }
    }
}

/// Obstacle generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Seconds between spawns at initial speed
    pub interval_min: f32,
    pub interval_max: f32,
    /// Probability that a spawn is a low (crouch-under) obstacle
    pub low_chance: f32,
    pub width: (f32, f32),
    pub high_height: (f32, f32),
    pub low_height: (f32, f32),
    pub low_offset: (f32, f32),
    /// Extra distance past the right edge where obstacles appear
    pub lead: (f32, f32),
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval_min: 2.3,
            interval_max: 3.6,
            low_chance: 0.35,
            width: (30.0, 50.0),
            high_height: (40.0, 70.0),
            low_height: (26.0, 36.0),
            low_offset: (32.0, 46.0),
            lead: (40.0, 120.0),
        }
    }
}

/// Gesture debouncing and intent mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureTuning {
    /// Extension margin as a fraction of palm size
    pub finger_margin: f32,
    /// Extended fingers needed for an open hand
    pub min_extended: usize,
    /// Votes in the window needed to commit open or closed
    pub open_votes: usize,
    pub closed_votes: usize,
    /// Minimum time an open/closed reading is held before decaying to none
    pub hold_ms: f64,
    /// Minimum time between gesture jumps
    pub jump_cooldown_ms: f64,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            finger_margin: 0.2,
            min_extended: 2,
            open_votes: 4,
            closed_votes: 4,
            hold_ms: 350.0,
            jump_cooldown_ms: 450.0,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub spawn: SpawnTuning,
    pub gesture: GestureTuning,
}

fn check_range(name: &'static str, (min, max): (f32, f32)) -> Result<(), TuningError> {
    if min > max {
        return Err(TuningError::InvertedRange { name, min, max });
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), TuningError> {
    if value < 0.0 || !value.is_finite() {
        return Err(TuningError::Negative { name, value });
    }
    Ok(())
}

/// Vote and finger thresholds must be reachable and non-trivial
fn check_count(name: &'static str, value: usize, max: usize) -> Result<(), TuningError> {
    if value == 0 || value > max {
        return Err(TuningError::CountOutOfRange {
            name,
            value,
            min: 1,
            max,
        });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value <= 0.0 || !value.is_finite() {
        return Err(TuningError::NotPositive { name, value });
    }
    Ok(())
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that ranges are ordered and rates are usable
    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.physics;
        check_positive("gravity", p.gravity)?;
        check_positive("jump_velocity", p.jump_velocity)?;
        check_positive("initial_speed", p.initial_speed)?;
        check_range("speed", (p.initial_speed, p.speed_cap))?;
        check_non_negative("speed_increase", p.speed_increase as f64)?;
        check_non_negative("score_rate", p.score_rate as f64)?;

        let pl = &self.player;
        check_positive("player width", pl.width)?;
        check_positive("player height", pl.height)?;
        check_positive("crouch height", pl.crouch_height)?;

        let s = &self.spawn;
        check_positive("spawn interval", s.interval_min)?;
        check_range("spawn interval", (s.interval_min, s.interval_max))?;
        check_range("obstacle width", s.width)?;
        check_range("high obstacle height", s.high_height)?;
        check_range("low obstacle height", s.low_height)?;
        check_range("low obstacle offset", s.low_offset)?;
        check_range("spawn lead", s.lead)?;
        if !(0.0..=1.0).contains(&s.low_chance) {
            return Err(TuningError::NotAProbability {
                name: "low_chance",
                value: s.low_chance,
            });
        }

        let g = &self.gesture;
        check_non_negative("finger_margin", g.finger_margin as f64)?;
        check_count("min_extended", g.min_extended, FINGER_COUNT)?;
        check_count("open_votes", g.open_votes, GESTURE_WINDOW)?;
        check_count("closed_votes", g.closed_votes, GESTURE_WINDOW)?;
        check_non_negative("hold_ms", g.hold_ms)?;
        check_non_negative("jump_cooldown_ms", g.jump_cooldown_ms)?;
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "hand_dash_tuning";

    /// Load a tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Load a tuning override from a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"physics": {"speed_cap": 20.0}}"#).unwrap();
        assert_eq!(tuning.physics.speed_cap, 20.0);
        assert_eq!(tuning.physics.initial_speed, 5.0);
        assert_eq!(tuning.gesture.hold_ms, 350.0);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Tuning::from_json(r#"{"spawn": {"low_height": [40.0, 10.0]}}"#).unwrap_err();
        assert!(matches!(err, TuningError::InvertedRange { .. }));
    }

    #[test]
    fn test_bad_json_rejected() {
        let err = Tuning::from_json("{physics").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_bad_probability_rejected() {
        let err = Tuning::from_json(r#"{"spawn": {"low_chance": 1.5}}"#).unwrap_err();
        assert!(matches!(err, TuningError::NotAProbability { .. }));
    }

    #[test]
    fn test_negative_score_rate_rejected() {
        let err = Tuning::from_json(r#"{"physics": {"score_rate": -1.0}}"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Negative {
                name: "score_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_gesture_thresholds_checked() {
        for json in [
            r#"{"gesture": {"open_votes": 0}}"#,
            r#"{"gesture": {"closed_votes": 11}}"#,
            r#"{"gesture": {"min_extended": 0}}"#,
            r#"{"gesture": {"min_extended": 5}}"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(
                matches!(err, TuningError::CountOutOfRange { .. }),
                "{json}: {err}"
            );
        }
        for json in [
            r#"{"gesture": {"hold_ms": -1.0}}"#,
            r#"{"gesture": {"jump_cooldown_ms": -450.0}}"#,
            r#"{"gesture": {"finger_margin": -0.1}}"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(matches!(err, TuningError::Negative { .. }), "{json}: {err}");
        }
        Tuning::from_json(r#"{"gesture": {"open_votes": 10, "hold_ms": 0.0}}"#).unwrap();
    }

    #[test]
    fn test_gesture_section_lists_only_live_fields() {
        let value = serde_json::to_value(GestureTuning::default()).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "closed_votes",
                "finger_margin",
                "hold_ms",
                "jump_cooldown_ms",
                "min_extended",
                "open_votes"
            ]
        );
    }
}
