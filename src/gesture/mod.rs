//! Hand gesture input
//!
//! Keypoints from the external hand detector flow through three stages:
//! - `classify`: one frame of 21 keypoints → raw [`Gesture`]
//! - `debounce`: rolling majority vote with a hold timer → stable gesture
//! - `control`: stable gesture → crouch/jump intents with a jump cooldown

pub mod classify;
pub mod control;
pub mod debounce;

pub use classify::{HandLandmarks, Landmark, classify, parse_detector_result};
pub use control::{GestureControl, GestureIntent};
pub use debounce::{Debouncer, GestureCounts, GestureWindow, StableGesture, resolve};

use serde::{Deserialize, Serialize};

/// A symbolic hand gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gesture {
    /// No hand, or no clear reading
    #[default]
    None,
    /// Two or more fingers extended
    Open,
    /// Fist
    Closed,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::None => "none",
            Gesture::Open => "open",
            Gesture::Closed => "closed",
        }
    }
}
