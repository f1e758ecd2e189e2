//! HUD text and status labels
//!
//! Pure view data; the web entry point copies it into the DOM.

use crate::gesture::Gesture;
use crate::platform::CameraError;

/// Camera/detector status shown under the video preview
#[derive(Debug, Clone, PartialEq)]
pub enum CameraStatus {
    /// Start screen, nothing requested yet
    Idle,
    /// Waiting on the permission prompt / stream start
    Initializing,
    /// Stream running, no detector result yet
    Active,
    /// Detector ran but found no hand
    NoHand,
    /// Detector is tracking a hand
    Detecting,
    /// Player chose keyboard control
    Keyboard,
    /// Camera could not be used; play continues on the keyboard
    Unavailable(CameraError),
}

impl CameraStatus {
    pub fn message(&self) -> String {
        match self {
            CameraStatus::Idle => String::new(),
            CameraStatus::Initializing => "Initializing".to_string(),
            CameraStatus::Active => "Camera active".to_string(),
            CameraStatus::NoHand => "No hand".to_string(),
            CameraStatus::Detecting => "Detecting".to_string(),
            CameraStatus::Keyboard => "Keyboard control".to_string(),
            CameraStatus::Unavailable(e) => format!("{e} - use the keyboard"),
        }
    }
}

/// Label for the stable gesture; "Waiting" until the detector reports
pub fn gesture_label(stable: Gesture, has_reading: bool) -> &'static str {
    if !has_reading {
        return "Waiting";
    }
    match stable {
        Gesture::Open => "Open hand",
        Gesture::Closed => "Closed fist",
        Gesture::None => "None",
    }
}

/// Everything the HUD displays for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: u64,
    /// Set once the run has ended
    pub final_score: Option<u64>,
    /// Best score in this page session
    pub best: u64,
    pub gesture: &'static str,
    pub status: String,
}
