//! Platform abstraction layer
//!
//! Handles the browser side of gesture input:
//! - Camera acquisition and its failure modes
//! - Feeding video frames to the hand detector (`FrameSource`)
//!
//! The trait and gating logic are platform independent; the web
//! implementations live in `web` and only build for wasm32.

#[cfg(target_arch = "wasm32")]
pub mod web;

use thiserror::Error;

/// Why gesture control is unavailable. Never fatal: play falls back to the keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Hand detector unavailable")]
    DetectorUnavailable,
    #[error("Camera not supported")]
    Unsupported,
    #[error("Camera access requires https or localhost")]
    InsecureContext,
    #[error("Camera blocked: {0}")]
    Blocked(String),
}

/// How video frames reach the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSourceKind {
    /// The detector vendor's camera helper drives frames itself
    CameraHelper,
    /// Poll the video element once per animation frame
    ManualPoll,
}

impl FrameSourceKind {
    /// Prefer the vendor helper when the page loaded it
    pub fn select(camera_helper_available: bool) -> Self {
        if camera_helper_available {
            FrameSourceKind::CameraHelper
        } else {
            FrameSourceKind::ManualPoll
        }
    }
}

/// Something that pushes camera frames into the hand detector
pub trait FrameSource {
    fn kind(&self) -> FrameSourceKind;
    /// Begin feeding frames; detector results arrive through its own callback
    fn start(&mut self);
    /// Stop feeding frames; in-flight detector work is left to finish
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Ownership of the live camera session
///
/// At most one acquisition is in flight. A session that finishes after the
/// slot was cleared is handed back to the caller to release.
#[derive(Debug, Default)]
pub enum CameraSlot<T> {
    #[default]
    Empty,
    Acquiring,
    Active(T),
}

impl<T> CameraSlot<T> {
    /// Claim the slot for a new acquisition; false while one is pending or live
    pub fn begin(&mut self) -> bool {
        match self {
            CameraSlot::Empty => {
                *self = CameraSlot::Acquiring;
                true
            }
            CameraSlot::Acquiring | CameraSlot::Active(_) => false,
        }
    }

    /// Install the session of the pending acquisition
    pub fn finish(&mut self, session: T) -> Result<(), T> {
        match self {
            CameraSlot::Acquiring => {
                *self = CameraSlot::Active(session);
                Ok(())
            }
            CameraSlot::Empty | CameraSlot::Active(_) => Err(session),
        }
    }

    /// The pending acquisition failed
    pub fn fail(&mut self) {
        if matches!(self, CameraSlot::Acquiring) {
            *self = CameraSlot::Empty;
        }
    }

    /// Cancel any pending acquisition and hand back the live session
    pub fn clear(&mut self) -> Option<T> {
        match std::mem::take(self) {
            CameraSlot::Active(session) => Some(session),
            CameraSlot::Empty | CameraSlot::Acquiring => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CameraSlot::Active(_))
    }
}

/// `HTMLMediaElement.HAVE_CURRENT_DATA`
pub const HAVE_CURRENT_DATA: u16 = 2;

/// Decides which polled video frames are worth sending to the detector
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoFrameGate {
    last_time: Option<f64>,
}

impl VideoFrameGate {
    /// True when the video has data and its clock moved since the last frame sent
    pub fn admit(&mut self, ready_state: u16, current_time: f64) -> bool {
        if ready_state < HAVE_CURRENT_DATA {
            return false;
        }
        if self.last_time == Some(current_time) {
            return false;
        }
        self.last_time = Some(current_time);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_prefers_camera_helper() {
        assert_eq!(FrameSourceKind::select(true), FrameSourceKind::CameraHelper);
        assert_eq!(FrameSourceKind::select(false), FrameSourceKind::ManualPoll);
    }

    #[test]
    fn test_gate_waits_for_data() {
        let mut gate = VideoFrameGate::default();
        assert!(!gate.admit(1, 0.5));
        assert!(gate.admit(HAVE_CURRENT_DATA, 0.5));
    }

    #[test]
    fn test_gate_skips_repeated_frames() {
        let mut gate = VideoFrameGate::default();
        assert!(gate.admit(4, 0.0));
        assert!(!gate.admit(4, 0.0));
        assert!(gate.admit(4, 0.033));
    }

    #[test]
    fn test_slot_allows_one_acquisition() {
        let mut slot = CameraSlot::default();
        assert!(slot.begin());
        assert!(!slot.begin());
        assert_eq!(slot.finish("first"), Ok(()));
        assert!(slot.is_active());
        // A second click while live does not start another request
        assert!(!slot.begin());
        assert_eq!(slot.clear(), Some("first"));
        assert!(slot.begin());
    }

    #[test]
    fn test_slot_returns_superseded_session() {
        let mut slot = CameraSlot::default();
        assert!(slot.begin());
        // Switched to keyboard while the permission prompt was open
        assert_eq!(slot.clear(), None);
        assert_eq!(slot.finish("late"), Err("late"));
        assert!(!slot.is_active());
    }

    #[test]
    fn test_slot_failure_frees_it() {
        let mut slot: CameraSlot<()> = CameraSlot::default();
        assert!(slot.begin());
        slot.fail();
        assert!(slot.begin());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CameraError::Unsupported.to_string(), "Camera not supported");
        assert_eq!(
            CameraError::Blocked("NotAllowedError".into()).to_string(),
            "Camera blocked: NotAllowedError"
        );
    }
}
