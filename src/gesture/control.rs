//! Stable gesture → game intents
//!
//! A closed fist holds crouch. An open hand queues a jump when the player is
//! on the ground, at most once per cooldown so a held open hand does not
//! bounce the player continuously.

use super::classify::{HandLandmarks, classify};
use super::debounce::Debouncer;
use super::Gesture;
use crate::tuning::GestureTuning;

/// Intents derived from the stable gesture for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureIntent {
    pub jump: bool,
    pub crouch: bool,
}

/// Detector-facing gesture state shared by the detector callback and the tick
#[derive(Debug, Clone, Default)]
pub struct GestureControl {
    debouncer: Debouncer,
    last_jump_at: Option<f64>,
    /// Set once the first detector result arrives
    has_reading: bool,
}

impl GestureControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one detector callback; `None` means no hand in frame
    pub fn on_detection(
        &mut self,
        hand: Option<&HandLandmarks>,
        now: f64,
        tuning: &GestureTuning,
    ) -> Gesture {
        let raw = hand.map_or(Gesture::None, |h| classify(h, tuning));
        self.has_reading = true;
        let stable = self.debouncer.observe(raw, now, tuning);
        log::trace!("gesture raw={} stable={}", raw.as_str(), stable.as_str());
        stable
    }

    /// Read the current stable gesture into intents for this tick
    pub fn poll(&mut self, on_ground: bool, now: f64, tuning: &GestureTuning) -> GestureIntent {
        let stable = self.debouncer.stable();
        let crouch = stable == Gesture::Closed;

        let cooled = self
            .last_jump_at
            .is_none_or(|at| now - at >= tuning.jump_cooldown_ms);
        let jump = stable == Gesture::Open && on_ground && cooled;
        if jump {
            self.last_jump_at = Some(now);
        }

        GestureIntent { jump, crouch }
    }

    #[inline]
    pub fn stable(&self) -> Gesture {
        self.debouncer.stable()
    }

    #[inline]
    pub fn raw(&self) -> Gesture {
        self.debouncer.raw()
    }

    #[inline]
    pub fn has_reading(&self) -> bool {
        self.has_reading
    }

    /// Clear history, hold and cooldown (new session)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
