//! Single-frame open hand / fist classifier
//!
//! Uses the MediaPipe hand topology: 0 is the wrist, and each finger runs
//! MCP → PIP → DIP → tip. The thumb is ignored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Gesture;
use crate::consts::HAND_LANDMARKS;
use crate::distance;
use crate::tuning::GestureTuning;

const WRIST: usize = 0;
const MIDDLE_MCP: usize = 9;

/// (tip, MCP) pairs for index, middle, ring and pinky
const FINGERS: [(usize, usize); 4] = [(8, 5), (12, 9), (16, 13), (20, 17)];

/// One normalized detector keypoint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A complete set of hand keypoints
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks([Landmark; HAND_LANDMARKS]);

impl HandLandmarks {
    pub fn new(points: [Landmark; HAND_LANDMARKS]) -> Self {
        Self(points)
    }

    /// Accepts exactly 21 keypoints
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; HAND_LANDMARKS] = points.try_into().ok()?;
        Some(Self(points))
    }

    #[inline]
    pub fn point(&self, index: usize) -> Vec2 {
        self.0[index].xy()
    }

    /// Number of fingers (thumb excluded) whose tip reaches clearly past its knuckle
    pub fn extended_fingers(&self, margin: f32) -> usize {
        let wrist = self.point(WRIST);
        let palm = distance(wrist, self.point(MIDDLE_MCP));
        FINGERS
            .iter()
            .filter(|&&(tip, mcp)| {
                let tip_dist = distance(self.point(tip), wrist);
                let mcp_dist = distance(self.point(mcp), wrist);
                tip_dist > mcp_dist + palm * margin
            })
            .count()
    }
}

/// Classify one frame: open hand or fist
///
/// Never returns [`Gesture::None`]; absence of a hand is decided by the caller.
pub fn classify(hand: &HandLandmarks, tuning: &GestureTuning) -> Gesture {
    if hand.extended_fingers(tuning.finger_margin) >= tuning.min_extended {
        Gesture::Open
    } else {
        Gesture::Closed
    }
}

/// Parse one detector callback payload
///
/// The payload is the first hand's keypoint array as JSON, or `null` when no
/// hand was found. Arrays with the wrong number of points count as no hand.
pub fn parse_detector_result(json: &str) -> Result<Option<HandLandmarks>, serde_json::Error> {
    let points: Option<Vec<Landmark>> = serde_json::from_str(json)?;
    Ok(points.and_then(|p| HandLandmarks::from_slice(&p)))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark { x, y, z: 0.0 }
    }

    /// Hand with the wrist at the bottom and the given fingers stretched upward
    pub fn hand(extended: [bool; 4]) -> HandLandmarks {
        let mut points = [Landmark::default(); HAND_LANDMARKS];
        points[WRIST] = lm(0.5, 0.9);
        // Thumb, pointed sideways and never considered
        for (i, p) in points.iter_mut().enumerate().take(5).skip(1) {
            *p = lm(0.5 - 0.05 * i as f32, 0.85);
        }
        for (finger, &(tip, mcp)) in FINGERS.iter().enumerate() {
            let x = 0.44 + 0.04 * finger as f32;
            points[mcp] = lm(x, 0.7);
            if extended[finger] {
                points[mcp + 1] = lm(x, 0.6);
                points[mcp + 2] = lm(x, 0.52);
                points[tip] = lm(x, 0.45);
            } else {
                // Curled back toward the palm
                points[mcp + 1] = lm(x, 0.65);
                points[mcp + 2] = lm(x, 0.7);
                points[tip] = lm(x, 0.74);
            }
        }
        HandLandmarks::new(points)
    }

    pub fn open_hand() -> HandLandmarks {
        hand([true; 4])
    }

    pub fn fist() -> HandLandmarks {
        hand([false; 4])
    }
}
