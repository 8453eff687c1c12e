//! Gesture classification from a single hand-landmark frame.
//!
//! The classifier is a pure function of one [`LandmarkSet`]: no smoothing,
//! no history.  "Hold the previous mode on an unclear hand" is state, and the
//! mode state machine owns it; here an unclear hand is just
//! [`Gesture::Unclear`].

use glam::Vec2;

use crate::mode::Mode;

// ════════════════════════════════════════════════════════════════════════════
// Landmarks
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

/// Indices into the 21-point hand topology.
pub mod landmark {
    pub const WRIST:      usize = 0;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_TIP:  usize = 8;
    /// Middle-finger knuckle; used as the palm centre.
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_TIP:  usize = 20;
}

/// One detected hand: 21 points normalised to the camera frame (0–1, y down).
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSet {
    points: [Vec2; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Vec2; LANDMARK_COUNT]) -> Self {
        LandmarkSet { points }
    }

    /// Build from a slice; `None` unless it holds exactly 21 points.
    pub fn from_slice(points: &[Vec2]) -> Option<Self> {
        let points: [Vec2; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(LandmarkSet { points })
    }

    pub fn point(&self, index: usize) -> Vec2 { self.points[index] }

    pub fn palm(&self) -> Vec2 { self.points[landmark::MIDDLE_MCP] }

    fn distance(&self, a: usize, b: usize) -> f32 {
        self.points[a].distance(self.points[b])
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

const PINCH_MAX:       f32 = 0.05;
const EXTENDED_MIN:    f32 = 0.25;
const CURLED_MAX:      f32 = 0.2;
const FIST_MAX_AVG:    f32 = 0.25;
const OPEN_MIN_AVG:    f32 = 0.4;

pub const NO_HAND_LABEL: &str = "No Hand Detected";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    Pinch,
    Victory,
    Fist,
    OpenHand,
    /// A hand is visible but matches nothing; the mode stays where it was.
    Unclear,
}

impl Gesture {
    /// Mode this gesture asks for, or `None` to keep the current one.
    pub fn mode(self) -> Option<Mode> {
        match self {
            Gesture::Pinch    => Some(Mode::Focus),
            Gesture::Victory  => Some(Mode::Heart),
            Gesture::Fist     => Some(Mode::Tree),
            Gesture::OpenHand => Some(Mode::Scatter),
            Gesture::Unclear  => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gesture::Pinch    => "Pinch (Focus)",
            Gesture::Victory  => "Victory (Heart)",
            Gesture::Fist     => "Fist (Tree)",
            Gesture::OpenHand => "Open Hand (Scatter)",
            Gesture::Unclear  => "Hand Detected",
        }
    }
}

/// Classifier output for one frame with a hand in it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub gesture: Gesture,
    /// `x` tilts the scene (pitch), `y` turns it (yaw); both in −1..1.
    pub rotation_intent: Vec2,
}

/// Classify one hand.  First matching rule wins:
///
/// 1. thumb tip and index tip nearly touching → pinch
/// 2. index + middle out, ring + pinky in → victory
/// 3. fingertips close to the wrist on average → fist
/// 4. fingertips far from the wrist on average → open hand
/// 5. otherwise unclear
///
/// The rotation intent always follows the palm, whichever rule fired.
pub fn classify(hand: &LandmarkSet) -> Reading {
    use landmark::*;

    let pinch  = hand.distance(THUMB_TIP, INDEX_TIP);
    let index  = hand.distance(INDEX_TIP, WRIST);
    let middle = hand.distance(MIDDLE_TIP, WRIST);
    let ring   = hand.distance(RING_TIP, WRIST);
    let pinky  = hand.distance(PINKY_TIP, WRIST);
    let avg    = (index + middle + ring + pinky) / 4.0;

    let victory = index > EXTENDED_MIN && middle > EXTENDED_MIN
               && ring < CURLED_MAX && pinky < CURLED_MAX;

    let gesture = if pinch < PINCH_MAX {
        Gesture::Pinch
    } else if victory {
        Gesture::Victory
    } else if avg < FIST_MAX_AVG {
        Gesture::Fist
    } else if avg > OPEN_MIN_AVG {
        Gesture::OpenHand
    } else {
        Gesture::Unclear
    };

    let palm = hand.palm();
    Reading {
        gesture,
        rotation_intent: Vec2::new((palm.y - 0.5) * 2.0, (palm.x - 0.5) * 2.0),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandShape: synthetic hands for the keyboard simulator and tests
// ════════════════════════════════════════════════════════════════════════════

/// Hand poses the simulator can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandShape {
    Fist,
    Open,
    Pinch,
    Victory,
    /// Half-curled fingers that match no gesture.
    Relaxed,
}

/// Wrist sits this far below the palm centre.
const WRIST_DROP: f32 = 0.15;
/// Fan angle of index, middle, ring, pinky from vertical.
const FINGER_FAN: [f32; 4] = [-0.3, -0.1, 0.1, 0.3];

impl HandShape {
    /// Fingertip-to-wrist reach of index, middle, ring, pinky.
    fn reach(self) -> [f32; 4] {
        match self {
            HandShape::Fist    => [0.15, 0.15, 0.15, 0.15],
            HandShape::Open    => [0.5, 0.5, 0.5, 0.5],
            HandShape::Pinch   => [0.3, 0.3, 0.3, 0.3],
            HandShape::Victory => [0.45, 0.45, 0.12, 0.12],
            HandShape::Relaxed => [0.32, 0.32, 0.32, 0.32],
        }
    }

    /// A full 21-point hand with its palm centre at `palm`.
    pub fn landmarks(self, palm: Vec2) -> LandmarkSet {
        let wrist = palm + Vec2::new(0.0, WRIST_DROP);
        let mut points = [wrist; LANDMARK_COUNT];

        for (finger, (&reach, &fan)) in self.reach().iter().zip(FINGER_FAN.iter()).enumerate() {
            let tip = wrist + Vec2::new(fan.sin(), -fan.cos()) * reach;
            let base = 5 + finger * 4;
            for joint in 0..4 {
                let f = (joint + 1) as f32 / 4.0;
                points[base + joint] = wrist.lerp(tip, f);
            }
        }

        let index_tip = points[landmark::INDEX_TIP];
        let thumb_tip = match self {
            HandShape::Pinch => index_tip + Vec2::new(0.01, 0.0),
            _                => wrist + Vec2::new(-0.25, -0.1),
        };
        for joint in 0..4 {
            let f = (joint + 1) as f32 / 4.0;
            points[1 + joint] = wrist.lerp(thumb_tip, f);
        }

        points[landmark::MIDDLE_MCP] = palm;
        LandmarkSet { points }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
