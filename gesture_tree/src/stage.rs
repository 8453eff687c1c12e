//! The choreography update loop.
//!
//! Everything moves by fixed per-frame easing toward a target, so the scene
//! never snaps: a mode change only swaps targets, and objects glide there
//! over the next second or so.  All object positions live in the scene
//! group's local frame; the group itself is turned by the global rotation.
//!
//! | Mode    | Position target              | Rotation                       |
//! |---------|------------------------------|--------------------------------|
//! | TREE    | catalog tree slot            | decorations spin, photos hold  |
//! | SCATTER | catalog scatter point        | everything spins by its drift  |
//! | HEART   | catalog heart point          | decorations spin, photos hold  |
//! | FOCUS   | target → in front of camera  | target faces the camera        |
//! |         | others → scatter × 1.5       | decorations spin, photos hold  |

use glam::{EulerRot, Quat, Vec3};
use photo_pool::PhotoPool;
use pose_catalog::{ChoreographedObject, ObjectId, TreeShape, MAX_DECORATIONS};
use rand::Rng;

use crate::mode::{Mode, ModeState};

/// Camera-facing spot (scene world space) the focused photo flies to.
pub const FOCUS_POINT: Vec3 = Vec3::new(0.0, 5.0, 65.0);
pub const FOCUS_SCALE: f32 = 4.5;
/// Non-focused objects back off this much further than their scatter point.
pub const FOCUS_SPREAD: f32 = 1.5;

const ROTATION_EASE: f32 = 0.05;
const POSITION_EASE: f32 = 0.08;
const SCALE_EASE:    f32 = 0.1;
/// Yaw per frame while the tree stands alone with no hand in view.
const IDLE_YAW:      f32 = 0.002;
const DECORATION_SPIN: f32 = 0.005;

const STAR_SPIN:   f32 = 0.01;
const STAR_SWAY:   f32 = 0.1;
/// Height of the star above the apex.
const STAR_LIFT:   f32 = 1.5;

// ════════════════════════════════════════════════════════════════════════════
// Star
// ════════════════════════════════════════════════════════════════════════════

/// Topper ornament.  It ignores modes and only turns in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Star {
    fn above(shape: &TreeShape) -> Self {
        Star {
            position: Vec3::new(0.0, shape.apex_y() + STAR_LIFT, 0.0),
            rotation: Vec3::ZERO,
        }
    }

    fn tick(&mut self, elapsed: f32) {
        self.rotation.y += STAR_SPIN;
        self.rotation.z = elapsed.sin() * STAR_SWAY;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Stage
// ════════════════════════════════════════════════════════════════════════════

pub struct Stage {
    decorations: Vec<ChoreographedObject>,
    /// Global scene rotation, Euler XYZ radians.
    rotation:    Vec3,
    star:        Star,
    elapsed:     f32,
}

impl Stage {
    /// Lay out `count` decorations on the tree.
    /// At most [`MAX_DECORATIONS`] are built so decoration ids never reach the
    /// photo range.
    pub fn build<R: Rng + ?Sized>(count: usize, shape: &TreeShape, rng: &mut R) -> Self {
        if count > MAX_DECORATIONS {
            tracing::warn!(requested = count, max = MAX_DECORATIONS, "decoration count capped");
        }
        let count = count.min(MAX_DECORATIONS);
        let decorations = (0..count)
            .map(|i| ChoreographedObject::decoration(i, count, shape, rng))
            .collect();
        Stage {
            decorations,
            rotation: Vec3::ZERO,
            star:     Star::above(shape),
            elapsed:  0.0,
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: f32, state: &ModeState, pool: &mut PhotoPool) {
        self.elapsed += dt;

        // ── 1. global rotation ───────────────────────────────────────────
        let intent = state.rotation_intent();
        self.rotation.x += (intent.x - self.rotation.x) * ROTATION_EASE;
        self.rotation.y += (intent.y - self.rotation.y) * ROTATION_EASE;
        if state.mode() == Mode::Tree && !state.hand_detected() {
            self.rotation.y += IDLE_YAW;
        }

        // ── 2–4. objects ─────────────────────────────────────────────────
        let frame = Targets {
            mode:        state.mode(),
            focus:       state.focus_target(),
            focus_point: self.scene_quat().inverse() * FOCUS_POINT,
            facing:      -self.rotation,
        };
        for obj in self.decorations.iter_mut().chain(pool.iter_mut()) {
            frame.settle(obj);
        }

        // ── 5. star ──────────────────────────────────────────────────────
        self.star.tick(self.elapsed);
    }

    pub fn scene_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn rotation(&self) -> Vec3 { self.rotation }

    pub fn star(&self) -> &Star { &self.star }

    pub fn elapsed(&self) -> f32 { self.elapsed }

    pub fn decorations(&self) -> &[ChoreographedObject] { &self.decorations }
}

/// Per-frame targets shared by every object.
struct Targets {
    mode:        Mode,
    focus:       Option<ObjectId>,
    /// `FOCUS_POINT` in the scene group's local frame.
    focus_point: Vec3,
    /// Rotation that cancels the group's, so the focused photo faces front.
    facing:      Vec3,
}

impl Targets {
    fn settle(&self, obj: &mut ChoreographedObject) {
        let is_focus = self.mode == Mode::Focus && self.focus == Some(obj.id);

        let (position, scale) = match self.mode.layout() {
            Some(layout)       => (obj.catalog.position(layout), obj.base_scale),
            None if is_focus   => (self.focus_point, Vec3::splat(FOCUS_SCALE)),
            None               => (obj.catalog.scatter * FOCUS_SPREAD, obj.base_scale),
        };

        let is_photo = obj.is_photo();
        let pose = &mut obj.pose;
        pose.position += (position - pose.position) * POSITION_EASE;
        pose.scale    += (scale - pose.scale) * SCALE_EASE;

        if self.mode == Mode::Scatter {
            pose.rotation += obj.catalog.drift;
        } else if is_focus {
            pose.rotation = self.facing;
        } else if !is_photo {
            pose.rotation.y += DECORATION_SPIN;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
