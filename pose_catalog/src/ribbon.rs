//! The golden ribbon spiralling up the tree, and photo slots along it.
//!
//! The curve is sampled densely once and parameterised by arc length, so equal
//! steps in `t` are equal distances along the ribbon regardless of how tight
//! the spiral gets near the apex.

use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

use crate::layout::TreeShape;

/// Polyline resolution of the sampled spiral.
const SAMPLES: usize = 800;

/// The ribbon hangs this far outside the decoration cone.
const RIBBON_CLEARANCE: f32 = 2.0;

/// Arc-length fraction of the first photo.
const FIRST_SLOT: f32 = 0.1;
/// Arc-length step between consecutive photos.
const SLOT_STEP:  f32 = 0.15;
/// Slots wrap here and start overlapping earlier photos after ~6 of them.
const SLOT_WRAP:  f32 = 0.95;

/// Arc-length fraction of the `ordinal`-th photo placed on the ribbon.
pub fn ribbon_fraction(ordinal: usize) -> f32 {
    (FIRST_SLOT + ordinal as f32 * SLOT_STEP) % SLOT_WRAP
}

// ════════════════════════════════════════════════════════════════════════════
// RibbonCurve
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct RibbonCurve {
    points:     Vec<Vec3>,
    /// `cumulative[i]` = arc length from `points[0]` to `points[i]`.
    cumulative: Vec<f32>,
}

impl RibbonCurve {
    pub fn new(shape: &TreeShape) -> Self {
        let radius = shape.base_radius + RIBBON_CLEARANCE;
        let points: Vec<Vec3> = (0..=SAMPLES)
            .map(|i| {
                let t     = i as f32 / SAMPLES as f32;
                let angle = t * TAU * shape.spiral_turns;
                let r     = radius * (1.0 - t);
                Vec3::new(angle.cos() * r, t * shape.height + shape.base_y(), angle.sin() * r)
            })
            .collect();

        let mut cumulative = Vec::with_capacity(points.len());
        let mut acc = 0.0;
        cumulative.push(acc);
        for pair in points.windows(2) {
            acc += pair[0].distance(pair[1]);
            cumulative.push(acc);
        }

        RibbonCurve { points, cumulative }
    }

    pub fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Point at arc-length fraction `t` (clamped to `[0, 1]`).
    pub fn point_at(&self, t: f32) -> Vec3 {
        let target = t.clamp(0.0, 1.0) * self.length();
        let upper = self.cumulative.partition_point(|&c| c < target);
        if upper == 0 {
            return self.points[0];
        }
        if upper >= self.points.len() {
            return self.points[self.points.len() - 1];
        }
        let (c0, c1) = (self.cumulative[upper - 1], self.cumulative[upper]);
        let span = c1 - c0;
        let f = if span > f32::EPSILON { (target - c0) / span } else { 0.0 };
        self.points[upper - 1].lerp(self.points[upper], f)
    }

    /// Position and Euler orientation (XYZ) of the `ordinal`-th photo.
    ///
    /// The photo faces away from the trunk, then gets a small random
    /// forward tilt and roll so the frames don't look machine-placed.
    pub fn photo_slot<R: Rng + ?Sized>(&self, ordinal: usize, rng: &mut R) -> (Vec3, Vec3) {
        let point   = self.point_at(ribbon_fraction(ordinal));
        let outward = Vec3::new(point.x, 0.0, point.z).normalize_or(Vec3::Z);
        let yaw     = outward.x.atan2(outward.z);
        let tilt    = rng.gen::<f32>() * 0.2;
        let roll    = (rng.gen::<f32>() - 0.5) * 0.5;

        let facing = Quat::from_rotation_y(yaw)
                   * Quat::from_rotation_x(tilt)
                   * Quat::from_rotation_z(roll);
        let (x, y, z) = facing.to_euler(EulerRot::XYZ);
        (point, Vec3::new(x, y, z))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
