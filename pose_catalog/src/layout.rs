//! The three mode layouts every object is assigned at creation.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

pub const SCATTER_INNER_RADIUS: f32 = 10.0;
pub const SCATTER_OUTER_RADIUS: f32 = 30.0;

const HEART_SCALE: f32 = 0.7;
const HEART_LIFT:  f32 = 5.0;

/// Largest per-axis spin (radians/frame) in scatter mode is half of this.
const DRIFT_SPAN:  f32 = 0.02;

// ════════════════════════════════════════════════════════════════════════════
// TreeShape
// ════════════════════════════════════════════════════════════════════════════

/// Dimensions of the cone the decorations form in tree mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeShape {
    pub height:       f32,
    pub base_radius:  f32,
    /// Turns of the photo ribbon between base and apex.
    pub spiral_turns: f32,
}

impl Default for TreeShape {
    fn default() -> Self {
        TreeShape { height: 35.0, base_radius: 14.0, spiral_turns: 4.5 }
    }
}

impl TreeShape {
    /// World-space y of the tree base.
    pub fn base_y(&self) -> f32 { -self.height / 2.0 }

    /// World-space y of the apex (the star sits a little above it).
    pub fn apex_y(&self) -> f32 { self.height / 2.0 }
}

// ════════════════════════════════════════════════════════════════════════════
// Layout + PoseCatalog
// ════════════════════════════════════════════════════════════════════════════

/// The layouts that have a precomputed per-object destination.
///
/// Focus is not listed: its destinations depend on the live scene rotation
/// and are derived every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    Tree,
    Scatter,
    Heart,
}

/// Immutable destinations of one object, fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseCatalog {
    pub tree:    Vec3,
    pub scatter: Vec3,
    pub heart:   Vec3,
    /// Per-axis angular velocity (radians/frame) used only while scattered.
    pub drift:   Vec3,
}

impl PoseCatalog {
    /// Draw the scatter, heart and drift entries; `tree` comes from the caller
    /// because decorations and photos place it differently.
    pub fn with_tree<R: Rng + ?Sized>(tree: Vec3, rng: &mut R) -> Self {
        let drift   = rotation_drift(rng);
        let scatter = scatter_position(rng);
        let heart   = heart_position(rng);
        PoseCatalog { tree, scatter, heart, drift }
    }

    pub fn position(&self, layout: Layout) -> Vec3 {
        match layout {
            Layout::Tree    => self.tree,
            Layout::Scatter => self.scatter,
            Layout::Heart   => self.heart,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Generators
// ════════════════════════════════════════════════════════════════════════════

/// Tree slot for decoration `index` of `count`.
///
/// Height grows linearly with the index; the admissible radius shrinks
/// linearly toward the apex and the object lands between 60 % and 110 % of it
/// at a random angle.
pub fn tree_position<R: Rng + ?Sized>(
    index: usize,
    count: usize,
    shape: &TreeShape,
    rng:   &mut R,
) -> Vec3 {
    let progress   = index as f32 / count.max(1) as f32;
    let y          = progress * shape.height + shape.base_y();
    let max_radius = shape.base_radius * (1.1 - progress);
    let angle      = rng.gen::<f32>() * TAU;
    let r          = max_radius * (0.6 + rng.gen::<f32>() * 0.5);
    Vec3::new(angle.cos() * r, y, angle.sin() * r)
}

/// Uniform point on the scatter shell.
///
/// The polar angle is drawn through the inverse CDF `acos(2v − 1)` so that
/// directions are uniform over solid angle instead of bunching at the poles.
pub fn scatter_position<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let r     = SCATTER_INNER_RADIUS
              + rng.gen::<f32>() * (SCATTER_OUTER_RADIUS - SCATTER_INNER_RADIUS);
    let theta = rng.gen::<f32>() * TAU;
    let phi   = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Point on the heart solid.
///
/// `u` sweeps the classic heart outline in the xy-plane, `v` squashes it
/// toward the centre and pushes it along z, which fills a rounded volume.
pub fn heart_position<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let u = rng.gen::<f32>() * TAU;
    let v = rng.gen::<f32>() * PI;
    let squash = v.sin().powi(2);
    let x = 16.0 * u.sin().powi(3) * squash;
    let y = (13.0 * u.cos()
           - 5.0 * (2.0 * u).cos()
           - 2.0 * (3.0 * u).cos()
           - (4.0 * u).cos()) * squash;
    let z = 6.0 * v.cos();
    let mut p = Vec3::new(x, y, z) * HEART_SCALE;
    p.y += HEART_LIFT;
    p
}

/// Per-object spin used in scatter mode.
pub fn rotation_drift<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * DRIFT_SPAN,
        (rng.gen::<f32>() - 0.5) * DRIFT_SPAN,
        (rng.gen::<f32>() - 0.5) * DRIFT_SPAN,
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use proptest::prelude::*;

    #[test]
    fn tree_height_follows_index() {
        let shape = TreeShape::default();
        let mut rng = StdRng::seed_from_u64(1);
        let first = tree_position(0, 100, &shape, &mut rng);
        let mid   = tree_position(50, 100, &shape, &mut rng);
        assert!((first.y - shape.base_y()).abs() < 1e-4);
        assert!((mid.y - 0.0).abs() < 1e-4);
    }

    #[test]
    fn tree_radius_shrinks_toward_apex() {
        let shape = TreeShape::default();
        let mut rng = StdRng::seed_from_u64(2);
        for i in 0..200 {
            let p = tree_position(i, 200, &shape, &mut rng);
            let progress = i as f32 / 200.0;
            let max_r = shape.base_radius * (1.1 - progress);
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!(r >= max_r * 0.6 - 1e-3, "slot {} too close to trunk", i);
            assert!(r <= max_r * 1.1 + 1e-3, "slot {} outside the cone", i);
        }
    }

    #[test]
    fn scatter_stays_in_shell() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..2000 {
            let r = scatter_position(&mut rng).length();
            assert!(r >= SCATTER_INNER_RADIUS - 1e-3 && r <= SCATTER_OUTER_RADIUS + 1e-3);
        }
    }

    #[test]
    fn scatter_is_isotropic() {
        // Uniform over solid angle ⇒ |cos φ| averages 0.5; a lat/long grid
        // sample would average 2/π ≈ 0.64.
        let mut rng = StdRng::seed_from_u64(4);
        let n = 20_000;
        let mean_abs_z: f32 = (0..n)
            .map(|_| scatter_position(&mut rng).normalize().z.abs())
            .sum::<f32>() / n as f32;
        assert!((mean_abs_z - 0.5).abs() < 0.02, "mean |z| = {}", mean_abs_z);
    }

    #[test]
    fn heart_is_bounded_and_lifted() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sum = Vec3::ZERO;
        let n = 5000;
        for _ in 0..n {
            let p = heart_position(&mut rng);
            assert!(p.x.abs() <= 16.0 * HEART_SCALE + 1e-3);
            assert!(p.z.abs() <= 6.0 * HEART_SCALE + 1e-3);
            sum += p;
        }
        let centre = sum / n as f32;
        assert!(centre.x.abs() < 0.5);
        assert!(centre.y > 0.0, "heart centre {:?} should sit above origin", centre);
    }

    #[test]
    fn drift_is_small() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            let d = rotation_drift(&mut rng);
            assert!(d.abs().max_element() <= DRIFT_SPAN / 2.0);
        }
    }

    #[test]
    fn same_seed_same_catalog() {
        let shape = TreeShape::default();
        let build = || {
            let mut rng = StdRng::seed_from_u64(99);
            (0..10)
                .map(|i| PoseCatalog::with_tree(tree_position(i, 10, &shape, &mut rng), &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn catalog_lookup_by_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let c = PoseCatalog::with_tree(Vec3::new(1.0, 2.0, 3.0), &mut rng);
        assert_eq!(c.position(Layout::Tree), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(c.position(Layout::Scatter), c.scatter);
        assert_eq!(c.position(Layout::Heart), c.heart);
    }

    proptest! {
        #[test]
        fn any_seed_stays_in_bounds(seed in any::<u64>(), count in 1usize..2000) {
            let shape = TreeShape::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let index = (seed as usize) % count;
            let p = tree_position(index, count, &shape, &mut rng);
            prop_assert!(p.y >= shape.base_y() - 1e-3 && p.y < shape.apex_y());
            let c = PoseCatalog::with_tree(p, &mut rng);
            let r = c.scatter.length();
            prop_assert!(r >= SCATTER_INNER_RADIUS - 1e-3 && r <= SCATTER_OUTER_RADIUS + 1e-3);
        }
    }
}
