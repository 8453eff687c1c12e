//! Falling snow behind the tree.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FLOOR:        f32 = -20.0;
const RESPAWN_Y:    f32 = 25.0;
/// Half-width of the square flakes respawn over.
const SPREAD:       f32 = 35.0;
/// Initial flakes fill a box this tall centred on the origin.
const INITIAL_SPAN: f32 = 50.0;
const FIELD_YAW:    f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flake {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Flake {
    fn spawn(rng: &mut StdRng, y: f32) -> Self {
        Flake {
            position: Vec3::new(
                rng.gen_range(-SPREAD..SPREAD),
                y,
                rng.gen_range(-SPREAD..SPREAD),
            ),
            velocity: Vec3::new(
                rng.gen_range(-0.01..0.01),
                rng.gen_range(-0.2..-0.05),
                rng.gen_range(-0.01..0.01),
            ),
        }
    }
}

/// Particle field; each flake keeps its own velocity for life and wraps from
/// the floor back to the top.
pub struct SnowField {
    flakes:     Vec<Flake>,
    /// Yaw of the whole field, radians.
    rotation_y: f32,
    rng:        StdRng,
}

impl SnowField {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let flakes = (0..count)
            .map(|_| {
                let y = rng.gen_range(-INITIAL_SPAN / 2.0..INITIAL_SPAN / 2.0);
                Flake::spawn(&mut rng, y)
            })
            .collect();
        SnowField { flakes, rotation_y: 0.0, rng }
    }

    pub fn tick(&mut self) {
        for flake in &mut self.flakes {
            flake.position += flake.velocity;
            if flake.position.y < FLOOR {
                flake.position.y = RESPAWN_Y;
                flake.position.x = self.rng.gen_range(-SPREAD..SPREAD);
                flake.position.z = self.rng.gen_range(-SPREAD..SPREAD);
            }
        }
        self.rotation_y += FIELD_YAW;
    }

    pub fn flakes(&self) -> &[Flake] { &self.flakes }

    pub fn rotation_y(&self) -> f32 { self.rotation_y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocities_in_range() {
        let field = SnowField::new(500, 1);
        for f in field.flakes() {
            assert!(f.velocity.y >= -0.2 && f.velocity.y < -0.05);
            assert!(f.velocity.x.abs() <= 0.01 && f.velocity.z.abs() <= 0.01);
        }
    }

    #[test]
    fn flakes_fall_and_wrap() {
        let mut field = SnowField::new(200, 2);
        let velocities: Vec<Vec3> = field.flakes().iter().map(|f| f.velocity).collect();
        // Slowest flake needs 45 / 0.05 = 900 frames to cross the box.
        for _ in 0..1000 {
            field.tick();
            for f in field.flakes() {
                assert!(f.position.y >= FLOOR - 0.2 && f.position.y <= RESPAWN_Y);
                assert!(f.position.x.abs() <= SPREAD + 10.0);
            }
        }
        let after: Vec<Vec3> = field.flakes().iter().map(|f| f.velocity).collect();
        assert_eq!(velocities, after);
        assert!((field.rotation_y() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn same_seed_same_field() {
        let a = SnowField::new(10, 5);
        let b = SnowField::new(10, 5);
        assert_eq!(a.flakes(), b.flakes());
    }
}
