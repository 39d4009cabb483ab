//! A single blob body and its per-step update rule
//!
//! Blobs are pulled toward a target by a detuned inverse-square force,
//! keep a fraction of their previous velocity, are speed limited, and
//! bounce off the unit square by flipping the remembered velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use crate::consts::DISTANCE_DETUNE;

/// A disk-shaped body chasing the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    position: Vec2,
    velocity: Vec2,
    radius: f32,
}

impl Blob {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity remembered for the next step's momentum term
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Advance this blob by one fixed step toward `target`
    pub fn update(&mut self, target: Vec2, config: &SimConfig) {
        let force = attraction(target - self.position, config);

        // Leaky integrator: decayed previous velocity plus this step's force
        let mut velocity = self.velocity * config.friction + force;
        if !velocity.is_finite() {
            log::debug!("Non-finite blob velocity, resetting to zero");
            velocity = Vec2::ZERO;
        }
        velocity = velocity.clamp_length_max(config.max_speed);

        self.position += velocity * config.time_step;

        // Position is left outside; only the remembered velocity turns around
        if self.position.x < 0.0 || self.position.x > 1.0 {
            velocity.x = -velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > 1.0 {
            velocity.y = -velocity.y;
        }

        self.velocity = velocity;
    }
}

/// Attraction force for a blob displaced `delta` from its target
///
/// Magnitude is `G / d²` with `d = |delta| * DISTANCE_DETUNE`. Inside
/// `min_distance` the magnitude is multiplied by `d²` once more, which
/// caps it at `G` instead of letting it diverge.
///
/// Zero when the target coincides with the blob (no direction to pull in)
/// or when the inverse-square term is not representable.
pub fn attraction(delta: Vec2, config: &SimConfig) -> Vec2 {
    let direction = delta.normalize_or_zero();
    if direction == Vec2::ZERO {
        return Vec2::ZERO;
    }

    let distance = delta.length() * DISTANCE_DETUNE;
    let falloff = distance * distance;
    let mut magnitude = config.gravity_constant / falloff;
    if distance < config.min_distance {
        magnitude *= falloff;
    }

    if !magnitude.is_finite() {
        return Vec2::ZERO;
    }
    direction * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_attraction_points_at_target() {
        let config = SimConfig::default();
        let force = attraction(Vec2::new(0.3, 0.0), &config);
        assert!(force.x > 0.0);
        assert_eq!(force.y, 0.0);

        // G / (0.3 * 2)^2
        let expected = config.gravity_constant / 0.36;
        assert!((force.length() - expected).abs() < EPS);
    }

    #[test]
    fn test_attraction_inverse_square() {
        let config = SimConfig::default();
        let near = attraction(Vec2::new(0.1, 0.0), &config).length();
        let far = attraction(Vec2::new(0.2, 0.0), &config).length();
        assert!((near / far - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_attraction_softened_inside_min_distance() {
        let config = SimConfig::default();
        // detuned distance 0.002 < min_distance 0.005
        let force = attraction(Vec2::new(0.0, 0.001), &config);
        assert!((force.length() - config.gravity_constant).abs() < EPS);
        assert!(force.y > 0.0);
    }

    #[test]
    fn test_attraction_zero_delta() {
        let config = SimConfig::default();
        assert_eq!(attraction(Vec2::ZERO, &config), Vec2::ZERO);
    }

    #[test]
    fn test_target_on_blob_stays_finite() {
        let config = SimConfig::default();
        let mut blob = Blob::new(Vec2::new(0.5, 0.5), Vec2::ZERO, 0.02);
        for _ in 0..10 {
            blob.update(Vec2::new(0.5, 0.5), &config);
        }
        assert!(blob.velocity().is_finite());
        assert!(blob.position().is_finite());
        assert!(blob.velocity().length() <= config.max_speed + EPS);
    }

    #[test]
    fn test_left_wall_flips_velocity() {
        let config = SimConfig {
            friction: 1.0,
            ..SimConfig::default()
        };
        let start = Vec2::new(0.0, 0.5);
        let mut blob = Blob::new(start, Vec2::new(-0.01, 0.0), 0.02);

        // Target on the blob so the only motion is momentum
        blob.update(start, &config);

        assert!(blob.position().x < 0.0);
        assert!(blob.velocity().x > 0.0);
        assert!((blob.velocity().x - 0.01).abs() < EPS);
        // Position is not clamped back
        assert!((blob.position().x + 0.005).abs() < EPS);
    }

    #[test]
    fn test_axes_reflect_independently() {
        let config = SimConfig {
            friction: 1.0,
            ..SimConfig::default()
        };
        let start = Vec2::new(0.5, 1.0);
        let mut blob = Blob::new(start, Vec2::new(0.01, 0.01), 0.02);
        blob.update(start, &config);

        assert!(blob.velocity().x > 0.0);
        assert!(blob.velocity().y < 0.0);
    }

    #[test]
    fn test_speed_clamped_to_max() {
        let config = SimConfig {
            friction: 1.0,
            ..SimConfig::default()
        };
        let mut blob = Blob::new(Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0), 0.02);
        blob.update(Vec2::new(0.5, 0.5), &config);

        let speed = blob.velocity().length();
        assert!((speed - config.max_speed).abs() < EPS);
        // Direction preserved
        assert!((blob.velocity().x - blob.velocity().y).abs() < EPS);
    }

    #[test]
    fn test_zero_friction_tracks_force() {
        let config = SimConfig {
            friction: 0.0,
            ..SimConfig::default()
        };
        let mut blob = Blob::new(Vec2::new(0.2, 0.5), Vec2::new(0.0, 0.01), 0.02);
        let target = Vec2::new(0.8, 0.5);
        let force = attraction(target - blob.position(), &config);
        blob.update(target, &config);
        assert!((blob.velocity() - force).length() < EPS);
    }

    #[test]
    fn test_moves_toward_target() {
        let config = SimConfig::default();
        let target = Vec2::new(0.9, 0.9);
        let mut blob = Blob::new(Vec2::new(0.1, 0.1), Vec2::ZERO, 0.02);
        let before = (target - blob.position()).length();
        for _ in 0..20 {
            blob.update(target, &config);
        }
        let after = (target - blob.position()).length();
        assert!(after < before);
    }

    proptest! {
        #[test]
        fn prop_speed_bounded(
            px in -0.1f32..1.1, py in -0.1f32..1.1,
            vx in -1.0f32..1.0, vy in -1.0f32..1.0,
            tx in 0.0f32..1.0, ty in 0.0f32..1.0,
            friction in 0.0f32..=1.0,
            steps in 1usize..50,
        ) {
            let config = SimConfig { friction, ..SimConfig::default() };
            let mut blob = Blob::new(Vec2::new(px, py), Vec2::new(vx, vy), 0.02);
            for _ in 0..steps {
                blob.update(Vec2::new(tx, ty), &config);
                prop_assert!(blob.velocity().length() <= config.max_speed + EPS);
                prop_assert!(blob.position().is_finite());
            }
        }

        #[test]
        fn prop_radius_constant(
            radius in 0.001f32..0.2,
            tx in 0.0f32..1.0, ty in 0.0f32..1.0,
            steps in 1usize..100,
        ) {
            let config = SimConfig::default();
            let mut blob = Blob::new(Vec2::new(0.5, 0.5), Vec2::ZERO, radius);
            for _ in 0..steps {
                blob.update(Vec2::new(tx, ty), &config);
            }
            prop_assert_eq!(blob.radius(), radius);
        }

        #[test]
        fn prop_update_deterministic(
            px in 0.0f32..1.0, py in 0.0f32..1.0,
            vx in -0.02f32..0.02, vy in -0.02f32..0.02,
            tx in 0.0f32..1.0, ty in 0.0f32..1.0,
        ) {
            let config = SimConfig::default();
            let start = Blob::new(Vec2::new(px, py), Vec2::new(vx, vy), 0.02);
            let mut a = start;
            let mut b = start;
            a.update(Vec2::new(tx, ty), &config);
            b.update(Vec2::new(tx, ty), &config);
            prop_assert_eq!(a, b);
        }
    }
}
