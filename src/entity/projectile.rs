//! Projectile body: the thrown bomb
//!
//! Stability drains with every launch, step, strain and course correction.
//! It only feeds the final score and never gates motion. There is no floor,
//! so it can go negative.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::random::RandomSource;
use crate::core::types::Vector3;

pub const INITIAL_STABILITY: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileStatus {
    Dormant,
    Airborne,
    Exploded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileEntity {
    pub status: ProjectileStatus,
    pub position: Vector3,
    pub velocity: Vector3,
    pub stability: f64,
}

impl Default for ProjectileEntity {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectileEntity {
    pub fn new() -> Self {
        Self {
            status: ProjectileStatus::Dormant,
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            stability: INITIAL_STABILITY,
        }
    }

    /// Throw along +X with a small lateral and vertical wobble
    pub fn launch(&mut self, config: &SimulationConfig, rng: &mut impl RandomSource) {
        self.status = ProjectileStatus::Airborne;
        let x = config.speed.sample(rng) as f64;
        let y = rng.int_in(-10, 10) as f64;
        let z = rng.int_in(-5, 5) as f64;
        self.velocity = Vector3::new(x, y, z);
        self.drain(rng, 5, 15);
    }

    /// Integrate one step of `dt` seconds
    pub fn advance(&mut self, dt: f64, rng: &mut impl RandomSource) {
        self.position += self.velocity * dt;
        self.drain(rng, 1, 5);
    }

    /// Scale velocity uniformly
    pub fn adjust_trajectory(&mut self, factor: f64, rng: &mut impl RandomSource) {
        self.velocity *= factor;
        self.drain(rng, 1, 3);
    }

    /// A web tether pulling on the body
    pub fn tether_strain(&mut self, rng: &mut impl RandomSource) {
        self.drain(rng, 10, 20);
    }

    pub fn release_with(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    pub fn detonate(&mut self) {
        self.status = ProjectileStatus::Exploded;
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.stability.is_finite()
    }

    fn drain(&mut self, rng: &mut impl RandomSource, min: i64, max: i64) {
        self.stability -= rng.int_in(min, max) as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Bounds;
    use crate::core::random::ScriptedRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> SimulationConfig {
        let mut config = SimulationConfig::generate(&mut ChaCha8Rng::seed_from_u64(1));
        config.speed = Bounds::new(30, 90);
        config
    }

    #[test]
    fn test_new_projectile_is_dormant_at_origin() {
        let bomb = ProjectileEntity::new();
        assert_eq!(bomb.status, ProjectileStatus::Dormant);
        assert_eq!(bomb.position, Vector3::ZERO);
        assert_eq!(bomb.stability, INITIAL_STABILITY);
    }

    #[test]
    fn test_launch_uses_speed_bounds() {
        let mut bomb = ProjectileEntity::new();
        let mut rng = ScriptedRandom::constant(0.0);
        bomb.launch(&config(), &mut rng);

        assert_eq!(bomb.status, ProjectileStatus::Airborne);
        assert_eq!(bomb.velocity, Vector3::new(30.0, -10.0, -5.0));
        assert_eq!(bomb.stability, 95.0);
    }

    #[test]
    fn test_advance_moves_by_velocity_times_dt() {
        let mut bomb = ProjectileEntity::new();
        bomb.velocity = Vector3::new(42.0, -7.0, 3.0);
        let mut rng = ScriptedRandom::constant(0.999);
        bomb.advance(0.1, &mut rng);

        assert_eq!(bomb.position, Vector3::new(42.0 * 0.1, -7.0 * 0.1, 3.0 * 0.1));
        assert_eq!(bomb.stability, 95.0);
    }

    #[test]
    fn test_adjust_trajectory_scales_each_component() {
        let mut bomb = ProjectileEntity::new();
        bomb.velocity = Vector3::new(10.0, -4.0, 2.0);
        bomb.adjust_trajectory(1.5, &mut ScriptedRandom::constant(0.0));
        assert_eq!(bomb.velocity, Vector3::new(15.0, -6.0, 3.0));
        assert_eq!(bomb.stability, 99.0);
    }

    #[test]
    fn test_stability_is_not_clamped() {
        let mut bomb = ProjectileEntity::new();
        let mut rng = ScriptedRandom::constant(0.999);
        for _ in 0..6 {
            bomb.tether_strain(&mut rng);
        }
        assert_eq!(bomb.stability, -20.0);
    }

    #[test]
    fn test_detonate_marks_exploded() {
        let mut bomb = ProjectileEntity::new();
        bomb.detonate();
        assert_eq!(bomb.status, ProjectileStatus::Exploded);
    }
}
