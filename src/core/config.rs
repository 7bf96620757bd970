//! Run configuration
//!
//! A [`SimulationConfig`] is drawn once at the start of a run (or loaded from
//! TOML) and handed to the sequencer. It is never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SimulationError};
use crate::core::random::RandomSource;

/// Inclusive `[min, max]` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl Bounds<i64> {
    /// Draw each end independently from its own range
    fn generate(rng: &mut impl RandomSource, min_range: (i64, i64), max_range: (i64, i64)) -> Self {
        let min = rng.int_in(min_range.0, min_range.1);
        let max = rng.int_in(max_range.0, max_range.1);
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut impl RandomSource) -> i64 {
        rng.int_in(self.min, self.max)
    }
}

impl Bounds<u64> {
    /// Same draw as [`RandomSource::int_in`], kept in u64 so wide bounds never wrap
    pub fn sample(&self, rng: &mut impl RandomSource) -> u64 {
        let span = self.max.saturating_sub(self.min) as f64 + 1.0;
        let offset = (rng.next_unit() * span).floor() as u64;
        self.min.saturating_add(offset).min(self.max)
    }
}

/// Randomized parameters for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Pause between beats, milliseconds
    pub cooldown: Bounds<u64>,
    pub distance: Bounds<i64>,
    /// Launch speed along +X
    pub speed: Bounds<i64>,
    pub angle: Bounds<i64>,
    /// Upper end caps the return throw
    pub force: Bounds<i64>,
    pub sense_threshold: f64,
    pub accuracy_threshold: f64,
    pub dodge_threshold: f64,
    /// Scenario-wide dampening applied to every skill check
    pub environmental_factor: f64,
}

impl SimulationConfig {
    /// Draw a fresh config
    pub fn generate(rng: &mut impl RandomSource) -> Self {
        let min_cooldown = rng.int_in(100, 300) as u64;
        let max_cooldown = rng.int_in(600, 1000) as u64;
        let distance = Bounds::generate(rng, (30, 70), (120, 180));
        let speed = Bounds::generate(rng, (20, 40), (80, 120));
        let angle = Bounds::generate(rng, (20, 40), (50, 70));
        let force = Bounds::generate(rng, (40, 60), (80, 120));

        Self {
            cooldown: Bounds::new(min_cooldown, max_cooldown),
            distance,
            speed,
            angle,
            force,
            sense_threshold: rng.float_in(0.2, 0.4),
            accuracy_threshold: rng.float_in(0.3, 0.5),
            dodge_threshold: rng.float_in(0.2, 0.4),
            environmental_factor: rng.float_in(0.7, 0.9),
        }
    }

    /// Parse and validate a TOML config
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.cooldown.min == 0 {
            return Err(SimulationError::InvalidConfig("cooldown.min must be positive".into()));
        }
        if !self.cooldown.is_ordered() {
            return Err(SimulationError::InvalidConfig(format!(
                "cooldown.min ({}) exceeds cooldown.max ({})",
                self.cooldown.min, self.cooldown.max
            )));
        }

        for (name, bounds) in [
            ("distance", self.distance),
            ("speed", self.speed),
            ("angle", self.angle),
            ("force", self.force),
        ] {
            if bounds.min <= 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "{name}.min must be positive, got {}",
                    bounds.min
                )));
            }
            if !bounds.is_ordered() {
                return Err(SimulationError::InvalidConfig(format!(
                    "{name}.min ({}) exceeds {name}.max ({})",
                    bounds.min, bounds.max
                )));
            }
        }

        for (name, value) in [
            ("sense_threshold", self.sense_threshold),
            ("accuracy_threshold", self.accuracy_threshold),
            ("dodge_threshold", self.dodge_threshold),
            ("environmental_factor", self.environmental_factor),
        ] {
            // NaN fails both comparisons
            if !(value > 0.0 && value < 1.0) {
                return Err(SimulationError::InvalidConfig(format!(
                    "{name} must lie strictly inside (0, 1), got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Gates that are forced to succeed instead of rolled
///
/// The default forces every gate, which guarantees the scripted ending.
/// Clearing a flag makes that beat roll against its computed probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedGates {
    /// Beat 18: thrower tracking
    pub tracking: bool,
    /// Beat 19: target lock
    pub lock: bool,
    /// Beat 21: swing
    pub swing: bool,
    /// Beat 22: release with swing velocity
    pub release: bool,
    /// Beat 26: proximity sensor
    pub proximity: bool,
    /// Beat 28: detonation
    pub detonation: bool,
}

impl Default for ForcedGates {
    fn default() -> Self {
        Self::all()
    }
}

impl ForcedGates {
    pub fn all() -> Self {
        Self {
            tracking: true,
            lock: true,
            swing: true,
            release: true,
            proximity: true,
            detonation: true,
        }
    }

    /// Every gate rolls
    pub fn none() -> Self {
        Self {
            tracking: false,
            lock: false,
            swing: false,
            release: false,
            proximity: false,
            detonation: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::ScriptedRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_config() -> SimulationConfig {
        SimulationConfig::generate(&mut ChaCha8Rng::seed_from_u64(7))
    }

    #[test]
    fn test_generated_config_validates() {
        let config = sample_config();
        assert!(config.validate().is_ok());
        assert!((100..=300).contains(&config.cooldown.min));
        assert!((600..=1000).contains(&config.cooldown.max));
        assert!((0.7..0.9).contains(&config.environmental_factor));
    }

    #[test]
    fn test_lowest_draws_hit_range_floors() {
        let config = SimulationConfig::generate(&mut ScriptedRandom::constant(0.0));
        assert_eq!(config.cooldown, Bounds::new(100, 600));
        assert_eq!(config.speed, Bounds::new(20, 80));
        assert_eq!(config.force, Bounds::new(40, 80));
        assert!((config.sense_threshold - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_bounds() {
        let mut config = sample_config();
        config.speed.min = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));
        assert!(err.to_string().contains("speed.min"));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let mut config = sample_config();
        config.force = Bounds::new(120, 40);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_threshold_outside_open_interval() {
        let mut config = sample_config();
        config.dodge_threshold = 1.0;
        assert!(config.validate().is_err());
        config.dodge_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip_through_loader() {
        let source = r#"
            sense_threshold = 0.3
            accuracy_threshold = 0.4
            dodge_threshold = 0.25
            environmental_factor = 0.8

            [cooldown]
            min = 150
            max = 700

            [distance]
            min = 50
            max = 150

            [speed]
            min = 30
            max = 100

            [angle]
            min = 30
            max = 60

            [force]
            min = 50
            max = 100
        "#;
        let config = SimulationConfig::from_toml_str(source).unwrap();
        assert_eq!(config.cooldown, Bounds::new(150, 700));
        assert_eq!(config.force.max, 100);
    }

    #[test]
    fn test_toml_with_invalid_values_is_rejected() {
        let source = r#"
            sense_threshold = 0.3
            accuracy_threshold = 0.4
            dodge_threshold = 0.25
            environmental_factor = 0.8
            cooldown = { min = 0, max = 700 }
            distance = { min = 50, max = 150 }
            speed = { min = 30, max = 100 }
            angle = { min = 30, max = 60 }
            force = { min = 50, max = 100 }
        "#;
        assert!(matches!(
            SimulationConfig::from_toml_str(source),
            Err(SimulationError::InvalidConfig(_))
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("cooldown = 3"),
            Err(SimulationError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_cooldown_sample_stays_inside_wide_bounds() {
        let cooldown = Bounds::new(100u64, u64::MAX);
        for draw in [0.0, 0.5, 0.999_999] {
            let pause = cooldown.sample(&mut ScriptedRandom::constant(draw));
            assert!(pause >= cooldown.min && pause <= cooldown.max, "draw {draw} gave {pause}");
        }
        assert_eq!(cooldown.sample(&mut ScriptedRandom::constant(0.0)), 100);
    }

    #[test]
    fn test_cooldown_sample_matches_integer_draw() {
        let cooldown = Bounds::new(150u64, 700);
        for draw in [0.0, 0.25, 0.5, 0.999] {
            let expected = ScriptedRandom::constant(draw).int_in(150, 700) as u64;
            assert_eq!(cooldown.sample(&mut ScriptedRandom::constant(draw)), expected);
        }
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let result = SimulationConfig::load("/nonexistent/pumpkin-bomb.toml");
        assert!(matches!(result, Err(SimulationError::IoError(_))));
    }

    #[test]
    fn test_default_gates_are_all_forced() {
        assert_eq!(ForcedGates::default(), ForcedGates::all());
        assert!(!ForcedGates::none().detonation);
    }
}
