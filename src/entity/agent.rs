//! The defending agent
//!
//! Four skills in [0, 1] drive every check. Skills only ever grow, through
//! [`AgentEntity::adapt_to_situation`], and saturate at 1.0.

use serde::{Deserialize, Serialize};

use crate::core::random::RandomSource;
use crate::core::types::Vector3;

/// Skill gain per unit difficulty for experience
const EXPERIENCE_GAIN: f64 = 0.1;
/// Skill gain per unit difficulty for sense, accuracy and dodge
const SKILL_GAIN: f64 = 0.05;
const SKILL_CEILING: f64 = 1.0;

/// Distance falloff on web accuracy
const WEB_FALLOFF: f64 = 0.1;
/// Speed falloff on dodge effectiveness
const DODGE_FALLOFF: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEntity {
    pub position: Vector3,
    pub spider_sense: f64,
    pub web_accuracy: f64,
    pub dodge_ability: f64,
    pub experience: f64,
}

impl AgentEntity {
    /// Fresh agent at the origin with rolled skills
    pub fn spawn(rng: &mut impl RandomSource) -> Self {
        Self {
            position: Vector3::ZERO,
            spider_sense: rng.float_in(0.6, 1.0),
            web_accuracy: rng.float_in(0.7, 1.0),
            dodge_ability: rng.float_in(0.8, 1.0),
            experience: rng.float_in(0.9, 1.0),
        }
    }

    /// Sense falls off linearly with distance. At zero distance the ratio is
    /// infinite and the threat is always detected.
    pub fn detect_threat(&self, bomb_position: Vector3, environmental_factor: f64, threshold: f64) -> bool {
        let distance = self.position.distance(&bomb_position);
        self.spider_sense * environmental_factor / distance > threshold
    }

    pub fn shoot_web(&self, target: Vector3, environmental_factor: f64, threshold: f64) -> bool {
        let distance = self.position.distance(&target);
        let accuracy = (self.web_accuracy * environmental_factor) / (1.0 + WEB_FALLOFF * distance);
        accuracy > threshold
    }

    pub fn dodge(&self, bomb_velocity: Vector3, environmental_factor: f64, threshold: f64) -> bool {
        let effectiveness =
            (self.dodge_ability * environmental_factor) / (1.0 + DODGE_FALLOFF * bomb_velocity.length());
        effectiveness > threshold
    }

    /// Learn from a situation of the given difficulty. Negative difficulty
    /// teaches nothing.
    pub fn adapt_to_situation(&mut self, difficulty: f64) {
        let difficulty = difficulty.max(0.0);
        self.experience = grow(self.experience, difficulty * EXPERIENCE_GAIN);
        self.spider_sense = grow(self.spider_sense, difficulty * SKILL_GAIN);
        self.web_accuracy = grow(self.web_accuracy, difficulty * SKILL_GAIN);
        self.dodge_ability = grow(self.dodge_ability, difficulty * SKILL_GAIN);
    }

    pub fn reposition(&mut self, offset: Vector3) {
        self.position += offset;
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
    }
}

fn grow(skill: f64, delta: f64) -> f64 {
    (skill + delta).min(SKILL_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::ScriptedRandom;

    fn agent() -> AgentEntity {
        AgentEntity {
            position: Vector3::ZERO,
            spider_sense: 0.8,
            web_accuracy: 0.9,
            dodge_ability: 0.85,
            experience: 0.95,
        }
    }

    #[test]
    fn test_spawn_skill_ranges() {
        let low = AgentEntity::spawn(&mut ScriptedRandom::constant(0.0));
        assert_eq!(low.spider_sense, 0.6);
        assert_eq!(low.web_accuracy, 0.7);
        assert_eq!(low.dodge_ability, 0.8);
        assert_eq!(low.experience, 0.9);
        assert_eq!(low.position, Vector3::ZERO);
    }

    #[test]
    fn test_detect_threat_at_zero_distance() {
        let agent = agent();
        assert!(agent.detect_threat(Vector3::ZERO, 0.8, 0.39));
    }

    #[test]
    fn test_detect_threat_falls_off_with_distance() {
        let agent = agent();
        // 0.8 * 0.75 / 1.0 = 0.6
        assert!(agent.detect_threat(Vector3::new(1.0, 0.0, 0.0), 0.75, 0.3));
        // 0.8 * 0.75 / 3.0 = 0.2
        assert!(!agent.detect_threat(Vector3::new(0.0, 3.0, 0.0), 0.75, 0.3));
    }

    #[test]
    fn test_shoot_web_accuracy_formula() {
        let agent = agent();
        // 0.9 * 0.8 / (1 + 0.1 * 5) = 0.48
        let target = Vector3::new(3.0, 4.0, 0.0);
        assert!(agent.shoot_web(target, 0.8, 0.47));
        assert!(!agent.shoot_web(target, 0.8, 0.49));
    }

    #[test]
    fn test_dodge_effectiveness_formula() {
        let agent = agent();
        // 0.85 * 0.8 / (1 + 0.05 * 20) = 0.34
        let velocity = Vector3::new(12.0, 16.0, 0.0);
        assert!(agent.dodge(velocity, 0.8, 0.33));
        assert!(!agent.dodge(velocity, 0.8, 0.35));
    }

    #[test]
    fn test_adapt_grows_and_saturates() {
        let mut agent = agent();
        agent.adapt_to_situation(0.1);
        assert!((agent.experience - 0.96).abs() < 1e-12);
        assert!((agent.spider_sense - 0.805).abs() < 1e-12);

        agent.adapt_to_situation(100.0);
        assert_eq!(agent.experience, 1.0);
        assert_eq!(agent.spider_sense, 1.0);
        assert_eq!(agent.web_accuracy, 1.0);
        assert_eq!(agent.dodge_ability, 1.0);
    }

    #[test]
    fn test_negative_difficulty_never_reduces_skill() {
        let mut agent = agent();
        let before = agent.clone();
        agent.adapt_to_situation(-5.0);
        assert_eq!(agent, before);
    }
}
