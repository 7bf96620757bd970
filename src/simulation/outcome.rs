//! Per-beat records and the final run report

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::core::types::Vector3;
use crate::simulation::context::{Attachment, Stance, TrackingFocus};

pub const BEAT_COUNT: usize = 29;

/// The fixed beat sequence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Beat {
    Ready,
    Launch,
    DetectThreat,
    ReadTrajectory,
    Stance,
    Evade,
    BombAdvance,
    TrackBomb,
    CriticalPoint,
    Awareness,
    Triangulate,
    Reconfirm,
    ShootWeb,
    WebConnection,
    Tether,
    TetherStability,
    ReacquireTarget,
    TrackThrower,
    TargetLock,
    ThrowSolution,
    Swing,
    Release,
    Return,
    AdjustTrajectory,
    MaintainFocus,
    Proximity,
    FinalAdjustment,
    Detonation,
    Impact,
}

impl Beat {
    pub const SEQUENCE: [Beat; BEAT_COUNT] = [
        Beat::Ready,
        Beat::Launch,
        Beat::DetectThreat,
        Beat::ReadTrajectory,
        Beat::Stance,
        Beat::Evade,
        Beat::BombAdvance,
        Beat::TrackBomb,
        Beat::CriticalPoint,
        Beat::Awareness,
        Beat::Triangulate,
        Beat::Reconfirm,
        Beat::ShootWeb,
        Beat::WebConnection,
        Beat::Tether,
        Beat::TetherStability,
        Beat::ReacquireTarget,
        Beat::TrackThrower,
        Beat::TargetLock,
        Beat::ThrowSolution,
        Beat::Swing,
        Beat::Release,
        Beat::Return,
        Beat::AdjustTrajectory,
        Beat::MaintainFocus,
        Beat::Proximity,
        Beat::FinalAdjustment,
        Beat::Detonation,
        Beat::Impact,
    ];

    /// 1-based position in the sequence
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::SEQUENCE.get(usize::from(number).checked_sub(1)?).copied()
    }

    /// Narrative tag handed to the narrator
    pub fn tag(self) -> &'static str {
        match self {
            Beat::Ready => "THROWER_READYING",
            Beat::Launch => "THROWER_RELEASE",
            Beat::DetectThreat => "DEFENDER_ALERT",
            Beat::ReadTrajectory => "DEFENDER_DETECTING_TRAJECTORY",
            Beat::Stance => "DEFENDER_READY_STANCE",
            Beat::Evade => "DEFENDER_EVASIVE_MANEUVERS",
            Beat::BombAdvance => "BOMB_NEW_POSITION",
            Beat::TrackBomb => "DEFENDER_TRACKING",
            Beat::CriticalPoint => "BOMB_CRITICAL_POINT",
            Beat::Awareness => "DEFENDER_AWARENESS",
            Beat::Triangulate => "DEFENDER_POSITION_TRIANGULATED",
            Beat::Reconfirm => "DEFENDER_RECONFIRM_COORDINATES",
            Beat::ShootWeb => "DEFENDER_WEB_DEPLOYED",
            Beat::WebConnection => "DEFENDER_WEB_CONNECTION",
            Beat::Tether => "BOMB_TETHER",
            Beat::TetherStability => "DEFENDER_TETHER_STABILITY",
            Beat::ReacquireTarget => "DEFENDER_TARGET_REACQUIRED",
            Beat::TrackThrower => "DEFENDER_TRACKING_TARGET",
            Beat::TargetLock => "DEFENDER_TARGET_LOCK",
            Beat::ThrowSolution => "DEFENDER_TRAJECTORY_CALCULATION",
            Beat::Swing => "DEFENDER_SWING",
            Beat::Release => "BOMB_RELEASED",
            Beat::Return => "BOMB_RETURNING",
            Beat::AdjustTrajectory => "BOMB_TRAJECTORY_ADJUSTED",
            Beat::MaintainFocus => "DEFENDER_MAINTAINING_FOCUS",
            Beat::Proximity => "BOMB_PROXIMITY_DETECTION",
            Beat::FinalAdjustment => "BOMB_FINAL_ADJUSTMENT",
            Beat::Detonation => "BOMB_DETONATION",
            Beat::Impact => "THROWER_IMPACT_REGISTERED",
        }
    }
}

/// The only verdict a completed run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Spider-Man Victorious")]
    Victorious,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Victorious => "Spider-Man Victorious",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Beat-specific results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BeatPayload {
    Ready,
    Launched { velocity: Vector3, stability: f64 },
    ThreatDetected { detected: bool },
    Trajectory { direction_degrees: f64, speed: f64 },
    Stance { stance: Stance },
    Dodge { success: bool, position: Vector3 },
    BombMoved { position: Vector3 },
    Tracking { focus: TrackingFocus },
    Awareness { level: f64 },
    Coordinates { position: Vector3 },
    WebShot { hit: bool, angle_degrees: f64, velocity: f64 },
    WebConnection { connected: bool },
    Tether { attachment: Attachment, stability: f64 },
    TetherStability { stable: bool, tension_force: i64 },
    TargetDirection { direction: Vector3, distance: f64 },
    ThrowerTracking { tracked: bool, estimate: Vector3 },
    TargetLock { engaged: bool, precision: f64 },
    ThrowSolution { angle_degrees: f64, force: f64 },
    Swing { success: bool, velocity: Vector3 },
    Release { released: bool },
    ReturnEstimate { seconds: f64 },
    VelocityAdjusted { factor: f64, velocity: Vector3 },
    Focus { maintained: bool },
    Proximity { detected: bool, distance: f64 },
    Detonation { detonated: bool },
    Impact { victory_score: f64, verdict: Verdict },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatOutcome {
    pub beat: Beat,
    pub payload: BeatPayload,
}

/// One executed beat plus the pause to wait before the next
#[derive(Debug, Clone, PartialEq)]
pub struct BeatStep {
    pub outcome: BeatOutcome,
    pub pause: Duration,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub seed: Option<u64>,
    pub verdict: Verdict,
    pub victory_score: f64,
    pub final_stability: f64,
    pub detonated: bool,
    pub beats_completed: usize,
    pub paced_ms: u64,
}

impl RunReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} after {} beats\nSituation control {:.2}%, bomb stability {:.0}, paced {}ms",
            self.verdict,
            self.beats_completed,
            self.victory_score * 100.0,
            self.final_stability,
            self.paced_ms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beat_numbers_follow_sequence() {
        for (index, beat) in Beat::SEQUENCE.iter().enumerate() {
            assert_eq!(usize::from(beat.number()), index + 1);
            assert_eq!(Beat::from_number(beat.number()), Some(*beat));
        }
        assert_eq!(Beat::Impact.number(), 29);
        assert_eq!(Beat::from_number(0), None);
        assert_eq!(Beat::from_number(30), None);
    }

    #[test]
    fn test_verdict_serializes_as_phrase() {
        let json = serde_json::to_string(&Verdict::Victorious).unwrap();
        assert_eq!(json, "\"Spider-Man Victorious\"");
        assert_eq!(Verdict::Victorious.to_string(), "Spider-Man Victorious");
    }

    #[test]
    fn test_payload_is_tagged_by_kind() {
        let outcome = BeatOutcome {
            beat: Beat::WebConnection,
            payload: BeatPayload::WebConnection { connected: true },
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["payload"]["kind"], "web_connection");
        assert_eq!(value["payload"]["connected"], true);
    }
}
