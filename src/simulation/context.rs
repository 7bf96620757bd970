//! Values carried from one beat to later beats
//!
//! Each field is written by exactly one beat (noted on the field) and only
//! read by beats that come after it.

use serde::{Deserialize, Serialize};

use crate::core::types::Vector3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    Braced,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingFocus {
    Locked,
    #[default]
    Partial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attachment {
    Connected,
    #[default]
    Glancing,
}

/// Observed bomb flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub direction_degrees: f64,
    pub speed: f64,
}

/// Angle and force for the return throw
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThrowSolution {
    pub angle_degrees: f64,
    pub force: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationContext {
    /// Beat 3
    pub threat_detected: bool,
    /// Beat 4
    pub bomb_trajectory: Trajectory,
    /// Beat 5
    pub stance: Stance,
    /// Beat 6
    pub dodge_succeeded: bool,
    /// Beat 8
    pub tracking_focus: TrackingFocus,
    /// Beat 10
    pub awareness: f64,
    /// Beat 11
    pub triangulated: Vector3,
    /// Beat 12
    pub refined: Vector3,
    /// Beat 13
    pub web_hit: bool,
    /// Beat 13
    pub web_trajectory: Trajectory,
    /// Beat 14
    pub web_connected: bool,
    /// Beat 15
    pub attachment: Attachment,
    /// Beat 16
    pub tether_stable: bool,
    /// Beat 16, newtons
    pub tension_force: i64,
    /// Beat 17
    pub thrower_position: Vector3,
    /// Beat 17, unnormalized
    pub direction_to_thrower: Vector3,
    /// Beat 17
    pub distance_to_thrower: f64,
    /// Beat 18
    pub tracking_accuracy: f64,
    /// Beat 18
    pub thrower_tracked: bool,
    /// Beat 18
    pub thrower_estimate: Vector3,
    /// Beat 19
    pub target_locked: bool,
    /// Beat 19
    pub lock_precision: f64,
    /// Beat 20
    pub throw_solution: ThrowSolution,
    /// Beat 21
    pub swing_succeeded: bool,
    /// Beat 21
    pub swing_velocity: Vector3,
    /// Beat 22
    pub released: bool,
    /// Beat 23, seconds
    pub return_time: f64,
    /// Beat 24
    pub accuracy_factor: f64,
    /// Beat 25
    pub focus_maintained: bool,
    /// Beat 26
    pub distance_to_target: f64,
    /// Beat 26
    pub proximity_detected: bool,
    /// Beat 27
    pub final_factor: f64,
    /// Beat 28
    pub detonated: bool,
    /// Beat 29
    pub victory_score: Option<f64>,
}
