//! Pumpkin Bomb - scripted bomb-versus-defender beat simulation

pub mod core;
pub mod entity;
pub mod simulation;

pub use crate::simulation::run_simulation;
