pub mod config;
pub mod error;
pub mod pacing;
pub mod random;
pub mod types;

pub use config::{Bounds, ForcedGates, SimulationConfig};
pub use error::{Result, SimulationError};
pub use pacing::{CancelFlag, InstantPacer, Pacer, TokioPacer};
pub use random::{RandomSource, ScriptedRandom};
pub use types::Vector3;
