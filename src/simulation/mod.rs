//! Beat simulation
//!
//! The sequencer drives a fixed run of 29 beats between a thrown bomb and a
//! defending agent. Outcomes go to a [`Narrator`]; pauses go to a [`Pacer`].

pub mod beats;
pub mod context;
pub mod narrator;
pub mod outcome;
pub mod sequencer;

pub use beats::PROXIMITY_THRESHOLD;
pub use context::{Attachment, SimulationContext, Stance, ThrowSolution, TrackingFocus, Trajectory};
pub use narrator::{Narrator, RecordingNarrator, TracingNarrator};
pub use outcome::{Beat, BeatOutcome, BeatPayload, BeatStep, RunReport, Verdict, BEAT_COUNT};
pub use sequencer::{BeatSequencer, DEFAULT_TIME_STEP};

use crate::core::error::Result;
use crate::core::pacing::{CancelFlag, TokioPacer};

/// Run one full sequence with a fresh random seed, real pacing and tracing
/// narration
pub async fn run_simulation() -> Result<Verdict> {
    let seed = rand::random::<u64>();
    let mut sequencer = BeatSequencer::from_seed(seed)?;
    let mut pacer = TokioPacer;
    let report = sequencer
        .run(&mut pacer, &mut TracingNarrator, &CancelFlag::new())
        .await?;
    Ok(report.verdict)
}
