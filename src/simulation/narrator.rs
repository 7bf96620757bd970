//! Receivers for per-beat outcomes
//!
//! The engine never formats narration. It hands each [`BeatOutcome`] to a
//! [`Narrator`], and rendering is the receiver's business.

use crate::simulation::outcome::BeatOutcome;

pub trait Narrator {
    fn narrate(&mut self, outcome: &BeatOutcome);
}

impl<F: FnMut(&BeatOutcome)> Narrator for F {
    fn narrate(&mut self, outcome: &BeatOutcome) {
        self(outcome)
    }
}

/// Emits each outcome as a structured `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNarrator;

impl Narrator for TracingNarrator {
    fn narrate(&mut self, outcome: &BeatOutcome) {
        tracing::info!(
            beat = outcome.beat.number(),
            tag = outcome.beat.tag(),
            payload = ?outcome.payload,
            "beat"
        );
    }
}

/// Keeps every outcome for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingNarrator {
    pub outcomes: Vec<BeatOutcome>,
}

impl RecordingNarrator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Narrator for RecordingNarrator {
    fn narrate(&mut self, outcome: &BeatOutcome) {
        self.outcomes.push(outcome.clone());
    }
}
