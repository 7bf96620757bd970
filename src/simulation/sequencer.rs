//! Beat sequencer
//!
//! Owns the config, both entities, the random source and the cross-beat
//! context for one run. Beats execute strictly in order. Between beats the
//! sequencer checks the cancel flag and hands the pacing delay to a [`Pacer`],
//! so entity state is always whole at a beat boundary.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::core::config::{ForcedGates, SimulationConfig};
use crate::core::error::{Result, SimulationError};
use crate::core::pacing::{CancelFlag, Pacer};
use crate::core::random::RandomSource;
use crate::entity::{AgentEntity, ProjectileEntity};
use crate::simulation::context::SimulationContext;
use crate::simulation::narrator::Narrator;
use crate::simulation::outcome::{Beat, BeatOutcome, BeatStep, RunReport, Verdict, BEAT_COUNT};

/// Seconds per physics step
pub const DEFAULT_TIME_STEP: f64 = 0.1;

pub struct BeatSequencer<R: RandomSource = ChaCha8Rng> {
    pub(super) config: SimulationConfig,
    pub(super) gates: ForcedGates,
    pub(super) time_step: f64,
    pub(super) rng: R,
    pub(super) bomb: ProjectileEntity,
    pub(super) agent: AgentEntity,
    pub(super) context: SimulationContext,
    seed: Option<u64>,
    completed: usize,
}

impl BeatSequencer<ChaCha8Rng> {
    /// Generate a config and entities from a seed, with every gate forced
    pub fn from_seed(seed: u64) -> Result<Self> {
        Self::from_seed_with_gates(seed, ForcedGates::default())
    }

    pub fn from_seed_with_gates(seed: u64, gates: ForcedGates) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let config = SimulationConfig::generate(&mut rng);
        let mut sequencer = Self::new(config, gates, rng)?;
        sequencer.seed = Some(seed);
        Ok(sequencer)
    }

    /// Run an injected config with a seeded random source
    pub fn seeded(config: SimulationConfig, gates: ForcedGates, seed: u64) -> Result<Self> {
        let mut sequencer = Self::new(config, gates, ChaCha8Rng::seed_from_u64(seed))?;
        sequencer.seed = Some(seed);
        Ok(sequencer)
    }
}

impl<R: RandomSource> BeatSequencer<R> {
    /// Validates the config, then spawns the agent from `rng`
    pub fn new(config: SimulationConfig, gates: ForcedGates, mut rng: R) -> Result<Self> {
        config.validate()?;
        let agent = AgentEntity::spawn(&mut rng);

        Ok(Self {
            config,
            gates,
            time_step: DEFAULT_TIME_STEP,
            rng,
            bomb: ProjectileEntity::new(),
            agent,
            context: SimulationContext::default(),
            seed: None,
            completed: 0,
        })
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn gates(&self) -> ForcedGates {
        self.gates
    }

    pub fn projectile(&self) -> &ProjectileEntity {
        &self.bomb
    }

    pub fn agent(&self) -> &AgentEntity {
        &self.agent
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn completed_beats(&self) -> usize {
        self.completed
    }

    pub fn is_finished(&self) -> bool {
        self.completed >= BEAT_COUNT
    }

    pub fn next_beat(&self) -> Option<Beat> {
        Beat::SEQUENCE.get(self.completed).copied()
    }

    /// Execute the next beat. Returns `None` once the sequence is complete.
    ///
    /// The pause is drawn here rather than in [`Self::run`] so stepping by
    /// hand consumes the random source exactly like a paced run.
    pub fn step(&mut self) -> Result<Option<BeatStep>> {
        let Some(beat) = self.next_beat() else {
            return Ok(None);
        };

        let payload = self.execute(beat);
        self.ensure_finite(beat)?;

        let pause = if beat == Beat::Impact {
            Duration::ZERO
        } else {
            Duration::from_millis(self.config.cooldown.sample(&mut self.rng))
        };
        self.completed += 1;

        tracing::debug!(beat = beat.number(), tag = beat.tag(), pause_ms = pause.as_millis() as u64, "beat executed");

        Ok(Some(BeatStep {
            outcome: BeatOutcome { beat, payload },
            pause,
        }))
    }

    /// Drive the remaining beats to completion
    ///
    /// Any failure aborts the whole run. It is logged once here and returned
    /// to the caller; no partial report is produced.
    pub async fn run<P, N>(&mut self, pacer: &mut P, narrator: &mut N, cancel: &CancelFlag) -> Result<RunReport>
    where
        P: Pacer,
        N: Narrator,
    {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id, seed = ?self.seed);

        async {
            tracing::info!(beats = BEAT_COUNT, "sequence starting");
            let result = self.drive(run_id, pacer, narrator, cancel).await;
            match &result {
                Ok(report) => tracing::info!(
                    verdict = %report.verdict,
                    victory_score = report.victory_score,
                    final_stability = report.final_stability,
                    "sequence complete"
                ),
                Err(err) if err.is_cancelled() => tracing::warn!("{}", err),
                Err(err) => tracing::error!(error = %err, beats_completed = self.completed, "sequence aborted"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn drive<P, N>(&mut self, run_id: Uuid, pacer: &mut P, narrator: &mut N, cancel: &CancelFlag) -> Result<RunReport>
    where
        P: Pacer,
        N: Narrator,
    {
        let mut paced = Duration::ZERO;

        while !self.is_finished() {
            if cancel.is_cancelled() {
                return Err(SimulationError::Cancelled { completed: self.completed });
            }
            let Some(step) = self.step()? else {
                break;
            };
            narrator.narrate(&step.outcome);
            if !step.pause.is_zero() {
                pacer.wait(step.pause).await;
                paced += step.pause;
            }
        }

        Ok(self.report(run_id, paced))
    }

    fn report(&self, run_id: Uuid, paced: Duration) -> RunReport {
        RunReport {
            run_id,
            seed: self.seed,
            verdict: Verdict::Victorious,
            victory_score: self.context.victory_score.unwrap_or_default(),
            final_stability: self.bomb.stability,
            detonated: self.context.detonated,
            beats_completed: self.completed,
            paced_ms: paced.as_millis() as u64,
        }
    }

    fn ensure_finite(&self, beat: Beat) -> Result<()> {
        if !self.bomb.is_finite() {
            return Err(SimulationError::NonFinite {
                beat: beat.number(),
                quantity: "projectile state",
            });
        }
        if !self.agent.is_finite() {
            return Err(SimulationError::NonFinite {
                beat: beat.number(),
                quantity: "agent position",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pacing::InstantPacer;
    use crate::core::random::ScriptedRandom;
    use crate::entity::ProjectileStatus;
    use crate::simulation::narrator::RecordingNarrator;

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = SimulationConfig::generate(&mut ChaCha8Rng::seed_from_u64(3));
        config.cooldown.min = 0;
        let result = BeatSequencer::new(config, ForcedGates::default(), ChaCha8Rng::seed_from_u64(3));
        assert!(matches!(result, Err(SimulationError::InvalidConfig(_))));
    }

    #[test]
    fn test_steps_through_every_beat_in_order() {
        let mut sequencer = BeatSequencer::from_seed(11).unwrap();
        let mut seen = Vec::new();
        while let Some(step) = sequencer.step().unwrap() {
            seen.push(step.outcome.beat);
            if step.outcome.beat == Beat::Impact {
                assert_eq!(step.pause, Duration::ZERO);
            } else {
                let ms = step.pause.as_millis() as u64;
                assert!(ms >= sequencer.config().cooldown.min && ms <= sequencer.config().cooldown.max);
            }
        }
        assert_eq!(seen, Beat::SEQUENCE.to_vec());
        assert!(sequencer.is_finished());
        assert!(sequencer.step().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_run_reports_fixed_verdict() {
        let mut sequencer = BeatSequencer::from_seed(2024).unwrap();
        let mut pacer = InstantPacer::new();
        let mut narrator = RecordingNarrator::new();
        let report = sequencer.run(&mut pacer, &mut narrator, &CancelFlag::new()).await.unwrap();

        assert_eq!(report.verdict, Verdict::Victorious);
        assert_eq!(report.beats_completed, BEAT_COUNT);
        assert_eq!(report.seed, Some(2024));
        assert_eq!(narrator.outcomes.len(), BEAT_COUNT);
        assert_eq!(pacer.pauses.len(), BEAT_COUNT - 1);
        assert_eq!(report.paced_ms, pacer.total().as_millis() as u64);
        assert!(report.detonated);
        assert_eq!(sequencer.projectile().status, ProjectileStatus::Exploded);
    }

    #[tokio::test]
    async fn test_infinite_time_step_aborts_at_first_move() {
        let mut sequencer = BeatSequencer::from_seed(5).unwrap().with_time_step(f64::INFINITY);
        let mut narrator = RecordingNarrator::new();
        let err = sequencer
            .run(&mut InstantPacer::new(), &mut narrator, &CancelFlag::new())
            .await
            .unwrap_err();

        assert!(matches!(err, SimulationError::NonFinite { beat: 7, .. }));
        // The failing beat is never narrated
        assert_eq!(narrator.outcomes.len(), 6);
    }

    #[test]
    fn test_scripted_source_is_deterministic() {
        let config = SimulationConfig::generate(&mut ScriptedRandom::constant(0.4));
        let mut a = BeatSequencer::new(config.clone(), ForcedGates::none(), ScriptedRandom::constant(0.4)).unwrap();
        let mut b = BeatSequencer::new(config, ForcedGates::none(), ScriptedRandom::constant(0.4)).unwrap();
        while let (Some(left), Some(right)) = (a.step().unwrap(), b.step().unwrap()) {
            assert_eq!(left, right);
        }
        assert_eq!(a.projectile(), b.projectile());
    }
}
