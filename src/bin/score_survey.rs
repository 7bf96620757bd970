//! Victory score survey
//!
//! Runs many seeded sequences back to back with instant pacing and reports
//! the observed victory score and stability ranges.

use clap::Parser;
use pumpkin_bomb::core::error::Result;
use pumpkin_bomb::core::{CancelFlag, ForcedGates, InstantPacer};
use pumpkin_bomb::simulation::{BeatOutcome, BeatSequencer};
use serde::Serialize;
use tokio::runtime::Runtime;

/// Survey victory scores across seeds
#[derive(Parser, Debug)]
#[command(name = "score_survey")]
#[command(about = "Run many seeded sequences and report the victory score range")]
struct Args {
    /// Number of runs
    #[arg(long, default_value_t = 1000)]
    runs: u64,

    /// First seed; run i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Roll every normally guaranteed gate
    #[arg(long)]
    probabilistic: bool,
}

#[derive(Serialize)]
struct Survey {
    runs: u64,
    first_seed: u64,
    min_score: f64,
    max_score: f64,
    mean_score: f64,
    min_stability: f64,
    max_stability: f64,
    detonations: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let gates = if args.probabilistic { ForcedGates::none() } else { ForcedGates::all() };
    let rt = Runtime::new()?;
    let cancel = CancelFlag::new();

    let mut survey = Survey {
        runs: 0,
        first_seed: args.seed,
        min_score: f64::INFINITY,
        max_score: f64::NEG_INFINITY,
        mean_score: 0.0,
        min_stability: f64::INFINITY,
        max_stability: f64::NEG_INFINITY,
        detonations: 0,
    };
    let mut total = 0.0;

    for offset in 0..args.runs {
        let seed = args.seed.wrapping_add(offset);
        let mut sequencer = BeatSequencer::from_seed_with_gates(seed, gates)?;
        let mut silent = |_: &BeatOutcome| {};
        let report = rt.block_on(sequencer.run(&mut InstantPacer::new(), &mut silent, &cancel))?;

        survey.runs += 1;
        survey.min_score = survey.min_score.min(report.victory_score);
        survey.max_score = survey.max_score.max(report.victory_score);
        survey.min_stability = survey.min_stability.min(report.final_stability);
        survey.max_stability = survey.max_stability.max(report.final_stability);
        if report.detonated {
            survey.detonations += 1;
        }
        total += report.victory_score;
    }

    if survey.runs > 0 {
        survey.mean_score = total / survey.runs as f64;
    }

    println!("{}", serde_json::to_string_pretty(&survey).unwrap_or_else(|_| "{}".to_string()));
    Ok(())
}
