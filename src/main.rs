//! Pumpkin Bomb - Entry Point
//!
//! Sets up logging and the async runtime, builds a sequencer from a seed or
//! a TOML config, and narrates the run to the console.

use clap::Parser;
use pumpkin_bomb::core::error::Result;
use pumpkin_bomb::core::{CancelFlag, ForcedGates, InstantPacer, Pacer, SimulationConfig, TokioPacer};
use pumpkin_bomb::simulation::{
    BeatOutcome, BeatPayload, BeatSequencer, RecordingNarrator, RunReport,
};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// Run the pumpkin bomb sequence
#[derive(Parser, Debug)]
#[command(name = "pumpkin-bomb")]
#[command(about = "Run the scripted bomb-versus-defender beat sequence")]
struct Args {
    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Load the run config from a TOML file instead of generating it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the pacing delay between beats
    #[arg(long)]
    instant: bool,

    /// Roll every normally guaranteed gate instead of forcing success
    #[arg(long)]
    probabilistic: bool,

    /// Print the run report and every beat outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let gates = if args.probabilistic { ForcedGates::none() } else { ForcedGates::all() };

    let mut sequencer = match &args.config {
        Some(path) => BeatSequencer::seeded(SimulationConfig::load(path)?, gates, seed)?,
        None => BeatSequencer::from_seed_with_gates(seed, gates)?,
    };
    tracing::info!(seed, probabilistic = args.probabilistic, "sequencer ready");

    let rt = Runtime::new()?;
    let cancel = CancelFlag::new();

    if args.json {
        let mut narrator = RecordingNarrator::new();
        let report = if args.instant {
            rt.block_on(sequencer.run(&mut InstantPacer::new(), &mut narrator, &cancel))?
        } else {
            rt.block_on(sequencer.run(&mut TokioPacer, &mut narrator, &cancel))?
        };
        let output = serde_json::json!({ "report": report, "beats": narrator.outcomes });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string()));
        return Ok(());
    }

    let report = if args.instant {
        run_to_console(&rt, &mut sequencer, &mut InstantPacer::new(), &cancel)?
    } else {
        run_to_console(&rt, &mut sequencer, &mut TokioPacer, &cancel)?
    };
    println!();
    println!("Sequence completed with result: {}", report.verdict);
    println!("{}", report.summary());
    println!("Seed: {}", seed);

    Ok(())
}

fn run_to_console<P: Pacer>(
    rt: &Runtime,
    sequencer: &mut BeatSequencer,
    pacer: &mut P,
    cancel: &CancelFlag,
) -> Result<RunReport> {
    let mut narrator = |outcome: &BeatOutcome| println!("{}", render(outcome));
    rt.block_on(sequencer.run(pacer, &mut narrator, cancel))
}

fn render(outcome: &BeatOutcome) -> String {
    let tag = outcome.beat.tag();
    let detail = match &outcome.payload {
        BeatPayload::Ready => String::new(),
        BeatPayload::Launched { velocity, .. } => format!("IN MOTION, velocity {}", velocity),
        BeatPayload::ThreatDetected { detected } => {
            if *detected { "ACTIVATED".into() } else { "TINGLING".into() }
        }
        BeatPayload::Trajectory { direction_degrees, speed } => {
            format!("direction {:.2}°, speed {:.2} m/s", direction_degrees, speed)
        }
        BeatPayload::Stance { stance } => format!("{:?}", stance).to_uppercase(),
        BeatPayload::Dodge { success, position } => format!(
            "{}, new position {}",
            if *success { "SUCCESS" } else { "PARTIAL" },
            position
        ),
        BeatPayload::BombMoved { position } => format!("{}", position),
        BeatPayload::Tracking { focus } => format!("{:?}", focus).to_uppercase(),
        BeatPayload::Awareness { level } => format!("awareness {:.2}%", level * 100.0),
        BeatPayload::Coordinates { position } => format!("{}", position),
        BeatPayload::WebShot { hit, angle_degrees, velocity } => format!(
            "{}, trajectory {:.2}°, velocity {:.2} m/s",
            if *hit { "HIT" } else { "NEAR MISS" },
            angle_degrees,
            velocity
        ),
        BeatPayload::WebConnection { connected } => {
            if *connected { "SUCCESS".into() } else { "PARTIAL".into() }
        }
        BeatPayload::Tether { attachment, .. } => format!("{:?}", attachment).to_uppercase(),
        BeatPayload::TetherStability { stable, tension_force } => format!(
            "{}, tension force {} N",
            if *stable { "STABLE" } else { "ADJUSTING" },
            tension_force
        ),
        BeatPayload::TargetDirection { direction, .. } => format!("direction {}", direction),
        BeatPayload::ThrowerTracking { tracked, estimate } => format!(
            "{}, estimated position {}",
            if *tracked { "LOCKED" } else { "PARTIAL" },
            estimate
        ),
        BeatPayload::TargetLock { engaged, precision } => format!(
            "{}, lock precision {:.2}%",
            if *engaged { "ENGAGED" } else { "PARTIAL" },
            precision * 100.0
        ),
        BeatPayload::ThrowSolution { angle_degrees, force } => {
            format!("angle {:.2}°, force {:.2} N", angle_degrees, force)
        }
        BeatPayload::Swing { success, velocity } => format!(
            "{}, velocity {}",
            if *success { "SUCCESS" } else { "FUMBLED" },
            velocity
        ),
        BeatPayload::Release { released } => {
            if *released { "RELEASED".into() } else { "HELD".into() }
        }
        BeatPayload::ReturnEstimate { seconds } => format!("estimated return time {:.2} s", seconds),
        BeatPayload::VelocityAdjusted { velocity, .. } => format!("new velocity {}", velocity),
        BeatPayload::Focus { maintained } => {
            if *maintained { "MAINTAINED".into() } else { "SLIPPING".into() }
        }
        BeatPayload::Proximity { detected, distance } => format!(
            "{}, distance to target {:.2} m",
            if *detected { "ACTIVE" } else { "SILENT" },
            distance
        ),
        BeatPayload::Detonation { detonated } => {
            if *detonated { "SUCCESS".into() } else { "DUD".into() }
        }
        BeatPayload::Impact { victory_score, .. } => {
            format!("situation control {:.2}%", victory_score * 100.0)
        }
    };

    if detail.is_empty() {
        format!("[{:>2}] {}", outcome.beat.number(), tag)
    } else {
        format!("[{:>2}] {} - {}", outcome.beat.number(), tag, detail)
    }
}
