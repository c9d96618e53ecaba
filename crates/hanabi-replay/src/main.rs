use std::path::PathBuf;

use clap::Parser;

use hanabi_replay::config::{ReplayConfig, ResolvedOutputs};
use hanabi_replay::logging::init_logging;
use hanabi_replay::runner::ReplayRunner;

/// Replays a recorded Hanabi action log and reports clue effects on our turns.
#[derive(Debug, Parser)]
#[command(
    name = "hanabi-replay",
    author,
    version,
    about = "Action-log replay harness for the Hanabi epistemic core"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "replay/replay.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the action log path.
    #[arg(long, value_name = "FILE")]
    actions: Option<String>,

    /// Override which seat the bot occupies.
    #[arg(long, value_name = "SEAT")]
    seat: Option<usize>,

    /// Exit after validating the configuration (no replay is run).
    #[arg(long)]
    validate_only: bool,

    /// Log every evaluated clue regardless of config (same as HANABI_EVAL_LOG=1).
    #[arg(long)]
    log_clue_details: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ReplayConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(actions) = cli.actions {
        config.input.actions = actions;
    }

    if let Some(seat) = cli.seat {
        config.table.our_player_index = seat;
    }

    if cli.log_clue_details {
        config.logging.clue_details = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let player_count = config.table.players.len();

    println!(
        "Loaded configuration '{run_id}' for a {player_count}-player '{}' table (seat {})",
        config.table.variant.name, config.table.our_player_index
    );

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = ReplayRunner::new(config, outputs)?;

    if cli.validate_only {
        println!(
            "Validation-only mode: {} actions parsed, replay skipped.",
            runner.actions().len()
        );
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Replay complete for '{run_id}': {} actions over {} turns, score {}/{}",
        summary.actions_applied, summary.turns, summary.score, summary.max_score
    );
    println!(
        "Clue reports: {} rows at {}",
        summary.reports_written,
        summary.reports_path.display()
    );
    println!("State snapshot: {}", summary.snapshot_path.display());
    if !summary.contradictions.is_empty() {
        println!(
            "Belief contradictions reset on orders {:?}",
            summary.contradictions
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
