use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use hanabi_bot::{ClueEvaluator, ClueReport, EvalFeatures};
use hanabi_core::error::ActionError;
use hanabi_core::game::{ActionOutcome, Game, StateSnapshot};
use hanabi_core::model::Action;
use hanabi_core::update_turn::TurnReport;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ReplayConfig, ResolvedOutputs};

/// Replays an action log through the core and records clue reports on each
/// of our turns.
pub struct ReplayRunner {
    config: ReplayConfig,
    outputs: ResolvedOutputs,
    actions: Vec<Action>,
    evaluator: ClueEvaluator,
}

/// Summary details returned after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub actions_applied: usize,
    pub turns: usize,
    pub reports_written: usize,
    pub contradictions: Vec<usize>,
    pub score: usize,
    pub max_score: usize,
    pub snapshot_path: PathBuf,
    pub reports_path: PathBuf,
}

#[derive(Serialize)]
struct ReportRow<'a> {
    run_id: &'a str,
    #[serde(flatten)]
    report: &'a ClueReport,
}

impl ReplayRunner {
    /// Build a runner, reading the action log named by the configuration.
    pub fn new(config: ReplayConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let actions = load_actions(&outputs.actions)?;
        Ok(Self::with_actions(config, outputs, actions))
    }

    pub fn with_actions(config: ReplayConfig, outputs: ResolvedOutputs, actions: Vec<Action>) -> Self {
        let features = EvalFeatures::from_env();
        let features = features.with_logging(features.log_reports() || config.logging.clue_details);
        Self {
            config,
            outputs,
            actions,
            evaluator: ClueEvaluator::new(features),
        }
    }

    pub fn evaluator(&self) -> &ClueEvaluator {
        &self.evaluator
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Apply every action, streaming JSONL report rows to disk, then write
    /// the final state snapshot.
    pub fn run(&self) -> Result<ReplaySummary, RunnerError> {
        ensure_parent(self.outputs.reports.parent())?;
        ensure_parent(self.outputs.snapshot.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.reports)?);
        let mut game = Game::new(self.config.table_config());
        let us = game.state.our_player_index();

        let mut turns = 0usize;
        let mut reports_written = 0usize;
        let mut contradictions = Vec::new();

        for (index, action) in self.actions.iter().enumerate() {
            let outcome = game
                .handle_action(action)
                .map_err(|source| RunnerError::Action { index, source })?;

            let ActionOutcome::TurnAdvanced(report) = outcome else {
                continue;
            };
            turns += 1;
            log_turn(&self.config.run_id, game.state.turn_count, &report);
            contradictions.extend(report.contradictions);

            if game.state.current_player_index == us && !game.state.ended() {
                for clue_report in self.evaluator.evaluate(&game, us) {
                    let row = ReportRow {
                        run_id: &self.config.run_id,
                        report: &clue_report,
                    };
                    serde_json::to_writer(&mut writer, &row)?;
                    writer.write_all(b"\n")?;
                    reports_written += 1;
                }
            }
        }

        writer.flush()?;

        let snapshot = StateSnapshot::to_json(&game.state)?;
        fs::write(&self.outputs.snapshot, snapshot)?;

        Ok(ReplaySummary {
            actions_applied: self.actions.len(),
            turns,
            reports_written,
            contradictions,
            score: game.state.score(),
            max_score: game.state.max_score(),
            snapshot_path: self.outputs.snapshot.clone(),
            reports_path: self.outputs.reports.clone(),
        })
    }
}

fn load_actions(path: &Path) -> Result<Vec<Action>, RunnerError> {
    let file = File::open(path).map_err(|source| RunnerError::ReadActions {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| RunnerError::ParseActions {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn log_turn(run_id: &str, turn: usize, report: &TurnReport) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    if report == &TurnReport::default() {
        return;
    }

    event!(
        target: "hanabi_replay::turn",
        Level::INFO,
        run_id,
        turn,
        advanced = ?report.advanced,
        invalidated = ?report.invalidated,
        exhausted = ?report.exhausted,
        contradictions = ?report.contradictions,
    );
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize output: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("failed to read action log {path:?}: {source}")]
    ReadActions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse action log {path:?}: {source}")]
    ParseActions {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("action {index} rejected: {source}")]
    Action {
        index: usize,
        #[source]
        source: ActionError,
    },
}
