use std::fs;

use hanabi_core::game::StateSnapshot;
use hanabi_replay::config::ReplayConfig;
use hanabi_replay::runner::ReplayRunner;
use tempfile::tempdir;

const ACTIONS: &str = r#"[
    {"type": "draw", "player_index": 0, "order": 0},
    {"type": "draw", "player_index": 0, "order": 1},
    {"type": "draw", "player_index": 1, "order": 2, "identity": {"suit_index": 0, "rank": 1}},
    {"type": "draw", "player_index": 1, "order": 3, "identity": {"suit_index": 3, "rank": 4}},
    {"type": "clue", "giver": 0, "target": 1, "list": [2], "clue": {"kind": "rank", "value": 1}},
    {"type": "turn", "num": 0, "current_player_index": 1},
    {"type": "play", "player_index": 1, "order": 2, "identity": {"suit_index": 0, "rank": 1}},
    {"type": "draw", "player_index": 1, "order": 4, "identity": {"suit_index": 2, "rank": 2}},
    {"type": "turn", "num": 1, "current_player_index": 0}
]"#;

fn load_config(dir: &std::path::Path) -> ReplayConfig {
    let actions = dir.join("actions.json");
    fs::write(&actions, ACTIONS).expect("write action log");

    let yaml = format!(
        r#"
run_id: "test_smoke"
table:
  players: ["Alice", "Bob"]
  our_player_index: 0
input:
  actions: "{actions}"
outputs:
  snapshot: "{snapshot}"
  reports: "{reports}"
logging:
  enable_structured: false
"#,
        actions = actions.display(),
        snapshot = dir.join("{run_id}/snapshot.json").display(),
        reports = dir.join("{run_id}/reports.jsonl").display()
    );

    let mut cfg: ReplayConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn replay_smoke_test_writes_reports_and_snapshot() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path());
    let outputs = config.resolved_outputs();
    assert!(outputs.reports.starts_with(dir.path().join("test_smoke")));

    let runner = ReplayRunner::new(config, outputs).expect("runner created");
    assert_eq!(runner.actions().len(), 9);
    let summary = runner.run().expect("replay completes");

    assert_eq!(summary.actions_applied, 9);
    assert_eq!(summary.turns, 2);
    assert_eq!(summary.score, 1);
    assert_eq!(summary.max_score, 25);
    assert!(summary.contradictions.is_empty());

    // Bob holds g2 and b4 when play returns to us: ranks 2 and 4, colours 2 and 3.
    let jsonl = fs::read_to_string(&summary.reports_path).expect("reports readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(summary.reports_written, rows.len());
    for row in &rows {
        assert_eq!(row["run_id"], "test_smoke");
        assert_eq!(row["turn"], 2);
        assert_eq!(row["giver"], 0);
        assert_eq!(row["clue"]["target"], 1);
    }

    let snapshot = fs::read_to_string(&summary.snapshot_path).expect("snapshot readable");
    let state = StateSnapshot::from_json(&snapshot)
        .expect("snapshot decodes")
        .restore()
        .expect("snapshot restores");
    assert_eq!(state.score(), 1);
    assert_eq!(state.hands[1], vec![4, 3]);
    assert_eq!(state.clue_tokens, 7);
}

#[test]
fn validation_rejects_unknown_seat() {
    let dir = tempdir().expect("temp dir");
    let mut config = load_config(dir.path());
    config.table.our_player_index = 2;
    assert!(config.validate().is_err());
}
