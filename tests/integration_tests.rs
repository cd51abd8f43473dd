//! Integration tests for scripted play and the replay binary

use std::process::Command as Process;

use blockfall::core::{
    Engine, EngineConfig, Grid, LevelTracker, Outcome, RandomSource, SequenceSource,
};
use blockfall::types::{Command, PieceKind};

fn run_script(engine: &mut Engine<SequenceSource>, script: &str) -> Vec<Outcome> {
    script
        .chars()
        .map(|c| engine.apply(Command::from_script_char(c).unwrap()))
        .collect()
}

#[test]
fn test_tetris_with_four_vertical_i_pieces() {
    // Bottom four rows full except column 9
    let mut rows = vec![vec![0u8; 10]; 25];
    for row in rows.iter_mut().skip(21) {
        *row = vec![3, 3, 3, 3, 3, 3, 3, 3, 3, 0];
    }
    let grid = Grid::from_rows(&rows).unwrap();
    let mut engine = Engine::with_grid(
        EngineConfig::default(),
        SequenceSource::repeat(PieceKind::I),
        grid,
    )
    .unwrap();

    // Vertical I uses box column 1, so the anchor goes to x = 8
    let outcomes = run_script(&mut engine, "urrrrx");
    let lock = outcomes
        .last()
        .and_then(Outcome::lock)
        .expect("hard drop locks");

    assert_eq!(lock.lines_removed(), 4);
    assert_eq!(lock.clear.cleared_rows, vec![21, 22, 23, 24]);
    assert_eq!(lock.clear.score_bonus, 800);
    assert_eq!(lock.drop_bonus, 20);
    assert_eq!(engine.score().value(), 820);
    assert!(engine.grid().is_empty());
}

#[test]
fn test_level_tracker_follows_lock_events() {
    let mut rows = vec![vec![0u8; 10]; 25];
    for row in rows.iter_mut().skip(15) {
        *row = vec![5, 5, 5, 5, 0, 0, 0, 0, 5, 5];
    }
    let grid = Grid::from_rows(&rows).unwrap();
    let config = EngineConfig::default();
    let mut engine =
        Engine::with_grid(config, SequenceSource::repeat(PieceKind::I), grid).unwrap();
    let mut levels = LevelTracker::new(config.lines_per_level);

    let mut level_ups = Vec::new();
    for _ in 0..10 {
        let drop = engine.hard_drop();
        let lock = drop.lock.unwrap();
        assert_eq!(lock.lines_removed(), 1);
        if let Some(level) = levels.record(&lock.clear) {
            level_ups.push(level);
        }
    }

    assert_eq!(levels.lines(), 10);
    assert_eq!(level_ups, vec![2]);
    assert!(engine.grid().is_empty());
}

#[test]
fn test_hold_then_swap_back() {
    let mut engine = Engine::new(
        EngineConfig::default(),
        SequenceSource::new([PieceKind::T, PieceKind::O, PieceKind::Z]).unwrap(),
    )
    .unwrap();

    // Hold T, drop O, swap T back in for Z
    run_script(&mut engine, "hxh");
    assert_eq!(engine.active_kind(), PieceKind::T);
    assert_eq!(engine.held_piece(), Some(PieceKind::Z));
    assert!(!engine.can_hold());
}

#[test]
fn test_snapshot_serializes_to_json() {
    let mut engine = Engine::new(EngineConfig::default(), RandomSource::new(5)).unwrap();
    engine.apply(Command::HardDrop);
    engine.apply(Command::Hold);

    let snapshot = engine.snapshot();
    let value = serde_json::to_value(&snapshot).unwrap();

    let grid = value["grid"].as_array().unwrap();
    assert_eq!(grid.len(), 25);
    assert_eq!(grid[0].as_array().unwrap().len(), 10);
    assert_eq!(value["queue"].as_array().unwrap().len(), 3);
    assert_eq!(value["status"], "Running");
    assert_eq!(value["can_hold"], false);
    assert_eq!(value["score"], snapshot.score);
    assert!(value["held"].is_string());
    assert_eq!(value["view"]["x"], 4);
}

#[test]
fn test_config_round_trips_through_json() {
    let config = EngineConfig {
        width: 12,
        queue_depth: 5,
        ..EngineConfig::default()
    };
    let text = serde_json::to_string(&config).unwrap();
    let back: EngineConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, config);

    // Missing fields fall back to defaults
    let partial: EngineConfig = serde_json::from_str(r#"{"width": 14}"#).unwrap();
    assert_eq!(partial.width, 14);
    assert_eq!(partial.height, 25);
    assert!(partial.validate().is_ok());
}

#[test]
fn test_replay_binary_prints_grid_and_score() {
    let output = Process::new(env!("CARGO_BIN_EXE_blockfall"))
        .args(["--seed", "7", "xxx"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    // 23 visible rows, then the summary
    assert!(lines.len() >= 24);
    assert!(lines[..23].iter().all(|l| l.len() == 10));
    assert!(lines[23].starts_with("score: "));
    assert!(lines.last().unwrap().ends_with("seed: 7"));
}

#[test]
fn test_replay_binary_summary_reports_hold_and_status() {
    let output = Process::new(env!("CARGO_BIN_EXE_blockfall"))
        .args(["--seed", "3", "h"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let summary = stdout.lines().last().unwrap();

    let mut engine = Engine::new(EngineConfig::default(), RandomSource::new(3)).unwrap();
    let held = engine.active_kind();
    engine.hold();
    assert_eq!(
        summary,
        format!("held: {}  status: running  seed: 3", held.as_str())
    );
}

#[test]
fn test_replay_binary_help_and_bad_flags() {
    let help = Process::new(env!("CARGO_BIN_EXE_blockfall"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(help.status.success());
    assert!(String::from_utf8(help.stdout).unwrap().contains("--seed"));

    let missing = Process::new(env!("CARGO_BIN_EXE_blockfall"))
        .arg("--seed")
        .output()
        .unwrap();
    assert!(!missing.status.success());

    let not_a_number = Process::new(env!("CARGO_BIN_EXE_blockfall"))
        .args(["--seed", "abc", "x"])
        .output()
        .unwrap();
    assert!(!not_a_number.status.success());
}

#[test]
fn test_replay_binary_json_matches_library() {
    let output = Process::new(env!("CARGO_BIN_EXE_blockfall"))
        .args(["--json", "--seed", "11", "lluxrx"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let mut engine = Engine::new(EngineConfig::default(), RandomSource::new(11)).unwrap();
    for c in "lluxrx".chars() {
        engine.apply(Command::from_script_char(c).unwrap());
    }
    assert_eq!(printed, serde_json::to_value(engine.snapshot()).unwrap());
}

#[test]
fn test_replay_binary_rejects_unknown_command() {
    let output = Process::new(env!("CARGO_BIN_EXE_blockfall"))
        .arg("lq")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
