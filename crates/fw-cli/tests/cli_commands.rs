#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable
#![allow(missing_docs)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a temp directory holding a small spawn file.
fn spawn_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("spawns.json"),
        r#"{
    "spawns": [
        { "name": "imp", "type_id": 7, "coords": { "x": 100, "z": 100, "level": 0 }, "count": 3 },
        { "name": "guard", "type_id": 12, "coords": { "x": 160, "z": 100, "level": 0 }, "content_group": 2 }
    ]
}
"#,
    )
    .unwrap();
    dir
}

#[test]
fn run_reports_population_and_zones() {
    let dir = spawn_dir();
    Command::cargo_bin("fw")
        .unwrap()
        .args(["run", "--ticks", "10", "--seed", "7"])
        .arg("--spawns")
        .arg(dir.path().join("spawns.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Fenwold run"))
        .stdout(predicate::str::contains("4 npcs live"))
        .stdout(predicate::str::contains("4 spawned"))
        .stdout(predicate::str::contains("populated zones"));
}

#[test]
fn run_without_spawn_file_uses_synthetic_population() {
    Command::cargo_bin("fw")
        .unwrap()
        .args(["run", "--npcs", "5", "--ticks", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 npcs live"));
}

#[test]
fn run_is_deterministic_per_seed() {
    let dir = spawn_dir();
    let output = |seed: &str| {
        Command::cargo_bin("fw")
            .unwrap()
            .args(["run", "--ticks", "25", "--seed", seed])
            .arg("--spawns")
            .arg(dir.path().join("spawns.json"))
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(output("11"), output("11"));
}

#[test]
fn zones_reports_initial_occupancy() {
    let dir = spawn_dir();
    Command::cargo_bin("fw")
        .unwrap()
        .arg("zones")
        .arg("--spawns")
        .arg(dir.path().join("spawns.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Zone occupancy"))
        .stdout(predicate::str::contains("zone(12, 12, 0)"))
        .stdout(predicate::str::contains("zone(20, 12, 0)"));
}

#[test]
fn missing_spawn_file_fails_cleanly() {
    Command::cargo_bin("fw")
        .unwrap()
        .args(["zones", "--spawns", "no-such-file.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
