use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_fleetsim")
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("fleetsim-{name}-{stamp}.{extension}"))
}

const SCENARIO_YAML: &str = r#"
trials: 2000
seed: 11
attacker:
  - class: interceptor
    count: 2
    initiative: 3
    ion_cannons: 1
    hull: 1
defender:
  - class: ancient
    initiative: 2
    ion_cannons: 2
    hull: 2
    computer: 1
    shield: 1
"#;

const LEGACY_CONF: &str = "\
Type : Cruiser Count : 2 Init : 2 IC : 1 PC : 0 AC : 0 IM : 0 PM : 0 Hull : 2 Comp : 1 Shield : 0
Type : Interceptor Count : 1 Init : 3 IC : 1 PC : 0 AC : 0 IM : 0 PM : 0 Hull : 1 Comp : 0 Shield : 0
Type : Dreadnought Count : 0 Init : 1 IC : 2 PC : 0 AC : 0 IM : 0 PM : 0 Hull : 3 Comp : 0 Shield : 0
Type : Alien Count : 1 Init : 2 IC : 2 PC : 0 AC : 0 IM : 0 PM : 0 Hull : 3 Comp : 1 Shield : 1
";

#[test]
fn simulate_command_emits_json_summary() {
    let path = unique_temp_path("simulate", "yaml");
    fs::write(&path, SCENARIO_YAML).expect("fixture should be written");

    let output = Command::new(bin())
        .args(["simulate", path.to_string_lossy().as_ref()])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("simulate should emit json");
    assert_eq!(payload["trials"], 2000);
    assert_eq!(payload["seed"], 11);
    assert_eq!(payload["attacker_units"], 2);
    assert_eq!(payload["defender_units"], 1);
    let rate = payload["win_rate"].as_f64().expect("win_rate is a number");
    assert!((0.0..=1.0).contains(&rate));

    let _ = fs::remove_file(path);
}

#[test]
fn simulate_positionals_override_scenario_settings() {
    let path = unique_temp_path("override", "yaml");
    fs::write(&path, SCENARIO_YAML).expect("fixture should be written");

    let output = Command::new(bin())
        .args(["simulate", path.to_string_lossy().as_ref(), "300", "5", "--workers", "2"])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("simulate should emit json");
    assert_eq!(payload["trials"], 300);
    assert_eq!(payload["seed"], 5);

    let _ = fs::remove_file(path);
}

#[test]
fn simulate_summary_prints_a_percentage_for_legacy_conf() {
    let path = unique_temp_path("legacy", "txt");
    fs::write(&path, LEGACY_CONF).expect("fixture should be written");

    let output = Command::new(bin())
        .args(["simulate", path.to_string_lossy().as_ref(), "1000", "3", "--summary"])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Winning %: "), "unexpected output: {stdout}");

    let _ = fs::remove_file(path);
}

#[test]
fn simulate_with_missing_scenario_runs_empty_forces() {
    let path = unique_temp_path("missing", "yaml");

    let output = Command::new(bin())
        .args(["simulate", path.to_string_lossy().as_ref(), "10", "1"])
        .output()
        .expect("simulate should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("simulate should emit json");
    assert_eq!(payload["attacker_units"], 0);
    assert_eq!(payload["wins"], 0);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("scenario rejected"));
}

#[test]
fn validate_command_lists_units() {
    let path = unique_temp_path("validate", "txt");
    fs::write(&path, LEGACY_CONF).expect("fixture should be written");

    let output = Command::new(bin())
        .args(["validate", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("attacker: 3 unit(s)"));
    assert!(stdout.contains("defender: 1 unit(s)"));
    assert!(stdout.contains("generic Init: 2"));

    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_returns_non_zero_on_malformed_scenario() {
    let path = unique_temp_path("malformed", "txt");
    fs::write(&path, "Type : Cruiser Count : 1 Init : x").expect("fixture should be written");

    let output = Command::new(bin())
        .args(["validate", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));

    let _ = fs::remove_file(path);
}

#[test]
fn unknown_command_prints_usage() {
    let output = Command::new(bin())
        .arg("serve")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: fleetsim"));
}
