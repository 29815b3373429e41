// Integration tests for the `partview-settings` binary.
// Run with: cargo test -p partview-cli --test settings_cli -- --nocapture

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn settings_cmd(settings: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_partview-settings"));
    cmd.arg("--settings").arg(settings);
    cmd.env("RUST_LOG", "off");
    cmd
}

fn run(settings: &Path, args: &[&str]) -> Output {
    settings_cmd(settings)
        .args(args)
        .output()
        .expect("run partview-settings")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn path_prints_the_selected_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("custom.toml");
    let output = run(&file, &["path"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), file.display().to_string());
}

#[test]
fn set_then_get_persists_value() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.json");

    let output = run(&file, &["set", "meshing/chordalDeflection", "0.05"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(file.exists());

    let output = run(&file, &["get", "meshing/chordalDeflection"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "0.05");
}

#[test]
fn enumeration_accepts_item_names() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.json");

    assert!(run(&file, &["set", "meshing/quality", "Precise"]).status.success());
    let output = run(&file, &["get", "meshing/quality"]);
    assert_eq!(stdout(&output), "Precise");
}

#[test]
fn invalid_value_is_rejected_and_file_untouched() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.json");

    let output = run(&file, &["set", "meshing/chordalDeflection", "-1"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(!file.exists());

    let output = run(&file, &["set", "application/unitSystemDecimals", "many"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn unknown_key_exit_code() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.json");
    let output = run(&file, &["get", "meshing/doesNotExist"]);
    assert_eq!(output.status.code(), Some(4));
    let output = run(&file, &["reset", "nowhere"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn reset_group_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.toml");

    assert!(run(&file, &["set", "meshing/relative", "true"]).status.success());
    assert!(run(&file, &["set", "application/unitSystemDecimals", "4"]).status.success());
    assert!(run(&file, &["reset", "meshing"]).status.success());

    assert_eq!(stdout(&run(&file, &["get", "meshing/relative"])), "false");
    assert_eq!(stdout(&run(&file, &["get", "application/unitSystemDecimals"])), "4");
}

#[test]
fn show_hides_internal_settings_unless_all() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.json");

    let output = run(&file, &["show", "--json"]);
    assert!(output.status.success());
    let visible: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert!(visible.get("meshing/quality").is_some());
    assert!(visible.get("application/lastOpenDir").is_none());

    let output = run(&file, &["show", "--all", "--json"]);
    let all: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert!(all.get("application/lastOpenDir").is_some());
}

#[test]
fn malformed_file_reports_store_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.json");
    fs::write(&file, "{ nope").unwrap();
    let output = run(&file, &["show"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn bad_stored_value_is_a_warning_not_a_failure() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.json");
    fs::write(
        &file,
        r#"{
    "meshing/chordalDeflection": { "type": "string", "value": "fine" },
    "meshing/relative": { "type": "bool", "value": true }
}"#,
    )
    .unwrap();

    let output = run(&file, &["get", "meshing/relative"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "true");
    assert!(String::from_utf8_lossy(&output.stderr).contains("meshing/chordalDeflection"));
}

#[test]
fn formats_lists_every_format() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir.path().join("settings.json"), &["formats"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.lines().any(|l| l.starts_with("step")));
    assert_eq!(text.lines().count(), 12);
}

#[test]
fn formats_lists_parameter_groups_from_the_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("settings.json");
    fs::write(
        &file,
        r#"{
    "io/stl/writer/binary": { "type": "bool", "value": true },
    "io/step/reader/productContext": { "type": "int", "value": 1 }
}"#,
    )
    .unwrap();

    let output = run(&file, &["formats"]);
    assert!(output.status.success());
    let text = stdout(&output);
    let line = |id: &str| text.lines().find(|l| l.starts_with(id)).unwrap_or_default().to_string();
    assert!(line("stl ").ends_with("writer"));
    assert!(line("step ").ends_with("reader"));
    assert!(!line("obj ").contains("reader") && !line("obj ").contains("writer"));
}
