// CLI integration tests for manager listing, config loading, and batch resolve.
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

const SIMPLE_MANAGER: &str = "org.assetio.examples.manager.simple";

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_assetio");
    let mut command = Command::new(exe);
    command.env_remove("ASSETIO_DEFAULT_CONFIG");
    command.env_remove("ASSETIO_LOGGING_SEVERITY");
    command
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn parse_json_lines(output: &[u8]) -> Vec<Value> {
    let text = String::from_utf8_lossy(output);
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_json)
        .collect()
}

fn parse_json_line(output: &[u8]) -> Value {
    parse_json_lines(output).into_iter().next().expect("json line")
}

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("assetio.toml");
    let text = format!(
        r#"[manager]
identifier = "{SIMPLE_MANAGER}"

[manager.settings]
read_traits = "simple://cat,locatable,location,${{config_dir}}/cat.png\nsimple://cat,frames,count,24"
capabilities = "resolution,existenceQueries"
"#
    );
    std::fs::write(&path, text).expect("write config");
    path
}

#[test]
fn managers_lists_builtin_simple_manager() {
    let output = cmd().arg("managers").output().expect("managers");
    assert!(output.status.success());
    let json = parse_json_line(&output.stdout);
    let managers = json["managers"].as_array().expect("managers array");
    let simple = managers
        .iter()
        .find(|manager| manager["identifier"] == SIMPLE_MANAGER)
        .expect("simple manager listed");
    assert_eq!(simple["display_name"], "Simple Manager");
    assert_eq!(simple["info"]["entityReferencesMatchPrefix"], "simple://");
}

#[test]
fn config_prints_identifier_and_expanded_settings() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_config(temp.path());
    let config_dir = temp.path().canonicalize().expect("canonical");

    let output = cmd()
        .args(["config", path.to_str().unwrap()])
        .output()
        .expect("config");
    assert!(output.status.success());
    let json = parse_json_line(&output.stdout);
    assert_eq!(json["identifier"], SIMPLE_MANAGER);
    let read_traits = json["settings"]["read_traits"].as_str().expect("read_traits");
    assert!(read_traits.contains(&format!("{}/cat.png", config_dir.display())));
    assert!(!read_traits.contains("${config_dir}"));
}

#[test]
fn config_reports_missing_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("absent.toml");
    let output = cmd()
        .args(["config", missing.to_str().unwrap()])
        .output()
        .expect("config");
    assert_eq!(output.status.code(), Some(3));
    let json = parse_json_line(&output.stderr);
    assert_eq!(json["error"]["kind"], "InputValidation");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .ends_with("file does not exist.")
    );
}

#[test]
fn resolve_reports_element_errors_inline() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_config(temp.path());

    let output = cmd()
        .args([
            "resolve",
            "--config",
            path.to_str().unwrap(),
            "--trait",
            "frames",
            "simple://cat",
            "simple://cow",
        ])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code(), Some(7));
    let lines = parse_json_lines(&output.stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["index"], 0);
    assert_eq!(lines[0]["entity"], "simple://cat");
    assert_eq!(lines[0]["traits"]["frames"]["count"], 24);
    assert!(lines[0]["traits"].get("locatable").is_none());
    assert_eq!(lines[1]["index"], 1);
    assert_eq!(lines[1]["error"]["code"], "entityResolutionError");
    assert_eq!(lines[1]["error"]["message"], "Entity not found");
}

#[test]
fn resolve_fail_fast_raises_first_element_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_config(temp.path());

    let output = cmd()
        .args([
            "resolve",
            "--config",
            path.to_str().unwrap(),
            "--trait",
            "locatable",
            "--fail-fast",
            "simple://cat",
            "simple://cow",
            "simple://pig",
        ])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code(), Some(7));
    assert!(output.stdout.is_empty());
    let json = parse_json_line(&output.stderr);
    assert_eq!(json["error"]["kind"], "BatchElement");
    assert_eq!(json["error"]["index"], 1);
    assert_eq!(json["error"]["code"], "entityResolutionError");
    assert_eq!(
        json["error"]["message"],
        "entityResolutionError: Entity not found [index=1] [access=read] [entity=simple://cow]"
    );
}

#[test]
fn resolve_manager_driven_access_is_rejected_per_element() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_config(temp.path());

    let output = cmd()
        .args([
            "resolve",
            "--config",
            path.to_str().unwrap(),
            "--trait",
            "locatable",
            "--access",
            "manager-driven",
            "simple://cat",
        ])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code(), Some(7));
    let json = parse_json_line(&output.stdout);
    assert_eq!(json["error"]["code"], "entityAccessError");
}

#[test]
fn resolve_uses_default_config_env_var() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_config(temp.path());
    let config_dir = temp.path().canonicalize().expect("canonical");

    let output = cmd()
        .env("ASSETIO_DEFAULT_CONFIG", &path)
        .args(["resolve", "--trait", "locatable", "simple://cat"])
        .output()
        .expect("resolve");
    assert!(output.status.success());
    let json = parse_json_line(&output.stdout);
    assert_eq!(
        json["traits"]["locatable"]["location"],
        format!("{}/cat.png", config_dir.display())
    );
}

#[test]
fn resolve_without_config_is_usage_error() {
    let output = cmd()
        .args(["resolve", "--trait", "locatable", "simple://cat"])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code(), Some(2));
    let json = parse_json_line(&output.stderr);
    assert_eq!(json["error"]["kind"], "Usage");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("ASSETIO_DEFAULT_CONFIG")
    );
}

#[test]
fn resolve_requires_a_trait() {
    let output = cmd()
        .args(["resolve", "simple://cat"])
        .output()
        .expect("resolve");
    assert_eq!(output.status.code(), Some(2));
    let json = parse_json_line(&output.stderr);
    assert_eq!(json["error"]["kind"], "Usage");
}
