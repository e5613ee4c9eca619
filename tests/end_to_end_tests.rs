use prompt_powerline::config::{self, SEPARATOR_ENV};
use prompt_powerline::{Config, SegmentKind};
use std::process::Command;
use tempfile::TempDir;
use tokio::fs;

const BINARY: &str = env!("CARGO_BIN_EXE_prompt-powerline");

async fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, content).await.unwrap();
    path
}

#[tokio::test]
async fn test_binary_renders_configured_segments() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        r#"{
            "separator": " > ",
            "segments": [
                {"type": "text", "template": "{{ upper \"user\" }}"},
                {"type": "text", "template": "{{ .Missing }}"},
                {"type": "text", "template": "{{ round 3.14159 2 }}"}
            ]
        }"#,
    )
    .await;

    let output = Command::new(BINARY)
        .args(["--config", config_path.to_str().unwrap()])
        .env_remove(SEPARATOR_ENV)
        .env_remove("PROMPT_POWERLINE_DEBUG")
        .env_remove("PROMPT_POWERLINE_LOG")
        .output()
        .expect("Failed to execute prompt-powerline");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "USER > 3.14");
    assert!(output.stderr.is_empty(), "template failures stay out of the prompt");
}

#[tokio::test]
async fn test_binary_rejects_unknown_segment_type() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(&temp_dir, r#"{"segments": [{"type": "weather"}]}"#).await;

    let output = Command::new(BINARY)
        .args(["--config", config_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute prompt-powerline");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to parse config file"));
}

#[tokio::test]
async fn test_binary_print_config_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        r#"{"segments": [{"type": "sysinfo", "properties": {"precision": 1}}], "maxConcurrency": 3}"#,
    )
    .await;

    let output = Command::new(BINARY)
        .args(["--config", config_path.to_str().unwrap(), "--print-config"])
        .env(SEPARATOR_ENV, " / ")
        .output()
        .expect("Failed to execute prompt-powerline");

    assert!(output.status.success());
    let printed: Config = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed.separator, " / ");
    assert_eq!(printed.max_concurrency, 3);
    assert_eq!(printed.segments[0].kind, SegmentKind::SysInfo);
    assert_eq!(printed.segments[0].properties.get_int("precision", 0), 1);
}

#[tokio::test]
async fn test_load_config_from_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(&temp_dir, r#"{"commandTimeoutMs": 75}"#).await;

    let config = config::load_config_file(&config_path).await.unwrap();
    assert_eq!(config.command_timeout_ms, 75);
    assert_eq!(config.segments, config::default_segments());
}

#[tokio::test]
async fn test_load_config_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = config::load_config(Some(temp_dir.path().join("absent.json"))).await;
    assert!(result.is_err());
}

#[test]
fn test_help() {
    let output = Command::new(BINARY)
        .arg("--help")
        .output()
        .expect("Failed to execute prompt-powerline");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--config"));
}
