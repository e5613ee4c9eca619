use crate::config::Config;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub const CONFIG_ENV: &str = "PROMPT_POWERLINE_CONFIG";
pub const SEPARATOR_ENV: &str = "PROMPT_POWERLINE_SEPARATOR";
pub const TIMEOUT_ENV: &str = "PROMPT_POWERLINE_TIMEOUT_MS";

/// Load configuration with priority: env vars > config file > defaults.
///
/// A file that exists but does not parse is an error, including an unknown
/// segment type.
pub async fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => load_config_file(&path).await?,
        None => load_config_from_default_locations().await?,
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok());

    Ok(config)
}

async fn load_config_from_default_locations() -> Result<Config> {
    for path in get_config_search_paths() {
        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "using config file");
            return load_config_file(&path).await;
        }
    }

    debug!("no config file found, using defaults");
    Ok(Config::default())
}

/// Paths searched for a configuration file, first match wins.
pub fn get_config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".prompt-powerline.json")];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("prompt-powerline").join("config.json"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("prompt-powerline").join("config.json"));
        paths.push(home.join(".prompt-powerline.json"));
    }

    paths.dedup();
    paths
}

pub async fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    Ok(serde_json::from_str(content)?)
}

/// Apply overrides read through `lookup`, normally the process environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(separator) = lookup(SEPARATOR_ENV) {
        config.separator = separator;
    }

    if let Some(timeout) = lookup(TIMEOUT_ENV) {
        match timeout.trim().parse::<u64>() {
            Ok(ms) => config.command_timeout_ms = ms,
            Err(e) => warn!(value = %timeout, error = %e, "ignoring invalid {}", TIMEOUT_ENV),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SegmentKind;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"{
                "separator": " | ",
                "commandTimeoutMs": 250,
                "maxConcurrency": 2,
                "segments": [
                    {"type": "sysinfo", "properties": {"precision": 2}},
                    {"type": "spotify", "template": "{{ .Track }}"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.separator, " | ");
        assert_eq!(config.command_timeout_ms, 250);
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.segments.len(), 2);
        assert_eq!(config.segments[0].kind, SegmentKind::SysInfo);
        assert_eq!(config.segments[0].properties.get_int("precision", 0), 2);
        assert_eq!(config.segments[1].template.as_deref(), Some("{{ .Track }}"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = parse_config(r#"{"segments": []}"#).unwrap();
        let defaults = Config::default();
        assert!(config.segments.is_empty());
        assert_eq!(config.separator, defaults.separator);
        assert_eq!(config.command_timeout_ms, defaults.command_timeout_ms);
        assert_eq!(config.max_concurrency, defaults.max_concurrency);
    }

    #[test]
    fn test_unknown_segment_type_is_rejected() {
        assert!(parse_config(r#"{"segments": [{"type": "weather"}]}"#).is_err());
        assert!(parse_config(r#"{"segments": [{"type": "Spotify"}]}"#).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| match key {
            SEPARATOR_ENV => Some(" :: ".to_string()),
            TIMEOUT_ENV => Some("1200".to_string()),
            _ => None,
        });
        assert_eq!(config.separator, " :: ");
        assert_eq!(config.command_timeout_ms, 1200);

        apply_env_overrides(&mut config, |key| (key == TIMEOUT_ENV).then(|| "soon".to_string()));
        assert_eq!(config.command_timeout_ms, 1200);
    }
}
