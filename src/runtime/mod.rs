pub mod cache;
pub mod mock;
pub mod process;

pub use cache::*;
pub use mock::*;
pub use process::*;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by the environment. Segments turn any of these into
/// "disabled" rather than propagating them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("command `{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("unable to start `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("unable to read system information: {0}")]
    SystemInfo(String),

    #[error("{0} is not available")]
    NotAvailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl Os {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Os::MacOs,
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            _ => Os::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Memory {
    pub physical_total_memory: u64,
    pub physical_available_memory: u64,
    pub physical_free_memory: u64,
    pub physical_percent_used: f64,
    pub swap_total_memory: u64,
    pub swap_free_memory: u64,
    pub swap_percent_used: f64,
}

/// Snapshot of system counters, always returned as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemInfo {
    #[serde(flatten)]
    pub memory: Memory,
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

/// Everything a segment may ask of the outside world.
///
/// Implementations must be safe to share between concurrently evaluated
/// segments. Every query is bounded in time; a query that does not finish
/// is reported as an error.
pub trait Environment: Send + Sync {
    /// Run `name` with `args` and return its trimmed standard output.
    fn run_command(&self, name: &str, args: &[&str]) -> Result<String, EnvError>;

    fn has_command(&self, name: &str) -> bool;

    fn system_info(&self) -> Result<SystemInfo, EnvError>;

    fn getenv(&self, key: &str) -> Option<String>;

    fn pwd(&self) -> Result<PathBuf, EnvError>;

    fn now(&self) -> DateTime<Local>;

    fn os(&self) -> Os;
}
