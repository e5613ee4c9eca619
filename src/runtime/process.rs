use crate::runtime::{EnvError, Environment, Memory, Os, QueryCache, QueryKey, QueryResult, SystemInfo};
use chrono::{DateTime, Local};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use sysinfo::System;
use tokio::process::Command;
use tokio::runtime::Handle;
use tracing::{debug, warn};

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

/// Environment backed by the real operating system.
///
/// External commands run on the tokio runtime behind `handle` and are killed
/// once `timeout` elapses. Queries block the calling thread, so callers must
/// be on a blocking thread (`spawn_blocking`), never on a runtime worker.
/// Results are cached for the lifetime of this value, which is one render pass.
pub struct ProcessEnvironment {
    handle: Handle,
    timeout: Duration,
    cache: QueryCache,
}

impl ProcessEnvironment {
    pub fn new(handle: Handle, timeout: Duration) -> Self {
        Self {
            handle,
            timeout,
            cache: QueryCache::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn execute(&self, name: &str, args: &[&str]) -> Result<String, EnvError> {
        debug!(command = name, ?args, "running external command");

        let mut command = Command::new(name);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let timeout = self.timeout;
        let outcome = self
            .handle
            .block_on(async move { tokio::time::timeout(timeout, command.output()).await });

        let output = match outcome {
            Err(_) => {
                warn!(command = name, ?timeout, "external command timed out");
                return Err(EnvError::Timeout {
                    command: name.to_string(),
                    timeout,
                });
            }
            Ok(Err(e)) => {
                return Err(EnvError::Spawn {
                    command: name.to_string(),
                    message: e.to_string(),
                })
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(EnvError::CommandFailed {
                command: name.to_string(),
                message,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Environment for ProcessEnvironment {
    fn run_command(&self, name: &str, args: &[&str]) -> Result<String, EnvError> {
        let key = QueryKey::command(name, args);
        match self
            .cache
            .get_or_run(key, || QueryResult::Output(self.execute(name, args)))
        {
            QueryResult::Output(result) => result,
            other => Err(EnvError::CommandFailed {
                command: name.to_string(),
                message: format!("unexpected cached result {:?}", other),
            }),
        }
    }

    fn has_command(&self, name: &str) -> bool {
        let key = QueryKey::HasCommand(name.to_string());
        matches!(
            self.cache
                .get_or_run(key, || QueryResult::Found(find_in_path(name).is_some())),
            QueryResult::Found(true)
        )
    }

    fn system_info(&self) -> Result<SystemInfo, EnvError> {
        match self
            .cache
            .get_or_run(QueryKey::SystemInfo, || QueryResult::SystemInfo(read_system_info()))
        {
            QueryResult::SystemInfo(result) => result,
            other => Err(EnvError::SystemInfo(format!(
                "unexpected cached result {:?}",
                other
            ))),
        }
    }

    fn getenv(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn pwd(&self) -> Result<PathBuf, EnvError> {
        env::current_dir().map_err(|e| EnvError::NotAvailable(format!("current directory ({})", e)))
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn os(&self) -> Os {
        Os::current()
    }
}

/// Locate an executable on `PATH`.
fn find_in_path(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let full = dir.join(name);
        if full.is_file() {
            return Some(full);
        }
        if cfg!(windows) {
            let exe = full.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

fn read_system_info() -> Result<SystemInfo, EnvError> {
    let mut system = System::new();
    system.refresh_memory();

    let total = system.total_memory();
    if total == 0 {
        return Err(EnvError::SystemInfo("memory counters unavailable".to_string()));
    }

    let available = system.available_memory();
    let swap_total = system.total_swap();
    let swap_free = system.free_swap();
    let load = System::load_average();

    Ok(SystemInfo {
        memory: Memory {
            physical_total_memory: total,
            physical_available_memory: available,
            physical_free_memory: system.free_memory(),
            physical_percent_used: percent_used(total, available),
            swap_total_memory: swap_total,
            swap_free_memory: swap_free,
            swap_percent_used: percent_used(swap_total, swap_free),
        },
        load1: load.one,
        load5: load.five,
        load15: load.fifteen,
    })
}

fn percent_used(total: u64, remaining: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    total.saturating_sub(remaining) as f64 / total as f64 * 100.0
}
