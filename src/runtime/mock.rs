use crate::runtime::{EnvError, Environment, Os, SystemInfo};
use chrono::{DateTime, Local, TimeZone};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type CommandKey = (String, Vec<String>);

/// Deterministic environment for tests.
///
/// Every answer is registered up front. Commands that were never registered
/// fail with [`EnvError::NotAvailable`], which segments treat like any other
/// failed query.
#[derive(Debug, Clone)]
pub struct MockEnvironment {
    commands: HashMap<CommandKey, Result<String, EnvError>>,
    system_info: Result<SystemInfo, EnvError>,
    vars: HashMap<String, String>,
    pwd: Option<PathBuf>,
    now: DateTime<Local>,
    os: Os,
    queries: Arc<AtomicUsize>,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self {
            commands: HashMap::new(),
            system_info: Err(EnvError::NotAvailable("system information".to_string())),
            vars: HashMap::new(),
            pwd: None,
            now: Local
                .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
                .single()
                .unwrap_or_else(Local::now),
            os: Os::Linux,
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(
        mut self,
        name: &str,
        args: &[&str],
        result: Result<&str, EnvError>,
    ) -> Self {
        let key = (
            name.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        );
        self.commands.insert(key, result.map(str::to_string));
        self
    }

    pub fn with_system_info(mut self, result: Result<SystemInfo, EnvError>) -> Self {
        self.system_info = result;
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_pwd(mut self, pwd: impl Into<PathBuf>) -> Self {
        self.pwd = Some(pwd.into());
        self
    }

    pub fn with_now(mut self, now: DateTime<Local>) -> Self {
        self.now = now;
        self
    }

    pub fn with_os(mut self, os: Os) -> Self {
        self.os = os;
        self
    }

    pub fn into_shared(self) -> Arc<dyn Environment> {
        Arc::new(self)
    }

    /// Number of queries answered so far, shared between clones.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

impl Environment for MockEnvironment {
    fn run_command(&self, name: &str, args: &[&str]) -> Result<String, EnvError> {
        self.record();
        let key = (
            name.to_string(),
            args.iter().map(|a| a.to_string()).collect::<Vec<_>>(),
        );
        self.commands
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(EnvError::NotAvailable(format!("{} {}", name, args.join(" ")))))
    }

    fn has_command(&self, name: &str) -> bool {
        self.record();
        self.commands.keys().any(|(command, _)| command == name)
    }

    fn system_info(&self) -> Result<SystemInfo, EnvError> {
        self.record();
        self.system_info.clone()
    }

    fn getenv(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn pwd(&self) -> Result<PathBuf, EnvError> {
        self.pwd
            .clone()
            .ok_or_else(|| EnvError::NotAvailable("current directory".to_string()))
    }

    fn now(&self) -> DateTime<Local> {
        self.now
    }

    fn os(&self) -> Os {
        self.os
    }
}
