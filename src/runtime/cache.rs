use crate::runtime::{EnvError, SystemInfo};
use dashmap::DashMap;
use std::sync::Arc;

/// Identity of a query issued against the environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Command { name: String, args: Vec<String> },
    HasCommand(String),
    SystemInfo,
}

impl QueryKey {
    pub fn command(name: &str, args: &[&str]) -> Self {
        QueryKey::Command {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Output(Result<String, EnvError>),
    Found(bool),
    SystemInfo(Result<SystemInfo, EnvError>),
}

/// Results of queries made during a single render pass.
///
/// The cache lives as long as the environment that owns it; there is no
/// expiry because an environment is never reused across renders. Two
/// segments issuing the same query at the same time may both execute it,
/// the first stored result is the one every later lookup sees.
#[derive(Debug, Default, Clone)]
pub struct QueryCache {
    entries: Arc<DashMap<QueryKey, QueryResult>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<QueryResult> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Return the cached result for `key`, running `query` on a miss.
    ///
    /// No lock is held while `query` runs.
    pub fn get_or_run<F>(&self, key: QueryKey, query: F) -> QueryResult
    where
        F: FnOnce() -> QueryResult,
    {
        if let Some(cached) = self.get(&key) {
            return cached;
        }

        let result = query();
        self.entries.entry(key).or_insert(result).value().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
