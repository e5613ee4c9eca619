pub mod defaults;
pub mod loader;

pub use defaults::*;
pub use loader::*;

use crate::properties::Properties;
use crate::registry::SegmentKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub segments: Vec<SegmentConfig>,
    pub separator: String,
    pub command_timeout_ms: u64,
    pub max_concurrency: usize,
}

impl Config {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// One slot in the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl SegmentConfig {
    pub fn new(kind: SegmentKind) -> Self {
        Self {
            kind,
            properties: Properties::default(),
            template: None,
        }
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.template = Some(template.to_string());
        self
    }
}
