use crate::properties::Properties;
use crate::runtime::{Environment, SystemInfo};
use crate::segments::{to_context, Binding, Segment};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub const PRECISION: &str = "precision";

const DEFAULT_TEMPLATE: &str = "{{ round .PhysicalPercentUsed .Precision }}";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SysInfoData {
    #[serde(flatten)]
    pub system: SystemInfo,
    pub precision: i64,
}

/// Memory usage and load averages.
#[derive(Default)]
pub struct SysInfoSegment {
    binding: Binding,
    data: SysInfoData,
}

impl SysInfoSegment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &SysInfoData {
        &self.data
    }
}

impl Segment for SysInfoSegment {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn init(&mut self, props: Properties, env: Arc<dyn Environment>) {
        self.binding.bind(props, env);
    }

    fn enabled(&mut self) -> bool {
        self.data = SysInfoData::default();
        let Some(env) = self.binding.env() else {
            return false;
        };

        let system = match env.system_info() {
            Ok(system) => system,
            Err(e) => {
                debug!(segment = "sysinfo", error = %e, "query failed");
                return false;
            }
        };

        // an all-zero snapshot carries no information
        if system.memory.physical_percent_used == 0.0 && system.memory.swap_percent_used == 0.0 {
            return false;
        }

        self.data = SysInfoData {
            system,
            precision: self.properties().get_int(PRECISION, 0).max(0),
        };
        true
    }

    fn default_template(&self) -> &'static str {
        DEFAULT_TEMPLATE
    }

    fn properties(&self) -> &Properties {
        self.binding.props()
    }

    fn context(&self) -> Value {
        to_context(self.name(), &self.data)
    }
}
