use crate::properties::Properties;
use crate::runtime::Environment;
use crate::segments::{to_context, Binding, Segment};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;
use tracing::debug;

pub const TIME_FORMAT: &str = "time_format";

const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";
const DEFAULT_TEMPLATE: &str = "{{ .CurrentDate }}";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeData {
    pub current_date: String,
    pub format: String,
}

/// Current local time, formatted with a strftime-style pattern.
#[derive(Default)]
pub struct TimeSegment {
    binding: Binding,
    data: TimeData,
}

impl TimeSegment {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Segment for TimeSegment {
    fn name(&self) -> &'static str {
        "time"
    }

    fn init(&mut self, props: Properties, env: Arc<dyn Environment>) {
        self.binding.bind(props, env);
    }

    fn enabled(&mut self) -> bool {
        self.data = TimeData::default();
        let Some(env) = self.binding.env() else {
            return false;
        };

        let format = self.properties().get_string(TIME_FORMAT, DEFAULT_TIME_FORMAT);
        let mut current_date = String::new();
        // chrono reports unknown specifiers as a formatting error
        if write!(current_date, "{}", env.now().format(&format)).is_err() {
            debug!(segment = "time", format = %format, "invalid time format");
            return false;
        }

        self.data = TimeData {
            current_date,
            format,
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
