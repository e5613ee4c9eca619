pub mod git;
pub mod path;
pub mod spotify;
pub mod system_info;
pub mod text;
pub mod time;

pub use git::*;
pub use path::*;
pub use spotify::*;
pub use system_info::*;
pub use text::*;
pub use time::*;

use crate::properties::{Properties, TEMPLATE};
use crate::runtime::Environment;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Contract implemented by every prompt segment.
///
/// A segment lives for one render pass: `init` binds it to its options and
/// the environment without touching the outside world, `enabled` performs
/// the queries and replaces all state, and `context` exposes that state to
/// the template.
pub trait Segment: Send {
    fn name(&self) -> &'static str;

    fn init(&mut self, props: Properties, env: Arc<dyn Environment>);

    /// Query the environment and decide whether the segment is shown.
    /// A failed query yields `false`, never an error.
    fn enabled(&mut self) -> bool;

    fn default_template(&self) -> &'static str;

    fn properties(&self) -> &Properties;

    /// Data visible to the template, as a JSON object.
    fn context(&self) -> Value;

    /// The configured template, or the segment's default.
    fn template(&self) -> String {
        self.properties()
            .get_string(TEMPLATE, self.default_template())
    }
}

/// Options and environment captured by `init`.
#[derive(Default, Clone)]
pub struct Binding {
    props: Properties,
    env: Option<Arc<dyn Environment>>,
}

impl Binding {
    pub fn bind(&mut self, props: Properties, env: Arc<dyn Environment>) {
        self.props = props;
        self.env = Some(env);
    }

    pub fn props(&self) -> &Properties {
        &self.props
    }

    /// The environment, or `None` before `init`.
    pub fn env(&self) -> Option<&dyn Environment> {
        self.env.as_deref()
    }
}

pub(crate) fn to_context<T: Serialize>(segment: &str, data: &T) -> Value {
    serde_json::to_value(data).unwrap_or_else(|e| {
        warn!(segment, error = %e, "unable to expose segment data");
        Value::Null
    })
}
