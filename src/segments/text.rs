use crate::properties::Properties;
use crate::runtime::Environment;
use crate::segments::{Binding, Segment};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Static text. Shown whenever it has a template to render.
#[derive(Default)]
pub struct TextSegment {
    binding: Binding,
}

impl TextSegment {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Segment for TextSegment {
    fn name(&self) -> &'static str {
        "text"
    }

    fn init(&mut self, props: Properties, env: Arc<dyn Environment>) {
        self.binding.bind(props, env);
    }

    fn enabled(&mut self) -> bool {
        self.binding.env().is_some() && !self.template().is_empty()
    }

    fn default_template(&self) -> &'static str {
        ""
    }

    fn properties(&self) -> &Properties {
        self.binding.props()
    }

    fn context(&self) -> Value {
        Value::Object(Map::new())
    }
}
