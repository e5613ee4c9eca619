//! Text substitution for segment templates.
//!
//! The language is a small subset of Go templates:
//!
//! ```text
//! {{ .Icon }}{{ .Artist }} - {{ .Track }}
//! {{ round .PhysicalPercentUsed .Precision }}%
//! {{ if gt .Ahead 0 }}↑{{ .Ahead }}{{ else }}≡{{ end }}
//! {{ .Branch | default "detached" | upper }}
//! ```
//!
//! Fields are looked up in a JSON object built from the segment's data.
//! A template that cannot be parsed or evaluated renders as an empty string
//! through [`render_or_empty`]; the failure is logged, never shown.

pub mod error;
pub mod eval;
pub mod functions;
pub mod lexer;
pub mod parser;

pub use error::TemplateError;
pub use functions::round_to;

use parser::Node;
use serde_json::Value;
use tracing::warn;

/// A parsed template. Immutable, so one value can be rendered any number
/// of times, from any thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let items = lexer::split(source)?;
        Ok(Self {
            nodes: parser::parse(items)?,
        })
    }

    pub fn render(&self, context: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        eval::render_nodes(&self.nodes, context, &mut out)?;
        Ok(out)
    }
}

pub fn render(source: &str, context: &Value) -> Result<String, TemplateError> {
    Template::parse(source)?.render(context)
}

/// Render `source`, turning any failure into an empty string.
pub fn render_or_empty(segment: &str, source: &str, context: &Value) -> String {
    match render(source, context) {
        Ok(text) => text,
        Err(e) => {
            warn!(segment, template = source, error = %e, "template rendering failed");
            String::new()
        }
    }
}
