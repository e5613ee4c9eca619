pub mod config;
pub mod engine;
pub mod properties;
pub mod registry;
pub mod runtime;
pub mod segments;
pub mod template;
pub mod utils;

pub use config::{Config, SegmentConfig};
pub use engine::{Engine, RenderedSegment};
pub use properties::{Properties, PropertyValue};
pub use registry::SegmentKind;
pub use runtime::{EnvError, Environment, MockEnvironment, ProcessEnvironment, SystemInfo};
pub use segments::Segment;
pub use template::{Template, TemplateError};
