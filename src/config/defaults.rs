use crate::config::*;
use crate::engine::DEFAULT_MAX_CONCURRENCY;
use crate::runtime::DEFAULT_COMMAND_TIMEOUT;

impl Default for Config {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            separator: " ".to_string(),
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT.as_millis() as u64,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Prompt used when no configuration file exists.
pub fn default_segments() -> Vec<SegmentConfig> {
    vec![
        SegmentConfig::new(SegmentKind::Path),
        SegmentConfig::new(SegmentKind::Git),
        SegmentConfig::new(SegmentKind::Text).with_template("\u{276f}"),
    ]
}
