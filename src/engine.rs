use crate::config::{Config, SegmentConfig};
use crate::properties::TEMPLATE;
use crate::registry::SegmentKind;
use crate::runtime::Environment;
use crate::template;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Output of one configured segment slot. Empty when the segment is
/// disabled or its template failed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl RenderedSegment {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Runs a render pass: every configured segment is evaluated on the
/// blocking pool, at most `max_concurrency` at a time, and the results are
/// returned in configuration order.
#[derive(Debug, Clone)]
pub struct Engine {
    max_concurrency: usize,
    separator: String,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY, " ")
    }
}

impl Engine {
    pub fn new(max_concurrency: usize, separator: &str) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
            separator: separator.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_concurrency, &config.separator)
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub async fn render_segments(
        &self,
        configs: &[SegmentConfig],
        env: Arc<dyn Environment>,
    ) -> Vec<RenderedSegment> {
        stream::iter(configs.iter().cloned())
            .map(|config| evaluate_blocking(config, env.clone()))
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    /// Same result as [`Engine::render_segments`], one segment at a time.
    pub async fn render_sequential(
        &self,
        configs: &[SegmentConfig],
        env: Arc<dyn Environment>,
    ) -> Vec<RenderedSegment> {
        let mut rendered = Vec::with_capacity(configs.len());
        for config in configs {
            rendered.push(evaluate_blocking(config.clone(), env.clone()).await);
        }
        rendered
    }

    pub async fn render_prompt(&self, configs: &[SegmentConfig], env: Arc<dyn Environment>) -> String {
        let started = Instant::now();
        let rendered = self.render_segments(configs, env).await;
        debug!(segments = rendered.len(), elapsed = ?started.elapsed(), "render pass finished");
        self.join(&rendered)
    }

    /// Concatenate non-empty segments with the separator.
    pub fn join(&self, segments: &[RenderedSegment]) -> String {
        segments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

async fn evaluate_blocking(config: SegmentConfig, env: Arc<dyn Environment>) -> RenderedSegment {
    let kind = config.kind;
    match tokio::task::spawn_blocking(move || evaluate(&config, env)).await {
        Ok(rendered) => rendered,
        Err(e) => {
            warn!(segment = %kind, error = %e, "segment evaluation aborted");
            RenderedSegment {
                kind,
                text: String::new(),
            }
        }
    }
}

/// Evaluate one segment slot on the current thread.
///
/// Environment queries block, so this must not run on an async worker.
pub fn evaluate(config: &SegmentConfig, env: Arc<dyn Environment>) -> RenderedSegment {
    let started = Instant::now();
    let mut props = config.properties.clone();
    if let Some(template) = &config.template {
        props = props.with(TEMPLATE, template.as_str());
    }

    let mut segment = config.kind.create();
    segment.init(props, env);

    let enabled = segment.enabled();
    let text = if enabled {
        template::render_or_empty(segment.name(), &segment.template(), &segment.context())
    } else {
        String::new()
    };

    debug!(segment = %config.kind, enabled, elapsed = ?started.elapsed(), "segment evaluated");
    RenderedSegment {
        kind: config.kind,
        text,
    }
}
