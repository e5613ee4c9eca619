use std::env;
use tracing_subscriber::EnvFilter;

/// Set to any value to turn on debug logging.
pub const DEBUG_ENV: &str = "PROMPT_POWERLINE_DEBUG";

/// Full `tracing` filter directive, overrides the debug switch.
pub const LOG_ENV: &str = "PROMPT_POWERLINE_LOG";

pub fn debug_enabled() -> bool {
    env::var(DEBUG_ENV).is_ok()
}

/// Install the stderr subscriber.
///
/// Prompt output must stay clean, so nothing below `error` is printed
/// unless debugging was asked for.
pub fn init_logging(debug: bool) {
    let level = if debug || debug_enabled() { "debug" } else { "error" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("prompt_powerline={}", level)));

    // a subscriber may already be installed, e.g. by a test harness
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init();
}
