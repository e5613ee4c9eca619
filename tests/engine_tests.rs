use chrono::{DateTime, Local};
use prompt_powerline::engine::evaluate;
use prompt_powerline::runtime::{EnvError, Environment, Memory, MockEnvironment, Os, SystemInfo};
use prompt_powerline::{Engine, Properties, SegmentConfig, SegmentKind};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn text(template: &str) -> SegmentConfig {
    SegmentConfig::new(SegmentKind::Text).with_template(template)
}

fn sysinfo_env() -> MockEnvironment {
    MockEnvironment::new().with_system_info(Ok(SystemInfo {
        memory: Memory {
            physical_percent_used: 60.51,
            ..Memory::default()
        },
        load1: 1.5,
        ..SystemInfo::default()
    }))
}

/// Answers every command after a delay, tracking how many run at once.
struct SlowEnvironment {
    delay: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl SlowEnvironment {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

impl Environment for SlowEnvironment {
    fn run_command(&self, name: &str, _args: &[&str]) -> Result<String, EnvError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(self.delay);
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(name.to_string())
    }

    fn has_command(&self, _name: &str) -> bool {
        true
    }

    fn system_info(&self) -> Result<SystemInfo, EnvError> {
        Err(EnvError::Timeout {
            command: "system info".to_string(),
            timeout: self.delay,
        })
    }

    fn getenv(&self, _key: &str) -> Option<String> {
        None
    }

    fn pwd(&self) -> Result<PathBuf, EnvError> {
        Ok(PathBuf::from("/tmp"))
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn os(&self) -> Os {
        Os::Linux
    }
}

#[tokio::test]
async fn test_output_follows_configured_order() {
    let configs = vec![text("a"), text("b"), text("c"), text("d")];
    let engine = Engine::new(4, " ");
    let rendered = engine
        .render_segments(&configs, MockEnvironment::new().into_shared())
        .await;

    let texts: Vec<_> = rendered.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_concurrent_matches_sequential() {
    let configs = vec![
        SegmentConfig::new(SegmentKind::SysInfo)
            .with_properties(Properties::new().with("precision", 2)),
        text("|"),
        SegmentConfig::new(SegmentKind::Spotify),
        SegmentConfig::new(SegmentKind::SysInfo).with_template("{{ .Load1 }}"),
        text("{{ .Missing }}"),
        SegmentConfig::new(SegmentKind::Time),
    ];
    let env = sysinfo_env().into_shared();
    let engine = Engine::new(3, " ");

    let concurrent = engine.render_segments(&configs, env.clone()).await;
    let sequential = engine.render_sequential(&configs, env).await;

    assert_eq!(concurrent, sequential);
    assert_eq!(engine.join(&concurrent), "60.51 | 1.5 12:00:00");
}

#[tokio::test]
async fn test_disabled_and_failing_segments_are_empty() {
    let configs = vec![
        SegmentConfig::new(SegmentKind::SysInfo),
        text("{{ round .Nothing 2 }}"),
        text("{{ if }}"),
        text("ok"),
    ];
    let engine = Engine::default();
    let rendered = engine
        .render_segments(&configs, MockEnvironment::new().into_shared())
        .await;

    assert!(rendered[0].is_empty());
    assert!(rendered[1].is_empty());
    assert!(rendered[2].is_empty());
    assert_eq!(rendered[3].text, "ok");
    assert_eq!(engine.join(&rendered), "ok");
}

#[tokio::test]
async fn test_render_prompt_uses_separator() {
    let configs = vec![text("left"), text(""), text("right")];
    let engine = Engine::new(2, " | ");
    let prompt = engine
        .render_prompt(&configs, MockEnvironment::new().into_shared())
        .await;
    assert_eq!(prompt, "left | right");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrency_is_bounded() {
    let slow = Arc::new(SlowEnvironment::new(Duration::from_millis(50)));
    let configs: Vec<_> = (0..6)
        .map(|_| SegmentConfig::new(SegmentKind::Git).with_template("{{ .Branch }}"))
        .collect();

    let engine = Engine::new(2, " ");
    let rendered = engine.render_segments(&configs, slow.clone()).await;

    assert_eq!(rendered.len(), 6);
    assert!(slow.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_segments_overlap_when_allowed() {
    let slow = Arc::new(SlowEnvironment::new(Duration::from_millis(100)));
    let configs: Vec<_> = (0..4)
        .map(|_| SegmentConfig::new(SegmentKind::Git).with_template("{{ .Branch }}"))
        .collect();

    let engine = Engine::new(4, " ");
    let rendered = engine.render_segments(&configs, slow.clone()).await;

    assert!(rendered.iter().all(|r| r.text == "git"));
    assert!(slow.peak.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_timed_out_query_disables_segment() {
    let slow: Arc<dyn Environment> = Arc::new(SlowEnvironment::new(Duration::from_millis(1)));
    let rendered = Engine::default()
        .render_segments(&[SegmentConfig::new(SegmentKind::SysInfo)], slow)
        .await;
    assert!(rendered[0].is_empty());
}

#[test]
fn test_evaluate_is_repeatable() {
    let env = sysinfo_env().into_shared();
    let config = SegmentConfig::new(SegmentKind::SysInfo)
        .with_properties(Properties::new().with("precision", 1));

    let first = evaluate(&config, env.clone());
    let second = evaluate(&config, env);
    assert_eq!(first.text, "60.5");
    assert_eq!(first, second);
}

#[test]
fn test_engine_from_blocking_context() {
    let configs = vec![text("x"), text("y")];
    let engine = Engine::new(0, "-");
    assert_eq!(engine.max_concurrency(), 1);

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let prompt = runtime.block_on(engine.render_prompt(&configs, MockEnvironment::new().into_shared()));
    assert_eq!(prompt, "x-y");
}

#[test]
fn test_render_with_tokio_test_block_on() {
    let configs = vec![text("{{ upper \"ok\" }}")];
    let prompt = tokio_test::block_on(async {
        Engine::default()
            .render_prompt(&configs, MockEnvironment::new().into_shared())
            .await
    });
    assert_eq!(prompt, "OK");
}
