use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prompt_powerline::properties::Properties;
use prompt_powerline::runtime::{Memory, Os};
use prompt_powerline::{
    template, Engine, MockEnvironment, SegmentConfig, SegmentKind, SystemInfo, Template,
};
use serde_json::json;

const CONDITIONAL_TEMPLATE: &str =
    "{{ .BranchIcon }}{{ .Branch }}{{ if .Dirty }} *{{ end }}{{ if .Ahead }} \u{2191}{{ .Ahead }}{{ end }}";

fn bench_environment() -> MockEnvironment {
    MockEnvironment::new()
        .with_os(Os::MacOs)
        .with_command("git", &["rev-parse", "--abbrev-ref", "HEAD"], Ok("main"))
        .with_command(
            "git",
            &["status", "--porcelain=v2"],
            Ok("1 .M N... 100644 100644 100644 4e1f 4e1f src/lib.rs\n? notes.txt"),
        )
        .with_command(
            "git",
            &["rev-list", "--left-right", "--count", "HEAD...@{upstream}"],
            Ok("2\t0"),
        )
        .with_command("osascript", &["-e", "application \"Spotify\" is running"], Ok("true"))
        .with_command(
            "osascript",
            &["-e", "tell application \"Spotify\" to player state as string"],
            Ok("playing"),
        )
        .with_command(
            "osascript",
            &["-e", "tell application \"Spotify\" to artist of current track as string"],
            Ok("Candlemass"),
        )
        .with_command(
            "osascript",
            &["-e", "tell application \"Spotify\" to name of current track as string"],
            Ok("Spellbreaker"),
        )
        .with_system_info(Ok(SystemInfo {
            memory: Memory {
                physical_percent_used: 60.51,
                swap_percent_used: 12.5,
                ..Memory::default()
            },
            load1: 0.22,
            load5: 0.12,
            load15: 0.0,
        }))
        .with_pwd("/home/bench/src/prompt")
        .with_env("HOME", "/home/bench")
}

fn bench_segments() -> Vec<SegmentConfig> {
    vec![
        SegmentConfig::new(SegmentKind::Path),
        SegmentConfig::new(SegmentKind::Git),
        SegmentConfig::new(SegmentKind::Spotify),
        SegmentConfig::new(SegmentKind::SysInfo)
            .with_properties(Properties::new().with("precision", 2)),
        SegmentConfig::new(SegmentKind::Time),
        SegmentConfig::new(SegmentKind::Text).with_template("\u{276f}"),
    ]
}

fn bench_template_parse(c: &mut Criterion) {
    c.bench_function("template_parse", |b| {
        b.iter(|| Template::parse(black_box(CONDITIONAL_TEMPLATE)))
    });
}

fn bench_template_render(c: &mut Criterion) {
    let context = json!({
        "BranchIcon": "\u{e0a0} ",
        "Branch": "main",
        "Dirty": true,
        "Ahead": 2,
    });
    let parsed = Template::parse(CONDITIONAL_TEMPLATE).unwrap();

    let mut group = c.benchmark_group("template_render");
    group.bench_function("parsed", |b| b.iter(|| parsed.render(black_box(&context))));
    group.bench_function("parse_and_render", |b| {
        b.iter(|| template::render(black_box(CONDITIONAL_TEMPLATE), black_box(&context)))
    });
    group.bench_function("round", |b| {
        let context = json!({"PhysicalPercentUsed": 60.5149, "Precision": 2});
        b.iter(|| {
            template::render(
                black_box("{{ round .PhysicalPercentUsed .Precision }}"),
                black_box(&context),
            )
        })
    });
    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let env = bench_environment();
    let segments = bench_segments();

    let mut group = c.benchmark_group("engine");
    for concurrency in [1, 4] {
        let engine = Engine::new(concurrency, " ");
        group.bench_function(format!("render_prompt_x{}", concurrency), |b| {
            b.iter(|| {
                rt.block_on(engine.render_prompt(black_box(&segments), env.clone().into_shared()))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_template_parse, bench_template_render, bench_engine);
criterion_main!(benches);
