//! Generation pipeline benchmarks
//!
//! Measures the non-I/O stages of a generation request: input sanitization,
//! normalization of provider output, and config parsing.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flashai::config::{Config, LimitsConfig};
use flashai::generation::{normalize, sanitize};
use std::hint::black_box;

fn provider_output(cards: usize, invalid: usize) -> String {
    let mut entries: Vec<serde_json::Value> = (0..cards)
        .map(|i| {
            serde_json::json!({
                "front": format!("What does concept {} describe?", i),
                "back": format!("Concept {} describes one step of the process.", i),
            })
        })
        .collect();
    entries.extend((0..invalid).map(|_| serde_json::json!({ "front": "", "back": null })));
    serde_json::Value::Array(entries).to_string()
}

/// Benchmark normalization of provider output
///
/// Sizes cover a typical answer, an over-long answer that gets capped, and
/// one padded with entries that are dropped.
fn bench_normalize(c: &mut Criterion) {
    let cases = vec![
        ("six_valid", provider_output(6, 0)),
        ("fifteen_capped", provider_output(15, 0)),
        ("mixed_invalid", provider_output(5, 20)),
    ];

    let mut group = c.benchmark_group("normalize");

    for (name, raw) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), raw, |b, raw| {
            b.iter(|| normalize(black_box(raw)));
        });
    }

    group.finish();
}

/// Benchmark input sanitization
///
/// The long case exercises truncation at the character limit.
fn bench_sanitize(c: &mut Criterion) {
    let limits = LimitsConfig::default();
    let cases = vec![
        ("paragraph", "Photosynthesis converts light energy into chemical energy. ".repeat(4)),
        ("at_limit", "x".repeat(8000)),
        ("over_limit_multibyte", "ü".repeat(20_000)),
    ];

    let mut group = c.benchmark_group("sanitize");

    for (name, text) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| sanitize(black_box(Some(text.as_str())), &limits));
        });
    }

    group.finish();
}

/// Benchmark configuration parsing and validation
///
/// Runs once at startup.
fn bench_config_parsing(c: &mut Criterion) {
    let toml_str = flashai::cli::generate_config_template();

    c.bench_function("config_parsing", |b| {
        b.iter(|| toml_str.parse::<Config>());
    });
}

criterion_group!(benches, bench_normalize, bench_sanitize, bench_config_parsing);
criterion_main!(benches);
