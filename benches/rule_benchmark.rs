//! Benchmarks for rule parsing and evaluation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rule_engine_core::config::EngineConfig;
use rule_engine_core::engine::RuleEngine;
use rule_engine_core::rule::{evaluate, parse_rule, record_from_json, LogicalOperator};
use serde_json::json;

const SIMPLE_RULE: &str = "age > 30";
const CHAINED_RULE: &str = "age > 30 AND department = 'Sales'";
const NESTED_RULE: &str =
    "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)";

/// A wide rule: `(f0 > 0) AND (f1 > 1) AND ... (fN > N)`
fn wide_rule(width: usize) -> String {
    (0..width)
        .map(|i| format!("(f{} > {})", i, i))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn bench_parse(c: &mut Criterion) {
    let wide = wide_rule(50);

    c.bench_function("parse_simple", |b| b.iter(|| parse_rule(black_box(SIMPLE_RULE))));
    c.bench_function("parse_chained", |b| b.iter(|| parse_rule(black_box(CHAINED_RULE))));
    c.bench_function("parse_nested", |b| b.iter(|| parse_rule(black_box(NESTED_RULE))));
    c.bench_function("parse_wide_50", |b| b.iter(|| parse_rule(black_box(&wide))));
}

fn bench_create_rule(c: &mut Criterion) {
    let cached = RuleEngine::new();
    let uncached = RuleEngine::with_config(EngineConfig {
        cache_capacity: 0,
        ..EngineConfig::default()
    });

    c.bench_function("create_rule_cached", |b| {
        b.iter(|| cached.create_rule(black_box(NESTED_RULE)))
    });
    c.bench_function("create_rule_uncached", |b| {
        b.iter(|| uncached.create_rule(black_box(NESTED_RULE)))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let data = record_from_json(&json!({
        "age": 35,
        "department": "Sales",
        "salary": 60000,
        "experience": 3
    }))
    .expect("valid record");

    let nested = parse_rule(NESTED_RULE).expect("valid rule");
    c.bench_function("evaluate_nested", |b| {
        b.iter(|| evaluate(black_box(&nested), black_box(&data)))
    });

    let width = 50;
    let wide = parse_rule(&wide_rule(width)).expect("valid rule");
    let wide_data = record_from_json(&json!(
        (0..width)
            .map(|i| (format!("f{}", i), json!(i + 1)))
            .collect::<serde_json::Map<_, _>>()
    ))
    .expect("valid record");
    c.bench_function("evaluate_wide_50", |b| {
        b.iter(|| evaluate(black_box(&wide), black_box(&wide_data)))
    });
}

fn bench_combine(c: &mut Criterion) {
    let engine = RuleEngine::new();
    let rules: Vec<String> = (0..20).map(|i| format!("f{} >= {}", i, i)).collect();

    c.bench_function("combine_20", |b| {
        b.iter(|| engine.combine_rules(black_box(&rules), LogicalOperator::Or))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_create_rule,
    bench_evaluate,
    bench_combine
);
criterion_main!(benches);
