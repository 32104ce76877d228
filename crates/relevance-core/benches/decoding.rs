use criterion::{black_box, criterion_group, criterion_main, Criterion};

use relevance_core::decode::decode_judgment;
use relevance_core::rubric;

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_judgment");

    let bare = r#"{"score": "great", "reasoning": "Follows the requested style and stays on topic."}"#;
    let fenced = "```json\n{\"score\": \"ok\", \"reasoning\": \"Touches the topic but misses key details.\"}\n```";
    let invalid = r#"{"score": "superb", "reasoning": "n/a"}"#;
    let long_reasoning = format!(
        r#"{{"score": "excellent", "reasoning": "{}"}}"#,
        "thorough and precise ".repeat(200)
    );

    group.bench_function("bare", |b| b.iter(|| decode_judgment(black_box(bare))));
    group.bench_function("fenced", |b| b.iter(|| decode_judgment(black_box(fenced))));
    group.bench_function("invalid_label", |b| {
        b.iter(|| decode_judgment(black_box(invalid)))
    });
    group.bench_function("long_reasoning", |b| {
        b.iter(|| decode_judgment(black_box(&long_reasoning)))
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let response = "Crimson maples fall\nwhispering to the cold earth\nautumn breathes its last".repeat(20);
    c.bench_function("rubric_render", |b| {
        b.iter(|| rubric::render(black_box("Write a haiku about autumn"), black_box(&response)))
    });
}

criterion_group!(benches, bench_decode, bench_render);
criterion_main!(benches);
