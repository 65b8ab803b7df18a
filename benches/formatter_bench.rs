//! Benchmarks for note formatting.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use notakers::formatter::Formatter;

fn bench_format_lecture(c: &mut Criterion) {
    let formatter = Formatter::new("Your Great Note:");

    // ~1024 tokens worth of generated text with a heading every tenth sentence.
    let text: String = (0..400)
        .map(|i| {
            if i % 10 == 0 {
                format!("section: Part {i}. ")
            } else {
                format!("Propositions are sentences in the language of mathematics {i}. ")
            }
        })
        .collect();

    c.bench_function("format_400_sentences", |b| {
        b.iter(|| black_box(formatter.format(black_box(&text))))
    });
}

criterion_group!(benches, bench_format_lecture);
criterion_main!(benches);
