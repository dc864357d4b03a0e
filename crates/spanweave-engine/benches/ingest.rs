use criterion::{Criterion, criterion_group, criterion_main};
use spanweave_engine::{HtmlAsRichTextConfig, html_as_rich_text};
mod common;

fn bench_html_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    group.sample_size(10);

    let html = common::generate_html(100);
    let plain = HtmlAsRichTextConfig::default();
    let customized = HtmlAsRichTextConfig::new()
        .container("article")
        .exclude("img")
        .serialize("h2", "heading3")
        .serialize("ul > li", "o-list-item");

    group.bench_function("default_config", |b| {
        b.iter(|| {
            let out = html_as_rich_text(std::hint::black_box(&html), &plain).unwrap();
            std::hint::black_box(out);
        });
    });

    group.bench_function("selectors_and_serializers", |b| {
        b.iter(|| {
            let out = html_as_rich_text(std::hint::black_box(&html), &customized).unwrap();
            std::hint::black_box(out);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_html_ingestion);
criterion_main!(benches);
