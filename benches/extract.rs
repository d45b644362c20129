// benches/extract.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use avf_scrape::core::html::strip_tags;
use avf_scrape::core::vischars::visible_text;
use avf_scrape::specs::trainers;

const SAMPLE: &str = include_str!("../tests/fixtures/trainers_page.html");

/// The sample page with its staff list repeated, to look like a big club.
fn large_page(copies: usize) -> String {
    let start = SAMPLE.find("<div class=\"liste\">").unwrap_or(0);
    let end = SAMPLE.find("<!--").unwrap_or(SAMPLE.len());
    let liste = &SAMPLE[start..end];
    let mut page = String::from("<html><body>");
    for _ in 0..copies {
        page.push_str(liste);
    }
    page.push_str("</body></html>");
    page
}

fn bench_extract(c: &mut Criterion) {
    let big = large_page(40);

    c.bench_function("trainers_sample", |b| {
        b.iter(|| {
            let rows = trainers::extract(black_box(SAMPLE), "FC Sion");
            black_box(rows.len())
        })
    });

    c.bench_function("trainers_large", |b| {
        b.iter(|| {
            let rows = trainers::extract(black_box(&big), "FC Sion");
            black_box(rows.len())
        })
    });

    c.bench_function("visible_text", |b| {
        b.iter(|| black_box(visible_text(black_box(SAMPLE))).len())
    });

    c.bench_function("strip_tags", |b| {
        b.iter(|| black_box(strip_tags(black_box(SAMPLE))).len())
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
