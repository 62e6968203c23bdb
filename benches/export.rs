//! Benchmarks for the export pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use folio::content::PullquotePosition;
use folio::dom::parse_html;
use folio::{Content, Exporter, FilenameBundler, Settings, Theme, ThemeLibrary};

const ARTICLE_HTML: &str = include_str!("../tests/fixtures/article.html");

fn article() -> Content {
    let mut content = Content::new("bench", ARTICLE_HTML)
        .with_title("The long read")
        .with_cover("https://media.example.com/2024/05/cover.jpg")
        .with_pullquote("Nothing moves faster than a rumour", PullquotePosition::Middle);
    content.author = Some("Staff Writer".to_string());
    content
}

fn bench_parse_html(c: &mut Criterion) {
    c.bench_function("parse_html", |b| {
        b.iter(|| parse_html(std::hint::black_box(ARTICLE_HTML)));
    });
}

fn bench_export(c: &mut Criterion) {
    let settings = Settings::default();
    let themes = ThemeLibrary::with_theme(Theme::default());
    let exporter = Exporter::new(&settings, &themes, &FilenameBundler);
    let content = article();

    c.bench_function("export_article", |b| {
        b.iter(|| exporter.export(std::hint::black_box(&content)).unwrap());
    });

    let html_settings = Settings {
        html_support: true,
        ..Settings::default()
    };
    let html_exporter = Exporter::new(&html_settings, &themes, &FilenameBundler);
    c.bench_function("export_article_html", |b| {
        b.iter(|| html_exporter.export(std::hint::black_box(&content)).unwrap());
    });
}

criterion_group!(benches, bench_parse_html, bench_export);
criterion_main!(benches);
