use criterion::{Criterion, criterion_group, criterion_main};
use extra_styles_config::Settings;
use extra_styles_engine::static_render::render_html;
use pulldown_cmark::{Parser, html};
use std::hint::black_box;
mod common;

fn bench_static_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("static_render");
    group.sample_size(10);

    let content = common::styled_note(100);
    let settings = Settings::default();

    group.bench_function("pulldown_cmark_baseline", |b| {
        b.iter(|| {
            let mut out = String::new();
            html::push_html(&mut out, Parser::new(black_box(&content)));
            black_box(out);
        });
    });

    group.bench_function("styled", |b| {
        b.iter(|| {
            let out = render_html(black_box(&content), &settings);
            black_box(out);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_static_render);
criterion_main!(benches);
