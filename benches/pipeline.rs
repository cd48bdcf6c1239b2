//! Benchmarks for the document processing pipeline.
//!
//! Run with: cargo bench

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

use flexdex::{Backend, Diagnostics, IndexSet, Processor, Settings, process_document};

/// Build a synthetic document: `terms` markers over a three-level
/// hierarchy, one marker every few lines of filler prose, one render
/// marker at the end.
fn sample_document(terms: usize) -> String {
    let mut doc = String::new();
    for i in 0..terms {
        let (a, b, c) = (i % 7, (i / 7) % 5, i);
        writeln!(doc, "Some prose discussing subject {a} in passing.").unwrap();
        writeln!(
            doc,
            "More detail <!-- ix main <area{a},topic{b},item{c}> --> follows here."
        )
        .unwrap();
        writeln!(doc, "And a closing sentence for the paragraph.").unwrap();
    }
    doc.push_str("<!-- ixhere main <style=column-grouped,cols=3lc.2> -->\n");
    doc
}

fn builtin_processor() -> Processor {
    let mut diag = Diagnostics::new();
    let mut settings = Settings::new();
    settings.parse_str(flexdex::BUILTIN_CONFIG, &mut diag);
    Processor::from_settings(Backend::Xhtml11, &settings)
}

// ============================================================================
// Whole-pipeline benchmarks
// ============================================================================

fn bench_process_small(c: &mut Criterion) {
    let doc = sample_document(50);
    c.bench_function("process_small", |b| {
        b.iter(|| process_document(&doc, Backend::Xhtml11, &[]));
    });
}

fn bench_process_large(c: &mut Criterion) {
    let doc = sample_document(2000);
    c.bench_function("process_large", |b| {
        b.iter(|| process_document(&doc, Backend::Xhtml11, &[]));
    });
}

fn bench_process_preloaded_config(c: &mut Criterion) {
    let doc = sample_document(500);
    let processor = builtin_processor();
    c.bench_function("process_preloaded_config", |b| {
        b.iter(|| {
            let mut diag = Diagnostics::new();
            processor.process(&doc, &mut diag)
        });
    });
}

// ============================================================================
// Per-pass benchmarks
// ============================================================================

fn bench_collect_pass(c: &mut Criterion) {
    let doc = sample_document(2000);
    c.bench_function("collect_pass", |b| {
        b.iter(|| {
            let mut diag = Diagnostics::new();
            IndexSet::collect(&doc, &mut diag)
        });
    });
}

fn bench_config_load(c: &mut Criterion) {
    c.bench_function("config_load", |b| {
        b.iter(builtin_processor);
    });
}

criterion_group!(
    benches,
    // whole pipeline
    bench_process_small,
    bench_process_large,
    bench_process_preloaded_config,
    // per pass
    bench_collect_pass,
    bench_config_load,
);
criterion_main!(benches);
