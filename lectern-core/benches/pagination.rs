//! Pagination and export benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use lectern_core::export::{Exporter, PlainTextExporter};
use lectern_core::reader::{Direction, Pagination, Step, VerseTarget};
use lectern_core::types::{Language, Verse};

fn pagination_benchmark(c: &mut Criterion) {
    // Verse counts of the first ten surahs
    let counts = [7u32, 286, 200, 176, 120, 165, 206, 75, 129, 109];

    c.bench_function("turn through ten chapters", |b| {
        b.iter(|| {
            let mut p = Pagination::new(1, counts.len() as u32);
            p.install(1, counts[0], VerseTarget::First);
            loop {
                match p.plan_turn(Direction::Forward) {
                    Step::Within(index) => p.select(VerseTarget::Index(index)),
                    Step::Chapter { chapter, target } => {
                        p.install(chapter, counts[chapter as usize - 1], target)
                    }
                    _ => break,
                }
            }
            std::hint::black_box(p.position())
        })
    });
}

fn export_benchmark(c: &mut Criterion) {
    let verses: Vec<Verse> = (1..=286)
        .map(|n| {
            Verse::new("quran", 2, n, "ذَٰلِكَ ٱلْكِتَـٰبُ لَا رَيْبَ فِيهِ")
                .with_translation(Language::English, "This is the Book about which there is no doubt")
                .with_translation(Language::EnglishTransliteration, "Thalika alkitabu la rayba feehi")
        })
        .collect();

    c.bench_function("plain text export", |b| {
        b.iter(|| {
            std::hint::black_box(
                PlainTextExporter
                    .export_to_string("quran - Chapter 2", &verses)
                    .unwrap(),
            )
        })
    });
}

criterion_group!(benches, pagination_benchmark, export_benchmark);
criterion_main!(benches);
