//! Benchmarks for book conversion.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use rcvmd::{
    AnchorIndex, BookSources, BookTable, ConvertConfig, build_anchor_map, convert_book,
    convert_library,
};

/// A synthetic book of `chapters` chapters with ten footnoted verses each.
fn sample_book(chapters: usize) -> BookSources {
    let mut body = String::from("<html><head><title>Genesis</title></head><body>");
    let mut notes = String::from("<html><head><title>Genesis Notes</title></head><body>");

    for c in 1..=chapters {
        for v in 1..=10 {
            body.push_str(&format!(
                r#"<p><b><a href="a.htm">Gen</a> <a href="Gen.htm#v{c}">{c}</a>:<a href="Gen.htm#v{c}_{v}">{v}</a></b> And God said<a href="GenN.htm#n{c}_{v}x1">1</a>, Let there be light; and there was light.</p>"#
            ));
            notes.push_str(&format!(
                r#"<a name="n{c}_{v}x1"></a><p><b>{c}<sup>{v}</sup></b> See <a href="Gen.htm#v{c}_{v}">v. {v}</a>.</p>"#
            ));
        }
    }
    body.push_str("</body></html>");
    notes.push_str("</body></html>");

    BookSources::new("Gen", body, notes)
}

fn bench_anchor_index(c: &mut Criterion) {
    let book = sample_book(50);
    c.bench_function("anchor_index_50_chapters", |b| {
        b.iter(|| AnchorIndex::from_html(black_box(&book.notes)))
    });
}

fn bench_convert_book(c: &mut Criterion) {
    let books = vec![sample_book(50)];
    let anchors = build_anchor_map(&books, &BookTable);
    let config = ConvertConfig::default();

    c.bench_function("convert_book_50_chapters", |b| {
        b.iter(|| convert_book(black_box(&books[0]), &anchors, &BookTable, &config))
    });
}

fn bench_convert_library(c: &mut Criterion) {
    let books: Vec<BookSources> = ["Gen", "Exo", "Lev", "Num", "Deu"]
        .iter()
        .map(|source| {
            let mut book = sample_book(20);
            book.source = source.to_string();
            book
        })
        .collect();
    let config = ConvertConfig::default();

    c.bench_function("convert_library_5_books", |b| {
        b.iter(|| convert_library(black_box(&books), &BookTable, &config))
    });
}

criterion_group!(
    benches,
    bench_anchor_index,
    bench_convert_book,
    bench_convert_library
);
criterion_main!(benches);
