//! Book and library conversion.
//!
//! A library converts in two phases: first the anchor index of every book's
//! footnote page, then the books themselves. Footnote links cross books, so
//! no book can be rendered before every index exists.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::book::BookContext;
use crate::books::BookLookup;
use crate::config::ConvertConfig;
use crate::error::{Error, Result};
use crate::refs::{AnchorIndex, AnchorMap, BracketEscape, LinkResolver};
use crate::render::{render_body, render_footnotes, render_outline};
use crate::rewrite::rewrite;

/// The three HTML pages of one book.
#[derive(Debug, Clone)]
pub struct BookSources {
    /// Source code of the book, as in the file names (`Gen`, `Mat`, `SoS`).
    pub source: String,
    pub body: String,
    pub notes: String,
    pub outline: Option<String>,
}

impl BookSources {
    pub fn new(source: impl Into<String>, body: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            body: body.into(),
            notes: notes.into(),
            outline: None,
        }
    }

    pub fn with_outline(mut self, outline: impl Into<String>) -> Self {
        self.outline = Some(outline.into());
        self
    }
}

/// The Markdown notes of one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMarkdown {
    /// Short abbreviation, the base of every note name.
    pub abbr: String,
    /// `Text/<abbr>.md`
    pub text: String,
    /// `Footnotes/<abbr>N.md`
    pub notes: String,
    /// `Outlines/<abbr>O.md`
    pub outline: Option<String>,
}

/// Short abbreviation for a book's source code.
pub fn book_abbreviation<'a>(source: &str, lookup: &'a dyn BookLookup) -> Result<&'a str> {
    lookup
        .abbreviation_of_source(source)
        .ok_or_else(|| Error::UnknownBook(source.to_string()))
}

/// Convert one book. `anchors` must hold the index of every book its pages link into.
pub fn convert_book(
    sources: &BookSources,
    anchors: &AnchorMap,
    lookup: &dyn BookLookup,
    config: &ConvertConfig,
) -> Result<BookMarkdown> {
    let abbr = book_abbreviation(&sources.source, lookup)?;
    let ctx = BookContext::new(abbr, lookup, config);
    let resolver = |escape| LinkResolver::new(ctx, anchors, escape);

    let (body, properties) = render_body(&sources.body, resolver(BracketEscape::Parens))?;
    let text = rewrite(&body, ctx, properties);
    let notes = render_footnotes(&sources.notes, resolver(BracketEscape::Parens))?;
    let outline = sources
        .outline
        .as_deref()
        .map(|html| render_outline(html, &ctx, resolver(BracketEscape::Backslash)))
        .transpose()?;

    debug!(book = abbr, bytes = text.len(), "converted book");
    Ok(BookMarkdown {
        abbr: abbr.to_string(),
        text,
        notes,
        outline,
    })
}

/// Phase one: the anchor index of every book, keyed by abbreviation.
///
/// Books with an unknown source code are skipped with a warning.
pub fn build_anchor_map(books: &[BookSources], lookup: &dyn BookLookup) -> AnchorMap {
    let indexes: Vec<(String, AnchorIndex)> = books
        .par_iter()
        .filter_map(|book| match book_abbreviation(&book.source, lookup) {
            Ok(abbr) => Some((abbr.to_string(), AnchorIndex::from_html(&book.notes))),
            Err(e) => {
                warn!(source = %book.source, "skipping anchor index: {e}");
                None
            }
        })
        .collect();
    indexes.into_iter().collect()
}

/// Phase two: convert `books` against a complete anchor map.
///
/// Results keep the input order; a failing book does not stop the others.
pub fn convert_books(
    books: &[BookSources],
    anchors: &AnchorMap,
    lookup: &dyn BookLookup,
    config: &ConvertConfig,
) -> Vec<(String, Result<BookMarkdown>)> {
    books
        .par_iter()
        .map(|book| {
            (
                book.source.clone(),
                convert_book(book, anchors, lookup, config),
            )
        })
        .collect()
}

/// Converted library: the reference map plus one result per book.
#[derive(Debug)]
pub struct LibraryOutput {
    pub anchors: AnchorMap,
    pub books: Vec<(String, Result<BookMarkdown>)>,
}

/// Convert a whole library, both phases.
pub fn convert_library(
    books: &[BookSources],
    lookup: &dyn BookLookup,
    config: &ConvertConfig,
) -> LibraryOutput {
    let anchors = build_anchor_map(books, lookup);
    let books = convert_books(books, &anchors, lookup, config);
    LibraryOutput { anchors, books }
}
