//! # rcvmd
//!
//! Converts the HTML edition of the Recovery Version Bible into cross-linked
//! Markdown notes for Obsidian: one text note, one footnote note and one
//! outline note per book.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rcvmd::{BookSources, BookTable, ConvertConfig, convert_library};
//!
//! let books = vec![
//!     BookSources::new("Gen", "<html>…</html>", "<html>…</html>")
//!         .with_outline("<html>…</html>"),
//! ];
//! let output = convert_library(&books, &BookTable, &ConvertConfig::default());
//! for (source, result) in output.books {
//!     match result {
//!         Ok(book) => println!("{}: {} bytes", book.abbr, book.text.len()),
//!         Err(e) => eprintln!("{source}: {e}"),
//!     }
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. [`AnchorIndex`] per footnote page, collected into an [`AnchorMap`]
//! 2. Renderers flatten each page, resolving links through [`LinkResolver`]
//! 3. The text note runs through the [`rewrite`] passes

pub mod book;
pub mod books;
pub mod config;
pub mod convert;
pub mod dom;
pub mod error;
pub mod outline;
pub mod refs;
pub mod render;
pub mod rewrite;
pub mod util;

pub use book::BookContext;
pub use books::{BookEntry, BookLookup, BookTable};
pub use config::ConvertConfig;
pub use convert::{
    BookMarkdown, BookSources, LibraryOutput, build_anchor_map, convert_book, convert_books,
    convert_library,
};
pub use error::{Error, Result};
pub use refs::{AnchorIndex, AnchorMap, BracketEscape, CanonicalLink, LinkResolver};
pub use render::{Properties, PropertyValue, render_body, render_footnotes, render_outline};
pub use rewrite::rewrite;
