//! Structural rewrites of the rendered body text.
//!
//! The body renderer produces one long run of text with link tokens. These
//! passes turn it into the final note: navigation lines, verse anchors,
//! outline headings and front matter. Every pass is a plain text-to-text
//! function and does nothing when its pattern is absent.
//!
//! ## Pass Order
//!
//! 1. **Cleanup** - Line breaks around links, placeholder and lead-in fixes
//! 2. **List Merge** - Join multi-line `**ch.**`/`**vv.**` link lists
//! 3. **Chapter Navigation** - Previous/next lines for chapters and psalms
//! 4. **Bible Links** - Normalize bold verse headers
//! 5. **Verse Separation** - Drop `Verses` stubs, put each header on its own line
//! 6. **Outline** - Classify outline points into headings, with spacing
//! 7. **Split Verses** - Rejoin `a`/`b` verse halves around outline points
//! 8. **Verse Anchors** - `^<ch>-<v>` on the last line of each verse
//! 9. **Navigation Merge** - Fold the verse list into the chapter navigation line
//! 10. **Finish** - Subject, top lines, blank-line cleanup, front matter

mod chapters;
mod cleanup;
mod finish;
mod navigation;
mod outline;
mod verses;

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::book::BookContext;
use crate::render::Properties;

static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// State shared by the passes of one book.
#[derive(Debug)]
pub struct PassContext<'a> {
    pub book: BookContext<'a>,
    /// Properties from the text page; the subject is added during the final pass.
    pub properties: Properties,
}

/// A single rewrite pass.
pub type Pass = fn(&str, &mut PassContext<'_>) -> String;

/// The passes, in the order they run.
pub const PASSES: &[(&str, Pass)] = &[
    ("cleanup", cleanup::cleanup_markdown),
    ("list-merge", chapters::merge_multiline_lists),
    ("chapter-navigation", chapters::add_chapter_navigation),
    ("bible-links", verses::normalize_bible_links),
    ("verse-separation", verses::separate_verse_headers),
    ("outline", outline::classify_outline),
    ("split-verses", verses::combine_split_verses),
    ("verse-anchors", verses::add_verse_anchors),
    ("navigation-merge", navigation::combine_nav_and_verse_lines),
    ("finish", finish::finish),
];

/// Run every pass over the rendered body text of one book.
pub fn rewrite(text: &str, book: BookContext<'_>, properties: Properties) -> String {
    let mut ctx = PassContext { book, properties };
    let mut text = text.to_string();
    for (name, pass) in PASSES {
        text = pass(&text, &mut ctx);
        debug!(book = book.abbr, pass = *name, bytes = text.len(), "rewrite pass done");
    }
    text
}

/// Collapse three or more consecutive newlines into one blank line.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n\n").into_owned()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
