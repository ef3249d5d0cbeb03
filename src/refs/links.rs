//! Hyperlink resolution into note link tokens.
//!
//! The edition addresses everything with relative hrefs of the form
//! `<stem>.htm#<fragment>`:
//! - `Gen.htm#v1_1` → verse 1:1 in the text of Genesis
//! - `GenN.htm#n1_1x2` → the second note on verse 1:1
//! - `GenO.htm#o3` → an outline point
//! - `a.htm` → the table of contents of the whole Bible
//!
//! These are rewritten into `[[<note>#^<anchor>|<display>]]` tokens.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex_lite::Regex;

use crate::book::BookContext;
use crate::error::{Error, Result};

use super::anchors::AnchorMap;

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\w+)\.htm)?(?:#(.+))?").unwrap());

static FOOTNOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^n(?:(\d+)_)?(\d+|Title)(?:x([^P]+)(?:P(\d+))?)?").unwrap()
});

static VERSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v(\d+)(?:_(Title|\d+))?").unwrap());

/// What a hyperlink points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// A verse or chapter anchor in a text note.
    Verse,
    /// A footnote, addressed by chapter, verse and note suffix.
    Footnote,
    /// A point in an outline note.
    Outline,
    /// A whole note, without fragment.
    BareBook,
    /// Any other fragment, passed through unchanged.
    CrossBook,
}

/// Which document family a file stem belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemKind {
    Text,
    Notes,
    Outline,
}

impl StemKind {
    fn suffix(self) -> &'static str {
        match self {
            StemKind::Text => "",
            StemKind::Notes => "N",
            StemKind::Outline => "O",
        }
    }
}

/// A parsed href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    /// Source code of the target book (`Gen`, `1Co`), `None` for same-document links.
    pub stem: Option<String>,
    pub stem_kind: StemKind,
    pub kind: LinkKind,
    pub chapter: Option<String>,
    pub verse: Option<String>,
    pub note: Option<String>,
    /// Raw fragment, without `#`.
    pub fragment: Option<String>,
}

impl LinkTarget {
    /// Parse a raw (possibly percent-encoded) href.
    pub fn parse(href: &str) -> Self {
        let decoded = percent_decode_str(href).decode_utf8_lossy();
        let caps = HREF_RE.captures(&decoded);
        let file = caps
            .as_ref()
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim());
        let fragment = caps
            .as_ref()
            .and_then(|c| c.get(2))
            .map(|m| m.as_str().to_string());

        let (stem, stem_kind) = match file {
            Some(f) if f.len() > 1 && f.ends_with('N') => (Some(&f[..f.len() - 1]), StemKind::Notes),
            Some(f) if f.len() > 1 && f.ends_with('O') => {
                (Some(&f[..f.len() - 1]), StemKind::Outline)
            }
            Some(f) => (Some(f), StemKind::Text),
            None => (None, StemKind::Text),
        };

        let mut target = LinkTarget {
            stem: stem.map(str::to_string),
            stem_kind,
            kind: LinkKind::CrossBook,
            chapter: None,
            verse: None,
            note: None,
            fragment,
        };

        let Some(fragment) = target.fragment.as_deref() else {
            target.kind = LinkKind::BareBook;
            return target;
        };

        if let Some(c) = FOOTNOTE_RE.captures(fragment) {
            target.kind = LinkKind::Footnote;
            target.chapter = c.get(1).map(|m| m.as_str().to_string());
            target.verse = c.get(2).map(|m| m.as_str().to_string());
            target.note = c.get(3).map(|m| m.as_str().to_string());
        } else if let Some(c) = VERSE_RE.captures(fragment) {
            target.kind = LinkKind::Verse;
            target.chapter = c.get(1).map(|m| m.as_str().to_string());
            target.verse = c.get(2).map(|m| m.as_str().to_string());
        } else if stem_kind == StemKind::Outline {
            target.kind = LinkKind::Outline;
        }
        target
    }

    /// Anchor index key of a footnote target: `chapter-verse[xnote]`.
    pub fn footnote_key(&self) -> Option<String> {
        if self.kind != LinkKind::Footnote {
            return None;
        }
        let verse = self.verse.as_deref()?;
        let mut key = match &self.chapter {
            Some(ch) => format!("{ch}-{verse}"),
            None => verse.to_string(),
        };
        if let Some(note) = &self.note {
            key.push('x');
            key.push_str(note);
        }
        Some(key)
    }
}

/// How square brackets in display text are neutralized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketEscape {
    /// `[` → `(`, `]` → `)`
    Parens,
    /// `[` → `\[`, `]` → `\]`
    Backslash,
}

impl BracketEscape {
    pub fn apply<'a>(self, text: &'a str) -> Cow<'a, str> {
        if !text.contains(['[', ']']) {
            return Cow::Borrowed(text);
        }
        match self {
            BracketEscape::Parens => Cow::Owned(text.replace('[', "(").replace(']', ")")),
            BracketEscape::Backslash => Cow::Owned(text.replace('[', r"\[").replace(']', r"\]")),
        }
    }
}

/// A resolved link token plus the originating tag's `name` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalLink {
    pub token: String,
    pub name: Option<String>,
}

impl fmt::Display for CanonicalLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Rewrites hyperlinks of one book into link tokens.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    ctx: BookContext<'a>,
    anchors: &'a AnchorMap,
    escape: BracketEscape,
}

impl<'a> LinkResolver<'a> {
    pub fn new(ctx: BookContext<'a>, anchors: &'a AnchorMap, escape: BracketEscape) -> Self {
        Self {
            ctx,
            anchors,
            escape,
        }
    }

    /// Resolve a hyperlink given its href, name attribute and display text.
    ///
    /// A tag without `href` resolves to the top of the current book.
    /// Fails with [`Error::MissingAnchor`] when a footnote key is absent from
    /// the target book's anchor index.
    pub fn resolve(
        &self,
        href: Option<&str>,
        name: Option<&str>,
        display: &str,
    ) -> Result<CanonicalLink> {
        let lookup = self.ctx.lookup;
        let text = lookup.normalize_source_abbreviations(display);
        let target = LinkTarget::parse(href.unwrap_or(""));

        let stem_book = target.stem.as_deref().map(|stem| self.book_for_stem(stem));
        let mut book = match (&stem_book, target.stem.as_deref()) {
            (_, Some("a")) => Some("Bible".to_string()),
            (Some(b), _) => Some(format!("{b}{}", target.stem_kind.suffix())),
            _ => None,
        };

        let anchor = match target.kind {
            LinkKind::Footnote => {
                let notes_book = stem_book.as_deref().unwrap_or(self.ctx.abbr);
                let key = target.footnote_key().unwrap_or_default();
                let canonical = self
                    .anchors
                    .get(notes_book)
                    .and_then(|index| index.canonical(&key))
                    .ok_or_else(|| Error::MissingAnchor {
                        book: notes_book.to_string(),
                        chapter: target.chapter.clone(),
                        verse: target.verse.clone().unwrap_or_default(),
                        note: target.note.clone(),
                    })?;
                book = Some(format!("{notes_book}N"));
                Some(canonical.to_string())
            }
            LinkKind::Verse => {
                let chapter = target.chapter.clone().unwrap_or_default();
                Some(match &target.verse {
                    Some(verse) => format!("{chapter}-{verse}"),
                    None => chapter,
                })
            }
            _ => target.fragment.clone(),
        };

        let text = if text.is_empty() { Cow::Borrowed("*") } else { text };
        let text = self.escape.apply(&text);

        let token = match (anchor, book) {
            (Some(anchor), book) => {
                let book = book.as_deref().unwrap_or(self.ctx.abbr);
                format!("[[{book}#^{anchor}|{text}]]")
            }
            (None, Some(book)) => format!("[[{book}|{text}]]"),
            (None, None) => format!("[[{}|{text}]]", self.ctx.top_link_target()),
        };

        Ok(CanonicalLink {
            token,
            name: name.map(str::to_string),
        })
    }

    /// Short abbreviation for a source stem, or the raw stem when unknown.
    fn book_for_stem(&self, stem: &str) -> String {
        if stem == "a" {
            return stem.to_string();
        }
        match self.ctx.lookup.abbreviation_of_source(stem) {
            Some(abbr) => abbr.to_string(),
            None => {
                tracing::warn!(book = self.ctx.abbr, stem, "unmapped book in link target");
                stem.to_string()
            }
        }
    }
}
