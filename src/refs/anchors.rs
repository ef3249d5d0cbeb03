//! Footnote anchor identity.
//!
//! A footnote page often stacks several `<a name=…>` tags in front of one
//! paragraph (`n1_1`, `n1_1P2`, ...), one per place in the text that cites
//! the same note. Only the last anchor of such a run is emitted in the output,
//! so every other name in the run must be rewritten to it.

use std::collections::BTreeMap;

use crate::dom::{ArenaDom, NodeId, parse_html};

/// Raw anchor id → canonical anchor id, for one book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorIndex {
    entries: BTreeMap<String, String>,
}

impl AnchorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a parsed footnote page.
    pub fn build(dom: &ArenaDom) -> Self {
        let mut index = Self::new();
        for p in dom.elements_by_tag(&["p"]) {
            let run = anchor_run(dom, p);
            let Some(canonical) = run.last() else {
                continue;
            };
            for anchor in &run {
                index.entries.insert(anchor.clone(), canonical.clone());
            }
        }
        index
    }

    /// Parse a footnote page and build its index.
    pub fn from_html(html: &str) -> Self {
        Self::build(&parse_html(html))
    }

    /// Canonical anchor for a raw anchor id.
    pub fn canonical(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    pub fn insert(&mut self, raw: impl Into<String>, canonical: impl Into<String>) {
        self.entries.insert(raw.into(), canonical.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

/// Anchor indexes of every book in a library, keyed by short abbreviation.
#[derive(Debug, Clone, Default)]
pub struct AnchorMap {
    books: BTreeMap<String, AnchorIndex>,
}

impl AnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, abbr: impl Into<String>, index: AnchorIndex) {
        self.books.insert(abbr.into(), index);
    }

    pub fn get(&self, abbr: &str) -> Option<&AnchorIndex> {
        self.books.get(abbr)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnchorIndex)> {
        self.books.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, AnchorIndex)> for AnchorMap {
    fn from_iter<I: IntoIterator<Item = (String, AnchorIndex)>>(iter: I) -> Self {
        Self {
            books: iter.into_iter().collect(),
        }
    }
}

/// Normalize an HTML anchor name to its id: `n1_1P2` → `1-1`.
pub fn normalize_anchor_name(name: &str) -> String {
    let name = name.strip_prefix('n').unwrap_or(name);
    let mut id = name.replace('_', "-");

    // Strip a trailing P<digits> paragraph marker
    let digits = id.bytes().rev().take_while(u8::is_ascii_digit).count();
    if digits > 0 && id[..id.len() - digits].ends_with('P') {
        id.truncate(id.len() - digits - 1);
    }
    id
}

/// Normalized names of the `<a name>` run directly in front of `p`, in document order.
///
/// Whitespace-only text between the anchors is skipped; anything else ends the run.
fn anchor_run(dom: &ArenaDom, p: NodeId) -> Vec<String> {
    let mut run = Vec::new();
    for prev in dom.preceding_siblings(p) {
        if dom.is_blank_text(prev) {
            continue;
        }
        match dom.get_attr(prev, "name") {
            Some(name) if dom.is_tag(prev, "a") => run.push(normalize_anchor_name(name)),
            _ => break,
        }
    }
    run.reverse();
    run
}
