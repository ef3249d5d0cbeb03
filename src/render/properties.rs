//! Book metadata from the centered properties table.
//!
//! The text page of every book starts with a table of `<ins>Key: value</ins>`
//! cells (author, time and place of writing, ...). These become the YAML
//! front matter of the text note and a bold summary block under the chapter
//! list.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::book::BookContext;
use crate::error::Result;

use super::Flattener;

static LINK_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[.*?\]\]").unwrap());

/// Keys that lead the front matter, in this order.
const KEY_ORDER: &[&str] = &[
    "Author(s)",
    "Time of Writing/Ministry",
    "Place of Writing",
    "Recipients",
    "Subject",
    "Book",
    "Version",
    "Index",
];

/// A property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    /// Value that mixes link tokens with text, split into its parts.
    List(Vec<String>),
    Integer(usize),
}

impl PropertyValue {
    /// Parse an extracted value, splitting around link tokens.
    fn parse(value: &str) -> Self {
        if !LINK_TOKEN_RE.is_match(value) {
            return PropertyValue::Text(value.to_string());
        }

        let mut parts = Vec::new();
        let mut last = 0;
        for m in LINK_TOKEN_RE.find_iter(value) {
            parts.push(&value[last..m.start()]);
            parts.push(m.as_str());
            last = m.end();
        }
        parts.push(&value[last..]);

        PropertyValue::List(
            parts
                .into_iter()
                .map(|p| p.trim_matches(|c: char| c.is_whitespace() || c == ',' || c == ';'))
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    fn items(self) -> Vec<String> {
        match self {
            PropertyValue::Text(text) => vec![text],
            PropertyValue::List(items) => items,
            PropertyValue::Integer(n) => vec![n.to_string()],
        }
    }

    /// Combine two values of merged keys, `; `-separated when both are text.
    fn join(self, other: PropertyValue) -> PropertyValue {
        match (self, other) {
            (PropertyValue::Text(a), PropertyValue::Text(b)) => PropertyValue::Text(format!("{a}; {b}")),
            (a, b) => {
                let mut items = a.items();
                items.extend(b.items());
                PropertyValue::List(items)
            }
        }
    }

    fn write_yaml(&self, key: &str, out: &mut String) {
        match self {
            PropertyValue::Text(text) => {
                out.push_str(&format!("{key}: {}\n", text.replace(": ", " — ")));
            }
            PropertyValue::Integer(n) => out.push_str(&format!("{key}: {n}\n")),
            PropertyValue::List(items) => {
                out.push_str(&format!("{key}:\n"));
                for item in items {
                    out.push_str(&format!("  - \"{}\"\n", item.replace('"', "\\\"")));
                }
            }
        }
    }
}

/// Insertion-ordered book properties plus their bold summary block.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
    summary: String,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the `<ins>` cells of the first centered table.
    ///
    /// Cell contents are rendered with the rules ranked below `limit`, so
    /// links and emphasis become tokens but no line breaks are introduced.
    pub(crate) fn extract(flattener: &Flattener<'_>, limit: usize) -> Result<Self> {
        let dom = flattener.dom();
        let mut properties = Self::new();

        let Some(table) = dom
            .elements_by_tag(&["table"])
            .find(|&t| dom.get_attr(t, "align") == Some("center"))
        else {
            return Ok(properties);
        };

        let cells: Vec<_> = dom
            .descendants(table)
            .filter(|&id| dom.is_tag(id, "ins"))
            .collect();
        for ins in cells {
            let text = flattener.children_text(ins, limit)?;
            if let Some((key, value)) = text.trim().split_once(':') {
                properties.push_extracted(key.trim(), value.trim());
            }
        }
        Ok(properties)
    }

    fn push_extracted(&mut self, key: &str, value: &str) {
        self.summary.push_str(&format!("**{key}**: {value}\n\n"));
        self.set(key, PropertyValue::parse(value));
    }

    /// Set a key, keeping its position if already present.
    pub fn set(&mut self, key: &str, value: PropertyValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Record the book's subject line.
    pub fn set_subject(&mut self, subject: &str) {
        self.summary.push_str(&format!("**Subject:** {subject}\n"));
        self.set("Subject", PropertyValue::Text(subject.to_string()));
    }

    /// Bold `**Key**: value` summary of the extracted properties.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Render the YAML front matter, adding the derived keys.
    pub fn front_matter(&self, ctx: &BookContext<'_>) -> String {
        let mut props = self.clone();

        for key in ["Author", "Authors", "author"] {
            if let Some(value) = props.remove(key) {
                props.set("Author(s)", value);
            }
        }
        props.merge_keys("Time of Writing", "Time of His Ministry", "Time of Writing/Ministry");
        props.set("Version", PropertyValue::Text(ctx.config.version_link.clone()));
        if let Some(index) = ctx.lookup.index_of(ctx.abbr) {
            props.set("Index", PropertyValue::Integer(index));
        }
        props.set("Book", PropertyValue::Text(ctx.title().to_string()));
        props.merge_keys("Recipient", "Recipients", "Recipient(s)");

        let mut ordered: Vec<&(String, PropertyValue)> = KEY_ORDER
            .iter()
            .filter_map(|key| props.entries.iter().find(|(k, _)| k == key))
            .collect();
        ordered.extend(
            props
                .entries
                .iter()
                .filter(|(k, _)| !KEY_ORDER.contains(&k.as_str())),
        );

        let mut out = String::from("---\n");
        for (key, value) in ordered {
            value.write_yaml(key, &mut out);
        }
        out.push_str("---\n");
        out
    }

    fn merge_keys(&mut self, first: &str, second: &str, merged: &str) {
        let a = self.remove(first);
        let b = self.remove(second);
        let value = match (a, b) {
            (Some(a), Some(b)) => a.join(b),
            (Some(v), None) | (None, Some(v)) => v,
            (None, None) => return,
        };
        self.set(merged, value);
    }
}
