//! Outline page renderer.
//!
//! Each outline point is one of `kbd`, `em`, `h6`, `dfn`, `big` or `samp`
//! (the tag encodes the depth in the edition's own stylesheet, which is not
//! trusted here). A point holds a label link, an `<a name>` anchor, the point's
//! text, and a trailing list of verse links.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::book::BookContext;
use crate::dom::{ArenaDom, NodeId, parse_html};
use crate::error::Result;
use crate::outline::classify_lines;
use crate::refs::LinkResolver;

use super::{Flattener, Profile, Rule, Selector, in_skipped_section};

static OUTLINE_PROFILE: Profile =
    Profile::new(&[(Selector::with_attr("a", "href"), Rule::Link)]);

const POINT_TAGS: &[&str] = &["kbd", "em", "h6", "dfn", "big", "samp"];
const SKIPPED: &[&str] = &["head", "h3", "pre"];

static VERSE_HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#v\d+_").unwrap());

static SINGLE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[\[[^\]|]+\|\d+\]\]\s*-\s*\[\[[^\]|]+\|\d+\]\]\s*$").unwrap()
});

/// Render a book's outline page.
pub fn render_outline(html: &str, ctx: &BookContext<'_>, resolver: LinkResolver<'_>) -> Result<String> {
    let dom = parse_html(html);
    let flattener = Flattener::new(&dom, &OUTLINE_PROFILE, resolver);

    let points: Vec<_> = dom
        .elements_by_tag(POINT_TAGS)
        .filter(|&id| !in_skipped_section(&dom, id, SKIPPED))
        .collect();

    let mut lines = Vec::with_capacity(points.len());
    for point in points {
        lines.push(point_line(&flattener, point, ctx.abbr)?);
    }

    let classified = classify_lines(&lines, ctx.title());
    Ok(format!(
        "# {} Outline\n\n{}\n",
        ctx.title(),
        classified.join("\n\n")
    ))
}

fn point_line(flattener: &Flattener<'_>, point: NodeId, abbr: &str) -> Result<String> {
    let dom = flattener.dom();
    let is_href_link = |_: &ArenaDom, id: NodeId| dom.is_tag(id, "a") && dom.has_attr(id, "href");

    let label = dom
        .find_descendant(point, is_href_link)
        .or_else(|| dom.find_descendant(point, |d, id| d.is_tag(id, "b")))
        .map(|id| dom.text(id).trim().to_string())
        .unwrap_or_default();

    let anchor = dom
        .find_descendant(point, |d, id| d.is_tag(id, "a") && d.has_attr(id, "name"))
        .and_then(|id| dom.get_attr(id, "name"))
        .unwrap_or("");

    let main_link = dom
        .descendants(point)
        .find(|&id| is_href_link(dom, id) && dom.text(id).trim() != label);
    let mut main = match main_link {
        Some(link) => flattener.text(link)?,
        None => dom
            .find_descendant(point, |d, id| d.is_tag(id, "u") && d.has_class(id, "o"))
            .map(|u| dom.text(u).trim().to_string())
            .unwrap_or_default(),
    };
    main = main.trim().to_string();

    let verses = verse_spec(flattener, point)?;
    if !verses.is_empty() {
        main.push_str(&format!(" ({verses})"));
    }

    let outline_link = match anchor.get(1..) {
        Some(num) => format!("[[{abbr}#^o{num}|{label}]]"),
        _ => label,
    };
    Ok(format!("{outline_link} {main}"))
}

enum VerseToken {
    Link(String),
    Sep(char),
}

/// Verse references listed directly in the point, as `a-b; c` link text.
///
/// A lone range becomes `vv. a-b`.
fn verse_spec(flattener: &Flattener<'_>, point: NodeId) -> Result<String> {
    let dom = flattener.dom();
    let mut tokens = Vec::new();
    for child in dom.children(point) {
        if let Some(text) = dom.text_content(child) {
            tokens.extend(
                text.chars()
                    .filter(|c| matches!(c, '-' | ',' | ';'))
                    .map(VerseToken::Sep),
            );
        } else if let Some(href) = dom.get_attr(child, "href")
            && dom.is_tag(child, "a")
            && VERSE_HREF_RE.is_match(href)
        {
            tokens.push(VerseToken::Link(flattener.text(child)?));
        }
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            VerseToken::Link(first) => match (tokens.get(i + 1), tokens.get(i + 2)) {
                (Some(VerseToken::Sep('-')), Some(VerseToken::Link(last))) => {
                    pieces.push(format!("{first}-{last}"));
                    i += 3;
                }
                _ => {
                    pieces.push(first.clone());
                    i += 1;
                }
            },
            VerseToken::Sep(',' | ';') => {
                if pieces.last().is_some_and(|p| p != "; ") {
                    pieces.push("; ".to_string());
                }
                i += 1;
            }
            VerseToken::Sep(_) => i += 1,
        }
    }

    let out = pieces.concat();
    let out = out.trim().trim_end_matches([';', ' ', ',']);
    if out.is_empty() {
        return Ok(String::new());
    }
    Ok(if SINGLE_RANGE_RE.is_match(out) {
        format!("vv. {out}")
    } else {
        out.to_string()
    })
}
