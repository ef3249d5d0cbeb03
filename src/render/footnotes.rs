//! Footnote page renderer.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::dom::{ArenaDom, NodeId, parse_html};
use crate::error::Result;
use crate::refs::{LinkResolver, normalize_anchor_name};
use crate::util::replace_nbsp;

use super::{Flattener, Profile, Rule, Selector, in_skipped_section};

static FOOTNOTE_PROFILE: Profile = Profile::new(&[
    (Selector::tag("head"), Rule::Drop),
    (Selector::tag("h3"), Rule::Drop),
    (Selector::tag("pre"), Rule::Drop),
    (Selector::tag("br"), Rule::LineBreak),
    (Selector::with_attr("a", "href"), Rule::Link),
    (Selector::tag("b"), Rule::Bold),
]);

const SKIPPED: &[&str] = &["head", "h3", "pre"];

static INDENTED_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s+").unwrap());

/// Render a footnote page: one paragraph per footnote, each ending in its block anchor.
///
/// A paragraph belongs to the nearest `<a name>` before it among its
/// siblings. Paragraphs without an anchor of their own continue the previous
/// footnote.
pub fn render_footnotes(html: &str, resolver: LinkResolver<'_>) -> Result<String> {
    let dom = parse_html(html);
    let flattener = Flattener::new(&dom, &FOOTNOTE_PROFILE, resolver);

    let mut notes: Vec<(String, Vec<String>)> = Vec::new();
    let paragraphs: Vec<_> = dom
        .elements_by_tag(&["p"])
        .filter(|&p| !in_skipped_section(&dom, p, SKIPPED))
        .collect();

    for p in paragraphs {
        let Some(anchor) = nearest_anchor(&dom, p) else {
            continue;
        };
        let text = flattener.text(p)?;
        let text = replace_nbsp(&text).trim().to_string();

        match notes.iter_mut().find(|(a, _)| *a == anchor) {
            Some((_, parts)) => parts.push(text),
            None => notes.push((anchor, vec![text])),
        }
    }

    let rendered: Vec<String> = notes
        .into_iter()
        .map(|(anchor, parts)| {
            let text = format!("{} ^{anchor}", parts.join("\n").trim_end());
            INDENTED_LINE_RE
                .replace_all(&text, "\n")
                .lines()
                .map(escape_paragraph_marker)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();

    Ok(rendered.join("\n\n"))
}

/// Normalized name of the closest preceding `<a name>` sibling.
fn nearest_anchor(dom: &ArenaDom, p: NodeId) -> Option<String> {
    dom.preceding_siblings(p)
        .find(|&prev| dom.is_tag(prev, "a") && dom.has_attr(prev, "name"))
        .and_then(|a| dom.get_attr(a, "name"))
        .map(normalize_anchor_name)
}

/// `[ **par.** … ]` lines would read as a link; escape their outer brackets.
fn escape_paragraph_marker(line: &str) -> String {
    match line
        .strip_prefix("[ **par.**")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => format!(r"\[ **par.**{inner}\]"),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookContext;
    use crate::books::BookTable;
    use crate::config::ConvertConfig;
    use crate::refs::{AnchorIndex, AnchorMap, BracketEscape};

    fn render(html: &str) -> String {
        let config = ConvertConfig::default();
        let index = AnchorIndex::from_html(html);
        let anchors: AnchorMap = [("Gen".to_string(), index)].into_iter().collect();
        let ctx = BookContext::new("Gen", &BookTable, &config);
        render_footnotes(html, LinkResolver::new(ctx, &anchors, BracketEscape::Parens)).unwrap()
    }

    #[test]
    fn test_notes_end_with_canonical_anchor() {
        let html = r##"<html><head><title>Genesis Notes</title></head><body>
            <h3>Genesis</h3>
            <a name="n1_1x1"></a><a name="n1_1x1P2"></a>
            <p><b>1<sup>1</sup></b> beginning<br>
               See note <a href="#n1_1x1">1</a> and <a href="Mat.htm#v1_1">Mat 1:1</a>.</p>
            <a name="n1_2x1"></a>
            <p>Second&nbsp;note</p>
        </body></html>"##;
        assert_eq!(
            render(html),
            "**11** beginning\nSee note [[GenN#^1-1x1|1]] and [[Matt#^1-1|Matt 1:1]]. ^1-1x1\n\nSecond note ^1-2x1"
        );
    }

    #[test]
    fn test_paragraph_marker_is_escaped() {
        assert_eq!(
            escape_paragraph_marker("[ **par.** [[GenN#^1-1x1|1]] ]"),
            r"\[ **par.** [[GenN#^1-1x1|1]] \]"
        );
        assert_eq!(escape_paragraph_marker("[other]"), "[other]");
    }

    #[test]
    fn test_continuation_paragraph_joins_previous_note() {
        let html = r#"<body><a name="n3_1x1"></a><p>First part</p><p>Second part</p></body>"#;
        assert_eq!(render(html), "First part\nSecond part ^3-1x1");
    }

    #[test]
    fn test_struck_reference_in_link() {
        let html = r#"<body><a name="n2_7x1"></a><p><a href="Gen.htm#v2_7">v. 7<s>b</s></a></p></body>"#;
        assert_eq!(render(html), "[[Gen#^2-7|v. 7^b]] ^2-7x1");
    }
}
