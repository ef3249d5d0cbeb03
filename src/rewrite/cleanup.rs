//! Pass 1: line structure and link cleanup.

use std::sync::LazyLock;

use regex_lite::{Captures, NoExpand, Regex};
use tracing::warn;

use super::PassContext;

static BOOK_LEAD_IN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Book of [^\[]+\[\[").unwrap());

static LEADING_OUTLINE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\[([^#]*)#\^o").unwrap());

static BOOK_MARKER_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^\]]+\]\]Book").unwrap());

static CHAPTER_LIST_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\*\*ch\..*\*\*.*$").unwrap());

static TITLE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^.*\|Title\]\]\*\*.*$").unwrap());

static HOME_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[Bible\|Home\]\]").unwrap());

static INTRODUCTION_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\[\[[^#]*#([^\]|]+)\|Introduction to [^\]]+:\]\]\n?").unwrap()
});

static SECTION_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^#]*#([^\]|]+)\|([^\]]+)\]\]").unwrap());

static STAR_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[\[([^\]\|]+)\|\*\]\]([“”'"\*_]?)([A-Za-zäöüÄÖÜß]+)([“”'"\*_]?)"#).unwrap()
});

pub(super) fn cleanup_markdown(text: &str, ctx: &mut PassContext<'_>) -> String {
    let text = text
        .replace("]])**", "]])\n**")
        .replace("\n**", "\n\n**")
        .replace("]][[Bible", "]]\n\n[[Bible")
        .replace("]]**[[Bible", "]]\n\n**[[Bible")
        .replace("]][[", "]]\n[[")
        .replace("\n\n\n", "\n\n");

    let text = BOOK_LEAD_IN_RE.replace(&text, "\n[[");
    let text = LEADING_OUTLINE_LINK_RE.replace(&text, "\n[[${1}#^o");
    let text = BOOK_MARKER_LINK_RE.replace_all(&text, "Book");
    let text = CHAPTER_LIST_LINE_RE.replace_all(&text, "${0}\n");
    let text = TITLE_LINE_RE.replace_all(&text, "\n${0}");
    let text = HOME_LINK_RE.replace_all(&text, NoExpand("\n[[Bible|Home]] ^b\n"));
    let text = INTRODUCTION_LINK_RE.replace_all(&text, "");

    let text = SECTION_LINK_RE.replace_all(&text, |caps: &Captures| {
        if is_self_reference(&caps[1], &caps[2]) {
            "\n---".to_string()
        } else {
            caps[0].to_string()
        }
    });

    let text = STAR_LINK_RE.replace_all(&text, "${2}[[${1}|${3}]]${4}");
    let text = text.replace("_ _", " ");

    for line in text.lines().filter(|line| line.contains("|*]]")) {
        warn!(book = ctx.book.abbr, line, "placeholder link left in text");
    }
    text
}

/// A link whose target and display end in the same word (`[[1 John#1 John|First John]]`)
/// points at the book itself and marks a section break.
///
/// Links to the book's subject are kept.
fn is_self_reference(target: &str, display: &str) -> bool {
    if display.contains("Subject") {
        return false;
    }
    match (
        target.split_whitespace().last(),
        display.split_whitespace().last(),
    ) {
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookContext;
    use crate::books::BookTable;
    use crate::config::ConvertConfig;
    use crate::render::Properties;

    fn cleanup(text: &str) -> String {
        let config = ConvertConfig::default();
        let mut ctx = PassContext {
            book: BookContext::new("SoS", &BookTable, &config),
            properties: Properties::new(),
        };
        cleanup_markdown(text, &mut ctx)
    }

    #[test]
    fn test_adjacent_links_are_split() {
        assert_eq!(cleanup("[[A#^1|1]][[B#^2|2]]"), "[[A#^1|1]]\n[[B#^2|2]]");
        assert_eq!(cleanup("x]][[Bible|Gen]]"), "x]]\n\n[[Bible|Gen]]");
    }

    #[test]
    fn test_self_reference_becomes_section_break() {
        assert_eq!(cleanup("a [[1Jo#1 John|First John]] b"), "a \n--- b");
        assert_eq!(
            cleanup("[[SoS#Song of Songs|Subject of Song of Songs]]"),
            "[[SoS#Song of Songs|Subject of Song of Songs]]"
        );
        assert!(is_self_reference("Song of Songs", "SONGS"));
        assert!(!is_self_reference("^1-1", "1"));
    }

    #[test]
    fn test_star_placeholder_moves_onto_word() {
        assert_eq!(cleanup("the [[SoSN#^1-2x1|*]]“Kiss” me"), "the “[[SoSN#^1-2x1|Kiss]]” me");
        assert_eq!(cleanup("[[SoSN#^1-2x1|*]]_love_"), "_[[SoSN#^1-2x1|love]]_");
    }

    #[test]
    fn test_star_placeholder_without_word_is_kept() {
        assert_eq!(cleanup("[[SoS#Song of Solomon|*]] 1"), "[[SoS#Song of Solomon|*]] 1");
    }

    #[test]
    fn test_home_link_and_lead_in() {
        assert_eq!(
            cleanup("Book of Songs [[Bible|Home]] next"),
            "\n\n[[Bible|Home]] ^b\n next"
        );
    }

    #[test]
    fn test_introduction_link_is_dropped() {
        assert_eq!(
            cleanup("x\n[[SoS#^intro|Introduction to Song of Songs:]]\nText"),
            "x\nText"
        );
    }

    #[test]
    fn test_chapter_list_gets_trailing_break() {
        assert_eq!(cleanup("**ch.** [[SoS#^1|1]] **x**\nnext"), "**ch.** [[SoS#^1|1]] **x**\n\nnext");
    }
}
