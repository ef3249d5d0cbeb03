//! Pass 9: fold the `**vv.**` verse list into the chapter navigation line.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::PassContext;

static TRAILING_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\^\w+\s*$").unwrap());

/// Lines after a section break in which the navigation line may appear.
const NAV_WINDOW: usize = 2;
/// Lines after the navigation line in which the verse list may appear.
const VERSE_LIST_WINDOW: usize = 4;

pub(super) fn combine_nav_and_verse_lines(text: &str, _ctx: &mut PassContext<'_>) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let n = lines.len();
    let mut out: Vec<String> = Vec::with_capacity(n);

    let mut i = 0;
    while i < n {
        if let Some((nav, verses)) = find_nav_and_verses(&lines, i) {
            out.extend(["", "---"].map(String::from));
            out.push(merge_nav_line(lines[nav].trim(), lines[verses].trim()));
            out.extend(["", "---", ""].map(String::from));
            i = verses + 1;
            continue;
        }
        out.push(lines[i].to_string());
        i += 1;
    }
    out.join("\n")
}

/// For a `---` line at `i`, the indices of the navigation line and the verse list after it.
fn find_nav_and_verses(lines: &[&str], i: usize) -> Option<(usize, usize)> {
    if !lines[i].trim().starts_with("---") {
        return None;
    }
    let n = lines.len();
    let nav = (i + 1..n.min(i + 1 + NAV_WINDOW)).find(|&j| {
        let line = lines[j].trim();
        line.contains("<- Previous") || line.contains("Next ->")
    })?;
    let verses = (nav + 1..n.min(nav + 1 + VERSE_LIST_WINDOW))
        .find(|&k| lines[k].contains("**vv.**"))?;
    Some((nav, verses))
}

/// Insert ` | <verses>` before the navigation line's own anchor.
fn merge_nav_line(nav: &str, verses: &str) -> String {
    match TRAILING_ANCHOR_RE.find(nav) {
        Some(m) => format!("{} | {verses}{}", &nav[..m.start()], &nav[m.start()..]).replace("  ", " "),
        None => format!("{nav} | {verses}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookContext;
    use crate::books::BookTable;
    use crate::config::ConvertConfig;
    use crate::render::Properties;

    fn combine(text: &str) -> String {
        let config = ConvertConfig::default();
        let mut ctx = PassContext {
            book: BookContext::new("SoS", &BookTable, &config),
            properties: Properties::new(),
        };
        combine_nav_and_verse_lines(text, &mut ctx)
    }

    #[test]
    fn test_verse_list_joins_navigation() {
        let text = "Top\n---\n[[SoS#Song of Songs|Song of Songs 1 of 8]] | [[SoS#^2|Next ->]] ^1\n\n---\n**vv.** [[SoS#^1-1|1]] [[SoS#^1-2|2]]\nVerse";
        assert_eq!(
            combine(text),
            "Top\n\n---\n[[SoS#Song of Songs|Song of Songs 1 of 8]] | [[SoS#^2|Next ->]] | **vv.** [[SoS#^1-1|1]] [[SoS#^1-2|2]] ^1\n\n---\n\nVerse"
        );
    }

    #[test]
    fn test_without_verse_list_nothing_changes() {
        let text = "---\n[[SoS#^2|Next ->]] ^1\n\n---\nVerse";
        assert_eq!(combine(text), text);
    }

    #[test]
    fn test_merge_without_anchor() {
        assert_eq!(merge_nav_line("[[A|Next ->]]", "**vv.** x"), "[[A|Next ->]] | **vv.** x");
    }
}
