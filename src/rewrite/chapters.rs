//! Passes 2 and 3: chapter lists and chapter navigation.

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

use super::{PassContext, is_blank};

static CHAPTER_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n?\[\[[^#]*#\^([^\]|]+)\|Chapter (\d+) of ([^\]]+)\]\]").unwrap()
});

static PSALM_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\[\[[^\]]+#Psalms\|Psalm\]\])\s*\[\[[^\]]+#\^(\d+|b)\|(\d+)\]\]").unwrap()
});

/// `**ch.**` and `**vv.**` lists wrap over several lines of `|•]]` links;
/// join each list onto one line.
pub(super) fn merge_multiline_lists(text: &str, _ctx: &mut PassContext<'_>) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let is_verses = line.starts_with("**vv.**");
        if !(line.starts_with("**ch.**") || is_verses) {
            out.push(line.to_string());
            i += 1;
            continue;
        }

        let mut merged = line.trim().to_string();
        let mut absorbed = false;
        let mut j = i + 1;
        while j < lines.len() && (is_blank(lines[j]) || lines[j].contains("|•]]")) {
            let next = lines[j].trim();
            if !next.is_empty() {
                merged.push(' ');
                merged.push_str(next);
                absorbed = true;
            }
            j += 1;
        }

        out.push(merged);
        if absorbed {
            out.push(String::new());
        }
        if is_verses {
            out.extend(["", "---", ""].map(String::from));
        }
        i = j;
    }
    out.join("\n")
}

/// Replace `Chapter N of ...` and `Psalm` links with previous/next navigation lines.
pub(super) fn add_chapter_navigation(text: &str, ctx: &mut PassContext<'_>) -> String {
    let abbr = ctx.book.abbr;
    let title = ctx.book.title();

    let text = CHAPTER_LINK_RE.replace_all(text, |caps: &Captures| {
        let Ok(chapter) = caps[2].parse::<u32>() else {
            return caps[0].to_string();
        };
        let prefix = previous_link(abbr, chapter);
        if caps[0].contains(&format!("^{chapter}")) {
            return format!("{prefix}{}", &caps[0]);
        }
        format!(
            "\n{prefix}[[{abbr}#{title}|{title} {chapter} of {rest}]] | [[{abbr}#^{next}|Next ->]] ^{chapter}\n\n---",
            rest = &caps[3],
            next = &caps[1],
        )
    });

    PSALM_LINK_RE
        .replace_all(&text, |caps: &Captures| {
            let Ok(chapter) = caps[3].parse::<u32>() else {
                return caps[0].to_string();
            };
            let next = match (&caps[2], chapter.checked_add(1)) {
                ("b", _) => "b".to_string(),
                (_, Some(next)) => next.to_string(),
                (_, None) => return caps[0].to_string(),
            };
            format!(
                "\n---\n{}[[{abbr}#{title}|{title} {chapter}]] | [[{abbr}#^{next}|Next ->]] ^{chapter}\n\n---",
                previous_link(abbr, chapter),
            )
        })
        .into_owned()
}

fn previous_link(abbr: &str, chapter: u32) -> String {
    if chapter > 1 {
        format!("[[{abbr}#^{}|<- Previous]] | ", chapter - 1)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookContext;
    use crate::books::BookTable;
    use crate::config::ConvertConfig;
    use crate::render::Properties;

    fn with_ctx<F: FnOnce(&mut PassContext<'_>) -> String>(abbr: &str, f: F) -> String {
        let config = ConvertConfig::default();
        let mut ctx = PassContext {
            book: BookContext::new(abbr, &BookTable, &config),
            properties: Properties::new(),
        };
        f(&mut ctx)
    }

    #[test]
    fn test_chapter_list_is_joined() {
        let text = "**ch.** [[Gen#^1|•]] [[Gen#^2|•]]\n\n[[Gen#^3|•]]\nText";
        assert_eq!(
            with_ctx("Gen", |ctx| merge_multiline_lists(text, ctx)),
            "**ch.** [[Gen#^1|•]] [[Gen#^2|•]] [[Gen#^3|•]]\n\nText"
        );
    }

    #[test]
    fn test_verse_list_adds_section_break() {
        assert_eq!(
            with_ctx("Gen", |ctx| merge_multiline_lists("**vv.** [[Gen#^1-1|1]]\nText", ctx)),
            "**vv.** [[Gen#^1-1|1]]\n\n---\n\nText"
        );
    }

    #[test]
    fn test_chapter_navigation() {
        let out = with_ctx("Gen", |ctx| {
            add_chapter_navigation("[[Gen#^3|Chapter 2 of Genesis]]", ctx)
        });
        assert_eq!(
            out,
            "\n[[Gen#^1|<- Previous]] | [[Gen#Genesis|Genesis 2 of Genesis]] | [[Gen#^3|Next ->]] ^2\n\n---"
        );
    }

    #[test]
    fn test_first_chapter_has_no_previous_link() {
        let out = with_ctx("Gen", |ctx| {
            add_chapter_navigation("x\n[[Gen#^2|Chapter 1 of Genesis]]", ctx)
        });
        assert_eq!(
            out,
            "x\n[[Gen#Genesis|Genesis 1 of Genesis]] | [[Gen#^2|Next ->]] ^1\n\n---"
        );
    }

    #[test]
    fn test_psalm_navigation() {
        let out = with_ctx("Psa", |ctx| {
            add_chapter_navigation("[[Psa#Psalms|Psalm]] [[Psa#^3|2]]", ctx)
        });
        assert_eq!(
            out,
            "\n---\n[[Psa#^1|<- Previous]] | [[Psa#Psalms|Psalms 2]] | [[Psa#^3|Next ->]] ^2\n\n---"
        );

        let last = with_ctx("Psa", |ctx| {
            add_chapter_navigation("[[Psa#Psalms|Psalm]] [[Psa#^b|150]]", ctx)
        });
        assert!(last.contains("[[Psa#^b|Next ->]] ^150"));
    }

    #[test]
    fn test_psalm_number_without_successor_is_left_alone() {
        let text = "x\n[[Psa#Psalms|Psalm]] [[Psa#^5|4294967295]]\ny";
        assert_eq!(with_ctx("Psa", |ctx| add_chapter_navigation(text, ctx)), text);
    }
}
