//! Verse header passes: header normalization (4), header separation (5),
//! split-verse recombination (7) and verse anchors (8).

use std::sync::LazyLock;

use regex_lite::{Captures, NoExpand, Regex};

use crate::util::split_lines;
use super::{PassContext, is_blank};

static BIBLE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\*\*\[\[Bible\|([^\]]+)\]\] \[\[([^\]]+)\|(\d+)\]\]:\[\[[^\]]+\|(\d+)\]\]\*\*",
    )
    .unwrap()
});

static SPLIT_VERSE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\*\*\[\[Bible\|([^\]]+)\]\] \[\[([^\]]+)\|((\d+)\]\]:\[\[([^\]]+)\|(\d+)([a])\]\]|(\d+)([a])\]\])\*\*) (\[\[[^\]]+\|-\]\]) (.*)",
    )
    .unwrap()
});

static VERSE_PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[\[[^\]|]+\|)(\d+)[ab](\]\])").unwrap());

static OUTLINE_ANCHOR_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^o\w+\s*$").unwrap());

static CONTINUATION_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\*\*\[\[Bible\|[^\]]+\]\] \[\[[^\]]+\|[^\]]+\]\](?::\[\[[^\]]+\|[^\]]+\]\])?\*\*\s*)?(?:\[\[[^\]]+#\^o[^\|]+\|-\]\]\s*)",
    )
    .unwrap()
});

static CHAPTER_VERSE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\*\*\[\[Bible\|[^\]]+\]\]\s+\[\[[^\]]+\|(\d+)\]\]:(?:\[\[[^\]]+\|([^\]]+)\]\])?\*\*",
    )
    .unwrap()
});

static VERSE_ONLY_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*\[\[Bible\|[^\]]+\]\]\s+\[\[[^\]]+\|([^\]]+)\]\]\*\*").unwrap()
});

/// `**[[Bible|Mat]] [[Matt#Matthew|1]]:[[MatN#x|2]]**` becomes
/// `**[[Bible|Matt]] [[Matt#Matthew|1]]:[[Matt#^1|2]]**`.
pub(super) fn normalize_bible_links(text: &str, ctx: &mut PassContext<'_>) -> String {
    let book = ctx.book;
    BIBLE_HEADER_RE
        .replace_all(text, |caps: &Captures| {
            let key = &caps[1];
            let mapped = book.lookup.abbreviation_of_source(key).unwrap_or(key);
            format!(
                "**[[Bible|{mapped}]] [[{}|{chapter}]]:[[{}#^{chapter}|{}]]**",
                &caps[2],
                book.abbr,
                &caps[4],
                chapter = &caps[3],
            )
        })
        .into_owned()
}

/// Drop `Verses` stub lines and start every embedded verse header on its own paragraph.
pub(super) fn separate_verse_headers(text: &str, ctx: &mut PassContext<'_>) -> String {
    let stub = format!("[[{}#^b|Verses]]", ctx.book.abbr);
    text.lines()
        .filter(|line| {
            let line = line.trim_start();
            !(line.starts_with("[[#^b|Verses]]") || line.starts_with(&stub))
        })
        .map(|line| {
            if line.contains("**[[Bible|") && !line.starts_with("**[[Bible|") {
                line.replace("**[[Bible|", "\n\n**[[Bible|")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rejoin a verse split by outline points.
///
/// The `a` half (`**…|16a]]** [[…|-]] text`) loses its letter, the outline
/// lines between the halves move after the verse, and the `b` half is
/// appended with its header removed and a `[b]` marker.
pub(super) fn combine_split_verses(text: &str, _ctx: &mut PassContext<'_>) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let n = lines.len();
    let mut out: Vec<String> = Vec::with_capacity(n);

    let mut i = 0;
    while i < n {
        if !SPLIT_VERSE_HEADER_RE.is_match(lines[i]) {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        }

        out.push(VERSE_PART_RE.replace_all(lines[i], "${1}${2}${3}").into_owned());
        let mut j = i + 1;
        while j < n && !lines[j].is_empty() {
            out.push(lines[j].to_string());
            j += 1;
        }

        let mut outline = Vec::new();
        let mut k = j + 1;
        while k < n {
            if is_blank(lines[k]) {
                k += 1;
            } else if OUTLINE_ANCHOR_END_RE.is_match(lines[k]) {
                outline.push(lines[k].trim());
                k += 1;
            } else {
                break;
            }
        }

        j = k;
        while j < n && !lines[j].is_empty() {
            let marker = if j == k { "[b] " } else { "" };
            out.push(
                CONTINUATION_PREFIX_RE
                    .replacen(lines[j], 1, NoExpand(marker))
                    .into_owned(),
            );
            j += 1;
        }

        out.push(String::new());
        for line in outline {
            out.push(line.to_string());
            out.push(String::new());
        }
        i = j + 1;
    }
    out.join("\n")
}

/// Append `^<ch>-<v>` (or `^<v>` in one-chapter books) to the last line of
/// each verse, i.e. the last line before the next blank line.
pub(super) fn add_verse_anchors(text: &str, _ctx: &mut PassContext<'_>) -> String {
    let mut lines = split_lines(text);

    for i in 0..lines.len() {
        let anchor = if let Some(caps) = CHAPTER_VERSE_HEADER_RE.captures(&lines[i]) {
            match caps.get(2) {
                Some(verse) => format!("{}-{}", &caps[1], verse.as_str()),
                None => caps[1].to_string(),
            }
        } else if let Some(caps) = VERSE_ONLY_HEADER_RE.captures(&lines[i]) {
            caps[1].to_string()
        } else {
            continue;
        };

        let end = (i + 1..lines.len())
            .find(|&j| is_blank(&lines[j]))
            .unwrap_or(lines.len());
        let last = &mut lines[end - 1];
        let trimmed_len = last.trim_end().len();
        last.truncate(trimmed_len);
        last.push_str(" ^");
        last.push_str(&anchor);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookContext;
    use crate::books::BookTable;
    use crate::config::ConvertConfig;
    use crate::render::Properties;

    fn apply(pass: crate::rewrite::Pass, text: &str) -> String {
        let config = ConvertConfig::default();
        let mut ctx = PassContext {
            book: BookContext::new("Gen", &BookTable, &config),
            properties: Properties::new(),
        };
        pass(text, &mut ctx)
    }

    #[test]
    fn test_bible_header_is_normalized() {
        assert_eq!(
            apply(normalize_bible_links, "**[[Bible|Gen]] [[Gen#Genesis|1]]:[[X#Y|1]]** text"),
            "**[[Bible|Gen]] [[Gen#Genesis|1]]:[[Gen#^1|1]]** text"
        );
    }

    #[test]
    fn test_unknown_source_key_is_kept() {
        assert_eq!(
            apply(normalize_bible_links, "**[[Bible|Xyz]] [[Gen#Genesis|2]]:[[X#Y|3]]**"),
            "**[[Bible|Xyz]] [[Gen#Genesis|2]]:[[Gen#^2|3]]**"
        );
    }

    #[test]
    fn test_verse_stubs_are_dropped_and_headers_separated() {
        let text = "[[Gen#^b|Verses]] 1 2 3\n  [[#^b|Verses]]\nend of 1 **[[Bible|Gen]] x";
        assert_eq!(
            apply(separate_verse_headers, text),
            "end of 1 \n\n**[[Bible|Gen]] x"
        );
    }

    #[test]
    fn test_anchor_goes_on_last_line_of_verse() {
        let text = "**[[Bible|Gen]] [[Gen#Genesis|1]]:[[Gen#^1|2]]** And the earth\nwas waste  \n\nNext";
        assert_eq!(
            apply(add_verse_anchors, text),
            "**[[Bible|Gen]] [[Gen#Genesis|1]]:[[Gen#^1|2]]** And the earth\nwas waste ^1-2\n\nNext"
        );
    }

    #[test]
    fn test_one_chapter_book_anchor() {
        let text = "**[[Bible|Jude]] [[Jude#Jude|3]]** Beloved";
        assert_eq!(apply(add_verse_anchors, text), "**[[Bible|Jude]] [[Jude#Jude|3]]** Beloved ^3");
    }

    #[test]
    fn test_split_verse_is_recombined() {
        let text = "**[[Bible|Gen]] [[Gen#Genesis|1]]:[[Gen#^1|2a]]** [[Gen#^o2|-]] And the earth\n\
                    \n\
                    ### [[Genesis (Book)#^o3|A.]] The heavens ^o3\n\
                    \n\
                    **[[Bible|Gen]] [[Gen#Genesis|1]]:[[Gen#^1|2b]]** [[Gen#^o3|-]] was waste\n\
                    \n\
                    **[[Bible|Gen]] [[Gen#Genesis|1]]:[[Gen#^1|3]]** And God said";

        assert_eq!(
            apply(combine_split_verses, text),
            "**[[Bible|Gen]] [[Gen#Genesis|1]]:[[Gen#^1|2]]** [[Gen#^o2|-]] And the earth\n\
             [b] was waste\n\
             \n\
             ### [[Genesis (Book)#^o3|A.]] The heavens ^o3\n\
             \n\
             **[[Bible|Gen]] [[Gen#Genesis|1]]:[[Gen#^1|3]]** And God said"
        );
    }

    #[test]
    fn test_split_verse_in_one_chapter_book() {
        let text = "**[[Bible|Jude]] [[Jude#Jude|16a]]** [[Jude#^o5|-]] These are murmurers\n\
                    \n\
                    ### [[Jude (Book)#^o6|B.]] The ungodly ^o6\n\
                    \n\
                    **[[Bible|Jude]] [[Jude#Jude|16b]]** [[Jude#^o6|-]] walking after their lusts\n\
                    \n\
                    **[[Bible|Jude]] [[Jude#Jude|17]]** But you, beloved";

        assert_eq!(
            apply(combine_split_verses, text),
            "**[[Bible|Jude]] [[Jude#Jude|16]]** [[Jude#^o5|-]] These are murmurers\n\
             [b] walking after their lusts\n\
             \n\
             ### [[Jude (Book)#^o6|B.]] The ungodly ^o6\n\
             \n\
             **[[Bible|Jude]] [[Jude#Jude|17]]** But you, beloved"
        );
    }
}
