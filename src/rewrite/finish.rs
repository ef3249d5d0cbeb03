//! Pass 10: subject extraction, top-of-note lines, blank-line cleanup and
//! front matter.

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};
use tracing::warn;

use crate::book::BookContext;

use super::{PassContext, collapse_blank_lines, is_blank};

static SUBJECT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[[^\]\[#]*#([^\]|]+)\|Subject of ([^\]]+)\]\]:").unwrap()
});

static INTRO_SUBJECT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*\[\[.*#\^intro\|Introduction\]\] \| \[\[.*#\^subject\|Subject\]\]\s*\]")
        .unwrap()
});

static CHAPTERS_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\[.*#\^b\|Chapters\]\]$").unwrap());

static CHAPTER_MARK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*ch\.\*\*\s*").unwrap());

static VERSE_ANCHOR_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s\^(\d+)(-\d+)?)$").unwrap());

static BOOK_PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\[([A-Za-z0-9]+)#([^\]|]+)\|\*\]\](.*)").unwrap());

pub(super) fn finish(text: &str, ctx: &mut PassContext<'_>) -> String {
    let text = extract_subject(text, ctx);
    let text = merge_top_chapters_line(&text);
    let text = collapse_blank_lines(&text);
    let text = ensure_blank_before_breaks(&text);
    insert_front_matter(&text, ctx)
}

/// Move the `Subject of <Book>:` block into the properties.
///
/// The subject is the paragraph after the link; everything from the link up
/// to the next section break is removed from the text.
fn extract_subject(text: &str, ctx: &mut PassContext<'_>) -> String {
    let Some(m) = SUBJECT_LINK_RE.find(text) else {
        return text.to_string();
    };

    let rest = &text[m.end()..];
    let subject = rest
        .trim_start()
        .lines()
        .take_while(|line| !is_blank(line) && !line.starts_with("---"))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");
    if !subject.is_empty() {
        ctx.properties.set_subject(&subject);
    }

    let removed_until = match rest.find("\n---") {
        Some(pos) => m.end() + pos + 1,
        None => text.len(),
    };
    format!("{}{}", &text[..m.start()], &text[removed_until..])
}

/// Rework the lines at the top of the note.
///
/// The `[ Introduction | Subject ]` line is dropped, the `Chapters` link
/// absorbs the following `**ch.**` list, and the `Book |` navigation line
/// gets its link to the Bible index.
fn merge_top_chapters_line(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if INTRO_SUBJECT_LINE_RE.is_match(line) {
            i += 1;
            continue;
        }

        if CHAPTERS_LINE_RE.is_match(line)
            && let Some(next) = lines.get(i + 1)
            && next.trim().starts_with("**ch.**")
        {
            let chapters = CHAPTER_MARK_RE.replace_all(next, "");
            out.push("---".to_string());
            out.push(format!("{line} {}", chapters.trim()));
            i += 2;
            continue;
        }

        match line.split_once("Book |") {
            Some((before, after)) if !line.starts_with("Book |") => {
                let after = after.split("Book |").next().unwrap_or(after);
                out.push(before.trim().to_string());
                out.extend(["", "---", ""].map(String::from));
                out.push(format!("[[Bible|Book]] | {}", after.trim()));
            }
            Some(_) => {
                out.push("---".to_string());
                out.push(line.replace("Book |", "[[Bible|Book]] |"));
            }
            None => out.push(line.to_string()),
        }
        i += 1;
    }
    out.join("\n")
}

/// Every `---` line after the first few gets a blank line before it, and
/// back-to-back breaks collapse into one.
fn ensure_blank_before_breaks(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.trim() == "---" && i > 3 {
            if out.last().is_some_and(|last| !is_blank(last)) {
                out.push("");
            }
            if let Some(j) = (i + 1..lines.len()).find(|&j| !is_blank(lines[j]))
                && lines[j].trim() == "---"
            {
                i = j;
            }
        }
        out.push(line);
        i += 1;
    }
    out.join("\n")
}

/// Prepend the front matter and place the heading, summary and interlinear links.
fn insert_front_matter(text: &str, ctx: &mut PassContext<'_>) -> String {
    let book = ctx.book;
    let lines: Vec<&str> = text.trim().lines().collect();
    let summary = format!("\n---\n{}", ctx.properties.summary().trim_end());

    let mut out: Vec<String> = vec![ctx.properties.front_matter(&book)];

    let nav_line = lines.first().copied().unwrap_or_default();
    if !has_top_navigation(nav_line, book.source_code()) {
        warn!(book = book.abbr, "first line is not the top navigation line");
    }

    let mut inserted = false;
    for line in &lines {
        let line = add_interlinear_link(line.trim(), &book);

        if line.contains("[[Bible|Book]] | ") {
            out.push(format!("# {}\n", book.title()));
            out.push(line);
        } else if !inserted && (line.contains("**ch.**") || line.contains("Bk1")) {
            if line.contains("Bk1") {
                out.push(String::new());
            }
            out.push(line);
            out.push(summary.clone());
            inserted = true;
        } else if let Some(remainder) = book_placeholder_remainder(&line, &book) {
            if !remainder.is_empty()
                && let Some(previous) = out.last_mut()
            {
                let trimmed_len = previous.trim_end().len();
                previous.truncate(trimmed_len);
                previous.push(' ');
                previous.push_str(remainder);
            }
        } else {
            out.push(line);
        }
    }

    if !inserted
        && let Some(first_verses) = out.iter_mut().find(|l| l.trim().starts_with("**vv.**"))
    {
        *first_verses = summary;
    }

    if book.config.repeat_navigation {
        out.push(format!("\n{nav_line}"));
    }
    collapse_blank_lines(&out.join("\n"))
}

fn has_top_navigation(line: &str, source_code: &str) -> bool {
    let pattern = format!(r"\]\]\s+{}\s+\[\[", regex_lite::escape(source_code));
    Regex::new(&pattern).is_ok_and(|re| re.is_match(line))
}

/// `... ^3-16` becomes `... [ ](https://biblehub.com/interlinear/john/3-16.htm) ^3-16`.
fn add_interlinear_link(line: &str, book: &BookContext<'_>) -> String {
    if !book.config.interlinear_links {
        return line.to_string();
    }
    let Some(key) = book.lookup.interlinear_key_of(book.abbr) else {
        return line.to_string();
    };
    VERSE_ANCHOR_END_RE
        .replace(line, |caps: &Captures| {
            let chapter_verse = format!("{}{}", &caps[2], caps.get(3).map_or("", |m| m.as_str()));
            format!(" [ ](https://biblehub.com/interlinear/{key}/{chapter_verse}.htm){}", &caps[1])
        })
        .into_owned()
}

/// The text after a book-only placeholder line such as `[[SoS#Song of Songs|*]] rest`.
fn book_placeholder_remainder<'t>(line: &'t str, book: &BookContext<'_>) -> Option<&'t str> {
    let caps = BOOK_PLACEHOLDER_RE.captures(line)?;
    let known = book.lookup.index_of(&caps[1]).is_some()
        && book.lookup.abbreviation_of(&caps[2]).is_some();
    if !known {
        return None;
    }
    caps.get(3).map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::BookTable;
    use crate::config::ConvertConfig;
    use crate::render::{Properties, PropertyValue};

    fn with_ctx<F: FnOnce(&mut PassContext<'_>) -> String>(config: &ConvertConfig, f: F) -> String {
        let mut ctx = PassContext {
            book: BookContext::new("SoS", &BookTable, config),
            properties: Properties::new(),
        };
        f(&mut ctx)
    }

    #[test]
    fn test_subject_is_extracted() {
        let config = ConvertConfig::default();
        let mut ctx = PassContext {
            book: BookContext::new("SoS", &BookTable, &config),
            properties: Properties::new(),
        };
        let text = "Top\n[[SoS#Song of Songs|Subject of Song of Songs]]:\nThe loving fellowship\nof the believer\n\nmore\n---\nRest";
        let out = extract_subject(text, &mut ctx);

        assert_eq!(out, "Top\n---\nRest");
        assert_eq!(
            ctx.properties.get("Subject"),
            Some(&PropertyValue::Text("The loving fellowship of the believer".to_string()))
        );
        assert_eq!(ctx.properties.summary(), "**Subject:** The loving fellowship of the believer\n");
    }

    #[test]
    fn test_top_lines_are_merged() {
        let text = "[ [[SoS#^intro|Introduction]] | [[SoS#^subject|Subject]] ]\n\
                    [[SoS#^b|Chapters]]\n\
                    **ch.** [[SoS#^1|1]] [[SoS#^2|2]]\n\
                    [[a|Home]] Book | [[SoS#^1|SoS]]";
        assert_eq!(
            merge_top_chapters_line(text),
            "---\n\
             [[SoS#^b|Chapters]] [[SoS#^1|1]] [[SoS#^2|2]]\n\
             [[a|Home]]\n\
             \n\
             ---\n\
             \n\
             [[Bible|Book]] | [[SoS#^1|SoS]]"
        );
    }

    #[test]
    fn test_book_line_at_start() {
        assert_eq!(
            merge_top_chapters_line("Book | [[SoS#^1|1]]"),
            "---\n[[Bible|Book]] | [[SoS#^1|1]]"
        );
    }

    #[test]
    fn test_duplicate_breaks_collapse() {
        let text = "a\nb\nc\nd\ne\n---\n\n---\nf";
        assert_eq!(ensure_blank_before_breaks(text), "a\nb\nc\nd\ne\n\n---\nf");
    }

    #[test]
    fn test_interlinear_link_before_anchor() {
        let config = ConvertConfig::default();
        let book = BookContext::new("SoS", &BookTable, &config);
        assert_eq!(
            add_interlinear_link("Let him kiss me ^1-2", &book),
            "Let him kiss me [ ](https://biblehub.com/interlinear/songs/1-2.htm) ^1-2"
        );
        assert_eq!(add_interlinear_link("point ^o3", &book), "point ^o3");
    }

    #[test]
    fn test_front_matter_and_navigation() {
        let config = ConvertConfig::default();
        let text = "[[Bible|Home]] ^b SoS [[SoS#^1|1]]\n\
                    \n\
                    Intro text\n\
                    [[SoS#Song of Songs|*]] Song\n\
                    \n\
                    **ch.** [[SoS#^1|1]]\n\
                    \n\
                    **[[Bible|SoS]] [[SoS#Song of Songs|1]]:[[SoS#^1|1]]** Kiss ^1-1";
        let out = with_ctx(&config, |ctx| insert_front_matter(text, ctx));

        assert!(out.starts_with("---\nBook: Song of Songs\n"));
        assert!(out.contains("Intro text Song\n"));
        assert!(out.contains("**ch.** [[SoS#^1|1]]\n\n---\n"));
        assert!(out.contains("Kiss [ ](https://biblehub.com/interlinear/songs/1-1.htm) ^1-1"));
        assert!(out.ends_with("\n\n[[Bible|Home]] ^b SoS [[SoS#^1|1]]"));
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn test_navigation_is_not_repeated_when_disabled() {
        let config = ConvertConfig::default().with_repeat_navigation(false);
        let out = with_ctx(&config, |ctx| insert_front_matter("Nav\n\nText", ctx));
        assert!(out.ends_with("Text"));
    }

    #[test]
    fn test_top_navigation_check() {
        assert!(has_top_navigation("[[Bible|Home]] ^b]] SoS [[SoS#^1|1]]", "SoS"));
        assert!(!has_top_navigation("Text", "SoS"));
    }
}
