//! Outline point classification.
//!
//! Outline labels (`I.`, `A.`, `1.`, `a.`, `(1)`, `(a)`) map to heading depths.
//! A label like `I` or `C` is ambiguous between a roman numeral and a letter;
//! the tie is broken by which reading continues the sequence seen so far.

use std::sync::LazyLock;

use regex_lite::Regex;

static OUTLINE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?\[\[[^#]*#\^o([^|]+)\|([^\]]+)\]\](.*)").unwrap());

static OUTLINE_TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^#]*#\^o").unwrap());

static TRAILING_OUTLINE_ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\^o\w+\s*$").unwrap());

static EMBEDDED_POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\[\[[^#]*#\^o[^\|]+\|[^\]]+\]\](?: [^\)]*)?\)").unwrap()
});

/// Depth assigned to an outline label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineLevel {
    /// Heading level 2 to 6.
    Heading(u8),
    /// Emphasized bullet item.
    Unordered,
}

/// Sequence state threaded through the classification fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutlineState {
    pub previous_roman: Option<u32>,
    /// Last decimal label, or the ordinal of the last letter label.
    pub previous_arabic: Option<u32>,
}

/// Value of a roman numeral, using subtractive notation.
pub fn roman_to_int(roman: &str) -> Option<u32> {
    let mut total: u32 = 0;
    let mut prev = 0;
    for ch in roman.chars().rev() {
        let val = match ch {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if val < prev {
            total = total.saturating_sub(val);
        } else {
            total = total.saturating_add(val);
        }
        prev = val;
    }
    Some(total)
}

fn is_roman(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| "IVXLCDM".contains(c))
}

fn letter_ordinal(label: &str, base: u8) -> Option<u32> {
    match label.as_bytes() {
        [c] if c.is_ascii_alphabetic() && c.is_ascii_uppercase() == base.is_ascii_uppercase() => {
            Some(u32::from(c - base) + 1)
        }
        _ => None,
    }
}

/// A roman label continues the roman sequence: first roman seen, or its successor.
fn fits_roman(value: u32, state: OutlineState) -> bool {
    state
        .previous_roman
        .is_none_or(|prev| prev.checked_add(1) == Some(value))
}

/// A single-letter label continues the letter sequence (`A` when none yet).
fn fits_alpha(ordinal: Option<u32>, state: OutlineState) -> bool {
    ordinal.is_some_and(|ord| state.previous_arabic.unwrap_or(0).checked_add(1) == Some(ord))
}

/// Classify one label (trailing dot already stripped).
pub fn classify_label(label: &str, state: OutlineState) -> (OutlineLevel, OutlineState) {
    let mut next = state;

    if !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()) {
        next.previous_arabic = label.parse().ok();
        return (OutlineLevel::Heading(4), next);
    }

    if is_roman(label) {
        let value = roman_to_int(label).unwrap_or(0);
        let ordinal = letter_ordinal(label, b'A');
        let as_letter = match (fits_roman(value, state), fits_alpha(ordinal, state)) {
            (true, false) => false,
            (false, true) => true,
            // Both continue: the letter is the deeper level
            (true, true) => true,
            (false, false) => false,
        };
        if as_letter {
            next.previous_arabic = ordinal;
            return (OutlineLevel::Heading(3), next);
        }
        next.previous_roman = Some(value);
        return (OutlineLevel::Heading(2), next);
    }

    if let Some(ordinal) = letter_ordinal(label, b'A') {
        next.previous_arabic = Some(ordinal);
        return (OutlineLevel::Heading(3), next);
    }

    if letter_ordinal(label, b'a').is_some() {
        return (OutlineLevel::Heading(5), next);
    }

    if let Some(inner) = label.strip_prefix('(').and_then(|l| l.strip_suffix(')'))
        && !inner.is_empty()
        && inner.bytes().all(|b| b.is_ascii_digit())
    {
        return (OutlineLevel::Heading(6), next);
    }

    (OutlineLevel::Unordered, next)
}

/// Classify one outline line such as `[[Gen#^o3|A.]] text`.
///
/// The first outline target is rewritten to `[[<title> (Book)#^o`, a ` ^o<num>`
/// block anchor is appended (except on `cont'd` lines) and the heading prefix
/// is added. Lines that are not outline points come back trimmed.
pub fn classify_line(line: &str, title: &str, state: OutlineState) -> (String, OutlineState) {
    let Some(caps) = OUTLINE_LINE_RE.captures(line) else {
        return (line.trim().to_string(), state);
    };
    let num = &caps[1];
    let label = caps[2].trim();
    let label = label.strip_suffix('.').unwrap_or(label);

    let replacement = format!("[[{title} (Book)#^o");
    let mut out = OUTLINE_TARGET_RE
        .replacen(line, 1, regex_lite::NoExpand(&replacement))
        .into_owned();
    if !out.contains("cont'd") {
        out.push_str(" ^o");
        out.push_str(num);
    }

    let (level, state) = classify_label(label, state);
    let rendered = match level {
        OutlineLevel::Heading(depth) => format!("{} {out}", "#".repeat(usize::from(depth))),
        OutlineLevel::Unordered => {
            let body = match TRAILING_OUTLINE_ANCHOR_RE.find(&out) {
                Some(m) => format!("{}*{}", &out[..m.start()], &out[m.start()..]),
                None => format!("{}*", out.trim_end()),
            };
            format!("- *{body}")
        }
    };
    (rendered, state)
}

/// Split parenthesized outline points embedded in a line onto their own lines.
///
/// `text ([[X#^o4|(1)]] point) more` becomes `([[X#^o4|(1)]] point)` and
/// `text  more`. Lines without embedded points are returned trimmed.
pub fn split_outline_points(line: &str) -> Vec<String> {
    let line = line.trim();
    let points: Vec<&str> = EMBEDDED_POINT_RE.find_iter(line).map(|m| m.as_str()).collect();
    if points.is_empty() {
        return vec![line.to_string()];
    }

    let mut rest = line.to_string();
    for point in &points {
        rest = rest.replace(point, "");
    }

    let mut out: Vec<String> = points.iter().map(|p| p.trim().to_string()).collect();
    let rest = rest.trim();
    if !rest.is_empty() {
        out.push(rest.to_string());
    }
    out
}

/// Split embedded points, then classify every line in one fold.
pub fn classify_lines<S: AsRef<str>>(lines: &[S], title: &str) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| split_outline_points(line.as_ref()))
        .scan(OutlineState::default(), |state, line| {
            let (out, next) = classify_line(&line, title, *state);
            *state = next;
            Some(out)
        })
        .collect()
}

/// Whether a classified line is an outline heading or item.
pub fn is_outline_line(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with('#')
        || line.starts_with("- *[")
        || line.starts_with("- *([")
        || line.starts_with("*[")
        || line.starts_with("* [")
}
