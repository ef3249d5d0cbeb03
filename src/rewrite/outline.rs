//! Pass 6: outline points embedded in the text become headings.

use crate::outline::{classify_lines, is_outline_line};

use super::{PassContext, is_blank};

/// Classify outline points and surround every outline line with blank lines.
pub(super) fn classify_outline(text: &str, ctx: &mut PassContext<'_>) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let classified = classify_lines(&lines, ctx.book.title());
    let n = classified.len();

    let mut out = Vec::with_capacity(n);
    for (i, line) in classified.iter().enumerate() {
        if !is_outline_line(line) {
            out.push(line.as_str());
            continue;
        }
        if i == 0 || !is_blank(&classified[i - 1]) {
            out.push("");
        }
        out.push(line.as_str());
        if i + 1 == n || !is_blank(&classified[i + 1]) {
            out.push("");
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookContext;
    use crate::books::BookTable;
    use crate::config::ConvertConfig;
    use crate::render::Properties;

    fn classify(text: &str) -> String {
        let config = ConvertConfig::default();
        let mut ctx = PassContext {
            book: BookContext::new("Gen", &BookTable, &config),
            properties: Properties::new(),
        };
        classify_outline(text, &mut ctx)
    }

    #[test]
    fn test_outline_points_get_headings_and_spacing() {
        let text = "Intro\n[[Gen#^o1|I.]] God's creation\n[[Gen#^o2|A.]] The heavens\nText";
        assert_eq!(
            classify(text),
            "Intro\n\
             \n\
             ## [[Genesis (Book)#^o1|I.]] God's creation ^o1\n\
             \n\
             \n\
             ### [[Genesis (Book)#^o2|A.]] The heavens ^o2\n\
             \n\
             Text"
        );
    }

    #[test]
    fn test_embedded_point_is_split_out() {
        let text = "Text ([[Gen#^o4|(1)]] The light) more";
        assert_eq!(
            classify(text),
            "\n###### ([[Genesis (Book)#^o4|(1)]] The light) ^o4\n\nText  more"
        );
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(classify("one\n\n  two"), "one\n\ntwo");
    }
}
