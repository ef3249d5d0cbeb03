//! Per-book conversion context.

use crate::books::BookLookup;
use crate::config::ConvertConfig;

/// Everything a renderer or rewrite pass needs to know about the book it works on.
#[derive(Clone, Copy)]
pub struct BookContext<'a> {
    /// Short abbreviation, also the note name (`Gen`, `1 Cor`).
    pub abbr: &'a str,
    pub lookup: &'a dyn BookLookup,
    pub config: &'a ConvertConfig,
}

impl<'a> BookContext<'a> {
    pub fn new(abbr: &'a str, lookup: &'a dyn BookLookup, config: &'a ConvertConfig) -> Self {
        Self {
            abbr,
            lookup,
            config,
        }
    }

    /// Display title (`Song of Songs`), or the abbreviation for unknown books.
    pub fn title(&self) -> &'a str {
        self.lookup.reverse_abbreviation(self.abbr).unwrap_or(self.abbr)
    }

    /// Source code (`SoS`, `Psa`) used by the edition's own navigation.
    pub fn source_code(&self) -> &'a str {
        self.lookup
            .source_abbreviation_of(self.title())
            .unwrap_or(self.abbr)
    }

    /// Link to the top of this book's text note.
    pub fn top_link_target(&self) -> String {
        format!("{}#{}", self.abbr, self.title())
    }
}

impl std::fmt::Debug for BookContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookContext")
            .field("abbr", &self.abbr)
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::BookTable;

    #[test]
    fn test_titles_and_codes() {
        let config = ConvertConfig::default();
        let ctx = BookContext::new("SoS", &BookTable, &config);
        assert_eq!(ctx.title(), "Song of Songs");
        // "Song of Songs" is an alias, not the canonical long name
        assert_eq!(ctx.source_code(), "SoS");
        assert_eq!(ctx.top_link_target(), "SoS#Song of Songs");

        let ctx = BookContext::new("Psa", &BookTable, &config);
        assert_eq!(ctx.source_code(), "Psa");

        let ctx = BookContext::new("1 Cor", &BookTable, &config);
        assert_eq!(ctx.source_code(), "1Co");
    }

    #[test]
    fn test_unknown_book_falls_back_to_abbreviation() {
        let config = ConvertConfig::default();
        let ctx = BookContext::new("Xyz", &BookTable, &config);
        assert_eq!(ctx.title(), "Xyz");
        assert_eq!(ctx.source_code(), "Xyz");
    }
}
