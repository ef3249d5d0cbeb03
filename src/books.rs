//! Book name tables.
//!
//! The HTML edition names its files with three-character source codes
//! (`Gen`, `Mat`, `1Co`, ...), while the Markdown notes are named with the
//! short abbreviations used in print (`Gen`, `Matt`, `1 Cor`, ...). This
//! module maps between the two and the canonical long names.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

/// Lookup service between source codes, long names and short abbreviations.
///
/// Every method returns `None` for unknown keys; callers decide whether to
/// fall back to the raw key.
pub trait BookLookup: Sync {
    /// Short abbreviation for a long name (or a legacy alias such as `S.S.`).
    fn abbreviation_of(&self, long_name: &str) -> Option<&str>;

    /// Canonical long name for a source code.
    fn long_name_of(&self, source: &str) -> Option<&str>;

    /// Display title for a short abbreviation.
    fn reverse_abbreviation(&self, abbr: &str) -> Option<&str>;

    /// BibleHub interlinear path segment for a short abbreviation.
    fn interlinear_key_of(&self, abbr: &str) -> Option<&str>;

    /// Source code for a canonical long name.
    fn source_abbreviation_of(&self, long_name: &str) -> Option<&str>;

    /// 1-based canonical position of a book.
    fn index_of(&self, abbr: &str) -> Option<usize>;

    /// Replace whole-word source codes in `text` with short abbreviations.
    fn normalize_source_abbreviations<'a>(&self, text: &'a str) -> Cow<'a, str>;

    /// Short abbreviation for a source code.
    fn abbreviation_of_source(&self, source: &str) -> Option<&str> {
        self.long_name_of(source)
            .and_then(|long| self.abbreviation_of(long))
    }
}

/// One canonical book.
#[derive(Debug, Clone, Copy)]
pub struct BookEntry {
    pub source: &'static str,
    pub name: &'static str,
    pub abbr: &'static str,
    pub title: &'static str,
    pub interlinear: &'static str,
}

const fn book(
    source: &'static str,
    name: &'static str,
    abbr: &'static str,
    title: &'static str,
    interlinear: &'static str,
) -> BookEntry {
    BookEntry {
        source,
        name,
        abbr,
        title,
        interlinear,
    }
}

/// The 66 books in canonical order.
pub static BOOKS: [BookEntry; 66] = [
    book("Gen", "Genesis", "Gen", "Genesis", "genesis"),
    book("Exo", "Exodus", "Exo", "Exodus", "exodus"),
    book("Lev", "Leviticus", "Lev", "Leviticus", "leviticus"),
    book("Num", "Numbers", "Num", "Numbers", "numbers"),
    book("Deu", "Deuteronomy", "Deut", "Deuteronomy", "deuteronomy"),
    book("Jos", "Joshua", "Josh", "Joshua", "joshua"),
    book("Jdg", "Judges", "Judg", "Judges", "judges"),
    book("Rut", "Ruth", "Ruth", "Ruth", "ruth"),
    book("1Sa", "1 Samuel", "1 Sam", "1 Samuel", "1_samuel"),
    book("2Sa", "2 Samuel", "2 Sam", "2 Samuel", "2_samuel"),
    book("1Ki", "1 Kings", "1 Kings", "1 Kings", "1_kings"),
    book("2Ki", "2 Kings", "2 Kings", "2 Kings", "2_kings"),
    book("1Ch", "1 Chronicles", "1 Chron", "1 Chronicles", "1_chronicles"),
    book("2Ch", "2 Chronicles", "2 Chron", "2 Chronicles", "2_chronicles"),
    book("Ezr", "Ezra", "Ezra", "Ezra", "ezra"),
    book("Neh", "Nehemiah", "Neh", "Nehemiah", "nehemiah"),
    book("Est", "Esther", "Esth", "Esther", "esther"),
    book("Job", "Job", "Job", "Job", "job"),
    book("Psa", "Psalms", "Psa", "Psalms", "psalms"),
    book("Prv", "Proverbs", "Prov", "Proverbs", "proverbs"),
    book("Ecc", "Ecclesiastes", "Eccl", "Ecclesiastes", "ecclesiastes"),
    book("SoS", "Song of Solomon", "SoS", "Song of Songs", "songs"),
    book("Isa", "Isaiah", "Isa", "Isaiah", "isaiah"),
    book("Jer", "Jeremiah", "Jer", "Jeremiah", "jeremiah"),
    book("Lam", "Lamentations", "Lam", "Lamentations", "lamentations"),
    book("Ezk", "Ezekiel", "Ezek", "Ezekiel", "ezekiel"),
    book("Dan", "Daniel", "Dan", "Daniel", "daniel"),
    book("Hos", "Hosea", "Hosea", "Hosea", "hosea"),
    book("Joe", "Joel", "Joel", "Joel", "joel"),
    book("Amo", "Amos", "Amos", "Amos", "amos"),
    book("Oba", "Obadiah", "Obad", "Obadiah", "obadiah"),
    book("Jon", "Jonah", "Jonah", "Jonah", "jonah"),
    book("Mic", "Micah", "Micah", "Micah", "micah"),
    book("Nah", "Nahum", "Nah", "Nahum", "nahum"),
    book("Hab", "Habakkuk", "Hab", "Habakkuk", "habakkuk"),
    book("Zep", "Zephaniah", "Zep", "Zephaniah", "zephaniah"),
    book("Hag", "Haggai", "Hag", "Haggai", "haggai"),
    book("Zec", "Zechariah", "Zech", "Zechariah", "zechariah"),
    book("Mal", "Malachi", "Mal", "Malachi", "malachi"),
    book("Mat", "Matthew", "Matt", "Matthew", "matthew"),
    book("Mrk", "Mark", "Mark", "Mark", "mark"),
    book("Luk", "Luke", "Luke", "Luke", "luke"),
    book("Joh", "John", "John", "John", "john"),
    book("Act", "Acts", "Acts", "Acts", "acts"),
    book("Rom", "Romans", "Rom", "Romans", "romans"),
    book("1Co", "1 Corinthians", "1 Cor", "1 Corinthians", "1_corinthians"),
    book("2Co", "2 Corinthians", "2 Cor", "2 Corinthians", "2_corinthians"),
    book("Gal", "Galatians", "Gal", "Galatians", "galatians"),
    book("Eph", "Ephesians", "Eph", "Ephesians", "ephesians"),
    book("Phi", "Philippians", "Phil", "Philippians", "philippians"),
    book("Col", "Colossians", "Col", "Colossians", "colossians"),
    book("1Th", "1 Thessalonians", "1 Thes", "1 Thessalonians", "1_thessalonians"),
    book("2Th", "2 Thessalonians", "2 Thes", "2 Thessalonians", "2_thessalonians"),
    book("1Ti", "1 Timothy", "1 Tim", "1 Timothy", "1_timothy"),
    book("2Ti", "2 Timothy", "2 Tim", "2 Timothy", "2_timothy"),
    book("Tit", "Titus", "Titus", "Titus", "titus"),
    book("Phm", "Philemon", "Philem", "Philemon", "philemon"),
    book("Heb", "Hebrews", "Heb", "Hebrews", "hebrews"),
    book("Jam", "James", "James", "James", "james"),
    book("1Pe", "1 Peter", "1 Pet", "1 Peter", "1_peter"),
    book("2Pe", "2 Peter", "2 Pet", "2 Peter", "2_peter"),
    book("1Jo", "1 John", "1 John", "1 John", "1_john"),
    book("2Jo", "2 John", "2 John", "2 John", "2_john"),
    book("3Jo", "3 John", "3 John", "3 John", "3_john"),
    book("Jud", "Jude", "Jude", "Jude", "jude"),
    book("Rev", "Revelation", "Rev", "Revelation", "revelation"),
];

/// Alternative long names found in book titles and properties.
static ALIASES: &[(&str, &str)] = &[
    ("Song of Songs", "SoS"),
    ("S.S", "SoS"),
    ("S.S.", "SoS"),
    ("S. S.", "SoS"),
    ("S. S", "SoS"),
    ("SS", "SoS"),
];

static SOURCE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let codes: Vec<&str> = BOOKS.iter().map(|b| b.source).collect();
    Regex::new(&format!(r"\b(?:{})\b", codes.join("|"))).unwrap()
});

/// The built-in tables for the Recovery Version HTML edition.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookTable;

impl BookTable {
    pub fn new() -> Self {
        Self
    }

    /// All books in canonical order.
    pub fn books(&self) -> &'static [BookEntry] {
        &BOOKS
    }

    fn by_abbr(&self, abbr: &str) -> Option<(usize, &'static BookEntry)> {
        BOOKS.iter().enumerate().find(|(_, b)| b.abbr == abbr)
    }
}

impl BookLookup for BookTable {
    fn abbreviation_of(&self, long_name: &str) -> Option<&str> {
        BOOKS
            .iter()
            .find(|b| b.name == long_name)
            .map(|b| b.abbr)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == long_name)
                    .map(|(_, abbr)| *abbr)
            })
    }

    fn long_name_of(&self, source: &str) -> Option<&str> {
        BOOKS.iter().find(|b| b.source == source).map(|b| b.name)
    }

    fn reverse_abbreviation(&self, abbr: &str) -> Option<&str> {
        self.by_abbr(abbr).map(|(_, b)| b.title)
    }

    fn interlinear_key_of(&self, abbr: &str) -> Option<&str> {
        self.by_abbr(abbr).map(|(_, b)| b.interlinear)
    }

    fn source_abbreviation_of(&self, long_name: &str) -> Option<&str> {
        BOOKS.iter().find(|b| b.name == long_name).map(|b| b.source)
    }

    fn index_of(&self, abbr: &str) -> Option<usize> {
        self.by_abbr(abbr).map(|(i, _)| i + 1)
    }

    fn normalize_source_abbreviations<'a>(&self, text: &'a str) -> Cow<'a, str> {
        SOURCE_CODE_RE.replace_all(text, |caps: &Captures| {
            let code = &caps[0];
            self.abbreviation_of_source(code).unwrap_or(code).to_string()
        })
    }
}
