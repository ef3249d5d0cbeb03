//! rcvmd - Recovery Version HTML to Markdown notes

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use rcvmd::util::decode_html;
use rcvmd::{
    AnchorMap, BookLookup, BookMarkdown, BookSources, BookTable, ConvertConfig, Error, Result,
    build_anchor_map, convert_books,
};

#[derive(Parser)]
#[command(name = "rcvmd")]
#[command(version, about = "Convert the HTML Recovery Version into Markdown notes", long_about = None)]
#[command(after_help = "EXAMPLES:
    rcvmd rcv/ Bible             Convert every book found in rcv/
    rcvmd rcv/ Bible -b Gen      Convert Genesis only
    rcvmd rcv/ --anchors-json refs.json")]
struct Cli {
    /// Directory holding the `<SRC>.htm`, `<SRC>N.htm` and `<SRC>O.htm` pages
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory for the Text, Footnotes and Outlines notes
    #[arg(value_name = "OUTPUT", default_value = "Bible")]
    output: PathBuf,

    /// Convert only this book (short abbreviation, e.g. `Gen` or `1 Cor`)
    #[arg(short, long)]
    book: Option<String>,

    /// Also write the footnote reference map as JSON
    #[arg(long, value_name = "FILE")]
    anchors_json: Option<PathBuf>,

    /// Front-matter `Version` value
    #[arg(long, default_value = "\"[[RcV]]\"")]
    version_link: String,

    /// Do not add BibleHub interlinear links to verses
    #[arg(long)]
    no_interlinear: bool,

    /// Do not repeat the top navigation line at the end of each text note
    #[arg(long)]
    no_repeat_navigation: bool,
}

/// Reference map as written by `--anchors-json`: book → raw anchor → canonical anchor.
#[derive(Serialize)]
#[serde(transparent)]
struct ReferenceMap<'a>(BTreeMap<&'a str, &'a BTreeMap<String, String>>);

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!(failed, "some books failed to convert");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "conversion failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Convert the library; returns the number of books that failed.
fn run(cli: &Cli) -> Result<usize> {
    let lookup = BookTable::new();
    let config = ConvertConfig::new()
        .with_version_link(cli.version_link.clone())
        .with_interlinear_links(!cli.no_interlinear)
        .with_repeat_navigation(!cli.no_repeat_navigation);

    let sources = discover_books(&cli.input)?;
    info!(books = sources.len(), input = %cli.input.display(), "found books");

    let anchors = build_anchor_map(&sources, &lookup);
    if let Some(path) = &cli.anchors_json {
        write_reference_map(path, &anchors)?;
        info!(path = %path.display(), "wrote reference map");
    }

    let selected = match &cli.book {
        Some(name) => {
            let selected: Vec<BookSources> = sources
                .into_iter()
                .filter(|s| lookup.abbreviation_of_source(&s.source) == Some(name.as_str()))
                .collect();
            if selected.is_empty() {
                return Err(match lookup.reverse_abbreviation(name) {
                    Some(_) => Error::MissingSource(format!("{name} in {}", cli.input.display())),
                    None => Error::UnknownBook(name.clone()),
                });
            }
            selected
        }
        None => sources,
    };

    let mut failed = 0;
    for (source, result) in convert_books(&selected, &anchors, &lookup, &config) {
        match result {
            Ok(book) => {
                write_book(&cli.output, &book)?;
                info!(book = %book.abbr, "wrote notes");
            }
            Err(e) => {
                error!(book = %source, error = %e, "book failed");
                failed += 1;
            }
        }
    }
    Ok(failed)
}

/// Find every book that has both a text page and a footnote page.
fn discover_books(dir: &Path) -> Result<Vec<BookSources>> {
    let mut books = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(source) = name.strip_suffix("N.htm") else {
            continue;
        };

        let body_path = dir.join(format!("{source}.htm"));
        if !body_path.exists() {
            warn!(source, "footnote page without a text page, skipping");
            continue;
        }

        let mut book = BookSources::new(source, read_page(&body_path)?, read_page(entry.path())?);
        let outline_path = dir.join(format!("{source}O.htm"));
        if outline_path.exists() {
            book = book.with_outline(read_page(&outline_path)?);
        }
        books.push(book);
    }
    Ok(books)
}

fn read_page(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_html(&bytes).into_owned())
}

fn write_book(output: &Path, book: &BookMarkdown) -> Result<()> {
    let mut files = vec![
        (output.join("Text"), format!("{}.md", book.abbr), &book.text),
        (output.join("Footnotes"), format!("{}N.md", book.abbr), &book.notes),
    ];
    if let Some(outline) = &book.outline {
        files.push((output.join("Outlines"), format!("{}O.md", book.abbr), outline));
    }

    for (dir, name, contents) in files {
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(name), contents)?;
    }
    Ok(())
}

fn write_reference_map(path: &Path, anchors: &AnchorMap) -> Result<()> {
    let map = ReferenceMap(
        anchors
            .iter()
            .map(|(abbr, index)| (abbr, index.as_map()))
            .collect(),
    );
    let json = serde_json::to_string_pretty(&map).map_err(std::io::Error::from)?;
    fs::write(path, json)?;
    Ok(())
}
