//! Whole-library conversion through the public API.

use std::fs;

use rcvmd::util::decode_html;
use rcvmd::{BookSources, BookTable, ConvertConfig, Error, convert_book, convert_library};

const GEN_BODY: &str = r#"<html><head><title>Genesis</title></head><body><b><a href="a.htm">Gen</a> <a href="Gen.htm#v1">1</a>:<a href="Gen.htm#v1_1">1</a></b> In the beginning<a href="GenN.htm#n1_1x1">1</a> God created the heavens and the earth.</body></html>"#;

const GEN_NOTES: &str = r#"<html><head><title>Genesis Notes</title></head><body>
    <h3>Genesis</h3>
    <a name="n1_1x1"></a><a name="n1_1x1P2"></a>
    <p><b>1<sup>1</sup></b> beginning</p>
    <a name="n1_2x1"></a>
    <p>Second note</p>
</body></html>"#;

const GEN_OUTLINE: &str = r#"<html><head><title>Outline</title></head><body>
    <h3>Genesis</h3>
    <kbd><a name="o1"></a><b>I.</b> <u class="o">God's creation</u></kbd>
    <em><a name="o2"></a><b>A.</b> <u class="o">The heavens</u></em>
    <h6><a name="o3"></a><a href="Gen.htm#o3">II.</a> <a href="Gen.htm#o3">Man</a> &mdash; <a href="Gen.htm#v2_4">4</a>-<a href="Gen.htm#v2_25">25</a></h6>
</body></html>"#;

const MAT_BODY: &str = r#"<html><head><title>Matthew</title></head><body><b><a href="a.htm">Mat</a> <a href="Mat.htm#v1">1</a>:<a href="Mat.htm#v1_1">1</a></b> The book of the generation<a href="GenN.htm#n1_1x1P2">1</a> of Jesus Christ.</body></html>"#;

const MAT_NOTES: &str = r#"<html><head><title>Matthew Notes</title></head><body>
    <a name="n1_1x1"></a>
    <p>See <a href="GenN.htm#n1_1x1">Gen 1:1, note 1</a>.</p>
</body></html>"#;

fn library() -> Vec<BookSources> {
    vec![
        BookSources::new("Gen", GEN_BODY, GEN_NOTES).with_outline(GEN_OUTLINE),
        BookSources::new("Mat", MAT_BODY, MAT_NOTES),
    ]
}

#[test]
fn test_library_converts_every_book() {
    let output = convert_library(&library(), &BookTable, &ConvertConfig::default());

    assert_eq!(output.anchors.len(), 2);
    assert_eq!(output.books.len(), 2);
    assert!(output.books.iter().all(|(_, result)| result.is_ok()));
    assert_eq!(output.books[0].0, "Gen");
    assert_eq!(output.books[1].0, "Mat");
}

#[test]
fn test_anchor_runs_collapse_to_one_target() {
    let output = convert_library(&library(), &BookTable, &ConvertConfig::default());
    let gen_index = output.anchors.get("Gen").unwrap();

    assert_eq!(gen_index.canonical("1-1x1"), Some("1-1x1"));
    assert_eq!(gen_index.canonical("1-2x1"), Some("1-2x1"));
    assert!(output.anchors.get("Matt").is_some());
    assert!(output.anchors.get("Mat").is_none());
}

#[test]
fn test_text_note_shape() {
    let output = convert_library(&library(), &BookTable, &ConvertConfig::default());
    let genesis = output.books[0].1.as_ref().unwrap();

    assert_eq!(genesis.abbr, "Gen");
    assert!(genesis.text.starts_with("---\n"));
    assert!(genesis.text.contains("Book: Genesis"));
    assert!(genesis.text.contains("[[Gen#^1|1]]"));
    assert!(genesis.text.contains("[[GenN#^1-1x1|1]]"));
    assert!(genesis.text.contains(" ^1-1"));
    assert!(genesis.text.contains("biblehub.com/interlinear/genesis/1-1.htm"));
    assert!(!genesis.text.contains("\n\n\n"));
}

#[test]
fn test_footnotes_carry_canonical_anchors() {
    let output = convert_library(&library(), &BookTable, &ConvertConfig::default());
    let genesis = output.books[0].1.as_ref().unwrap();

    assert!(genesis.notes.contains(" ^1-1x1"));
    assert!(genesis.notes.contains("Second note ^1-2x1"));
}

#[test]
fn test_links_cross_books() {
    let output = convert_library(&library(), &BookTable, &ConvertConfig::default());
    let matthew = output.books[1].1.as_ref().unwrap();

    assert_eq!(matthew.abbr, "Matt");
    assert!(matthew.text.contains("[[GenN#^1-1x1|1]]"));
    assert!(matthew.notes.contains("[[GenN#^1-1x1|Gen 1:1, note 1]]"));
    assert!(matthew.outline.is_none());
}

#[test]
fn test_outline_note() {
    let output = convert_library(&library(), &BookTable, &ConvertConfig::default());
    let outline = output.books[0].1.as_ref().unwrap().outline.as_deref().unwrap();

    assert!(outline.starts_with("# Genesis Outline\n\n"));
    assert!(outline.contains("## [[Genesis (Book)#^o1|I.]] God's creation ^o1"));
    assert!(outline.contains("### [[Genesis (Book)#^o2|A.]] The heavens ^o2"));
    assert!(outline.contains("(vv. [[Gen#^2-4|4]]-[[Gen#^2-25|25]]) ^o3"));
}

#[test]
fn test_failing_book_does_not_stop_the_rest() {
    let mut books = library();
    books.push(BookSources::new("Xyz", "<body></body>", "<body></body>"));
    let output = convert_library(&books, &BookTable, &ConvertConfig::default());

    assert_eq!(output.books.len(), 3);
    assert!(output.books[0].1.is_ok());
    assert!(output.books[1].1.is_ok());
    assert!(matches!(&output.books[2].1, Err(Error::UnknownBook(code)) if code == "Xyz"));
}

#[test]
fn test_dangling_footnote_link_fails_the_book() {
    let books = vec![BookSources::new(
        "Gen",
        r#"<body><a href="GenN.htm#n9_9x9">1</a></body>"#,
        GEN_NOTES,
    )];
    let output = convert_library(&books, &BookTable, &ConvertConfig::default());
    assert!(output.books[0].1.is_err());
}

#[test]
fn test_book_needs_anchor_map_of_linked_books() {
    let anchors = rcvmd::build_anchor_map(&library()[1..], &BookTable);
    let result = convert_book(&library()[1], &anchors, &BookTable, &ConvertConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_windows_1252_page_is_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("GenN.htm");
    fs::write(
        &path,
        b"<html><head><meta charset=\"windows-1252\"></head><body>God\x92s word</body></html>",
    )
    .unwrap();

    let bytes = fs::read(&path).unwrap();
    let html = decode_html(&bytes);
    assert!(html.contains("God\u{2019}s word"));
}
