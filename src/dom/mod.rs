//! HTML parsing into an index-linked arena.

mod arena;
mod tree_sink;

pub use arena::{ArenaDom, Attribute, Children, Descendants, Node, NodeData, NodeId};
pub use tree_sink::ArenaSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document into an [`ArenaDom`].
pub fn parse_html(html: &str) -> ArenaDom {
    parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
