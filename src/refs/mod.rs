//! Cross-document references: footnote anchor identity and link resolution.

mod anchors;
mod links;

pub use anchors::{AnchorIndex, AnchorMap, normalize_anchor_name};
pub use links::{BracketEscape, CanonicalLink, LinkKind, LinkResolver, LinkTarget, StemKind};
