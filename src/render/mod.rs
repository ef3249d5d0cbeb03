//! HTML → line-oriented text renderers.
//!
//! Each document kind has a [`Profile`]: an ordered list of tag rules. The
//! order matters because the rules nest the way successive tag rewrites
//! would: when a rule fires on an element, only rules that come *before* it
//! in the profile apply inside that element. For the body text, italics are
//! rendered first, so a link containing `<i>` shows `_word_` in its display
//! text, but a `<b>` inside a link is plain text.

mod body;
mod footnotes;
mod outline;
mod properties;

pub use body::render_body;
pub use footnotes::render_footnotes;
pub use outline::render_outline;
pub use properties::{Properties, PropertyValue};

use crate::dom::{ArenaDom, NodeData, NodeId};
use crate::error::Result;
use crate::refs::LinkResolver;

/// Which elements a rule applies to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Selector {
    tag: &'static str,
    attr: Option<(&'static str, Option<&'static str>)>,
}

impl Selector {
    pub(crate) const fn tag(tag: &'static str) -> Self {
        Self { tag, attr: None }
    }

    pub(crate) const fn with_attr(tag: &'static str, attr: &'static str) -> Self {
        Self {
            tag,
            attr: Some((attr, None)),
        }
    }

    pub(crate) const fn with_attr_value(
        tag: &'static str,
        attr: &'static str,
        value: &'static str,
    ) -> Self {
        Self {
            tag,
            attr: Some((attr, Some(value))),
        }
    }

    fn matches(&self, dom: &ArenaDom, id: NodeId) -> bool {
        if !dom.is_tag(id, self.tag) {
            return false;
        }
        match self.attr {
            None => true,
            Some((name, None)) => dom.has_attr(id, name),
            Some((name, Some(value))) => dom.get_attr(id, name) == Some(value),
        }
    }
}

/// What to emit for a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    /// `_text_` from the raw text content.
    Italic,
    /// Emit nothing.
    Drop,
    /// Resolve as a hyperlink.
    Link,
    /// `**inner**`
    Bold,
    /// Indented quotation on its own line.
    Quote,
    /// A newline; the element has no content.
    LineBreak,
    /// A newline, then the content.
    BlockBreak,
}

/// Ordered rule table for one document kind.
pub(crate) struct Profile {
    rules: &'static [(Selector, Rule)],
}

impl Profile {
    pub(crate) const fn new(rules: &'static [(Selector, Rule)]) -> Self {
        Self { rules }
    }

    /// Limit under which every rule is active.
    pub(crate) fn all(&self) -> usize {
        self.rules.len()
    }

    /// Rank of the first rule for `tag`.
    pub(crate) fn rank_of(&self, tag: &str) -> Option<usize> {
        self.rules.iter().position(|(sel, _)| sel.tag == tag)
    }

    fn rule_for(&self, dom: &ArenaDom, id: NodeId, limit: usize) -> Option<(usize, Rule)> {
        self.rules[..limit.min(self.rules.len())]
            .iter()
            .position(|(sel, _)| sel.matches(dom, id))
            .map(|rank| (rank, self.rules[rank].1))
    }
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    limit: usize,
    in_link: bool,
}

/// Flattens a DOM subtree to text according to a profile.
pub(crate) struct Flattener<'a> {
    dom: &'a ArenaDom,
    profile: &'a Profile,
    resolver: LinkResolver<'a>,
}

impl<'a> Flattener<'a> {
    pub(crate) fn new(dom: &'a ArenaDom, profile: &'a Profile, resolver: LinkResolver<'a>) -> Self {
        Self {
            dom,
            profile,
            resolver,
        }
    }

    pub(crate) fn dom(&self) -> &'a ArenaDom {
        self.dom
    }

    /// Render `id` with every rule active.
    pub(crate) fn text(&self, id: NodeId) -> Result<String> {
        let mut out = String::new();
        self.render(id, self.scope(self.profile.all()), &mut out)?;
        Ok(out)
    }

    /// Render the children of `id` with only rules ranked below `limit` active.
    pub(crate) fn children_text(&self, id: NodeId, limit: usize) -> Result<String> {
        let mut out = String::new();
        self.render_children(id, self.scope(limit), &mut out)?;
        Ok(out)
    }

    fn scope(&self, limit: usize) -> Scope {
        Scope {
            limit,
            in_link: false,
        }
    }

    fn render_children(&self, id: NodeId, scope: Scope, out: &mut String) -> Result<()> {
        for child in self.dom.children(id) {
            self.render(child, scope, out)?;
        }
        Ok(())
    }

    fn render(&self, id: NodeId, scope: Scope, out: &mut String) -> Result<()> {
        let Some(node) = self.dom.get(id) else {
            return Ok(());
        };
        match &node.data {
            NodeData::Text(text) => {
                out.push_str(text);
                return Ok(());
            }
            NodeData::Element { .. } => {}
            NodeData::Document => return self.render_children(id, scope, out),
            NodeData::Comment(_) => return Ok(()),
        }

        let Some((rank, rule)) = self.profile.rule_for(self.dom, id, scope.limit) else {
            // A struck-through span inside a link marks a superscript reference
            if scope.in_link && self.dom.is_tag(id, "s") {
                out.push('^');
                out.push_str(&self.dom.text(id));
                return Ok(());
            }
            return self.render_children(id, scope, out);
        };

        let inner = Scope {
            limit: rank,
            in_link: scope.in_link,
        };
        match rule {
            Rule::Italic => {
                out.push('_');
                out.push_str(&self.dom.text(id));
                out.push('_');
            }
            Rule::Drop => {}
            Rule::Link => {
                let mut display = String::new();
                self.render_children(
                    id,
                    Scope {
                        limit: rank,
                        in_link: true,
                    },
                    &mut display,
                )?;
                let link = self.resolver.resolve(
                    self.dom.get_attr(id, "href"),
                    self.dom.get_attr(id, "name"),
                    &display,
                )?;
                out.push_str(&link.token);
            }
            Rule::Bold => {
                out.push_str("**");
                self.render_children(id, inner, out)?;
                out.push_str("**");
            }
            Rule::Quote => {
                out.push_str("\n   ");
                self.render_children(id, inner, out)?;
                out.push('\n');
            }
            Rule::LineBreak => out.push('\n'),
            Rule::BlockBreak => {
                out.push('\n');
                self.render_children(id, scope, out)?;
            }
        }
        Ok(())
    }
}

/// Whether `id` lies inside one of the document's non-content sections.
pub(crate) fn in_skipped_section(dom: &ArenaDom, id: NodeId, skipped: &[&str]) -> bool {
    skipped.iter().any(|tag| dom.is_tag(id, tag) || dom.has_ancestor(id, tag))
}
