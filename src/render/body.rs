//! Body (verse text) renderer.

use crate::dom::parse_html;
use crate::error::Result;
use crate::refs::LinkResolver;
use crate::util::{collapse_whitespace, replace_nbsp};

use super::{Flattener, Profile, Properties, Rule, Selector};

static BODY_PROFILE: Profile = Profile::new(&[
    (Selector::tag("head"), Rule::Drop),
    (Selector::tag("i"), Rule::Italic),
    (Selector::tag("s"), Rule::Drop),
    (Selector::tag("a"), Rule::Link),
    (Selector::tag("b"), Rule::Bold),
    (Selector::tag("q"), Rule::Quote),
    (Selector::with_attr_value("table", "align", "center"), Rule::Drop),
    (Selector::tag("br"), Rule::LineBreak),
    (Selector::tag("div"), Rule::BlockBreak),
]);

/// Render a book's text page into the initial line stream.
///
/// All source whitespace is collapsed first, so line structure comes only
/// from `<br>`, `<div>` and `<q>`. The centered properties table is removed
/// from the text and returned separately.
pub fn render_body(html: &str, resolver: LinkResolver<'_>) -> Result<(String, Properties)> {
    let html = collapse_whitespace(html);
    let dom = parse_html(&html);
    let flattener = Flattener::new(&dom, &BODY_PROFILE, resolver);

    let ins_limit = BODY_PROFILE.rank_of("br").unwrap_or(BODY_PROFILE.all());
    let properties = Properties::extract(&flattener, ins_limit)?;

    let text = flattener.text(dom.document())?;
    Ok((replace_nbsp(text.trim()).into_owned(), properties))
}
