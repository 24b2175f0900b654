//! Typed accessors over `scraper` documents and the listing/post extractors built on them.
//!
//! Documents are parsed inside synchronous functions and never held across an `.await`,
//! pages travel between the pipeline stages as plain `(url, html)` pairs.

pub mod listing;
pub mod meta;
pub mod post;

use scraper::{ElementRef, Selector};
use url::Url;

use crate::{Error, Result};

pub use listing::extract_listing;
pub use meta::{parse_meta, Meta};
pub use post::{extract_post, PostBody};

/// One fetched page of the blog index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub url: String,
    pub html: String,
}

/// One fetched post page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub url: String,
    pub html: String,
}

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

/// First descendant of `scope` matching `selector`, or a named `MissingElement`.
pub(crate) fn select_first<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    what: &'static str,
    url: &str,
) -> Result<ElementRef<'a>> {
    scope.select(selector).next().ok_or_else(|| missing(what, url))
}

/// Non-empty, trimmed attribute value.
pub(crate) fn required_attr<'a>(
    el: ElementRef<'a>,
    attr: &str,
    what: &'static str,
    url: &str,
) -> Result<&'a str> {
    el.value()
        .attr(attr)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(what, url))
}

/// Non-empty text content with whitespace runs collapsed.
pub(crate) fn required_text(el: ElementRef, what: &'static str, url: &str) -> Result<String> {
    optional_text(Some(el)).ok_or_else(|| missing(what, url))
}

pub(crate) fn optional_text(el: Option<ElementRef>) -> Option<String> {
    let text = el?.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// Resolves a possibly relative `href` against the page it was found on.
pub(crate) fn resolve(base: &str, href: &str) -> Result<String> {
    let url = Url::parse(base)?.join(href)?;
    Ok(url.into())
}

fn missing(what: &'static str, url: &str) -> Error {
    Error::MissingElement {
        what,
        url: url.to_string(),
    }
}
