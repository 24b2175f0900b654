use std::collections::HashSet;

use scraper::Html;
use tracing::{debug, error, info, warn};

use crate::config::{Config, Layout, Pagination};
use crate::parse::{create_selector, resolve, ListingPage};
use crate::request::Fetch;
use crate::Result;

const START_PAGE: usize = 1;

enum State {
    Numeric { index: usize },
    Link {
        next: Option<String>,
        visited: HashSet<String>,
    },
    Done,
}

/// Pull-based, finite walk over the listing pages of a blog.
///
/// Once [`PageCursor::next_page`] returns `Ok(None)` the cursor is exhausted for good.
/// A failed request ends the walk instead of surfacing as an error, an unusable `href` on
/// a "next" anchor does not.
pub struct PageCursor<'a, F: ?Sized> {
    fetcher: &'a F,
    root: String,
    layout: Layout,
    max_pages: Option<usize>,
    yielded: usize,
    state: State,
}

impl<'a, F: Fetch + ?Sized> PageCursor<'a, F> {
    pub fn new(config: &Config, fetcher: &'a F) -> Self {
        let state = match config.pagination {
            Pagination::Numeric => State::Numeric { index: START_PAGE },
            Pagination::NextLink => State::Link {
                next: Some(config.root_url.clone()),
                visited: HashSet::new(),
            },
        };
        Self {
            fetcher,
            root: config.root_url.clone(),
            layout: config.layout,
            max_pages: config.max_pages,
            yielded: 0,
            state,
        }
    }

    /// Number of pages handed out so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    pub async fn next_page(&mut self) -> Result<Option<ListingPage>> {
        if self.max_pages.is_some_and(|max| self.yielded >= max) {
            debug!(pages = self.yielded, "page limit reached");
            self.state = State::Done;
        }

        let page = match self.state {
            State::Numeric { index } => self.next_numeric(index).await,
            State::Link { .. } => self.next_linked().await?,
            State::Done => None,
        };

        match page {
            Some(_) => self.yielded += 1,
            None => self.state = State::Done,
        }
        Ok(page)
    }

    async fn next_numeric(&mut self, index: usize) -> Option<ListingPage> {
        let url = page_url(&self.root, index);
        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(err) => {
                error!(url = %url, error = %err, "listing request failed");
                return None;
            }
        };

        if html.trim().is_empty() {
            info!(url = %url, "empty listing page, stopping");
            return None;
        }
        let elements = count_elements(&html);
        debug!(url = %url, elements, "fetched listing page");
        if elements <= 1 {
            info!(url = %url, "degenerate listing page, stopping");
            return None;
        }

        self.state = State::Numeric { index: index + 1 };
        Some(ListingPage { url, html })
    }

    async fn next_linked(&mut self) -> Result<Option<ListingPage>> {
        let State::Link { next, visited } = &mut self.state else {
            return Ok(None);
        };
        let Some(url) = next.take() else {
            return Ok(None);
        };

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(err) => {
                error!(url = %url, error = %err, "listing request failed");
                return Ok(None);
            }
        };
        visited.insert(url.clone());

        *next = match next_link(&html, &url, self.layout)? {
            Some(link) if visited.contains(&link) => {
                warn!(url = %url, next = %link, "next link points back to a visited page, stopping");
                None
            }
            Some(link) => {
                debug!(url = %url, next = %link, "found next link");
                Some(link)
            }
            None => {
                info!(url = %url, "no next link, last listing page");
                None
            }
        };
        Ok(Some(ListingPage { url, html }))
    }
}

/// `{root}/{index}`
fn page_url(root: &str, index: usize) -> String {
    format!("{}/{index}", root.trim_end_matches('/'))
}

/// Elements besides the `html`, `head` and `body` every parsed document gets.
fn count_elements(html: &str) -> usize {
    let doc = Html::parse_document(html);
    doc.tree
        .nodes()
        .filter_map(|node| node.value().as_element())
        .filter(|el| !matches!(el.name(), "html" | "head" | "body"))
        .count()
}

/// Resolved target of the page's "next" anchor, if it has one.
fn next_link(html: &str, page_url: &str, layout: Layout) -> Result<Option<String>> {
    let selector = match layout {
        Layout::Articles => create_selector(r#"a[rel~="next"][href]"#)?,
        Layout::Previews => create_selector(
            r#"a[rel~="next"][href], .pager .next a[href], .nav-previous a[href]"#,
        )?,
    };
    let doc = Html::parse_document(html);
    let href = doc
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty());

    href.map(|href| resolve(page_url, href)).transpose()
}
