use scraper::{ElementRef, Html};

use super::{create_selector, PostPage};
use crate::{Error, Result};

const BODY_SELECTOR: &str = r#"[itemprop="articleBody"]"#;
const SHARE_SELECTOR: &str = ".share, .sharedaddy, .social-share, .condividi";

/// The article body of a post, as markup and as Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBody {
    pub html: String,
    pub markdown: String,
}

/// Locates the article body container, drops the share widgets nested in it and converts
/// what is left to Markdown.
pub fn extract_post(page: &PostPage) -> Result<PostBody> {
    let body_selector = create_selector(BODY_SELECTOR)?;
    let share_selector = create_selector(SHARE_SELECTOR)?;
    let no_body = || Error::Extraction {
        url: page.url.clone(),
    };

    let mut doc = Html::parse_document(&page.html);
    let (body_id, share_ids) = {
        let body = doc.select(&body_selector).next().ok_or_else(no_body)?;
        let shares = body
            .select(&share_selector)
            .map(|el| el.id())
            .collect::<Vec<_>>();
        (body.id(), shares)
    };

    for id in share_ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let body = doc
        .tree
        .get(body_id)
        .and_then(ElementRef::wrap)
        .ok_or_else(no_body)?;
    let html = body.html();
    let markdown = htmd::convert(&html).map_err(|e| Error::Conversion(e.to_string()))?;

    Ok(PostBody { html, markdown })
}
