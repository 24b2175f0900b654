use scraper::Html;
use tracing::debug;

use super::meta::{parse_iso_date, parse_meta};
use super::{
    create_selector, optional_text, required_attr, required_text, resolve, select_first,
    ListingPage,
};
use crate::config::{DateLocale, Layout};
use crate::record::{PostDate, PostRecord};
use crate::{Result, PREVIEWS_PER_PAGE};

/// Extracts every post preview on a listing page, in page order.
/// A preview without a link or a title fails the whole page.
pub fn extract_listing(
    page: &ListingPage,
    layout: Layout,
    locale: DateLocale,
) -> Result<Vec<PostRecord>> {
    let doc = Html::parse_document(&page.html);
    let posts = match layout {
        Layout::Articles => extract_articles(&doc, &page.url)?,
        Layout::Previews => extract_previews(&doc, &page.url, locale)?,
    };
    debug!(url = %page.url, posts = posts.len(), "extracted listing");
    Ok(posts)
}

fn extract_articles(doc: &Html, url: &str) -> Result<Vec<PostRecord>> {
    let item_selector = create_selector("article.articoli-item")?;
    let title_selector = create_selector("h1.titolo")?;
    let link_selector = create_selector("a[href]")?;
    let author_selector = create_selector(r#"meta[itemprop="author"]"#)?;
    let date_selector = create_selector(r#"meta[itemprop="datePublished"]"#)?;

    let mut posts = Vec::with_capacity(PREVIEWS_PER_PAGE);
    for item in doc.select(&item_selector) {
        let heading = select_first(item, &title_selector, "preview title", url)?;
        let link = select_first(heading, &link_selector, "preview link", url)?;
        let href = required_attr(link, "href", "preview link", url)?;

        let mut record = PostRecord::new(
            resolve(url, href)?,
            required_text(heading, "preview title", url)?,
        );
        record.author = item
            .select(&author_selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .map(String::from);
        record.date = item
            .select(&date_selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(parse_iso_date)
            .transpose()?;

        posts.push(record);
    }
    Ok(posts)
}

fn extract_previews(doc: &Html, url: &str, locale: DateLocale) -> Result<Vec<PostRecord>> {
    let item_selector = create_selector("div.post-preview")?;
    let link_selector = create_selector("a[href]")?;
    let title_selector = create_selector(".post-title")?;
    let subtitle_selector = create_selector(".post-subtitle")?;
    let meta_selector = create_selector(".post-meta")?;

    let mut posts = Vec::with_capacity(PREVIEWS_PER_PAGE);
    for item in doc.select(&item_selector) {
        let link = select_first(item, &link_selector, "preview link", url)?;
        let href = required_attr(link, "href", "preview link", url)?;
        let heading = select_first(item, &title_selector, "preview title", url)?;

        let mut record = PostRecord::new(
            resolve(url, href)?,
            required_text(heading, "preview title", url)?,
        );
        record.subtitle = optional_text(item.select(&subtitle_selector).next());
        if let Some(line) = optional_text(item.select(&meta_selector).next()) {
            let meta = parse_meta(&line, locale)?;
            record.date = meta.date.map(PostDate::Day);
            record.comments = meta.comments;
            record.rating = meta.rating;
        }

        posts.push(record);
    }
    Ok(posts)
}
