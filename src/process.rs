use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Local;
use tokio::task::spawn_blocking;
use tracing::{debug, info};

use crate::config::Config;
use crate::output::write_posts;
use crate::paginate::PageCursor;
use crate::parse::{extract_listing, extract_post, PostPage};
use crate::progress::{finish, progress_bar};
use crate::record::{EnrichedPost, PostRecord};
use crate::request::Fetch;
use crate::{info_time, Result, PREVIEWS_PER_PAGE};

/// What a finished run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Listing pages walked.
    pub pages: usize,
    /// Posts that made it into the output.
    pub posts: usize,
    /// Listing pages and posts left out under the skip policy.
    pub skipped: usize,
    pub output: Option<PathBuf>,
}

/// Mirrors the blog described by `config` and writes the result to `config.output`.
/// Under the abort policy any failure discards the whole run and nothing is written.
pub async fn process_site<F: Fetch + ?Sized>(config: &Config, fetcher: &F) -> Result<RunSummary> {
    let start_time = Local::now();
    info_time!("Started mirroring {}", config.root_url);

    let (posts, mut summary) = collect_posts(config, fetcher).await?;
    info_time!(start_time, "Finished PROCESSING all posts.");

    let local_now = Local::now();
    let path = config.output.clone();
    let written = spawn_blocking({
        let path = path.clone();
        move || write_posts(&path, &posts)
    })
    .await??;
    info_time!(local_now, "Wrote {} posts to file: {}", written, path.display());

    summary.output = Some(path);
    info!(
        pages = summary.pages,
        posts = summary.posts,
        skipped = summary.skipped,
        "run finished"
    );
    Ok(summary)
}

/// Runs the three phases (listings, post requests, post extraction) without writing anything.
pub async fn collect_posts<F: Fetch + ?Sized>(
    config: &Config,
    fetcher: &F,
) -> Result<(Vec<EnrichedPost>, RunSummary)> {
    let mut summary = RunSummary::default();

    let records = collect_listings(config, fetcher, &mut summary).await?;
    let pages = fetch_posts(config, fetcher, records, &mut summary).await?;
    let posts = extract_posts(config, pages, &mut summary)?;

    summary.posts = posts.len();
    Ok((posts, summary))
}

/// Walks every listing page and gathers the previews in encounter order.
/// A URL already seen on an earlier page is dropped.
async fn collect_listings<F: Fetch + ?Sized>(
    config: &Config,
    fetcher: &F,
    summary: &mut RunSummary,
) -> Result<Vec<PostRecord>> {
    let start_time = Local::now();
    let mut cursor = PageCursor::new(config, fetcher);
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(PREVIEWS_PER_PAGE);

    while let Some(page) = cursor.next_page().await? {
        let listing = extract_listing(&page, config.layout, config.locale);
        let Some(listing) = config.on_error.handle(listing, "listing page", &page.url)? else {
            summary.skipped += 1;
            continue;
        };

        info!(url = %page.url, posts = listing.len(), "collected listing page");
        for record in listing {
            if seen.insert(record.url.clone()) {
                records.push(record);
            } else {
                debug!(url = %record.url, "post already listed, dropping");
            }
        }
    }
    summary.pages = cursor.yielded();

    info_time!(
        start_time,
        "Collected {} posts from {} listing pages.",
        records.len(),
        summary.pages
    );
    Ok(records)
}

/// One request per post, strictly one after the other.
async fn fetch_posts<F: Fetch + ?Sized>(
    config: &Config,
    fetcher: &F,
    records: Vec<PostRecord>,
    summary: &mut RunSummary,
) -> Result<Vec<(PostRecord, PostPage)>> {
    let pb = progress_bar(records.len(), "fetching posts");
    let mut pages = Vec::with_capacity(records.len());

    for record in records {
        let html = fetcher.fetch(&record.url).await;
        pb.inc(1);
        match config.on_error.handle(html, "post request", &record.url)? {
            Some(html) => {
                let page = PostPage {
                    url: record.url.clone(),
                    html,
                };
                pages.push((record, page));
            }
            None => summary.skipped += 1,
        }
    }

    finish(&pb);
    Ok(pages)
}

fn extract_posts(
    config: &Config,
    pages: Vec<(PostRecord, PostPage)>,
    summary: &mut RunSummary,
) -> Result<Vec<EnrichedPost>> {
    let pb = progress_bar(pages.len(), "converting posts");
    let mut posts = Vec::with_capacity(pages.len());

    for (record, page) in pages {
        let body = extract_post(&page);
        pb.inc(1);
        match config.on_error.handle(body, "post", &page.url)? {
            Some(body) => posts.push(EnrichedPost {
                record,
                post: body.html,
                post_markdown: body.markdown,
            }),
            None => summary.skipped += 1,
        }
    }

    finish(&pb);
    Ok(posts)
}
