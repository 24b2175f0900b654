//! BLOG MIRROR
//! Walks a blog's listing pages, fetches every post it finds and stores the posts, converted
//! to Markdown, in one gzip-compressed CSV.
//!
//! The run is strictly sequential: listing pages, then post requests, then conversion, then
//! a single write.

mod macros;

pub mod config;
pub mod error;
pub mod output;
pub mod paginate;
pub mod parse;
pub mod process;
pub mod progress;
pub mod record;
pub mod request;

pub use config::{Args, Config};
pub use error::{Error, Result};
pub use process::{collect_posts, process_site, RunSummary};
pub use request::{Fetch, HttpFetcher};

pub const DEFAULT_ROOT_URL: &str = "http://ilpedante.info/home/loadArticoli";
pub const FILE_PATH: &str = "_posts/posts.csv.gz";
/// Capacity hint, listing pages rarely show more previews than this.
const PREVIEWS_PER_PAGE: usize = 10;
