use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::warn;

use crate::{Result, DEFAULT_ROOT_URL, FILE_PATH};

/// Mirror a paginated blog into a gzip-compressed CSV of Markdown posts.
#[derive(Debug, Parser)]
#[command(name = "blogmirror", version, about)]
pub struct Args {
    /// Listing endpoint of the blog.
    #[arg(default_value = DEFAULT_ROOT_URL)]
    pub root_url: String,

    /// Log level. Falls back to RUST_LOG, then `info`.
    #[arg(long, value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// How the listing pages are discovered.
    #[arg(long, value_enum, default_value_t = Pagination::Numeric)]
    pub pagination: Pagination,

    /// Markup layout of the blog.
    #[arg(long, value_enum, default_value_t = Layout::Articles)]
    pub layout: Layout,

    /// Language of the month names and comment counts in post metadata.
    #[arg(long, value_enum, default_value_t = DateLocale::It)]
    pub locale: DateLocale,

    /// What to do when a listing page or a post fails.
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Abort)]
    pub on_error: ErrorPolicy,

    /// Where the compressed CSV is written.
    #[arg(long, default_value = FILE_PATH)]
    pub output: PathBuf,

    /// Stop after this many listing pages.
    #[arg(long)]
    pub max_pages: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Pagination {
    /// `{root}/1`, `{root}/2`, ... until an empty or degenerate page.
    Numeric,
    /// Start at the root and follow the "next" anchor.
    NextLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// `article.articoli-item` previews with schema.org author/date meta tags.
    Articles,
    /// `div.post-preview` previews with a subtitle and a `date | comments | rating` line.
    Previews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateLocale {
    It,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicy {
    /// The first failing page or post ends the run, nothing is written.
    Abort,
    /// Failing pages and posts are logged and left out of the output.
    Skip,
}

impl ErrorPolicy {
    /// Applies the policy to one unit of work.
    /// `Ok(None)` means the failure was logged and the unit should be dropped.
    pub fn handle<T>(self, res: Result<T>, what: &str, url: &str) -> Result<Option<T>> {
        match res {
            Ok(value) => Ok(Some(value)),
            Err(err) if self == ErrorPolicy::Skip => {
                warn!(url, error = %err, "skipping {what}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Everything a run needs besides the fetcher.
#[derive(Debug, Clone)]
pub struct Config {
    pub root_url: String,
    pub pagination: Pagination,
    pub layout: Layout,
    pub locale: DateLocale,
    pub on_error: ErrorPolicy,
    pub output: PathBuf,
    pub max_pages: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            pagination: Pagination::Numeric,
            layout: Layout::Articles,
            locale: DateLocale::It,
            on_error: ErrorPolicy::Abort,
            output: PathBuf::from(FILE_PATH),
            max_pages: None,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            root_url: args.root_url,
            pagination: args.pagination,
            layout: args.layout,
            locale: args.locale,
            on_error: args.on_error,
            output: args.output,
            max_pages: args.max_pages,
        }
    }
}
