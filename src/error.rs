use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("Missing {what} on page {url}")]
    MissingElement { what: &'static str, url: String },
    #[error("Couldn't parse date {input:?}: {source}")]
    InvalidDate {
        input: String,
        source: chrono::ParseError,
    },
    #[error("Couldn't parse comment count {input:?}: {source}")]
    InvalidCommentCount {
        input: String,
        source: std::num::ParseIntError,
    },
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("No article body found on post page {url}")]
    Extraction { url: String },
    #[error("Markdown conversion failed: {0}")]
    Conversion(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },
}

impl Error {
    /// True for failures of the fetch itself, as opposed to what was fetched.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Reqwest(_) | Error::Http { .. })
    }
}
