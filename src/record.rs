use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Columns in the order they are written. Only the ones some record actually
/// carries end up in the output.
pub const COLUMNS: [&str; 9] = [
    "url",
    "title",
    "author",
    "date",
    "subtitle",
    "comments",
    "rating",
    "post",
    "post_markdown",
];

/// Publication date of a post, as precise as the page states it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostDate {
    Day(NaiveDate),
    Local(NaiveDateTime),
    Timestamp(DateTime<FixedOffset>),
}

impl PostDate {
    pub fn day(&self) -> NaiveDate {
        match self {
            PostDate::Day(day) => *day,
            PostDate::Local(dt) => dt.date(),
            PostDate::Timestamp(dt) => dt.date_naive(),
        }
    }
}

impl From<NaiveDate> for PostDate {
    fn from(day: NaiveDate) -> Self {
        PostDate::Day(day)
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostDate::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
            PostDate::Local(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            PostDate::Timestamp(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%:z")),
        }
    }
}

/// One post preview found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub url: String,
    pub title: String,
    pub author: Option<String>,
    pub date: Option<PostDate>,
    pub subtitle: Option<String>,
    pub comments: Option<u32>,
    pub rating: Option<u32>,
}

impl PostRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            author: None,
            date: None,
            subtitle: None,
            comments: None,
            rating: None,
        }
    }
}

/// A `PostRecord` with its fetched and converted article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPost {
    pub record: PostRecord,
    /// Article body markup.
    pub post: String,
    pub post_markdown: String,
}

impl EnrichedPost {
    /// Value of a column from `COLUMNS`, `None` when the record has no such field.
    pub fn field(&self, column: &str) -> Option<String> {
        let record = &self.record;
        match column {
            "url" => Some(record.url.clone()),
            "title" => Some(record.title.clone()),
            "author" => record.author.clone(),
            "date" => record.date.map(|d| d.to_string()),
            "subtitle" => record.subtitle.clone(),
            "comments" => record.comments.map(|c| c.to_string()),
            "rating" => record.rating.map(|r| r.to_string()),
            "post" => Some(self.post.clone()),
            "post_markdown" => Some(self.post_markdown.clone()),
            _ => None,
        }
    }
}

/// Union of the fields present across `posts`, in `COLUMNS` order.
/// The always-present columns are kept even for an empty set.
pub fn columns(posts: &[EnrichedPost]) -> Vec<&'static str> {
    COLUMNS
        .into_iter()
        .filter(|col| {
            matches!(*col, "url" | "title" | "post" | "post_markdown")
                || posts.iter().any(|p| p.field(col).is_some())
        })
        .collect()
}
