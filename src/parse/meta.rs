use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::DateLocale;
use crate::record::PostDate;
use crate::{Error, Result};

const META_DELIMITER: char = '|';
const RATING_GLYPH: char = '●';
const ITALIAN_MONTHS: [(&str, &str); 12] = [
    ("gennaio", "january"),
    ("febbraio", "february"),
    ("marzo", "march"),
    ("aprile", "april"),
    ("maggio", "may"),
    ("giugno", "june"),
    ("luglio", "july"),
    ("agosto", "august"),
    ("settembre", "september"),
    ("ottobre", "october"),
    ("novembre", "november"),
    ("dicembre", "december"),
];

impl DateLocale {
    /// Word used instead of a number when a post has no comments.
    fn none_term(self) -> &'static str {
        match self {
            DateLocale::It => "nessun",
            DateLocale::En => "no",
        }
    }

    /// Rewrites localized month names into the English ones `chrono` understands.
    fn normalize_months(self, text: &str) -> String {
        let text = text.to_lowercase();
        match self {
            DateLocale::It => ITALIAN_MONTHS
                .iter()
                .fold(text, |acc, &(it, en)| acc.replace(it, en)),
            DateLocale::En => text,
        }
    }
}

/// Fields of a composite `date | comments | rating` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Meta {
    pub date: Option<NaiveDate>,
    pub comments: Option<u32>,
    pub rating: Option<u32>,
}

/// Splits a composite meta line into its positional segments.
/// Missing or blank segments stay `None`, malformed ones are errors.
pub fn parse_meta(text: &str, locale: DateLocale) -> Result<Meta> {
    let mut segments = text
        .split(META_DELIMITER)
        .map(str::trim)
        .map(|s| (!s.is_empty()).then_some(s));

    let date = segments.next().flatten();
    let comments = segments.next().flatten();
    let rating = segments.next().flatten();

    Ok(Meta {
        date: date.map(|d| parse_date(d, locale)).transpose()?,
        comments: comments
            .map(|c| parse_comment_count(c, locale))
            .transpose()?,
        rating: rating.map(count_rating),
    })
}

/// Parses `12 gennaio, 2020` or `12 January, 2020`.
pub fn parse_date(text: &str, locale: DateLocale) -> Result<NaiveDate> {
    let normalized = locale.normalize_months(text.trim());
    NaiveDate::parse_from_str(&normalized, "%d %B, %Y")
        .or_else(|_| NaiveDate::parse_from_str(&normalized, "%d %B %Y"))
        .map_err(|source| Error::InvalidDate {
            input: text.to_string(),
            source,
        })
}

/// Parses the `content` of a `datePublished` meta tag: RFC 3339, a local date and time, or a
/// bare `YYYY-MM-DD`. Time of day and offset are kept when present.
pub fn parse_iso_date(text: &str) -> Result<PostDate> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(PostDate::Timestamp(dt));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(PostDate::Local(dt));
        }
    }
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(PostDate::Day)
        .map_err(|source| Error::InvalidDate {
            input: text.to_string(),
            source,
        })
}

/// `3 commenti` is 3, `Nessun commento` is 0.
pub fn parse_comment_count(text: &str, locale: DateLocale) -> Result<u32> {
    let lower = text.trim().to_lowercase();
    let count = lower.split_whitespace().next().unwrap_or_default();
    if count == locale.none_term() {
        return Ok(0);
    }
    count
        .parse()
        .map_err(|source| Error::InvalidCommentCount {
            input: text.to_string(),
            source,
        })
}

pub fn count_rating(text: &str) -> u32 {
    text.chars().filter(|c| *c == RATING_GLYPH).count() as u32
}
