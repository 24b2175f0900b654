use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::record::{columns, EnrichedPost};
use crate::{Error, Result};

/// Writes `posts` as a gzip-compressed CSV, one row per post.
/// Fields a post doesn't have are left empty. Returns the number of rows written.
pub fn write_posts(path: &Path, posts: &[EnrichedPost]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut writer = csv::Writer::from_writer(encoder);

    let columns = columns(posts);
    writer.write_record(&columns)?;
    for post in posts {
        writer.write_record(columns.iter().map(|col| post.field(col).unwrap_or_default()))?;
    }

    let encoder = writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))?;
    encoder.finish()?.flush()?;

    Ok(posts.len())
}
