//! Progress bars and the log writer that keeps them intact.
//!
//! Bars and log lines share stderr. Every bar lives in one process-wide `MultiProgress`, and
//! [`LogWriter`] hides all of them while it writes a line, then redraws them below it.

use std::io::{self, Write};
use std::sync::OnceLock;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

static BARS: OnceLock<MultiProgress> = OnceLock::new();

fn bars() -> &'static MultiProgress {
    BARS.get_or_init(MultiProgress::new)
}

/// A bar registered with the shared `MultiProgress`.
/// Hidden automatically when stderr isn't a terminal.
pub(crate) fn progress_bar(len: usize, msg: &'static str) -> ProgressBar {
    let pb = bars().add(ProgressBar::new(len as u64).with_message(msg));
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg} [{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

pub(crate) fn finish(pb: &ProgressBar) {
    pb.finish_and_clear();
    bars().remove(pb);
}

/// `tracing-subscriber` writer that suspends the progress bars around every write.
/// ```ignore
/// tracing_subscriber::fmt().with_writer(LogWriter::stderr).init();
/// ```
pub struct LogWriter<W> {
    inner: W,
}

impl LogWriter<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> LogWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for LogWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        bars().suspend(|| inner.write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let inner = &mut self.inner;
        bars().suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        let inner = &mut self.inner;
        bars().suspend(|| inner.flush())
    }
}
