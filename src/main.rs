use blogmirror::config::LogLevel;
use blogmirror::progress::LogWriter;
use blogmirror::{info_time, process_site, Args, Config, HttpFetcher, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level);

    let start_time = Local::now();
    let config = Config::from(args);
    let fetcher = HttpFetcher::new()?;
    process_site(&config, &fetcher).await?;
    info_time!(start_time, "Full program time:");

    Ok(())
}

/// `--log-level` wins over `RUST_LOG`, which wins over `info`.
fn init_tracing(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.as_filter()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(LogWriter::stderr)
        .init();
}
