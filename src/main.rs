// placescrape CLI: drive one extraction run over an input table of
// businesses, checkpointing after every record.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use placescrape::{RunDriver, ScrapeConfig};

#[derive(Parser, Debug)]
#[command(
    name = "placescrape",
    about = "Resumable extractor for map-style business listings"
)]
struct Cli {
    /// Input table (CSV with at least `name` and `address` columns).
    input: PathBuf,

    /// Checkpoint file, replaced atomically after each finished record.
    /// Loaded instead of the input when it already exists.
    #[arg(long, default_value = "places.checkpoint.csv")]
    checkpoint: PathBuf,

    /// Definitive output table.
    #[arg(long, default_value = "places.out.csv")]
    output: PathBuf,

    /// Append the audit log to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Browser binary to launch instead of auto-detecting one.
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Run the browser with a visible window.
    #[arg(long)]
    headed: bool,

    /// Review cap per record.
    #[arg(long, default_value_t = 300)]
    max_reviews: usize,

    /// Lower bound of the randomized inter-action delay, milliseconds.
    #[arg(long, default_value_t = 1_000)]
    min_delay_ms: u64,

    /// Upper bound of the randomized inter-action delay, milliseconds.
    #[arg(long, default_value_t = 5_000)]
    max_delay_ms: u64,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut builder = ScrapeConfig::builder(cli.input, cli.checkpoint, cli.output)
        .headless(!cli.headed)
        .max_reviews(cli.max_reviews)
        .action_delay_ms(cli.min_delay_ms, cli.max_delay_ms);
    if let Some(chrome) = cli.chrome {
        builder = builder.chrome_executable(chrome);
    }
    let config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    let summary = RunDriver::new(config).run().await?;
    info!(
        processed = summary.processed,
        not_matched = summary.not_matched,
        navigation_failed = summary.navigation_failed,
        skipped = summary.skipped,
        "done"
    );
    Ok(())
}
