use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use impresascope::aspect::Aspect;
use impresascope::config::AppConfig;
use impresascope::engine::{CancellationToken, ResearchEngine};
use impresascope::export::{ExportFormat, ExportManager};
use impresascope::fetch::HttpFetcher;

/// Research an Italian company across financial, digital, competitor,
/// social and profile aspects.
#[derive(Parser, Debug)]
#[command(name = "impresascope", version, about)]
struct Cli {
    /// Company name to research
    company: String,

    /// Comma-separated aspects to run (default: all).
    /// Values: financial, digital, competitor, social, company_profile
    #[arg(long, value_delimiter = ',')]
    aspects: Option<Vec<String>>,

    /// Output format: json, csv or markdown
    #[arg(long)]
    format: Option<String>,

    /// Output file path; prints to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Abort in-flight work after this many seconds
    #[arg(long)]
    timeout_seconds: Option<u64>,

    /// Alternative configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path).await?,
        None => AppConfig::load().await?,
    };

    impresascope::logging::init_logging(&config.logging)?;
    info!("Starting impresascope v{}", env!("CARGO_PKG_VERSION"));

    let aspects = parse_aspects(cli.aspects.as_deref())?;
    let format = ExportFormat::from_name(
        cli.format.as_deref().unwrap_or(&config.export.default_format),
    )?;

    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);
    let engine = ResearchEngine::new(&config, fetcher)?;

    let record = match cli.timeout_seconds {
        Some(seconds) => {
            engine
                .analyze_with_timeout(&cli.company, &aspects, Duration::from_secs(seconds))
                .await?
        }
        None => {
            engine
                .analyze(&cli.company, &aspects, &CancellationToken::new())
                .await?
        }
    };

    if !record.failed_aspects.is_empty() {
        for failure in &record.failed_aspects {
            eprintln!("aspect {} failed: {}", failure.aspect, failure.reason);
        }
    }

    let manager = ExportManager::new(&config.export);
    match cli.output {
        Some(path) => {
            let stats = manager.export(&record, &path, format).await?;
            println!(
                "Wrote {} ({} bytes, score {:.2}, {})",
                path.display(),
                stats.file_size_bytes,
                record.overall_score,
                record.quality
            );
        }
        None => {
            println!("{}", ExportManager::render(&record, format)?);
        }
    }

    Ok(())
}

fn parse_aspects(names: Option<&[String]>) -> Result<Vec<Aspect>> {
    match names {
        None => Ok(Aspect::ALL.to_vec()),
        Some(names) => names
            .iter()
            .map(|name| {
                Aspect::from_name(name).ok_or_else(|| anyhow!("unknown aspect: {}", name))
            })
            .collect(),
    }
}
