//! # Index-crawler CLI
//!
//! Command-line interface for the index-crawler library.
//! Provides a wget-like interface for mirroring HTTP directory listings.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use index_crawler::{CrawlOptions, TransportConfig};
use log::{error, LevelFilter};
use url::Url;

mod cli;

/// Command-line interface for index-crawler
#[derive(Parser)]
#[command(name = "index-crawler")]
#[command(about = "Mirror HTTP directory listings (\"Index of ...\") to local storage")]
#[command(long_about = "Downloads a single file, or recursively mirrors a directory listing:
  index-crawler http://host/pub/file.iso            # Save file.iso in the current directory
  index-crawler http://host/pub/ mirror             # Recreate /pub/ under ./mirror
  index-crawler http://host/pub/ --dry-run          # Show what would be downloaded

Entries that cannot be reached are skipped; any other error stops the crawl.")]
#[command(version = env!("INDEX_CRAWLER_VERSION"))]
struct Cli {
    /// URL of a file or of a directory listing page
    url: String,

    /// Destination path (defaults to the last path segment of the URL)
    output: Option<String>,

    /// Walk the remote tree without creating directories or downloading files
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Overall per-request timeout in seconds (0 disables it)
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = 10)]
    connect_timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,
}

impl Cli {
    fn transport_config(&self) -> TransportConfig {
        let mut config = TransportConfig {
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            ..Default::default()
        };
        if let Some(ref user_agent) = self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }
}

/// Resolve the destination path from CLI arguments
fn resolve_output(target_url: &Url, output: Option<&str>) -> String {
    match output {
        Some(path) if !path.is_empty() => path.to_string(),
        _ => index_crawler::default_destination(target_url),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr; RUST_LOG takes precedence over --verbose
    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🕸️  Index-crawler v{} starting...", env!("INDEX_CRAWLER_VERSION"));
    }

    let url = Url::parse(cli.url.trim())
        .with_context(|| format!("'{}' is not an absolute URL", cli.url))?;
    let output = resolve_output(&url, cli.output.as_deref());

    if cli.dry_run {
        eprintln!("🔍 [DRY RUN] Would mirror: {} to {output}", url);
    } else {
        eprintln!("📁 Saving to: {output}");
    }

    let progress = cli::ProgressManager::new(&format!("🌐 Crawling {}", url));
    let options = CrawlOptions {
        dry_run: cli.dry_run,
        on_event: Some(progress.callback()),
    };

    let result =
        index_crawler::download_with_options(url.as_str(), &output, &cli.transport_config(), options).await;

    match result {
        Ok(()) => {
            progress.finish();
            Ok(())
        }
        Err(e) => {
            progress.pb.abandon();
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_auto() {
        let url = Url::parse("http://host/pub/linux/").unwrap();
        assert_eq!(resolve_output(&url, None), "linux");
        assert_eq!(resolve_output(&url, Some("")), "linux");
    }

    #[test]
    fn test_resolve_output_custom() {
        let url = Url::parse("http://host/pub/linux/").unwrap();
        assert_eq!(resolve_output(&url, Some("mirror")), "mirror");
    }

    #[test]
    fn test_transport_config_from_flags() {
        let cli = Cli::parse_from([
            "index-crawler",
            "http://host/",
            "--timeout",
            "0",
            "--connect-timeout",
            "3",
            "--user-agent",
            "mirror-bot/1.0",
        ]);
        let config = cli.transport_config();

        assert_eq!(config.timeout, None);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "mirror-bot/1.0");
    }
}
