//! CLI-specific progress handling for index-crawler
//!
//! Provides a spinner that tallies crawl events for the command-line interface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use index_crawler::{CrawlEvent, EventCallback};

/// Creates a spinner for CLI display
pub fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Failed to create progress style"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Running totals for a crawl
#[derive(Default)]
pub struct CrawlTally {
    pub directories: AtomicU64,
    pub files: AtomicU64,
    pub skipped: AtomicU64,
    pub bytes: AtomicU64,
}

impl CrawlTally {
    pub fn record(&self, event: &CrawlEvent) {
        match event {
            CrawlEvent::DirectoryEntered { .. } => {
                self.directories.fetch_add(1, Ordering::Relaxed);
            }
            CrawlEvent::FileSaved { bytes, .. } => {
                self.files.fetch_add(1, Ordering::Relaxed);
                self.bytes.fetch_add(*bytes, Ordering::Relaxed);
            }
            CrawlEvent::FileSkipped { .. } => {
                self.files.fetch_add(1, Ordering::Relaxed);
            }
            CrawlEvent::Skipped { .. } => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} directories, {} files ({}), {} unreachable",
            self.directories.load(Ordering::Relaxed),
            self.files.load(Ordering::Relaxed),
            HumanBytes(self.bytes.load(Ordering::Relaxed)),
            self.skipped.load(Ordering::Relaxed),
        )
    }
}

/// Progress manager for a crawl
pub struct ProgressManager {
    pub pb: ProgressBar,
    pub tally: Arc<CrawlTally>,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(message: &str) -> Self {
        let pb = create_spinner();

        // Print initial message to stderr
        eprintln!("{}", message);

        Self {
            pb,
            tally: Arc::new(CrawlTally::default()),
        }
    }

    /// Callback that updates the spinner for every crawl event
    pub fn callback(&self) -> EventCallback {
        let pb = self.pb.clone();
        let tally = Arc::clone(&self.tally);
        Arc::new(move |event: &CrawlEvent| {
            tally.record(event);
            let current = match event {
                CrawlEvent::DirectoryEntered { path, .. }
                | CrawlEvent::FileSaved { path, .. }
                | CrawlEvent::FileSkipped { path, .. } => path.display().to_string(),
                CrawlEvent::Skipped { url } => format!("skipped {url}"),
            };
            pb.set_message(format!("{} | {}", tally.summary(), current));
        })
    }

    pub fn finish(&self) {
        self.pb.finish_with_message(format!("✅ {}", self.tally.summary()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use url::Url;

    #[test]
    fn test_tally_counts_events() {
        let tally = CrawlTally::default();
        let url = Url::parse("http://host/a.txt").unwrap();

        tally.record(&CrawlEvent::DirectoryEntered {
            url: Url::parse("http://host/").unwrap(),
            path: PathBuf::from("out"),
        });
        tally.record(&CrawlEvent::FileSaved {
            url: url.clone(),
            path: PathBuf::from("out/a.txt"),
            bytes: 2048,
        });
        tally.record(&CrawlEvent::Skipped { url });

        assert_eq!(tally.directories.load(Ordering::Relaxed), 1);
        assert_eq!(tally.files.load(Ordering::Relaxed), 1);
        assert_eq!(tally.skipped.load(Ordering::Relaxed), 1);
        assert_eq!(tally.bytes.load(Ordering::Relaxed), 2048);
        assert!(tally.summary().starts_with("1 directories, 1 files"));
    }

    #[test]
    fn test_progress_manager_callback() {
        let manager = ProgressManager::new("Test crawl");
        let callback = manager.callback();

        callback(&CrawlEvent::FileSkipped {
            url: Url::parse("http://host/a.txt").unwrap(),
            path: PathBuf::from("out/a.txt"),
        });

        assert_eq!(manager.tally.files.load(Ordering::Relaxed), 1);
        manager.finish();
    }
}
