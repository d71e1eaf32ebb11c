//! Recursive mirroring of directory listings
//!
//! `Crawler::download` classifies a URL and either saves it as a file or
//! recreates it as a directory and descends into every listed entry,
//! depth-first and one entry at a time. The first hard error aborts the
//! whole crawl.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use url::Url;

use crate::core::classify::classify;
use crate::core::error::{Error, Result};
use crate::core::listing::list_directory;
use crate::core::target::{CrawlTarget, UrlKind};
use crate::core::transport::Transport;

/// Something observable that happened during a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// A directory was created (or already existed) and is about to be listed
    DirectoryEntered { url: Url, path: PathBuf },
    /// A file was downloaded
    FileSaved { url: Url, path: PathBuf, bytes: u64 },
    /// A file would have been downloaded, but this is a dry run
    FileSkipped { url: Url, path: PathBuf },
    /// The URL could not be fetched and its branch was pruned
    Skipped { url: Url },
}

/// Event callback function type
pub type EventCallback = Arc<dyn Fn(&CrawlEvent) + Send + Sync>;

/// Options for crawl operations
#[derive(Clone, Default)]
pub struct CrawlOptions {
    /// Walk the remote tree without creating directories or downloading files
    pub dry_run: bool,

    /// Optional progress callback
    pub on_event: Option<EventCallback>,
}

/// Makes sure `path` is a directory, creating it and its parents if missing.
///
/// An existing non-directory at `path` is an error; it is never replaced.
pub async fn ensure_directory(path: &Path) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(Error::DirectoryCreation {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                ),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(Error::DirectoryCreation {
                path: path.to_path_buf(),
                source: e,
            });
        }
    }

    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| Error::DirectoryCreation {
            path: path.to_path_buf(),
            source,
        })
}

/// Mirrors remote listings through a `Transport`
pub struct Crawler<T> {
    transport: T,
    options: CrawlOptions,
}

impl<T: Transport> Crawler<T> {
    /// Create a crawler with default options
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, CrawlOptions::default())
    }

    /// Create a crawler with custom options
    pub fn with_options(transport: T, options: CrawlOptions) -> Self {
        Self { transport, options }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mirror `url` to `path`: a file is saved at `path`, a directory listing
    /// is recreated under it.
    pub async fn download(&self, url: &str, path: impl AsRef<Path>) -> Result<()> {
        let root = CrawlTarget::root(url, path)?;
        self.crawl(root).await
    }

    /// Process `root` and everything reachable below it.
    ///
    /// Children are pushed in reverse so they pop in document order, which
    /// keeps the visit order identical to a recursive depth-first walk.
    pub async fn crawl(&self, root: CrawlTarget) -> Result<()> {
        let mut pending = vec![root];

        while let Some(target) = pending.pop() {
            match classify(&self.transport, &target.url).await {
                UrlKind::Unreachable => {
                    debug!("Skipping unreachable {}", target.url);
                    self.emit(CrawlEvent::Skipped { url: target.url });
                }
                UrlKind::File => self.save_file(target).await?,
                UrlKind::Directory => {
                    if !self.options.dry_run {
                        ensure_directory(&target.path).await?;
                    }
                    info!("Entering {} -> {}", target.url, target.path.display());
                    self.emit(CrawlEvent::DirectoryEntered {
                        url: target.url.clone(),
                        path: target.path.clone(),
                    });

                    let listing = list_directory(&self.transport, &target.url, &target.path).await?;
                    let children: Vec<CrawlTarget> = listing.targets().collect();
                    debug!("{} entries in {}", children.len(), listing.base());
                    pending.extend(children.into_iter().rev());
                }
            }
        }

        Ok(())
    }

    async fn save_file(&self, target: CrawlTarget) -> Result<()> {
        let CrawlTarget { url, path } = target;

        if self.options.dry_run {
            info!("[DRY RUN] Would download {} -> {}", url, path.display());
            self.emit(CrawlEvent::FileSkipped { url, path });
            return Ok(());
        }

        let bytes = self
            .transport
            .fetch_to_file(&url, &path)
            .await
            .map_err(|e| Error::transfer(url.as_str(), &path, e))?;

        info!("Saved {} -> {} ({} bytes)", url, path.display(), bytes);
        self.emit(CrawlEvent::FileSaved { url, path, bytes });
        Ok(())
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(ref on_event) = self.options.on_event {
            on_event(&event);
        }
    }
}
