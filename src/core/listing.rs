//! Directory listing extraction
//!
//! Turns an auto-generated "Index of ..." page into child crawl targets.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::core::error::{Error, Result};
use crate::core::target::CrawlTarget;
use crate::core::transport::Transport;

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("html > head > title").expect("valid title selector"));

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid anchor selector"));

/// Hrefs a listing uses for "this directory" and "parent directory"
const NAVIGATIONAL_HREFS: [&str; 2] = ["./", "../"];

/// A hyperlink found in a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

/// A parsed HTML page
pub struct ListingPage {
    document: Html,
}

impl ListingPage {
    pub fn parse(body: &str) -> Self {
        Self {
            document: Html::parse_document(body),
        }
    }

    /// Text content of the document title, if there is one
    pub fn title(&self) -> Option<String> {
        self.document
            .select(&TITLE)
            .next()
            .map(|title| title.text().collect())
    }

    /// Anchors carrying an `href`, in document order.
    ///
    /// `text` joins every descendant text node, so `<a href="x"><b>x</b></a>`
    /// still yields `x` rather than only the text before the first child.
    pub fn anchors(&self) -> impl Iterator<Item = Anchor> + '_ {
        self.document.select(&ANCHOR).filter_map(|a| {
            let href = a.value().attr("href")?;
            Some(Anchor {
                href: href.to_string(),
                text: a.text().collect(),
            })
        })
    }
}

/// Returns `url` with a path guaranteed to end in `/`, so relative hrefs
/// resolve inside the directory rather than beside it.
pub fn normalize_base(url: &Url) -> Url {
    let mut base = url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// Reduces anchor text to a single local path component.
///
/// Listings commonly render directories as `name/`; one trailing slash is
/// dropped. Anything that could leave the parent directory is rejected.
fn local_name(text: &str) -> Option<&str> {
    let name = text.trim();
    let name = name.strip_suffix('/').unwrap_or(name);

    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    if name.contains('/') || name.contains('\\') || Path::new(name).is_absolute() {
        return None;
    }
    Some(name)
}

/// Child targets of one directory, backed by its parsed listing page
pub struct DirectoryListing {
    page: ListingPage,
    base: Url,
    path: PathBuf,
}

impl DirectoryListing {
    pub fn new(page: ListingPage, url: &Url, path: impl Into<PathBuf>) -> Self {
        Self {
            page,
            base: normalize_base(url),
            path: path.into(),
        }
    }

    /// The slash-normalized directory URL children are resolved against
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Yields `(child url, child path)` pairs in document order, skipping
    /// navigational anchors. Each call recomputes the sequence from the page.
    pub fn targets(&self) -> impl Iterator<Item = CrawlTarget> + '_ {
        self.page.anchors().filter_map(move |anchor| {
            if NAVIGATIONAL_HREFS.contains(&anchor.href.as_str()) {
                return None;
            }

            let url = match self.base.join(&anchor.href) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping unresolvable link '{}' in {}: {e}", anchor.href, self.base);
                    return None;
                }
            };

            let Some(name) = local_name(&anchor.text) else {
                warn!(
                    "Skipping link '{}' in {}: text '{}' is not a usable file name",
                    anchor.href, self.base, anchor.text
                );
                return None;
            };

            Some(CrawlTarget::new(url, self.path.join(name)))
        })
    }
}

/// Fetches the listing page at `url` and prepares its child targets under `path`.
///
/// The caller has already classified `url` as a directory, so any failure
/// here is a hard error.
pub async fn list_directory<T: Transport>(
    transport: &T,
    url: &Url,
    path: &Path,
) -> Result<DirectoryListing> {
    debug!("Listing {url}");
    let body = transport
        .fetch_page(url)
        .await
        .map_err(|e| Error::listing_fetch(url.as_str(), e))?;

    Ok(DirectoryListing::new(ListingPage::parse(&body), url, path))
}
