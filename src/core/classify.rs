//! URL classification
//!
//! Decides whether a URL is a file to download, a listing page to descend
//! into, or something that cannot be reached at all.
//!
//! The extension fast path is a heuristic: an extensionless file is treated
//! as a directory candidate, and a directory whose name contains a dot is
//! treated as a file. Both are kept as-is for compatibility with existing
//! mirrors.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use url::{Position, Url};

use crate::core::listing::ListingPage;
use crate::core::target::UrlKind;
use crate::core::transport::Transport;

/// A literal dot followed by ASCII word characters at the end of a segment
static FILE_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[A-Za-z0-9_]+$").expect("valid extension pattern"));

/// True when the final path segment of `url` looks like `name.ext`.
pub fn has_file_extension(url: &Url) -> bool {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .is_some_and(|last| FILE_EXTENSION.is_match(last))
}

/// True when the page title announces a listing of `url`,
/// i.e. contains `Index of <percent-decoded path?query#fragment>`.
///
/// Query and fragment stay in the needle: a sort link such as
/// `/pub/?C=N;O=D` serves the `/pub/` listing again and must not be
/// mistaken for a subdirectory.
pub fn is_index_of(url: &Url, page: &ListingPage) -> bool {
    let location = &url[Position::BeforePath..];
    let location =
        String::from_utf8_lossy(&urlencoding::decode_binary(location.as_bytes())).into_owned();
    let needle = format!("Index of {location}");

    page.title().is_some_and(|title| title.contains(&needle))
}

/// Classifies `url`, fetching it at most once.
pub async fn classify<T: Transport>(transport: &T, url: &Url) -> UrlKind {
    if has_file_extension(url) {
        debug!("{url}: file (extension)");
        return UrlKind::File;
    }

    let body = match transport.fetch_page(url).await {
        Ok(body) => body,
        Err(e) => {
            debug!("{url}: unreachable ({e})");
            return UrlKind::Unreachable;
        }
    };

    if is_index_of(url, &ListingPage::parse(&body)) {
        debug!("{url}: directory");
        UrlKind::Directory
    } else {
        debug!("{url}: file (not a listing)");
        UrlKind::File
    }
}
