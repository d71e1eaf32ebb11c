//! Error types for index-crawler
//!
//! Hard errors abort the whole traversal. An unreachable URL is not an error:
//! the classifier reports it as `UrlKind::Unreachable` and the branch is pruned.

use std::fmt;
use std::path::PathBuf;

/// Why a file transfer failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferReason {
    /// The body ended before `Content-Length` bytes arrived
    ShortContent,
    /// Any other transport or filesystem failure
    Other,
}

/// Main error type for index-crawler operations
#[derive(Debug)]
pub enum Error {
    /// Downloading a file to its destination failed
    Transfer {
        url: String,
        path: PathBuf,
        reason: TransferReason,
        cause: Box<Error>,
    },

    /// The destination directory could not be created, or a non-directory occupies it
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A URL already classified as a directory could not be fetched again for listing
    ListingFetch {
        url: String,
        cause: Box<Error>,
    },

    /// Fewer body bytes than announced by `Content-Length`
    ContentTooShort {
        expected: u64,
        received: u64,
    },

    /// HTTP-specific error (non-success status, malformed response)
    HttpError(String),

    /// Network connectivity issues (connect failure, timeout)
    NetworkError(String),

    /// File I/O error
    IoError(std::io::Error),

    /// Invalid URL or configuration
    InvalidInput(String),
}

impl Error {
    /// Wraps a transfer failure with the URL and destination it concerned.
    pub fn transfer(url: impl Into<String>, path: impl Into<PathBuf>, cause: Error) -> Self {
        let reason = match cause {
            Error::ContentTooShort { .. } => TransferReason::ShortContent,
            _ => TransferReason::Other,
        };
        Error::Transfer {
            url: url.into(),
            path: path.into(),
            reason,
            cause: Box::new(cause),
        }
    }

    /// Wraps a failure to re-fetch a directory listing.
    pub fn listing_fetch(url: impl Into<String>, cause: Error) -> Self {
        Error::ListingFetch {
            url: url.into(),
            cause: Box::new(cause),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transfer { url, path, reason: TransferReason::ShortContent, .. } => {
                write!(
                    f,
                    "Couldn't download file from '{}' to '{}': file content too short",
                    url,
                    path.display()
                )
            }
            Error::Transfer { url, path, reason: TransferReason::Other, cause } => {
                write!(
                    f,
                    "Couldn't download file from '{}' to '{}': {}",
                    url,
                    path.display(),
                    cause
                )
            }
            Error::DirectoryCreation { path, source } => {
                write!(f, "Couldn't create directory '{}': {}", path.display(), source)
            }
            Error::ListingFetch { url, cause } => {
                write!(f, "Couldn't list directory '{}': {}", url, cause)
            }
            Error::ContentTooShort { expected, received } => {
                write!(f, "Content too short: expected {} bytes, received {}", expected, received)
            }
            Error::HttpError(msg) => {
                write!(f, "HTTP error: {}", msg)
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transfer { cause, .. } | Error::ListingFetch { cause, .. } => Some(cause.as_ref()),
            Error::DirectoryCreation { source, .. } => Some(source),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidInput(err.to_string())
    }
}

/// Convenience result type for index-crawler operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_transfer_reason_from_cause() {
        let short = Error::transfer(
            "http://host/a.bin",
            "/tmp/out/a.bin",
            Error::ContentTooShort { expected: 10, received: 4 },
        );
        match short {
            Error::Transfer { reason, .. } => assert_eq!(reason, TransferReason::ShortContent),
            other => panic!("Expected Transfer, got {other:?}"),
        }

        let other = Error::transfer(
            "http://host/a.bin",
            "/tmp/out/a.bin",
            Error::HttpError("404 Not Found".to_string()),
        );
        match other {
            Error::Transfer { reason, .. } => assert_eq!(reason, TransferReason::Other),
            other => panic!("Expected Transfer, got {other:?}"),
        }
    }

    #[test]
    fn test_transfer_message_names_url_and_path() {
        let err = Error::transfer(
            "http://host/a.bin",
            "/tmp/out/a.bin",
            Error::HttpError("500 Internal Server Error".to_string()),
        );
        let message = err.to_string();
        assert!(message.contains("http://host/a.bin"));
        assert!(message.contains("/tmp/out/a.bin"));
        assert!(message.contains("500"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_short_content_message() {
        let err = Error::transfer(
            "http://host/a.bin",
            "/tmp/out/a.bin",
            Error::ContentTooShort { expected: 10, received: 4 },
        );
        assert!(err.to_string().contains("too short"));
    }
}
