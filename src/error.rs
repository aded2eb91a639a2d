//! Unified error type for repowatch operations.

use thiserror::Error;

/// Main error type for repowatch operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WatchError {
    /// The operator-supplied reference URL could not be parsed.
    #[error("invalid reference URL '{url}': {reason}")]
    InvalidReference { url: String, reason: String },

    /// Snippet line bounds fall outside the fetched file.
    #[error("line range L{start}-L{end} is out of bounds for a {line_count}-line file")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        line_count: usize,
    },

    /// The branch returned zero commits at registration time.
    #[error("no commits found on {owner}/{repo}@{branch}")]
    EmptyHistory {
        owner: String,
        repo: String,
        branch: String,
    },

    /// The URL is already present in the monitored collection.
    #[error("already monitoring {0}")]
    DuplicateEntry(String),

    /// The URL is not present in the monitored collection.
    #[error("not monitoring {0}")]
    NotFound(String),

    /// Network failure, non-success status, or malformed response body.
    #[error("fetch failed for {context}: {message}")]
    Fetch { context: String, message: String },

    /// The notification template could not be rendered.
    #[error("template error: {0}")]
    Template(String),

    /// The webhook rejected or never received the rendered message.
    #[error("webhook delivery failed: {0}")]
    Delivery(String),

    /// The state document could not be read or written.
    #[error("state file error at {path}: {message}")]
    Persistence { path: String, message: String },
}

/// Convenient Result type for repowatch operations.
pub type Result<T> = std::result::Result<T, WatchError>;

impl WatchError {
    /// Create an `InvalidReference` error.
    pub fn invalid_reference(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a `Fetch` error with request context.
    pub fn fetch(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a `Persistence` error for a given path.
    pub fn persistence(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.into(),
        }
    }
}
