//! Content error types
//!
//! Loading errors are fatal only at startup; render errors are per page and
//! the aggregation policy decides whether they fail a request.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while loading the documentation tree
#[derive(Debug, Error)]
pub enum ContentError {
    /// Content directory missing or unreadable
    #[error("Content directory not readable: {path}: {source}")]
    DirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Single file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frontmatter opened with `---` but never closed
    #[error("Unterminated frontmatter in {0}")]
    UnterminatedFrontmatter(PathBuf),
}

/// Error raised while rendering a page to text
#[derive(Debug, Error)]
pub enum RenderError {
    /// Malformed MDX (unbalanced component tags and the like)
    #[error("Malformed content in {url}: {reason}")]
    Malformed { url: String, reason: String },

    /// `<include>` target could not be read
    #[error("Cannot read include {target} in {url}: {source}")]
    Include {
        url: String,
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Page has no source file to resolve includes against
    #[error("Include without source file in {0}")]
    NoSourceFile(String),
}

impl RenderError {
    pub fn malformed(url: &str, reason: impl Into<String>) -> Self {
        RenderError::Malformed {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for content loading
pub type Result<T> = std::result::Result<T, ContentError>;

/// Result alias for page rendering
pub type RenderResult<T> = std::result::Result<T, RenderError>;
