//! Error types for pagetrack.
//!
//! Every failure is local to a single pagination request; nothing here is
//! fatal to the owning view.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by fetch collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the pagetrack library.
#[derive(Debug, Error)]
pub enum PageTrackError {
    // Fetch collaborator errors
    #[error("Fetch failed: {message}")]
    Fetch {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Request for page {page_number} was superseded by a newer request")]
    Superseded { page_number: usize },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Persistence errors
    #[error("Preference store error: {message}")]
    Store { message: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for pagetrack operations.
pub type Result<T> = std::result::Result<T, PageTrackError>;

impl From<std::io::Error> for PageTrackError {
    fn from(err: std::io::Error) -> Self {
        PageTrackError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for PageTrackError {
    fn from(err: serde_json::Error) -> Self {
        PageTrackError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for PageTrackError {
    fn from(err: rusqlite::Error) -> Self {
        PageTrackError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl PageTrackError {
    /// Create a fetch error from a plain message.
    pub fn fetch(message: impl Into<String>) -> Self {
        PageTrackError::Fetch {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an arbitrary collaborator error as a fetch failure.
    pub fn fetch_source(err: impl Into<BoxError>) -> Self {
        let source = err.into();
        PageTrackError::Fetch {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PageTrackError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        PageTrackError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Check if the caller may reasonably issue the same request again.
    ///
    /// The tracker itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PageTrackError::Fetch { .. } | PageTrackError::Superseded { .. }
        )
    }
}
