//! FLOC-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, FlocateError>;

/// Top-level error type for flocate.
#[derive(Debug, Error)]
pub enum FlocateError {
    #[error("[FLOC-1001] expected an existing directory at {path}")]
    InvalidRoot { path: PathBuf },

    #[error("[FLOC-2001] malformed index: {details}")]
    IndexFormat { details: String },

    #[error("[FLOC-2002] index capacity exceeded: {what} does not fit in 32 bits")]
    IndexFull { what: &'static str },

    #[error("[FLOC-3001] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FLOC-3002] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[FLOC-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl FlocateError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRoot { .. } => "FLOC-1001",
            Self::IndexFormat { .. } => "FLOC-2001",
            Self::IndexFull { .. } => "FLOC-2002",
            Self::Io { .. } => "FLOC-3001",
            Self::ChannelClosed { .. } => "FLOC-3002",
            Self::Runtime { .. } => "FLOC-3900",
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for format errors.
    #[must_use]
    pub fn format(details: impl Into<String>) -> Self {
        Self::IndexFormat {
            details: details.into(),
        }
    }
}
