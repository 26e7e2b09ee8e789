//! @ai:module:intent Define error types for the stub catalog compiler
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all catalog operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest not found: {0}")]
    ManifestMissing(PathBuf),

    #[error("Invalid manifest {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("Stub root not found: {0}")]
    StubRootMissing(PathBuf),

    #[error("Parse error at {file}:{line}: {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Version lookup failed for {distribution}: {message}")]
    VersionLookup {
        distribution: String,
        message: String,
    },

    #[error("Invalid configuration {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Failed to load stub grammar: {0}")]
    Grammar(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// @ai:intent Check whether the error stops the whole run
    /// @ai:effects pure
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ManifestMissing(_)
                | Error::ManifestInvalid { .. }
                | Error::Config { .. }
                | Error::Grammar(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
