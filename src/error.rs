//! Errors raised by the helpers

use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Expected a textual value, got {value:?}")]
    TypeMismatch { value: String },

    #[error("'{key}' is missing.")]
    ConfigurationMissing { key: String },
    #[error("'{key}' contains only white space.")]
    ConfigurationInvalid { key: String },
    #[error("'{key}' is not a valid environment variable name")]
    InvalidEnvKey { key: String },
    #[error("'{key}' is not valid unicode")]
    EnvNotUnicode { key: String },

    #[error("Failed to fetch {url}: {status}, {body}")]
    FetchFailure {
        url: String,
        status: u16,
        body: String,
    },
    #[error("No assets found in release {tag}")]
    NoAssetsFound { tag: String },
    #[error("Malformed release metadata from {url}: {reason}")]
    MalformedRelease { url: String, reason: String },
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
