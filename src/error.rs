use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reading an asset (manifest or post markdown) from an [`AssetSource`].
///
/// [`AssetSource`]: crate::asset_source::AssetSource
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("access to asset forbidden: {0}")]
    Forbidden(String),

    #[error("error reading asset {0}: {1}")]
    Io(String, #[source] io::Error),
}

/// Failure loading the post manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not fetch manifest: {0}")]
    Fetch(#[from] FetchError),

    #[error("malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("post slug is empty")]
    Empty,

    #[error("post slug is malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HighlightError {
    #[error("no highlighting available for language {0}")]
    UnknownLanguage(String),

    #[error("highlighting failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error opening configuration file {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("error parsing configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}
