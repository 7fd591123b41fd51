//! Error types for the analyzer.

use thiserror::Error;

/// Failure to retrieve a page for URL analysis.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Content to analyze is empty")]
    EmptyText,
}

pub type Result<T> = std::result::Result<T, Error>;
