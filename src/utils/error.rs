// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 500 Internal Server Error

    #[error("Registry rate limit likely exceeded")]
    RateLimited,

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Fetch timed out: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Pattern '{name}' must have exactly {expected} capture group(s), found {found}")]
    PatternGroups {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid selector '{css}': {reason}")]
    Selector { css: String, reason: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Failure of a whole search call. Per-officer failures never surface here.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Could not fetch search results: {0}")]
    Fetch(#[from] FetchError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Extraction setup failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
