//! Formcast: a form schema extractor and bulk submission dispatcher
//!
//! This crate reads the public page of a form, recovers its question schema
//! from the page's embedded data blob, synthesizes answer payloads and submits
//! them through a bounded pool of workers with per-request retry and backoff.

pub mod answers;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod report;
pub mod schema;
pub mod synth;

use thiserror::Error;

/// Errors raised while retrieving the form page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid form URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Rate limited by {url} (429). Wait a few hours (up to 24h) before trying again")]
    RateLimited { url: String },

    #[error("Server returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Errors raised while decoding the embedded schema blob
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Could not find form data in page source")]
    BlobNotFound,

    #[error("Malformed form data JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected form data shape at {path}: expected {expected}")]
    Shape { path: String, expected: &'static str },
}

/// Failure of a whole extraction; no schema is produced
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for extraction
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use answers::{AnswerValue, OverrideMap};
pub use config::Config;
pub use dispatch::{Dispatcher, Outcome, ProgressObserver, RunStats};
pub use schema::{extract, FormSchema, Question, QuestionKind};
pub use synth::{SubmissionPayload, Synthesizer};
