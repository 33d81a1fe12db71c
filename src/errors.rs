//! Errors for the train data updater
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status} for {endpoint}")]
    HttpStatus {
        status: reqwest::StatusCode,
        endpoint: String,
    },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("GraphQL errors: {0}")]
    GraphQlErrors(String),

    #[error("Invalid trip id: {0:?}")]
    InvalidTripId(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Could not publish snapshot to {path}: {origin}")]
    PublishError { path: PathBuf, origin: std::io::Error },
}
