//! Error types for VTN client operations

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for VTN client operations
pub type Result<T> = std::result::Result<T, ToadrClientError>;

/// Error response from a VTN or token provider
///
/// Carries everything the server sent back so callers can inspect the raw
/// problem body or headers.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ToadrError {
    /// Short description, built from the problem title and detail
    pub message: String,
    /// HTTP status code of the response
    pub status_code: u16,
    /// Canonical reason phrase of the status code
    pub reason: String,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded JSON body, `Null` if the body was not JSON
    pub json_response: serde_json::Value,
}

impl ToadrError {
    pub fn new(
        message: impl Into<String>,
        status: StatusCode,
        headers: HeaderMap,
        json_response: serde_json::Value,
    ) -> Self {
        Self {
            message: message.into(),
            status_code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            json_response,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status_code).ok()
    }
}

/// Errors that can occur during VTN client operations
#[derive(Error, Debug)]
pub enum ToadrClientError {
    /// Arguments were rejected before anything was sent
    #[error("{0}")]
    Validation(String),

    /// The VTN or token provider answered with an error status
    #[error(transparent)]
    Api(#[from] ToadrError),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected record schema
    #[error("Schema error: {0}")]
    Schema(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Header name or value could not be sent
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The client was closed
    #[error("Client is closed")]
    ClientClosed,

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ToadrClientError {
    /// The API error, if the server answered with an error status
    pub fn api_error(&self) -> Option<&ToadrError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of an API error
    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(|err| err.status_code)
    }

    /// True if the server answered 404
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}
