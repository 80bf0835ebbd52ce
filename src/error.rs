use std::result;

use thiserror::Error;

/// Error types for PubMed search operations
///
/// Every failure of the remote E-utilities round trip (transport, status,
/// response parsing) is one of the remote variants below. Callers at the tool
/// boundary only ever render the message, so no variant is retried.
#[derive(Error, Debug)]
pub enum PubMedError {
    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Any other transport failure (DNS, connection reset, body read, ...)
    #[error("fetch failed: {0}")]
    RequestFailed(String),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// Invalid query structure or parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid PMID format
    #[error("Invalid PMID format: {pmid}")]
    InvalidPmid { pmid: String },
}

impl PubMedError {
    /// Whether the error came from user input rather than the remote service
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PubMedError::InvalidQuery(_) | PubMedError::InvalidPmid { .. }
        )
    }
}

impl From<reqwest::Error> for PubMedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return PubMedError::Timeout;
        }

        if let Some(status) = err.status() {
            return PubMedError::ApiError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
            };
        }

        PubMedError::RequestFailed(err.to_string())
    }
}

pub type Result<T> = result::Result<T, PubMedError>;
