//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every attempt failed; carries the cause of the last one.
    #[error("Request to {url} failed after {attempts} attempt(s): {cause}")]
    Failed {
        /// The requested URL.
        url: String,
        /// Number of attempts made.
        attempts: u32,
        /// Why the last attempt failed.
        cause: AttemptError,
    },

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    /// Creates a [`FetchError::Failed`].
    pub fn failed(url: impl Into<String>, attempts: u32, cause: AttemptError) -> Self {
        Self::Failed {
            url: url.into(),
            attempts,
            cause,
        }
    }

    /// Returns the last attempt's cause, if the request was actually made.
    pub fn cause(&self) -> Option<&AttemptError> {
        match self {
            Self::Failed { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Returns true if the last attempt timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self.cause(), Some(AttemptError::Timeout(_)))
    }

    /// Returns the HTTP status of the last attempt, if it got a response.
    pub fn status(&self) -> Option<u16> {
        match self.cause() {
            Some(AttemptError::HttpStatus { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Attempt Error
// ============================================================================

/// Why a single attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// The attempt exceeded its time bound.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} {reason}")]
    HttpStatus {
        /// Status code.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AttemptError {
    fn from(err: reqwest::Error) -> Self {
        AttemptError::Network(err.to_string())
    }
}

impl From<reqwest::StatusCode> for AttemptError {
    fn from(status: reqwest::StatusCode) -> Self {
        AttemptError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let err = FetchError::failed("http://x/pokemon/missingno", 3, reqwest::StatusCode::NOT_FOUND.into());
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Request to http://x/pokemon/missingno failed after 3 attempt(s): HTTP 404 Not Found"
        );
    }

    #[test]
    fn test_timeout_accessor() {
        let err = FetchError::failed("http://x", 3, AttemptError::Timeout(Duration::from_secs(5)));
        assert!(err.is_timeout());
        assert_eq!(err.status(), None);
    }
}
