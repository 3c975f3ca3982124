//! Error types for the search client.

use crate::transport::TransportError;

/// Errors surfaced by the search client.
///
/// Each stage of the job lifecycle reports its own kind. Malformed responses
/// and missing fields are not distinguished; both are a failure of that stage.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An operation was called before a required earlier step
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The login exchange failed or returned no usable token
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<TransportError>,
    },

    /// Job submission failed or returned no usable identifier
    #[error("Job submission failed: {message}")]
    Submission {
        message: String,
        #[source]
        source: Option<TransportError>,
    },

    /// A status poll failed or the response carried no done flag
    #[error("Job status check failed: {message}")]
    Status {
        message: String,
        #[source]
        source: Option<TransportError>,
    },

    /// The caller supplied a value that strict validation rejects
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The job did not finish within the configured polling bounds
    #[error("Job {sid} not done after {attempts} status checks")]
    PollTimeout { sid: String, attempts: u32 },

    /// Network layer failure passed through unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SearchError {
    pub(crate) fn authentication(message: impl Into<String>) -> Self {
        SearchError::Authentication {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn submission(message: impl Into<String>) -> Self {
        SearchError::Submission {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn status(message: impl Into<String>) -> Self {
        SearchError::Status {
            message: message.into(),
            source: None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_stage_error_keeps_transport_source() {
        let err = SearchError::Authentication {
            message: "login request failed".to_string(),
            source: Some(TransportError::Network("connection refused".to_string())),
        };

        assert_eq!(err.to_string(), "Authentication failed: login request failed");
        let source = err.source().expect("source should be kept");
        assert!(source.to_string().contains("connection refused"));
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let err: SearchError = TransportError::Network("reset by peer".to_string()).into();
        assert_eq!(err.to_string(), "Network error: reset by peer");
    }

    #[test]
    fn test_poll_timeout_message() {
        let err = SearchError::PollTimeout {
            sid: "job-42".to_string(),
            attempts: 3,
        };
        assert_eq!(err.to_string(), "Job job-42 not done after 3 status checks");
    }
}
