//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub API error
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// Pull request not found
    #[error("Pull request {0} not found")]
    PrNotFound(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// GitHub rejected the reviewer request
    #[error("Reviewer request rejected for {pull_request}: {message}")]
    Rejected {
        pull_request: String,
        message: String,
    },
}

impl From<Error> for depreview_core::Error {
    fn from(err: Error) -> Self {
        depreview_core::Error::Review(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_to_core_review_error() {
        let err: depreview_core::Error = Error::PrNotFound("acme/widgets#3".to_string()).into();
        assert!(matches!(err, depreview_core::Error::Review(_)));
        assert_eq!(
            err.to_string(),
            "Review request error: Pull request acme/widgets#3 not found"
        );
    }
}
