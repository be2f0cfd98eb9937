use std::time::Duration;
use thiserror::Error;

// * Unified Error type for oracle calls.
// * Every variant is non-fatal to the pipeline; the enhancer skips the query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Oracle credential not configured")]
    NotConfigured,

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed oracle response: {0}")]
    MalformedBody(String),

    #[error("Invalid oracle URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for OracleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            OracleError::MalformedBody(e.to_string())
        } else {
            OracleError::Unavailable(e.to_string())
        }
    }
}

impl From<url::ParseError> for OracleError {
    fn from(e: url::ParseError) -> Self {
        OracleError::InvalidUrl(e.to_string())
    }
}
