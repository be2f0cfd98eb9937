use std::time::Duration;
use thiserror::Error;

// * Unified error type for the extraction engine.
// * Only EmptyText and ProcessingTimeout are fatal to a document; the rest are
// * contained at the extractor or match level.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("No readable text content after normalization")]
    EmptyText,

    #[error("Malformed numeric literal: {0:?}")]
    MalformedNumericLiteral(String),

    #[error("Extractor '{extractor}' failed: {message}")]
    UnexpectedExtractorFailure { extractor: String, message: String },

    #[error("Processing exceeded {0:?}")]
    ProcessingTimeout(Duration),

    #[error("Job store error: {0}")]
    JobStore(String),
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
