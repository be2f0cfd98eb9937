pub mod enhancement;
pub mod normalization;
pub mod pipeline;

pub use enhancement::{AiEnhancer, EnhancementReport, CLASSIFICATION_QUERIES};
pub use normalization::{normalize_text, truncate_chars};
pub use pipeline::{ContractProcessor, ProcessedContract};
