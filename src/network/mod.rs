pub mod client;
pub mod errors;
pub mod mock;
pub mod oracle;

pub use client::HuggingFaceOracle;
pub use errors::OracleError;
pub use mock::{MockOracle, MockOracleCall};
pub use oracle::{
    ClassificationRequest, ClassificationResponse, GeneratedText, GenerationRequest, Oracle,
    OracleResult,
};
