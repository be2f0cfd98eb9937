// * Contract extraction-and-scoring engine.
// * Rule-based extractors feed a confidence model and a weighted gap/score analyzer,
// * with an optional oracle-backed enhancement stage.

pub mod config;
pub mod engine;
pub mod error;
pub mod network;
pub mod ops;
pub mod persistence;
pub mod refinery;
pub mod scoring;

pub use config::{EngineConfig, OracleConfig};
pub use engine::ContractProcessor;
pub use error::ExtractionError;
pub use persistence::{ExtractedData, Gap, InMemoryJobStore, JobRecord, JobStatus, JobStore};
