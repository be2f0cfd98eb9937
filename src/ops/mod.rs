// * Operations: structured logging and Prometheus metrics

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, init_tracing_with_level,
    record_contract_completed, record_contract_failed, record_contract_score,
    record_extractor_failure, record_oracle_query, record_stage_duration, ProcessingStats,
};
