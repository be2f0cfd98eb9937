// * Telemetry - JSON Logging and Prometheus Metrics
// * Structured logging plus process-local metrics for the extraction pipeline

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram, register_histogram_vec, CounterVec, Encoder,
    Histogram, HistogramVec, TextEncoder,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Finished contracts by terminal status
    pub static ref CONTRACTS_PROCESSED_TOTAL: CounterVec = register_counter_vec!(
        "contract_intel_contracts_processed_total",
        "Total contracts processed by terminal status",
        &["status"]
    ).unwrap();

    // * Per-stage wall time
    pub static ref STAGE_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "contract_intel_stage_duration_seconds",
        "Pipeline stage duration in seconds",
        &["stage"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0]
    ).unwrap();

    // * Oracle queries by kind (classification / generation) and outcome
    pub static ref ORACLE_QUERIES_TOTAL: CounterVec = register_counter_vec!(
        "contract_intel_oracle_queries_total",
        "Total oracle queries by kind and outcome",
        &["kind", "outcome"]
    ).unwrap();

    // * Contained extractor failures
    pub static ref EXTRACTOR_FAILURES_TOTAL: CounterVec = register_counter_vec!(
        "contract_intel_extractor_failures_total",
        "Total extractor failures by extractor name",
        &["extractor"]
    ).unwrap();

    // * Distribution of final contract scores
    pub static ref CONTRACT_SCORE: Histogram = register_histogram!(
        "contract_intel_contract_score",
        "Final contract completeness score (0-100)",
        vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
    ).unwrap();
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use contract_intel::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(contract_id = "c-1", "Processing contract");
/// ```
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initializes tracing with custom log level
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // * try_init so repeated calls (tests, embedding) are harmless
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .try_init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty())
        .try_init();
}

/// Returns the current metrics in Prometheus text format
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Records a contract that reached `completed`
pub fn record_contract_completed() {
    CONTRACTS_PROCESSED_TOTAL.with_label_values(&["completed"]).inc();
}

/// Records a contract that reached `failed`
pub fn record_contract_failed() {
    CONTRACTS_PROCESSED_TOTAL.with_label_values(&["failed"]).inc();
}

pub fn record_stage_duration(stage: &str, seconds: f64) {
    STAGE_DURATION_SECONDS
        .with_label_values(&[stage])
        .observe(seconds);
}

pub fn record_oracle_query(kind: &str, outcome: &str) {
    ORACLE_QUERIES_TOTAL.with_label_values(&[kind, outcome]).inc();
}

pub fn record_extractor_failure(extractor: &str) {
    EXTRACTOR_FAILURES_TOTAL.with_label_values(&[extractor]).inc();
}

pub fn record_contract_score(score: f64) {
    CONTRACT_SCORE.observe(score);
}

/// In-process counters for one processor instance
#[derive(Debug, Default)]
pub struct ProcessingStats {
    completed: AtomicU64,
    failed: AtomicU64,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn success_rate(&self) -> f64 {
        let completed = self.completed() as f64;
        let total = completed + self.failed() as f64;
        if total > 0.0 {
            completed / total
        } else {
            1.0
        }
    }
}
