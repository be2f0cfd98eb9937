// * Pipeline Orchestrator
// * Sole writer of the aggregate: normalize, extract, enhance, score, and report
// * coarse progress to the job store at each stage boundary.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::constants::{
    PROGRESS_EXTRACTED, PROGRESS_NORMALIZED, PROGRESS_SCORED, PROGRESS_STARTED,
};
use crate::config::EngineConfig;
use crate::engine::enhancement::AiEnhancer;
use crate::engine::normalization::{normalize_text, truncate_chars};
use crate::error::ExtractionError;
use crate::network::client::HuggingFaceOracle;
use crate::network::errors::OracleError;
use crate::network::oracle::Oracle;
use crate::ops::telemetry::{
    record_contract_completed, record_contract_failed, record_contract_score,
    record_stage_duration, ProcessingStats,
};
use crate::persistence::job_store::{JobRecord, JobStore, JobUpdate};
use crate::persistence::schema::{ExtractedData, Gap};
use crate::refinery::Refinery;
use crate::scoring::gap_analyzer;

/// Result of a full pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedContract {
    pub data: ExtractedData,
    pub score: f64,
    pub gaps: Vec<Gap>,
}

pub struct ContractProcessor {
    config: EngineConfig,
    refinery: Refinery,
    enhancer: AiEnhancer,
    stats: ProcessingStats,
}

impl ContractProcessor {
    /// Creates a processor around the given oracle
    ///
    /// Enhancement only runs when `config.oracle` carries a credential; an
    /// oracle passed without one is ignored.
    pub fn new(config: EngineConfig, oracle: Option<Arc<dyn Oracle>>) -> Self {
        let enhancer = match (&config.oracle, oracle) {
            (Some(oracle_config), Some(oracle)) => {
                AiEnhancer::new(Some(oracle)).with_config(oracle_config)
            }
            (None, Some(_)) => {
                warn!("Oracle supplied without a configured credential; enhancement disabled");
                AiEnhancer::disabled()
            }
            (_, None) => AiEnhancer::disabled(),
        };

        Self {
            config,
            refinery: Refinery::new(),
            enhancer,
            stats: ProcessingStats::new(),
        }
    }

    /// Creates a processor, building the HTTP oracle when a credential is configured
    pub fn from_config(config: EngineConfig) -> Result<Self, OracleError> {
        let oracle: Option<Arc<dyn Oracle>> = match &config.oracle {
            Some(oracle_config) => Some(Arc::new(HuggingFaceOracle::new(oracle_config)?)),
            None => None,
        };
        Ok(Self::new(config, oracle))
    }

    /// Replaces the extractor set
    pub fn with_refinery(mut self, refinery: Refinery) -> Self {
        self.refinery = refinery;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    pub fn enhancement_enabled(&self) -> bool {
        self.enhancer.is_enabled()
    }

    /// Deterministic extraction (no enhancement)
    pub fn extract(&self, text: &str) -> Result<ExtractedData, ExtractionError> {
        self.refinery
            .extract(truncate_chars(text, self.config.max_text_chars))
    }

    /// Extraction followed by AI enhancement when an oracle is configured
    pub async fn extract_enhanced(&self, text: &str) -> Result<ExtractedData, ExtractionError> {
        let text: Arc<str> = Arc::from(normalize_text(truncate_chars(
            text,
            self.config.max_text_chars,
        ))?);
        let mut data = self.refinery.extract_normalized_concurrent(Arc::clone(&text)).await;
        self.enhance_contained(&text, &mut data).await?;
        Ok(data)
    }

    pub fn score(&self, data: &ExtractedData) -> (f64, Vec<Gap>) {
        gap_analyzer::score(data)
    }

    /// Runs the full pipeline for one contract, reporting to the job store
    ///
    /// Returns the final job record, `completed` or `failed`. An `Err` is only
    /// returned when the job store itself cannot be written or read.
    pub async fn process_contract(
        &self,
        contract_id: &str,
        raw_text: &str,
        store: &dyn JobStore,
    ) -> Result<JobRecord, ExtractionError> {
        info!(contract_id = %contract_id, "Processing contract");
        store
            .update(contract_id, JobUpdate::progress(PROGRESS_STARTED))
            .await?;

        let reached = AtomicU8::new(PROGRESS_STARTED);
        let timeout = self.config.processing_timeout;
        let outcome = match tokio::time::timeout(
            timeout,
            self.run_stages(contract_id, raw_text, store, &reached),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ExtractionError::ProcessingTimeout(timeout)),
        };

        match outcome {
            Ok(processed) => {
                record_contract_score(processed.score);
                record_contract_completed();
                self.stats.record_completed();
                info!(
                    contract_id = %contract_id,
                    score = processed.score,
                    gaps = processed.gaps.len(),
                    "Contract processed"
                );
                store
                    .update(
                        contract_id,
                        JobUpdate::completed(processed.data, processed.score, processed.gaps),
                    )
                    .await?;
            }
            Err(e) => {
                record_contract_failed();
                self.stats.record_failed();
                error!(contract_id = %contract_id, error = %e, "Contract processing failed");
                store
                    .update(
                        contract_id,
                        JobUpdate::failed(reached.load(Ordering::Relaxed), e.to_string()),
                    )
                    .await?;
            }
        }

        store.get(contract_id).await?.ok_or_else(|| {
            ExtractionError::JobStore(format!("job {contract_id} missing after update"))
        })
    }

    async fn run_stages(
        &self,
        contract_id: &str,
        raw_text: &str,
        store: &dyn JobStore,
        reached: &AtomicU8,
    ) -> Result<ProcessedContract, ExtractionError> {
        // * Stage 1: Normalize
        let started = Instant::now();
        let text: Arc<str> = Arc::from(normalize_text(truncate_chars(
            raw_text,
            self.config.max_text_chars,
        ))?);
        record_stage_duration("normalize", started.elapsed().as_secs_f64());
        self.milestone(contract_id, store, reached, PROGRESS_NORMALIZED)
            .await?;

        // * Stage 2: Extract, then enhance
        let started = Instant::now();
        let mut data = self.refinery.extract_normalized_concurrent(Arc::clone(&text)).await;
        record_stage_duration("extract", started.elapsed().as_secs_f64());

        let started = Instant::now();
        self.enhance_contained(&text, &mut data).await?;
        record_stage_duration("enhance", started.elapsed().as_secs_f64());
        self.milestone(contract_id, store, reached, PROGRESS_EXTRACTED)
            .await?;

        // * Stage 3: Score
        let started = Instant::now();
        let (score, gaps) = gap_analyzer::score(&data);
        record_stage_duration("score", started.elapsed().as_secs_f64());
        self.milestone(contract_id, store, reached, PROGRESS_SCORED)
            .await?;

        Ok(ProcessedContract { data, score, gaps })
    }

    // * A panic inside enhancement fails the job instead of unwinding the caller
    async fn enhance_contained(
        &self,
        text: &str,
        data: &mut ExtractedData,
    ) -> Result<(), ExtractionError> {
        AssertUnwindSafe(self.enhancer.enhance(text, data))
            .catch_unwind()
            .await
            .map(|_| ())
            .map_err(|_| ExtractionError::UnexpectedExtractorFailure {
                extractor: "enhancement".to_string(),
                message: "AI enhancement panicked".to_string(),
            })
    }

    async fn milestone(
        &self,
        contract_id: &str,
        store: &dyn JobStore,
        reached: &AtomicU8,
        progress: u8,
    ) -> Result<(), ExtractionError> {
        store
            .update(contract_id, JobUpdate::progress(progress))
            .await?;
        reached.store(progress, Ordering::Relaxed);
        info!(contract_id = %contract_id, progress, "Milestone reached");
        Ok(())
    }
}
