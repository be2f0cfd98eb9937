// * The Refinery (Extraction Pipeline)
// * Normalizes raw contract text, runs the six section extractors and assembles
// * their outputs into one ExtractedData aggregate with confidence scores.

pub mod account;
pub mod financial;
pub mod parties;
pub mod payment;
pub mod regex_extractor;
pub mod revenue;
pub mod sla;

// * Re-exports for convenient access
pub use account::extract_account;
pub use financial::extract_financial;
pub use parties::extract_parties;
pub use payment::extract_payment;
pub use revenue::extract_revenue;
pub use sla::extract_sla;

use futures::future::join_all;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::engine::normalization::normalize_text;
use crate::error::ExtractionError;
use crate::ops::telemetry::record_extractor_failure;
use crate::persistence::schema::{
    AccountInfo, ExtractedData, FinancialDetails, PartyInfo, PaymentStructure,
    RevenueClassification, ServiceLevelAgreement,
};
use crate::scoring::confidence::confidence_scores;

/// Output of one section extractor
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    Parties(Vec<PartyInfo>),
    Financial(FinancialDetails),
    Payment(PaymentStructure),
    Revenue(RevenueClassification),
    Sla(ServiceLevelAgreement),
    Account(AccountInfo),
}

impl SectionData {
    /// Writes this section into its slot on the aggregate
    pub fn apply(self, data: &mut ExtractedData) {
        match self {
            SectionData::Parties(parties) => data.parties = parties,
            SectionData::Financial(financial) => data.financial_details = Some(financial),
            SectionData::Payment(payment) => data.payment_structure = Some(payment),
            SectionData::Revenue(revenue) => data.revenue_classification = Some(revenue),
            SectionData::Sla(sla) => data.sla = Some(sla),
            SectionData::Account(account) => data.account_info = Some(account),
        }
    }
}

/// A pure function from normalized text to one section of the aggregate
pub trait SectionExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, text: &str) -> Result<SectionData, ExtractionError>;
}

/// Rule-based extractor backed by one of the section functions
pub struct RuleExtractor {
    name: &'static str,
    run: fn(&str) -> SectionData,
}

impl RuleExtractor {
    pub const fn new(name: &'static str, run: fn(&str) -> SectionData) -> Self {
        Self { name, run }
    }
}

impl SectionExtractor for RuleExtractor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn extract(&self, text: &str) -> Result<SectionData, ExtractionError> {
        Ok((self.run)(text))
    }
}

/// The six built-in extractors, in assembly order
pub fn default_extractors() -> Vec<Arc<dyn SectionExtractor>> {
    vec![
        Arc::new(RuleExtractor::new("parties", |t| SectionData::Parties(extract_parties(t)))),
        Arc::new(RuleExtractor::new("financial", |t| SectionData::Financial(extract_financial(t)))),
        Arc::new(RuleExtractor::new("payment", |t| SectionData::Payment(extract_payment(t)))),
        Arc::new(RuleExtractor::new("revenue", |t| SectionData::Revenue(extract_revenue(t)))),
        Arc::new(RuleExtractor::new("sla", |t| SectionData::Sla(extract_sla(t)))),
        Arc::new(RuleExtractor::new("account", |t| SectionData::Account(extract_account(t)))),
    ]
}

/// Runs one extractor, converting a panic into an extractor failure
pub fn run_contained(
    extractor: &dyn SectionExtractor,
    text: &str,
) -> Result<SectionData, ExtractionError> {
    match catch_unwind(AssertUnwindSafe(|| extractor.extract(text))) {
        Ok(result) => result,
        Err(payload) => Err(ExtractionError::UnexpectedExtractorFailure {
            extractor: extractor.name().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// The extraction pipeline
///
/// # Example
/// ```ignore
/// use contract_intel::refinery::Refinery;
///
/// let refinery = Refinery::new();
/// let data = refinery.extract("PARTY A: Acme Inc. Total: $5,000.")?;
///
/// println!("Parties: {}", data.parties.len());
/// println!("Total: {:?}", data.total_value());
/// ```
pub struct Refinery {
    extractors: Vec<Arc<dyn SectionExtractor>>,
}

impl Refinery {
    /// Creates a refinery with the built-in extractors
    pub fn new() -> Self {
        Self::with_extractors(default_extractors())
    }

    /// Creates a refinery with a custom extractor set
    pub fn with_extractors(extractors: Vec<Arc<dyn SectionExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Normalizes then extracts sequentially
    ///
    /// # Pipeline Steps:
    /// 1. Normalize text (fails with `EmptyText` when nothing readable remains)
    /// 2. Run every extractor; a failing extractor leaves its section absent
    /// 3. Compute per-category confidence
    pub fn extract(&self, raw: &str) -> Result<ExtractedData, ExtractionError> {
        let text = normalize_text(raw)?;
        Ok(self.extract_normalized(&text))
    }

    /// Extracts from already-normalized text
    pub fn extract_normalized(&self, text: &str) -> ExtractedData {
        let results = self
            .extractors
            .iter()
            .map(|extractor| (extractor.name(), run_contained(extractor.as_ref(), text)))
            .collect();
        assemble(results)
    }

    /// Normalizes then runs every extractor on the blocking pool concurrently
    pub async fn extract_concurrent(&self, raw: &str) -> Result<ExtractedData, ExtractionError> {
        let text: Arc<str> = Arc::from(normalize_text(raw)?);
        Ok(self.extract_normalized_concurrent(text).await)
    }

    /// Runs every extractor on the blocking pool over already-normalized text
    pub async fn extract_normalized_concurrent(&self, text: Arc<str>) -> ExtractedData {
        let handles = self.extractors.iter().map(|extractor| {
            let extractor = Arc::clone(extractor);
            let text = Arc::clone(&text);
            tokio::task::spawn_blocking(move || run_contained(extractor.as_ref(), &text))
        });

        let joined = join_all(handles).await;
        let results = self
            .extractors
            .iter()
            .zip(joined)
            .map(|(extractor, joined)| {
                let result = joined.unwrap_or_else(|e| {
                    Err(ExtractionError::UnexpectedExtractorFailure {
                        extractor: extractor.name().to_string(),
                        message: e.to_string(),
                    })
                });
                (extractor.name(), result)
            })
            .collect();

        assemble(results)
    }
}

impl Default for Refinery {
    fn default() -> Self {
        Self::new()
    }
}

// * Applies results in extractor order, then scores confidence
fn assemble(results: Vec<(&'static str, Result<SectionData, ExtractionError>)>) -> ExtractedData {
    let mut data = ExtractedData::default();

    for (name, result) in results {
        match result {
            Ok(section) => {
                debug!(extractor = name, "Extractor finished");
                section.apply(&mut data);
            }
            Err(e) => {
                warn!(extractor = name, error = %e, "Extractor failed, section left absent");
                record_extractor_failure(name);
            }
        }
    }

    data.confidence_scores = confidence_scores(&data);
    data
}

/// Convenience function to extract with the built-in extractors
pub fn extract_contract(raw: &str) -> Result<ExtractedData, ExtractionError> {
    Refinery::new().extract(raw)
}
