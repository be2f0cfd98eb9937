// * AI Enhancement Adapter
// * Blends oracle output into the deterministic aggregate. Queries run concurrently,
// * merging is serial, and every failed query is skipped without touching prior data.

use futures::future::join_all;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::debug;

use crate::config::constants::{
    CLASSIFICATION_TEXT_LIMIT, CLASSIFICATION_TIMEOUT, GENERATION_TEXT_LIMIT, GENERATION_TIMEOUT,
};
use crate::config::OracleConfig;
use crate::engine::normalization::truncate_chars;
use crate::network::errors::OracleError;
use crate::network::oracle::{ClassificationRequest, GenerationRequest, Oracle};
use crate::ops::telemetry::record_oracle_query;
use crate::persistence::schema::{is_valid_amount, Category, ExtractedData, PartyInfo};
use crate::refinery::parties::is_valid_party_name;
use crate::refinery::regex_extractor::parse_amount;

/// One classification query per category
pub const CLASSIFICATION_QUERIES: [(Category, &str); 5] = [
    (Category::Parties, "This text contains company names and parties"),
    (Category::Financial, "This text contains financial amounts and currency"),
    (Category::Payment, "This text contains payment terms and methods"),
    (Category::Sla, "This text contains service level agreements"),
    (Category::Contact, "This text contains contact information"),
];

// * Capitalized words ending in a corporate suffix
static GENERATED_COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([A-Z][A-Za-z0-9&'\-]*(?:\s+[A-Z][A-Za-z0-9&'\-]*)*?\s+(?i:Inc\.|Corp\.|Ltd\.|(?:Inc|LLC|Corp|Corporation|Company|Ltd|Limited)\b))",
    )
    .expect("Invalid generated company regex")
});

static GENERATED_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([\d,]+\.?\d*)").expect("Invalid generated amount regex"));

/// What the enhancer changed, for logging and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnhancementReport {
    pub classifications_applied: usize,
    pub classifications_skipped: usize,
    pub parties_added: usize,
    pub total_value_raised: bool,
    pub generation_applied: bool,
}

pub struct AiEnhancer {
    oracle: Option<Arc<dyn Oracle>>,
    classification_timeout: Duration,
    generation_timeout: Duration,
}

impl AiEnhancer {
    /// Enhancer over an oracle; `None` makes every call a pass-through
    pub fn new(oracle: Option<Arc<dyn Oracle>>) -> Self {
        Self {
            oracle,
            classification_timeout: CLASSIFICATION_TIMEOUT,
            generation_timeout: GENERATION_TIMEOUT,
        }
    }

    /// Pass-through enhancer
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Takes per-query timeouts from oracle settings
    pub fn with_config(mut self, config: &OracleConfig) -> Self {
        self.classification_timeout = config.classification_timeout;
        self.generation_timeout = config.generation_timeout;
        self
    }

    pub fn with_timeouts(mut self, classification: Duration, generation: Duration) -> Self {
        self.classification_timeout = classification;
        self.generation_timeout = generation;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.oracle.is_some()
    }

    /// Enhances an aggregate in place
    pub async fn enhance(&self, text: &str, data: &mut ExtractedData) -> EnhancementReport {
        let mut report = EnhancementReport::default();
        let Some(oracle) = &self.oracle else {
            return report;
        };

        self.apply_classifications(oracle.as_ref(), text, data, &mut report)
            .await;
        self.apply_generation(oracle.as_ref(), text, data, &mut report)
            .await;

        debug!(
            applied = report.classifications_applied,
            skipped = report.classifications_skipped,
            parties_added = report.parties_added,
            total_value_raised = report.total_value_raised,
            "AI enhancement finished"
        );
        report
    }

    async fn apply_classifications(
        &self,
        oracle: &dyn Oracle,
        text: &str,
        data: &mut ExtractedData,
        report: &mut EnhancementReport,
    ) {
        let excerpt = truncate_chars(text, CLASSIFICATION_TEXT_LIMIT);

        // * Issue all queries first; nothing is written until every one settles
        let queries = CLASSIFICATION_QUERIES.iter().map(|(category, label)| {
            let request = ClassificationRequest::new(excerpt, *label);
            let timeout = self.classification_timeout;
            async move {
                let result = match tokio::time::timeout(timeout, oracle.classify(request)).await {
                    Ok(Ok(response)) => response.top_score(),
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(OracleError::Timeout(timeout)),
                };
                (*category, result)
            }
        });
        let results = join_all(queries).await;

        for (category, result) in results {
            match result {
                Ok(oracle_score) => {
                    let blended = ((data.confidence(category) + oracle_score) / 2.0).clamp(0.0, 1.0);
                    data.confidence_scores
                        .insert(category.as_str().to_string(), blended);
                    report.classifications_applied += 1;
                    record_oracle_query("classification", "ok");
                }
                Err(e) => {
                    debug!(category = %category, error = %e, "Classification query skipped");
                    report.classifications_skipped += 1;
                    record_oracle_query("classification", "skipped");
                }
            }
        }
    }

    async fn apply_generation(
        &self,
        oracle: &dyn Oracle,
        text: &str,
        data: &mut ExtractedData,
        report: &mut EnhancementReport,
    ) {
        let request = GenerationRequest::new(generation_prompt(text));
        let result = match tokio::time::timeout(self.generation_timeout, oracle.generate(request)).await {
            Ok(Ok(outputs)) => outputs
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| OracleError::MalformedBody("empty generation list".to_string())),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(OracleError::Timeout(self.generation_timeout)),
        };

        match result {
            Ok(generated) => {
                record_oracle_query("generation", "ok");
                report.generation_applied = true;
                merge_generated(&generated, data, report);
            }
            Err(e) => {
                debug!(error = %e, "Generation query skipped");
                record_oracle_query("generation", "skipped");
            }
        }
    }
}

/// Prompt sent to the generation model
pub fn generation_prompt(text: &str) -> String {
    format!(
        "Analyze this contract and extract:\n\
         - Company names\n\
         - Financial amounts\n\
         - Payment terms\n\
         \n\
         Contract: {}\n\
         \n\
         Extract:",
        truncate_chars(text, GENERATION_TEXT_LIMIT)
    )
}

/// Company names suggested by generated text
pub fn generated_companies(generated: &str) -> Vec<String> {
    GENERATED_COMPANY
        .captures_iter(generated)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|name| is_valid_party_name(name))
        .collect()
}

/// Largest valid dollar amount in generated text
pub fn generated_max_amount(generated: &str) -> Option<f64> {
    GENERATED_AMOUNT
        .captures_iter(generated)
        .filter_map(|caps| parse_amount(&caps[1]).ok())
        .filter(|amount| is_valid_amount(*amount))
        .fold(None, |max, amount| match max {
            Some(current) if current >= amount => Some(current),
            _ => Some(amount),
        })
}

// * New parties carry a name only; total_value only ever grows
fn merge_generated(generated: &str, data: &mut ExtractedData, report: &mut EnhancementReport) {
    for name in generated_companies(generated) {
        if data.push_party(PartyInfo::named(name)) {
            report.parties_added += 1;
        }
    }

    let Some(amount) = generated_max_amount(generated) else {
        return;
    };
    if let Some(financial) = data.financial_details.as_mut() {
        let raise = financial.total_value.map_or(true, |current| amount > current);
        if raise {
            financial.total_value = Some(amount);
            report.total_value_raised = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::mock::MockOracle;
    use crate::persistence::schema::FinancialDetails;

    fn base_data() -> ExtractedData {
        let mut data = ExtractedData {
            parties: vec![PartyInfo::named("Acme Inc.")],
            financial_details: Some(FinancialDetails {
                total_value: Some(1_000.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        data.confidence_scores = crate::scoring::confidence_scores(&data);
        data
    }

    #[tokio::test]
    async fn test_disabled_is_pass_through() {
        let mut data = base_data();
        let before = data.clone();
        let report = AiEnhancer::disabled().enhance("text", &mut data).await;
        assert_eq!(data, before);
        assert_eq!(report, EnhancementReport::default());
    }

    #[tokio::test]
    async fn test_classification_blends_with_existing() {
        let oracle = MockOracle::new()
            .with_score("This text contains company names and parties", 1.0)
            .with_generation_error(OracleError::Unavailable("HTTP 503".to_string()));
        let enhancer = AiEnhancer::new(Some(Arc::new(oracle)));

        let mut data = base_data();
        let report = enhancer.enhance("contract text", &mut data).await;

        // * parties: (0.5 + 1.0) / 2
        assert!((data.confidence(Category::Parties) - 0.75).abs() < 1e-9);
        assert_eq!(report.classifications_applied, 1);
        assert_eq!(report.classifications_skipped, 4);
        assert!(!report.generation_applied);
    }

    #[tokio::test]
    async fn test_generation_adds_parties_and_raises_total() {
        let oracle = MockOracle::new()
            .with_generated_text("Companies: Acme Inc. and Globex LLC. Amounts: $2,500.00 and $900");
        let enhancer = AiEnhancer::new(Some(Arc::new(oracle)));

        let mut data = base_data();
        let report = enhancer.enhance("contract text", &mut data).await;

        assert_eq!(data.parties.len(), 2);
        assert!(data.has_party("Globex LLC"));
        assert_eq!(data.parties[1].legal_entity, None);
        assert_eq!(data.total_value(), Some(2_500.0));
        assert_eq!(report.parties_added, 1);
        assert!(report.total_value_raised);
    }

    #[tokio::test]
    async fn test_generation_never_lowers_total() {
        let oracle = MockOracle::new().with_generated_text("Total $500");
        let enhancer = AiEnhancer::new(Some(Arc::new(oracle)));

        let mut data = base_data();
        enhancer.enhance("contract text", &mut data).await;
        assert_eq!(data.total_value(), Some(1_000.0));
    }

    #[tokio::test]
    async fn test_generation_without_financial_section() {
        let oracle = MockOracle::new().with_generated_text("Total $5,000");
        let enhancer = AiEnhancer::new(Some(Arc::new(oracle)));

        let mut data = ExtractedData::default();
        enhancer.enhance("contract text", &mut data).await;
        assert!(data.financial_details.is_none());
    }

    #[tokio::test]
    async fn test_slow_oracle_times_out() {
        let oracle = MockOracle::new()
            .with_default_score(1.0)
            .with_generated_text("Globex LLC")
            .with_delay(Duration::from_millis(200));
        let enhancer = AiEnhancer::new(Some(Arc::new(oracle)))
            .with_timeouts(Duration::from_millis(10), Duration::from_millis(10));

        let mut data = base_data();
        let before = data.clone();
        let report = enhancer.enhance("contract text", &mut data).await;

        assert_eq!(data, before);
        assert_eq!(report.classifications_skipped, 5);
    }

    #[test]
    fn test_generated_companies() {
        let names = generated_companies("Parties are Big Acme Inc. and Globex LLC, plus the Company.");
        assert_eq!(names, vec!["Big Acme Inc.".to_string(), "Globex LLC".to_string()]);
    }

    #[test]
    fn test_generated_max_amount_ignores_out_of_range() {
        assert_eq!(generated_max_amount("$5,000 and $2,000,000,000"), Some(5_000.0));
        assert_eq!(generated_max_amount("no money"), None);
    }

    #[test]
    fn test_prompt_truncates_contract() {
        let text = "x".repeat(600);
        let prompt = generation_prompt(&text);
        assert!(prompt.starts_with("Analyze this contract and extract:"));
        assert!(prompt.contains(&"x".repeat(500)));
        assert!(!prompt.contains(&"x".repeat(501)));
        assert!(prompt.ends_with("Extract:"));
    }
}
