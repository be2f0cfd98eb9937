// * Mock Oracle
// * Scripted classification scores and generated text, no network. Every call is recorded.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::network::errors::OracleError;
use crate::network::oracle::{
    ClassificationRequest, ClassificationResponse, GeneratedText, GenerationRequest, Oracle,
    OracleResult,
};

#[derive(Debug, Clone, PartialEq)]
pub enum MockOracleCall {
    Classify { label: String, text_len: usize },
    Generate { prompt: String },
}

// * Unscripted labels fall back to `default_score`, else fail with `Unavailable`.
// * Generation with no scripted text fails the same way.
#[derive(Default)]
pub struct MockOracle {
    scores: RwLock<HashMap<String, Result<f64, OracleError>>>,
    default_score: Option<f64>,
    generation: Option<Result<String, OracleError>>,
    failure: Option<OracleError>,
    delay: Option<Duration>,
    calls: Arc<RwLock<Vec<MockOracleCall>>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with the given error (e.g. an HTTP 500)
    pub fn failing(error: OracleError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    /// Score returned for labels with no scripted response
    pub fn with_default_score(mut self, score: f64) -> Self {
        self.default_score = Some(score);
        self
    }

    /// Scripted score for one candidate label
    pub fn with_score(self, label: impl Into<String>, score: f64) -> Self {
        if let Ok(mut scores) = self.scores.write() {
            scores.insert(label.into(), Ok(score));
        }
        self
    }

    /// Scripted failure for one candidate label
    pub fn with_classification_error(self, label: impl Into<String>, error: OracleError) -> Self {
        if let Ok(mut scores) = self.scores.write() {
            scores.insert(label.into(), Err(error));
        }
        self
    }

    pub fn with_generated_text(mut self, text: impl Into<String>) -> Self {
        self.generation = Some(Ok(text.into()));
        self
    }

    pub fn with_generation_error(mut self, error: OracleError) -> Self {
        self.generation = Some(Err(error));
        self
    }

    /// Every response is delayed, for exercising timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<MockOracleCall> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn classification_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockOracleCall::Classify { .. }))
            .count()
    }

    pub fn generation_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockOracleCall::Generate { .. }))
            .count()
    }

    fn record(&self, call: MockOracleCall) {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(call);
        }
    }

    fn scripted_score(&self, label: &str) -> Result<f64, OracleError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let scripted = self
            .scores
            .read()
            .ok()
            .and_then(|scores| scores.get(label).cloned());
        match (scripted, self.default_score) {
            (Some(result), _) => result,
            (None, Some(score)) => Ok(score),
            (None, None) => Err(OracleError::Unavailable(format!("no scripted score for {label:?}"))),
        }
    }

    fn scripted_generation(&self) -> Result<String, OracleError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.generation
            .clone()
            .unwrap_or_else(|| Err(OracleError::Unavailable("no scripted generation".to_string())))
    }
}

impl Oracle for MockOracle {
    fn classify(&self, request: ClassificationRequest) -> OracleResult<ClassificationResponse> {
        let label = request.label().to_string();
        self.record(MockOracleCall::Classify {
            label: label.clone(),
            text_len: request.inputs.text.chars().count(),
        });

        let result = self.scripted_score(&label).map(ClassificationResponse::single);
        let delay = self.delay;
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }

    fn generate(&self, request: GenerationRequest) -> OracleResult<Vec<GeneratedText>> {
        self.record(MockOracleCall::Generate {
            prompt: request.inputs.clone(),
        });

        let result = self
            .scripted_generation()
            .map(|generated_text| vec![GeneratedText { generated_text }]);
        let delay = self.delay;
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}
