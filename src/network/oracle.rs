// * Oracle collaborator: the external text-understanding service consulted by the enhancer.
// * Two request kinds, zero-shot classification and free-text generation.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

use crate::config::constants::{GENERATION_MAX_LENGTH, GENERATION_TEMPERATURE};
use crate::network::errors::OracleError;

/// Type alias for async oracle results
pub type OracleResult<T> = Pin<Box<dyn Future<Output = Result<T, OracleError>> + Send>>;

/// Zero-shot classification request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub inputs: ClassificationInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInputs {
    pub text: String,
    pub candidate_labels: Vec<String>,
}

impl ClassificationRequest {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            inputs: ClassificationInputs {
                text: text.into(),
                candidate_labels: vec![label.into()],
            },
        }
    }

    /// The single label this request asks about
    pub fn label(&self) -> &str {
        self.inputs
            .candidate_labels
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationResponse {
    #[serde(default)]
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ClassificationResponse {
    pub fn single(score: f64) -> Self {
        Self {
            labels: Vec::new(),
            scores: vec![score],
        }
    }

    /// First score, if it is a usable probability
    pub fn top_score(&self) -> Result<f64, OracleError> {
        match self.scores.first() {
            Some(score) if score.is_finite() => Ok(*score),
            Some(score) => Err(OracleError::MalformedBody(format!("non-finite score {score}"))),
            None => Err(OracleError::MalformedBody("empty scores".to_string())),
        }
    }
}

/// Text generation request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub inputs: String,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub max_length: u32,
    pub temperature: f32,
    pub do_sample: bool,
}

impl GenerationRequest {
    /// Greedy (non-sampling) request with the default length and temperature
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            inputs: prompt.into(),
            parameters: GenerationParameters {
                max_length: GENERATION_MAX_LENGTH,
                temperature: GENERATION_TEMPERATURE,
                do_sample: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratedText {
    #[serde(default)]
    pub generated_text: String,
}

/// Trait for the external oracle
pub trait Oracle: Send + Sync {
    fn classify(&self, request: ClassificationRequest) -> OracleResult<ClassificationResponse>;
    fn generate(&self, request: GenerationRequest) -> OracleResult<Vec<GeneratedText>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_wire_shape() {
        let request = ClassificationRequest::new("contract text", "This text contains contact information");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"]["text"], "contract text");
        assert_eq!(
            json["inputs"]["candidate_labels"][0],
            "This text contains contact information"
        );
        assert_eq!(request.label(), "This text contains contact information");
    }

    #[test]
    fn test_generation_wire_shape() {
        let json = serde_json::to_value(GenerationRequest::new("Extract:")).unwrap();
        assert_eq!(json["inputs"], "Extract:");
        assert_eq!(json["parameters"]["max_length"], 200);
        assert_eq!(json["parameters"]["do_sample"], false);
    }

    #[test]
    fn test_top_score() {
        let response: ClassificationResponse =
            serde_json::from_str(r#"{"labels":["x"],"scores":[0.82]}"#).unwrap();
        assert_eq!(response.top_score(), Ok(0.82));

        let empty = ClassificationResponse::default();
        assert!(matches!(empty.top_score(), Err(OracleError::MalformedBody(_))));
    }

    #[test]
    fn test_generated_text_missing_field() {
        let parsed: Vec<GeneratedText> = serde_json::from_str(r#"[{}]"#).unwrap();
        assert_eq!(parsed[0].generated_text, "");
    }
}
