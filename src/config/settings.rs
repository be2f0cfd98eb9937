// * Engine Settings
// * Immutable configuration handed to the processor at construction time.

use std::env;
use std::time::Duration;

use crate::config::constants::{
    CLASSIFICATION_TIMEOUT, GENERATION_TIMEOUT, MAX_TEXT_CHARS, PROCESSING_TIMEOUT,
};

pub const DEFAULT_ORACLE_URL: &str = "https://api-inference.huggingface.co/models/";
pub const DEFAULT_CLASSIFICATION_MODEL: &str = "facebook/bart-large-mnli";
pub const DEFAULT_GENERATION_MODEL: &str = "microsoft/DialoGPT-medium";

/// Connection settings for the external text-understanding oracle
#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    /// Bearer credential sent with every request
    pub api_key: String,
    /// Base URL that model names are joined onto
    pub base_url: String,
    /// Zero-shot classification model
    pub classification_model: String,
    /// Free-text generation model
    pub generation_model: String,
    pub classification_timeout: Duration,
    pub generation_timeout: Duration,
}

impl OracleConfig {
    /// Creates an oracle config with default endpoints and timeouts
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_ORACLE_URL.to_string(),
            classification_model: DEFAULT_CLASSIFICATION_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            classification_timeout: CLASSIFICATION_TIMEOUT,
            generation_timeout: GENERATION_TIMEOUT,
        }
    }

    /// Overrides the base URL (proxies, self-hosted inference)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Oracle settings; `None` turns AI enhancement into a pass-through
    pub oracle: Option<OracleConfig>,
    /// Upper bound for one document's full pipeline run
    pub processing_timeout: Duration,
    /// Raw input longer than this is truncated before normalization
    pub max_text_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            oracle: None,
            processing_timeout: PROCESSING_TIMEOUT,
            max_text_chars: MAX_TEXT_CHARS,
        }
    }
}

impl EngineConfig {
    /// Builds the configuration from process environment variables
    ///
    /// The credential is read from `HUGGINGFACE_API_KEY`, then `HF_TOKEN`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let oracle = non_empty("HUGGINGFACE_API_KEY")
            .or_else(|| non_empty("HF_TOKEN"))
            .map(|api_key| {
                let mut oracle = OracleConfig::new(api_key);
                if let Some(url) = non_empty("HUGGINGFACE_API_URL") {
                    oracle.base_url = url;
                }
                if let Some(model) = non_empty("CLASSIFICATION_MODEL") {
                    oracle.classification_model = model;
                }
                if let Some(model) = non_empty("GENERATION_MODEL") {
                    oracle.generation_model = model;
                }
                oracle
            });

        let processing_timeout = non_empty("PROCESSING_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(PROCESSING_TIMEOUT);

        Self {
            oracle,
            processing_timeout,
            ..Self::default()
        }
    }

    /// Returns a copy with the oracle enabled
    pub fn with_oracle(mut self, oracle: OracleConfig) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// True when an oracle credential is configured
    pub fn enhancement_enabled(&self) -> bool {
        self.oracle.is_some()
    }
}
