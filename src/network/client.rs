use crate::config::OracleConfig;
use crate::network::errors::OracleError;
use crate::network::oracle::{
    ClassificationRequest, ClassificationResponse, GeneratedText, GenerationRequest, Oracle,
    OracleResult,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

// * HTTP oracle backed by the hosted inference API.
// * Model names are joined onto the base URL; every request carries a bearer credential.
#[derive(Clone)]
pub struct HuggingFaceOracle {
    inner: Client,
    api_key: String,
    classification_url: Url,
    generation_url: Url,
    classification_timeout: Duration,
    generation_timeout: Duration,
}

impl HuggingFaceOracle {
    // * Builds the client from config.
    // * @param config - Must carry a non-empty api_key
    pub fn new(config: &OracleConfig) -> Result<Self, OracleError> {
        if config.api_key.trim().is_empty() {
            return Err(OracleError::NotConfigured);
        }

        let base = base_url(&config.base_url)?;
        let inner = Client::builder().build()?;

        Ok(Self {
            inner,
            api_key: config.api_key.clone(),
            classification_url: base.join(&config.classification_model)?,
            generation_url: base.join(&config.generation_model)?,
            classification_timeout: config.classification_timeout,
            generation_timeout: config.generation_timeout,
        })
    }

    pub fn classification_url(&self) -> &Url {
        &self.classification_url
    }

    pub fn generation_url(&self) -> &Url {
        &self.generation_url
    }

    // * POSTs a JSON body and decodes a JSON reply; non-2xx becomes Unavailable.
    async fn post_json<B, R>(&self, url: &Url, body: &B, timeout: Duration) -> Result<R, OracleError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let start = Instant::now();
        let resp = self
            .inner
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(timeout)
                } else {
                    OracleError::from(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            warn!(status = %status, url = %url, error = %error_text, "Oracle API error");
            return Err(OracleError::Unavailable(format!("HTTP {}", status.as_u16())));
        }

        let bytes = resp.bytes().await?;
        let parsed = serde_json::from_slice(&bytes)
            .map_err(|e| OracleError::MalformedBody(e.to_string()))?;

        debug!(url = %url, duration_ms = start.elapsed().as_millis() as u64, "Oracle call finished");
        Ok(parsed)
    }
}

// * Url::join replaces the last segment unless the base ends with '/'
fn base_url(raw: &str) -> Result<Url, OracleError> {
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{raw}/"))?)
    }
}

impl Oracle for HuggingFaceOracle {
    fn classify(&self, request: ClassificationRequest) -> OracleResult<ClassificationResponse> {
        let this = self.clone();
        Box::pin(async move {
            this.post_json(&this.classification_url, &request, this.classification_timeout)
                .await
        })
    }

    fn generate(&self, request: GenerationRequest) -> OracleResult<Vec<GeneratedText>> {
        let this = self.clone();
        Box::pin(async move {
            this.post_json(&this.generation_url, &request, this.generation_timeout)
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_urls() {
        let oracle = HuggingFaceOracle::new(&OracleConfig::new("hf_test")).unwrap();
        assert_eq!(
            oracle.classification_url().as_str(),
            "https://api-inference.huggingface.co/models/facebook/bart-large-mnli"
        );
        assert_eq!(
            oracle.generation_url().as_str(),
            "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium"
        );
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let config = OracleConfig::new("hf_test").with_base_url("http://localhost:8080/models");
        let oracle = HuggingFaceOracle::new(&config).unwrap();
        assert_eq!(
            oracle.classification_url().as_str(),
            "http://localhost:8080/models/facebook/bart-large-mnli"
        );
    }

    #[test]
    fn test_missing_credential() {
        assert!(matches!(
            HuggingFaceOracle::new(&OracleConfig::new("  ")),
            Err(OracleError::NotConfigured)
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = OracleConfig::new("hf_test").with_base_url("not a url");
        assert!(matches!(
            HuggingFaceOracle::new(&config),
            Err(OracleError::InvalidUrl(_))
        ));
    }
}
