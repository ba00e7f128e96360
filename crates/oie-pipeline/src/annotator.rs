//! Annotator implementations
//!
//! `HttpAnnotator` talks to a spaCy-style annotation service that answers
//! `{"text", "model"}` with the JSON token layout read by
//! [`oie_parser::JsonParser`]. `PreAnnotated` serves a fixed stream.

use std::time::Duration;

use async_trait::async_trait;
use oie_core::{AnnotatorConfig, Annotator, OieError, Result, TokenStream};
use oie_parser::JsonParser;
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
    model: &'a str,
}

/// HTTP annotation service client
pub struct HttpAnnotator {
    client: Client,
    url: String,
    model: String,
}

impl HttpAnnotator {
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            model: model.into(),
        }
    }

    /// Create from config
    pub fn from_config(config: &AnnotatorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OieError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Annotator for HttpAnnotator {
    async fn annotate(&self, text: &str) -> Result<TokenStream> {
        let request = AnnotateRequest {
            text,
            model: &self.model,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OieError::Annotation(format!("Annotation request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OieError::Annotation(format!(
                "Annotation service error: {error_text}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OieError::Annotation(format!("Failed to parse annotation: {e}")))?;

        JsonParser
            .parse_value(body)
            .map_err(|e| OieError::Annotation(e.to_string()))
    }
}

/// Annotator that ignores its input and returns a prepared stream
#[derive(Debug, Clone, Default)]
pub struct PreAnnotated {
    tokens: TokenStream,
}

impl PreAnnotated {
    pub fn new(tokens: TokenStream) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl Annotator for PreAnnotated {
    async fn annotate(&self, _text: &str) -> Result<TokenStream> {
        Ok(self.tokens.clone())
    }
}
