//! LLM-based triplet extraction
//!
//! Asks a language model to list triplets for a page title. The reply is
//! unstructured: it is split into lines and counted, nothing more.

use oie_core::LlmClient;
use serde::{Deserialize, Serialize};

/// Placeholder replaced with the page title in the prompt template
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Configuration for LLM-based extraction
#[derive(Debug, Clone)]
pub struct LlmExtractorConfig {
    /// Prompt template containing [`PAGE_PLACEHOLDER`]
    pub prompt_template: String,
}

impl Default for LlmExtractorConfig {
    fn default() -> Self {
        Self {
            prompt_template: include_str!("prompts/triplets.txt").to_string(),
        }
    }
}

/// Raw lines returned by the model for one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmExtraction {
    pub lines: Vec<String>,
}

impl LlmExtraction {
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// LLM-based triplet extractor
pub struct LlmTripletExtractor {
    pub config: LlmExtractorConfig,
}

impl LlmTripletExtractor {
    /// Create a new extractor with the default prompt
    pub fn new() -> Self {
        Self {
            config: LlmExtractorConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: LlmExtractorConfig) -> Self {
        Self { config }
    }

    /// Build the extraction prompt for a page
    pub fn build_prompt(&self, page_title: &str) -> String {
        self.config
            .prompt_template
            .replace(PAGE_PLACEHOLDER, page_title)
    }

    /// Split a model reply into trimmed lines.
    ///
    /// Blank lines inside the reply are kept; a blank reply has no lines.
    pub fn split_response(response: &str) -> Vec<String> {
        if response.trim().is_empty() {
            return Vec::new();
        }
        response
            .split('\n')
            .map(|line| line.trim().to_string())
            .collect()
    }

    /// Ask the model for triplets about a page.
    ///
    /// Model failures and empty replies yield an empty extraction and a
    /// warning; they never fail the caller.
    pub async fn extract(&self, client: &dyn LlmClient, page_title: &str) -> LlmExtraction {
        let prompt = self.build_prompt(page_title);
        tracing::debug!(page = page_title, "Calling LLM with prompt length: {} chars", prompt.len());

        match client.generate(&prompt).await {
            Ok(response) => {
                let lines = Self::split_response(&response);
                if lines.is_empty() {
                    tracing::warn!(page = page_title, "LLM returned an empty response");
                }
                LlmExtraction { lines }
            }
            Err(e) => {
                tracing::warn!(page = page_title, error = %e, "LLM extraction failed");
                LlmExtraction::default()
            }
        }
    }
}

impl Default for LlmTripletExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
