//! OIE Pipeline - Document extraction orchestrator
//!
//! Runs the full extraction flow for a list of page titles:
//! - Retrieve the page text from a `DocumentSource`
//! - Annotate it into a token stream
//! - Apply the POS-pattern and dependency-pattern extractors
//! - Optionally ask an LLM for its own triplet listing
//!
//! Documents are processed with bounded concurrency and reported in
//! input order. A failing document is recorded and skipped.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use oie_core::{
    AppConfig, Annotator, DocumentSource, LlmClient, OieError, PipelineConfig, Result,
    TokenStream, Triplet,
};
use oie_extractor::{
    DependencyPatternExtractor, LlmTripletExtractor, PosPatternExtractor, TripletExtractor,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod annotator;
pub mod llm;
pub mod wikipedia;

pub use annotator::{HttpAnnotator, PreAnnotated};
pub use llm::{create_llm_client, GeminiClient, OllamaClient, OpenAiClient};
pub use wikipedia::{strip_headings, DirectorySource, WikipediaSource};

// ============================================================================
// Reports
// ============================================================================

/// Extraction result for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub id: Uuid,
    pub title: String,
    pub pos_triplets: Vec<Triplet>,
    pub dependency_triplets: Vec<Triplet>,
    /// Raw LLM lines; `None` when no LLM was consulted
    pub llm_lines: Option<Vec<String>>,
    pub token_count: usize,
    pub extracted_at: DateTime<Utc>,
}

impl DocumentReport {
    pub fn pos_count(&self) -> usize {
        self.pos_triplets.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependency_triplets.len()
    }

    pub fn llm_count(&self) -> Option<usize> {
        self.llm_lines.as_ref().map(Vec::len)
    }
}

/// A document that could not be processed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub title: String,
    pub error: String,
}

/// Result of a multi-document run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub documents: Vec<DocumentReport>,
    pub failures: Vec<DocumentFailure>,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for doc in &self.documents {
            writeln!(f, "--- {} ---", doc.title)?;
            writeln!(f, "Number of POS Based Triplets: {}", doc.pos_count())?;
            writeln!(
                f,
                "Number of Dependency Based Triplets: {}",
                doc.dependency_count()
            )?;
            if let Some(count) = doc.llm_count() {
                writeln!(f, "Number of LLM Triplets: {count}")?;
            }
            writeln!(f)?;
        }
        for failure in &self.failures {
            writeln!(f, "--- {} ---", failure.title)?;
            writeln!(f, "Failed: {}", failure.error)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Retrieval, annotation and extraction for a batch of titles
pub struct ExtractionPipeline {
    /// Page text provider
    source: Arc<dyn DocumentSource>,

    /// Tagger and dependency parser
    annotator: Arc<dyn Annotator>,

    /// LLM client (optional)
    llm_client: Option<Arc<dyn LlmClient>>,

    /// Prompting for the LLM listing
    llm_extractor: LlmTripletExtractor,

    /// Configuration
    config: PipelineConfig,
}

impl ExtractionPipeline {
    /// Create a new pipeline
    pub fn new(
        source: Arc<dyn DocumentSource>,
        annotator: Arc<dyn Annotator>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            annotator,
            llm_client: None,
            llm_extractor: LlmTripletExtractor::new(),
            config,
        }
    }

    /// Build every collaborator from application config.
    ///
    /// A local directory in the source config takes precedence over the
    /// Wikipedia API. The LLM client is only created when enabled.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source: Arc<dyn DocumentSource> = match &config.source.local_dir {
            Some(dir) => Arc::new(DirectorySource::new(dir)),
            None => Arc::new(WikipediaSource::from_config(&config.source)?),
        };
        let annotator = Arc::new(HttpAnnotator::from_config(&config.annotator)?);

        let mut pipeline = Self::new(source, annotator, config.pipeline.clone());
        if config.pipeline.llm_enabled {
            pipeline = pipeline.with_llm_client(Arc::from(create_llm_client(&config.llm)?));
        }
        Ok(pipeline)
    }

    /// Set the LLM client
    pub fn with_llm_client(mut self, client: Arc<dyn LlmClient>) -> Self {
        self.llm_client = Some(client);
        self
    }

    /// Set a custom LLM extractor (prompt template)
    pub fn with_llm_extractor(mut self, extractor: LlmTripletExtractor) -> Self {
        self.llm_extractor = extractor;
        self
    }

    fn llm(&self) -> Option<&dyn LlmClient> {
        if self.config.llm_enabled {
            self.llm_client.as_deref()
        } else {
            None
        }
    }

    /// Process one page
    pub async fn run_document(&self, title: &str) -> Result<DocumentReport> {
        let start_time = Instant::now();
        tracing::info!(title, source = self.source.name(), "Document extraction started");

        let text = self.source.fetch(title).await?;
        tracing::debug!(title, "Fetched {} chars", text.len());

        let tokens = self.annotator.annotate(&text).await?;
        tracing::debug!(title, "Annotated {} tokens", tokens.len());

        let token_count = tokens.len();
        let (pos_triplets, dependency_triplets) = extract_rule_based(tokens).await?;
        tracing::debug!(
            title,
            pos = pos_triplets.len(),
            dependency = dependency_triplets.len(),
            "Rule-based extraction completed"
        );

        let llm_lines = match self.llm() {
            Some(client) => Some(self.llm_extractor.extract(client, title).await.lines),
            None => None,
        };

        tracing::info!(
            title,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Document extraction completed"
        );

        Ok(DocumentReport {
            id: Uuid::new_v4(),
            title: title.to_string(),
            pos_triplets,
            dependency_triplets,
            llm_lines,
            token_count,
            extracted_at: Utc::now(),
        })
    }

    /// Process pages in input order, at most `concurrency` at a time
    pub async fn run<I, S>(&self, titles: I) -> RunReport
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let concurrency = self.config.concurrency.max(1);

        let results: Vec<(String, Result<DocumentReport>)> =
            stream::iter(titles.into_iter().map(Into::into))
                .map(|title: String| async move {
                    let result = self.run_document(&title).await;
                    (title, result)
                })
                .buffered(concurrency)
                .collect()
                .await;

        let mut report = RunReport::default();
        for (title, result) in results {
            match result {
                Ok(doc) => report.documents.push(doc),
                Err(e) => {
                    log_failure(&title, &e);
                    report.failures.push(DocumentFailure {
                        title,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            documents = report.documents.len(),
            failures = report.failures.len(),
            "Run completed"
        );
        report
    }
}

fn log_failure(title: &str, error: &OieError) {
    if error.is_document_failure() {
        tracing::warn!(title, error = %error, "Skipping document");
    } else {
        tracing::error!(title, error = %error, "Document extraction failed");
    }
}

/// Run both rule-based extractors off the async executor
async fn extract_rule_based(tokens: TokenStream) -> Result<(Vec<Triplet>, Vec<Triplet>)> {
    tokio::task::spawn_blocking(move || {
        (
            PosPatternExtractor.extract(&tokens),
            DependencyPatternExtractor.extract(&tokens),
        )
    })
    .await
    .map_err(|e| OieError::Other(e.into()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use oie_core::{dep, Pos};
    use std::collections::HashMap;
    use std::time::Duration;

    /// In-memory pages with optional per-title latency
    struct MapSource {
        pages: HashMap<String, String>,
        delays_ms: HashMap<String, u64>,
    }

    impl MapSource {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(t, p)| (t.to_string(), p.to_string()))
                    .collect(),
                delays_ms: HashMap::new(),
            }
        }
    }

    #[async_trait]
    impl DocumentSource for MapSource {
        async fn fetch(&self, title: &str) -> Result<String> {
            if let Some(ms) = self.delays_ms.get(title) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            match title {
                "Mercury" => Err(OieError::Disambiguation {
                    title: title.to_string(),
                    options: vec!["Mercury (planet)".to_string()],
                }),
                _ => self
                    .pages
                    .get(title)
                    .cloned()
                    .ok_or_else(|| OieError::NotFound(title.to_string())),
            }
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    struct CannedLlm;

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok("(\"Brad Pitt\", \"married\", \"Angelina Jolie\")\n(\"Brad Pitt\", \"born in\", \"Shawnee\")".to_string())
        }
    }

    fn pitt_jolie() -> TokenStream {
        TokenStream::builder()
            .token("Brad", Pos::Propn, dep::COMPOUND, Some(1))
            .token("Pitt", Pos::Propn, dep::NSUBJ, Some(2))
            .token("married", Pos::Verb, dep::ROOT, Some(2))
            .token("Angelina", Pos::Propn, dep::COMPOUND, Some(4))
            .token("Jolie", Pos::Propn, dep::DOBJ, Some(2))
            .build()
    }

    fn pipeline(source: MapSource, config: PipelineConfig) -> ExtractionPipeline {
        ExtractionPipeline::new(
            Arc::new(source),
            Arc::new(PreAnnotated::new(pitt_jolie())),
            config,
        )
    }

    #[tokio::test]
    async fn test_run_document() {
        let p = pipeline(
            MapSource::new(&[("Brad Pitt", "Brad Pitt married Angelina Jolie")]),
            PipelineConfig::default(),
        );

        let report = p.run_document("Brad Pitt").await.unwrap();
        assert_eq!(report.title, "Brad Pitt");
        assert_eq!(report.token_count, 5);
        assert_eq!(
            report.pos_triplets,
            vec![Triplet::new("Brad Pitt", "married", "Angelina Jolie")]
        );
        assert_eq!(report.pos_triplets, report.dependency_triplets);
        assert_eq!(report.llm_count(), None);
    }

    #[tokio::test]
    async fn test_failures_are_skipped() {
        let p = pipeline(
            MapSource::new(&[("Brad Pitt", "text")]),
            PipelineConfig::default(),
        );

        let report = p.run(["Mercury", "Brad Pitt", "Nobody"]).await;
        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.documents[0].title, "Brad Pitt");
        let failed: Vec<&str> = report.failures.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(failed, vec!["Mercury", "Nobody"]);
        assert!(report.failures[0].error.contains("Mercury (planet)"));
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn test_concurrent_run_keeps_order() {
        let titles = ["Donald Trump", "Ruth Bader Ginsburg", "J.K. Rowling", "Neil Gorsuch"];
        let mut source = MapSource::new(&titles.map(|t| (t, "text")));
        // Earlier titles take longer to fetch
        for (i, title) in titles.iter().enumerate() {
            source
                .delays_ms
                .insert(title.to_string(), 10 * (titles.len() - i) as u64);
        }

        let p = pipeline(
            source,
            PipelineConfig {
                concurrency: 4,
                ..Default::default()
            },
        );

        let report = p.run(titles).await;
        let order: Vec<&str> = report.documents.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(order, titles.to_vec());
    }

    #[tokio::test]
    async fn test_llm_lines_only_when_enabled() {
        let disabled = pipeline(
            MapSource::new(&[("Brad Pitt", "text")]),
            PipelineConfig::default(),
        )
        .with_llm_client(Arc::new(CannedLlm));
        let report = disabled.run_document("Brad Pitt").await.unwrap();
        assert_eq!(report.llm_count(), None);

        let enabled = pipeline(
            MapSource::new(&[("Brad Pitt", "text")]),
            PipelineConfig {
                llm_enabled: true,
                ..Default::default()
            },
        )
        .with_llm_client(Arc::new(CannedLlm));
        let report = enabled.run_document("Brad Pitt").await.unwrap();
        assert_eq!(report.llm_count(), Some(2));
    }

    #[tokio::test]
    async fn test_report_display() {
        let p = pipeline(
            MapSource::new(&[("Brad Pitt", "text")]),
            PipelineConfig {
                llm_enabled: true,
                ..Default::default()
            },
        )
        .with_llm_client(Arc::new(CannedLlm));

        let text = p.run(["Brad Pitt", "Nobody"]).await.to_string();
        assert!(text.contains("--- Brad Pitt ---\nNumber of POS Based Triplets: 1\n"));
        assert!(text.contains("Number of Dependency Based Triplets: 1\n"));
        assert!(text.contains("Number of LLM Triplets: 2\n"));
        assert!(text.contains("--- Nobody ---\nFailed: Page not found: Nobody"));
    }

    #[tokio::test]
    async fn test_report_serializes() {
        let p = pipeline(
            MapSource::new(&[("Brad Pitt", "text")]),
            PipelineConfig::default(),
        );
        let report = p.run(["Brad Pitt"]).await;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["documents"][0]["pos_triplets"][0]["subject"], "Brad Pitt");
        assert!(json["documents"][0]["llm_lines"].is_null());
    }
}
