//! OIE Core - Token, triplet and collaborator types
//!
//! This crate defines the core abstractions used throughout the OIE system:
//! - Annotated token streams (POS tags, dependency labels, head links)
//! - Triplet records
//! - Common error types
//! - Collaborator traits (document retrieval, annotation, LLM)
//! - Configuration management

pub mod config;
pub mod token;
pub mod triplet;

pub use config::{
    AnnotatorConfig, AppConfig, ConfigError, LlmConfig, LlmProvider, LoggingConfig,
    PipelineConfig, SourceConfig,
};
pub use token::{dep, Pos, Token, TokenStream, TokenStreamBuilder};
pub use triplet::Triplet;

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for OIE operations
#[derive(Error, Debug)]
pub enum OieError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Ambiguous page {title}: may refer to {}", .options.join(", "))]
    Disambiguation { title: String, options: Vec<String> },

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Annotation error: {0}")]
    Annotation(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OieError {
    /// Errors that abort a single document but not a whole run
    pub fn is_document_failure(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Disambiguation { .. }
                | Self::Retrieval(_)
                | Self::Annotation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OieError>;

// ============================================================================
// Traits
// ============================================================================

/// Trait for document retrieval (e.g. encyclopedia pages by title)
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw text of a document
    async fn fetch(&self, title: &str) -> Result<String>;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Trait for linguistic annotation of raw text
#[async_trait::async_trait]
pub trait Annotator: Send + Sync {
    /// Tag and parse raw text into a token stream
    async fn annotate(&self, text: &str) -> Result<TokenStream>;
}

/// Trait for LLM clients
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response
    async fn generate(&self, prompt: &str) -> Result<String>;
}

// ============================================================================
// Tests
// ============================================================================
