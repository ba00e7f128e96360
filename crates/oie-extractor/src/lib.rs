//! OIE Extractor - Triplet extraction from annotated tokens
//!
//! Implements two rule-based extractors over a `TokenStream`:
//! - POS pattern: proper-noun runs separated by a verb-bearing span
//! - Dependency pattern: subject/object heads attached to a shared verb
//!   or through a preposition
//!
//! plus an LLM-backed extractor and evaluation metrics.

use oie_core::{TokenStream, Triplet};
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod dependency;
pub mod llm;
pub mod metrics;
pub mod pos;
pub mod proper_noun;

pub use builder::{build_triplet, contains_verb};
pub use dependency::{DependencyPattern, DependencyPatternExtractor};
pub use llm::{LlmExtraction, LlmExtractorConfig, LlmTripletExtractor};
pub use metrics::{AggregateMetrics, Evaluator, ExtractorComparison, TripletMetrics};
pub use pos::{PosPatternExtractor, PosScanner};
pub use proper_noun::{proper_noun_sequences, ProperNounSequences};

/// Trait for rule-based triplet extractors
///
/// Extraction is total: any finite stream, including an empty one,
/// yields a (possibly empty) list.
pub trait TripletExtractor: Send + Sync {
    fn extract(&self, tokens: &TokenStream) -> Vec<Triplet>;

    /// Get extractor name for logging
    fn name(&self) -> &'static str;
}

/// Rule-based extraction methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Pos,
    Dependency,
}

impl ExtractionMethod {
    pub const ALL: [ExtractionMethod; 2] = [Self::Pos, Self::Dependency];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pos => "pos",
            Self::Dependency => "dependency",
        }
    }

    /// Create the extractor for this method
    pub fn extractor(&self) -> Box<dyn TripletExtractor> {
        match self {
            Self::Pos => Box::new(PosPatternExtractor),
            Self::Dependency => Box::new(DependencyPatternExtractor),
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExtractionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pos" => Ok(Self::Pos),
            "dep" | "dependency" => Ok(Self::Dependency),
            other => Err(format!("unknown extraction method: {other}")),
        }
    }
}
