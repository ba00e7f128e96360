//! OIE Parser - Readers for pre-annotated token streams
//!
//! Supports:
//! - CoNLL-U (one token per line, tab-separated columns)
//! - JSON (`{"tokens": [...]}`, including spaCy `Doc.to_json()` output)
//!
//! Each parser implements the `AnnotationParser` trait and produces a
//! `TokenStream` ready for triplet extraction.

use std::path::Path;

use oie_core::TokenStream;
use thiserror::Error;

pub mod conllu;
pub mod json;

pub use conllu::ConlluParser;
pub use json::JsonParser;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while reading annotated input
#[derive(Error, Debug)]
pub enum ParserError {
    /// File format is not supported
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CoNLL-U line
    #[error("CoNLL-U error at line {line}: {message}")]
    Conllu { line: usize, message: String },

    /// Malformed JSON document
    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// File Types
// ============================================================================

/// Supported annotation formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Conllu,
    Json,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "conllu" | "conll" => Self::Conllu,
            "json" => Self::Json,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conllu => write!(f, "conllu"),
            Self::Json => write!(f, "json"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// Parser Trait
// ============================================================================

/// Trait for annotation readers
pub trait AnnotationParser: Send + Sync {
    /// Parse annotated content held in memory
    fn parse_str(&self, content: &str) -> Result<TokenStream>;

    /// Get supported file types
    fn supported_types(&self) -> &[FileType];

    /// Parse an annotated file
    fn parse(&self, path: &Path) -> Result<TokenStream> {
        let content = std::fs::read_to_string(path).map_err(|e| ParserError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        self.parse_str(&content)
    }

    /// Check if this parser can handle a file type
    fn can_parse(&self, file_type: FileType) -> bool {
        self.supported_types().contains(&file_type)
    }
}

// ============================================================================
// Parser Registry
// ============================================================================

/// Registry of available parsers
pub struct ParserRegistry {
    parsers: Vec<Box<dyn AnnotationParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registry with every built-in parser
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ConlluParser);
        registry.register(JsonParser);
        registry
    }

    /// Register a parser
    pub fn register<P: AnnotationParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Find a parser for a file type
    pub fn find_parser(&self, file_type: FileType) -> Option<&dyn AnnotationParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(file_type))
            .map(|p| p.as_ref())
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path) -> Result<TokenStream> {
        let file_type = FileType::from_path(path);

        if file_type == FileType::Unknown {
            return Err(ParserError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none")
                    .to_string(),
            ));
        }

        let parser = self
            .find_parser(file_type)
            .ok_or_else(|| ParserError::UnsupportedFormat(file_type.to_string()))?;

        parser.parse(path)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Parse an annotated file, picking the reader from its extension
pub fn parse_file(path: impl AsRef<Path>) -> Result<TokenStream> {
    ParserRegistry::with_defaults().parse(path.as_ref())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_extension("conllu"), FileType::Conllu);
        assert_eq!(FileType::from_extension("CONLL"), FileType::Conllu);
        assert_eq!(FileType::from_extension("json"), FileType::Json);
        assert_eq!(FileType::from_extension("txt"), FileType::Unknown);
        assert_eq!(
            FileType::from_path(Path::new("pages/Donald Trump.conllu")),
            FileType::Conllu
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_file("notes.txt").unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_parse_file_dispatch() {
        let mut file = tempfile::Builder::new()
            .suffix(".conllu")
            .tempfile()
            .unwrap();
        writeln!(file, "1\tParis\tParis\tPROPN\tNNP\t_\t0\tROOT\t_\t_").unwrap();

        let stream = parse_file(file.path()).unwrap();
        assert_eq!(stream.len(), 1);
        assert!(stream.get(0).unwrap().is_root());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file("/nonexistent/doc.json").unwrap_err();
        assert!(matches!(err, ParserError::IoError { .. }));
    }
}
