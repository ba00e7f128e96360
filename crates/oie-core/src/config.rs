//! OIE Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with defaults suitable for local runs against public Wikipedia.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Document retrieval configuration
    pub source: SourceConfig,

    /// Annotation service configuration
    pub annotator: AnnotatorConfig,

    /// Extraction pipeline configuration
    pub pipeline: PipelineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // LLM
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider.parse()?;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.llm.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.llm.gemini_api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            config.llm.ollama_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }

        // Sources
        if let Ok(url) = std::env::var("WIKIPEDIA_API_URL") {
            config.source.wikipedia_api_url = url;
        }
        if let Ok(url) = std::env::var("ANNOTATOR_URL") {
            config.annotator.url = url;
        }

        // Pipeline
        if let Ok(n) = std::env::var("OIE_CONCURRENCY") {
            config.pipeline.concurrency = n.parse().map_err(|_| ConfigError::InvalidValue {
                key: "OIE_CONCURRENCY".to_string(),
                value: n,
            })?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError { path, message },
            other => other,
        })
    }

    /// Parse from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        let llm_default = LlmConfig::default();

        if std::env::var("LLM_PROVIDER").is_ok() {
            self.llm.provider = env_config.llm.provider;
        }
        if env_config.llm.model != llm_default.model {
            self.llm.model = env_config.llm.model;
        }
        if env_config.llm.ollama_url != llm_default.ollama_url {
            self.llm.ollama_url = env_config.llm.ollama_url;
        }
        if env_config.source.wikipedia_api_url != SourceConfig::default().wikipedia_api_url {
            self.source.wikipedia_api_url = env_config.source.wikipedia_api_url;
        }
        if env_config.annotator.url != AnnotatorConfig::default().url {
            self.annotator.url = env_config.annotator.url;
        }
        if env_config.pipeline.concurrency != PipelineConfig::default().concurrency {
            self.pipeline.concurrency = env_config.pipeline.concurrency;
        }
        if env_config.logging.level != LoggingConfig::default().level {
            self.logging.level = env_config.logging.level;
        }

        // Always use env for secrets
        if env_config.llm.openai_api_key.is_some() {
            self.llm.openai_api_key = env_config.llm.openai_api_key;
        }
        if env_config.llm.gemini_api_key.is_some() {
            self.llm.gemini_api_key = env_config.llm.gemini_api_key;
        }

        Ok(self)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// LLM provider to use
    pub provider: LlmProvider,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL (for OpenAI-compatible servers)
    pub openai_base_url: Option<String>,

    /// Google Generative Language API key
    pub gemini_api_key: Option<String>,

    /// Gemini API base URL
    pub gemini_base_url: String,

    /// Ollama server URL
    pub ollama_url: String,

    /// Model name to use
    pub model: String,

    /// Maximum tokens for completion
    pub max_tokens: u32,

    /// Temperature for generation
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Gemini,
            openai_api_key: None,
            openai_base_url: None,
            gemini_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            model: "gemini-1.5-flash".to_string(),
            max_tokens: 4096,
            temperature: 0.1,
            timeout_secs: 120,
        }
    }
}

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAI,
    Ollama,
    Gemini,
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            "gemini" | "google" => Ok(Self::Gemini),
            _ => Err(ConfigError::InvalidValue {
                key: "LLM_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Document retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// MediaWiki action API endpoint
    pub wikipedia_api_url: String,

    /// User-Agent sent to the MediaWiki API
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Read `<title>.txt` files from this directory instead of the network
    pub local_dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            wikipedia_api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            user_agent: concat!("oie/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            local_dir: None,
        }
    }
}

/// Annotation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Endpoint accepting `{"text", "model"}` and returning tokens
    pub url: String,

    /// Pipeline/model name requested from the service
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8090/annotate".to_string(),
            model: "en_core_web_sm".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Extraction pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Documents processed concurrently
    pub concurrency: usize,

    /// Run the LLM extractor when a client is configured
    pub llm_enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            llm_enabled: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
