//! Centralized configuration management for rustbot
//!
//! Configuration follows a simple hierarchy:
//! 1. Safe defaults (defined as constants)
//! 2. Optional TOML file
//! 3. `RUSTBOT_*` environment variable overrides
//! 4. Runtime validation
//!
//! Every crate that needs settings takes its section from here, so the
//! chunking budget, model names and index name are defined exactly once.

pub mod error;
pub mod source;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use source::{ConfigurationLoader, ConfigurationSource, EnvironmentSource, TomlFileSource};
pub use validation::Validate;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// SAFE DEFAULTS
// =============================================================================

// Chunking Configuration (whitespace-delimited words)
const DEFAULT_CHUNK_TOKEN_TARGET: usize = 600;
const DEFAULT_CHUNK_MAX_TOKENS: usize = 2047; // embeddinggemma context is 2048

// Embedding Configuration
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_EMBEDDING_MODEL: &str = "embeddinggemma";
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;
const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 8;
const DEFAULT_EMBEDDING_TIMEOUT_SECONDS: u64 = 60;

// Vector Storage Configuration
const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
const DEFAULT_COLLECTION_NAME: &str = "rust-docs";
const DEFAULT_VECTOR_TIMEOUT_SECONDS: u64 = 30;

// Ingestion Configuration
const DEFAULT_KNOWLEDGE_BASE_DIR: &str = "kb";
const DEFAULT_DOCUMENT_EXTENSION: &str = "md";

// Search Configuration
const DEFAULT_SEARCH_NUM_HITS: usize = 6; // 6 * ~600 words fits the chat context
const DEFAULT_MINIMUM_SIMILARITY: f32 = 0.5;
const DEFAULT_SEARCH_TIMEOUT_SECONDS: u64 = 30;

// Chat Configuration
const DEFAULT_CHAT_MODEL: &str = "gemma3";
const DEFAULT_CHATS_DIR: &str = "chats";
const DEFAULT_CHAT_TIMEOUT_SECONDS: u64 = 300;

// Telemetry Configuration
const DEFAULT_TRACING_LEVEL: &str = "info";

/// Core configuration for the whole application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Document splitting budget
    pub chunking: ChunkingConfig,

    /// Embedding service configuration
    pub embedding: EmbeddingConfig,

    /// Vector index configuration
    pub vector_storage: VectorStorageConfig,

    /// Knowledge-base ingestion configuration
    pub indexing: IndexingConfig,

    /// Retrieval configuration
    pub search: SearchConfig,

    /// Chat model configuration
    pub chat: ChatConfig,

    /// Logging configuration
    pub telemetry: TelemetryConfig,
}

/// What the heading splitter does with siblings that follow an oversized block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiblingPolicy {
    /// Return as soon as the first oversized block has been split further;
    /// later siblings at that level are dropped
    #[default]
    ShortCircuit,

    /// Split every oversized block and keep all siblings
    Exhaustive,
}

impl std::fmt::Display for SiblingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ShortCircuit => "short_circuit",
            Self::Exhaustive => "exhaustive",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SiblingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "short_circuit" => Ok(Self::ShortCircuit),
            "exhaustive" => Ok(Self::Exhaustive),
            _ => Err(ConfigError::InvalidValue {
                field: "chunking.sibling_policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Word budget for the document chunker
///
/// `token_target` is the soft threshold after which a chunk is closed at the
/// next sentence end; `max_tokens` is the hard ceiling. Both count
/// whitespace-delimited words, a cheap proxy for model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Soft threshold in words
    pub token_target: usize,

    /// Hard ceiling in words, must be greater than `token_target`
    pub max_tokens: usize,

    /// Handling of siblings after an oversized heading block
    pub sibling_policy: SiblingPolicy,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            token_target: DEFAULT_CHUNK_TOKEN_TARGET,
            max_tokens: DEFAULT_CHUNK_MAX_TOKENS,
            sibling_policy: SiblingPolicy::default(),
        }
    }
}

impl ChunkingConfig {
    /// Create a budget, rejecting `max_tokens <= token_target`
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBudget` or `ConfigError::OutOfRange` when
    /// the budget is unusable
    pub fn new(token_target: usize, max_tokens: usize) -> ConfigResult<Self> {
        let config = Self {
            token_target,
            max_tokens,
            sibling_policy: SiblingPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Builder method to set the sibling policy
    #[must_use]
    pub const fn with_sibling_policy(mut self, sibling_policy: SiblingPolicy) -> Self {
        self.sibling_policy = sibling_policy;
        self
    }

    fn apply_overrides(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(v) = parsed(lookup, "RUSTBOT_CHUNKING_TOKEN_TARGET") {
            self.token_target = v;
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_CHUNKING_MAX_TOKENS") {
            self.max_tokens = v;
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_CHUNKING_SIBLING_POLICY") {
            self.sibling_policy = v;
        }
    }
}

impl Validate for ChunkingConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_range(self.token_target as u64, 1, 100_000, "chunking.token_target")?;
        if self.max_tokens <= self.token_target {
            return Err(ConfigError::InvalidBudget {
                token_target: self.token_target,
                max_tokens: self.max_tokens,
            });
        }
        Ok(())
    }
}

/// Embedding service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL of the Ollama-compatible embedding server
    pub base_url: String,

    /// Embedding model name (e.g. "embeddinggemma")
    pub model: String,

    /// Length of every vector the model returns
    pub dimensions: usize,

    /// Number of texts sent per embedding request
    pub batch_size: usize,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
            timeout_seconds: DEFAULT_EMBEDDING_TIMEOUT_SECONDS,
        }
    }
}

impl EmbeddingConfig {
    fn apply_overrides(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("RUSTBOT_EMBEDDING_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("RUSTBOT_EMBEDDING_MODEL") {
            self.model = v;
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_EMBEDDING_DIMENSIONS") {
            self.dimensions = v;
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_EMBEDDING_BATCH_SIZE") {
            self.batch_size = v;
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_EMBEDDING_TIMEOUT_SECONDS") {
            self.timeout_seconds = v;
        }
    }
}

impl Validate for EmbeddingConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_url(&self.base_url, "embedding.base_url")?;
        validation::validate_non_empty(&self.model, "embedding.model")?;
        validation::validate_range(self.dimensions as u64, 1, 10_000, "embedding.dimensions")?;
        validation::validate_range(self.batch_size as u64, 1, 1000, "embedding.batch_size")?;
        validation::validate_range(self.timeout_seconds, 1, 3600, "embedding.timeout_seconds")?;
        Ok(())
    }
}

/// Vector storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStorageConfig {
    /// Qdrant server URL
    pub url: String,

    /// Collection (index) name
    pub collection_name: String,

    /// Vector dimensions
    pub vector_dimension: usize,

    /// Connection timeout in seconds
    pub timeout_seconds: u64,

    /// Optional API key for authenticated deployments
    pub api_key: Option<String>,
}

impl Default for VectorStorageConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_QDRANT_URL.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            vector_dimension: DEFAULT_EMBEDDING_DIMENSIONS,
            timeout_seconds: DEFAULT_VECTOR_TIMEOUT_SECONDS,
            api_key: None,
        }
    }
}

impl VectorStorageConfig {
    fn apply_overrides(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("RUSTBOT_VECTOR_STORAGE_URL") {
            self.url = v;
        }
        if let Some(v) = lookup("RUSTBOT_VECTOR_STORAGE_COLLECTION_NAME") {
            self.collection_name = v;
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_VECTOR_STORAGE_DIMENSION") {
            self.vector_dimension = v;
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_VECTOR_STORAGE_TIMEOUT_SECONDS") {
            self.timeout_seconds = v;
        }
        if let Some(v) = lookup("RUSTBOT_VECTOR_STORAGE_API_KEY") {
            self.api_key = Some(v);
        }
    }
}

impl Validate for VectorStorageConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_url(&self.url, "vector_storage.url")?;
        validation::validate_non_empty(&self.collection_name, "vector_storage.collection_name")?;
        validation::validate_range(
            self.vector_dimension as u64,
            1,
            10_000,
            "vector_storage.vector_dimension",
        )?;
        validation::validate_range(self.timeout_seconds, 1, 3600, "vector_storage.timeout_seconds")?;
        Ok(())
    }
}

/// Knowledge-base ingestion configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Directory holding the markdown documents
    pub knowledge_base_dir: PathBuf,

    /// File extension (without dot) of documents to ingest
    pub extension: String,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            knowledge_base_dir: PathBuf::from(DEFAULT_KNOWLEDGE_BASE_DIR),
            extension: DEFAULT_DOCUMENT_EXTENSION.to_string(),
        }
    }
}

impl IndexingConfig {
    fn apply_overrides(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("RUSTBOT_INDEXING_KNOWLEDGE_BASE_DIR") {
            self.knowledge_base_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("RUSTBOT_INDEXING_EXTENSION") {
            self.extension = v.trim_start_matches('.').to_string();
        }
    }
}

impl Validate for IndexingConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty(
            &self.knowledge_base_dir.to_string_lossy(),
            "indexing.knowledge_base_dir",
        )?;
        validation::validate_non_empty(&self.extension, "indexing.extension")?;
        Ok(())
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of nearest neighbours requested per question
    pub num_hits: usize,

    /// Hits scoring at or below this are not used as knowledge
    pub minimum_similarity: f32,

    /// Overall timeout for one search in seconds
    pub timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_hits: DEFAULT_SEARCH_NUM_HITS,
            minimum_similarity: DEFAULT_MINIMUM_SIMILARITY,
            timeout_seconds: DEFAULT_SEARCH_TIMEOUT_SECONDS,
        }
    }
}

impl SearchConfig {
    fn apply_overrides(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(v) = parsed(lookup, "RUSTBOT_SEARCH_NUM_HITS") {
            self.num_hits = v;
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_SEARCH_MINIMUM_SIMILARITY") {
            self.minimum_similarity = v;
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_SEARCH_TIMEOUT_SECONDS") {
            self.timeout_seconds = v;
        }
    }
}

impl Validate for SearchConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_range(self.num_hits as u64, 1, 100, "search.num_hits")?;
        validation::validate_unit_interval(self.minimum_similarity, "search.minimum_similarity")?;
        validation::validate_range(self.timeout_seconds, 1, 3600, "search.timeout_seconds")?;
        Ok(())
    }
}

/// Chat model configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Base URL of the Ollama-compatible chat server
    pub base_url: String,

    /// Chat model name (e.g. "gemma3")
    pub model: String,

    /// Directory receiving conversation transcripts
    pub chats_dir: PathBuf,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            chats_dir: PathBuf::from(DEFAULT_CHATS_DIR),
            timeout_seconds: DEFAULT_CHAT_TIMEOUT_SECONDS,
        }
    }
}

impl ChatConfig {
    fn apply_overrides(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("RUSTBOT_CHAT_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("RUSTBOT_CHAT_MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("RUSTBOT_CHAT_CHATS_DIR") {
            self.chats_dir = PathBuf::from(v);
        }
        if let Some(v) = parsed(lookup, "RUSTBOT_CHAT_TIMEOUT_SECONDS") {
            self.timeout_seconds = v;
        }
    }
}

impl Validate for ChatConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_url(&self.base_url, "chat.base_url")?;
        validation::validate_non_empty(&self.model, "chat.model")?;
        validation::validate_range(self.timeout_seconds, 1, 3600, "chat.timeout_seconds")?;
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Tracing level (trace, debug, info, warn, error)
    pub tracing_level: String,

    /// Directory for rolling log files (OS-specific default when unset)
    pub log_dir: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            tracing_level: DEFAULT_TRACING_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

impl TelemetryConfig {
    fn apply_overrides(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("RUSTBOT_TELEMETRY_TRACING_LEVEL") {
            self.tracing_level = v;
        }
        if let Some(v) = lookup("RUSTBOT_TELEMETRY_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(v));
        }
    }

    /// Log directory, falling back to the user data directory
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("rustbot").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

impl Validate for TelemetryConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.tracing_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::Generic {
                message: format!("Invalid tracing level: {}", self.tracing_level),
            }),
        }
    }
}

impl ApplicationConfig {
    /// Defaults with `RUSTBOT_*` environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Apply `RUSTBOT_*` process environment variables on top of `self`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(&|key| std::env::var(key).ok());
    }

    /// Apply overrides read through `lookup`, keyed by environment variable name
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides_from(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        self.chunking.apply_overrides(lookup);
        self.embedding.apply_overrides(lookup);
        self.vector_storage.apply_overrides(lookup);
        self.indexing.apply_overrides(lookup);
        self.search.apply_overrides(lookup);
        self.chat.apply_overrides(lookup);
        self.telemetry.apply_overrides(lookup);
    }

    /// Render the effective configuration as TOML
    ///
    /// # Errors
    /// Returns `ConfigError::TomlSerialization` if rendering fails
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Validate for ApplicationConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.chunking.validate()?;
        self.embedding.validate()?;
        self.vector_storage.validate()?;
        self.indexing.validate()?;
        self.search.validate()?;
        self.chat.validate()?;
        self.telemetry.validate()?;

        // Cross-field validation - embedding dimension must match vector storage
        if self.embedding.dimensions != self.vector_storage.vector_dimension {
            return Err(ConfigError::Generic {
                message: format!(
                    "Embedding dimension ({}) must match vector storage dimension ({})",
                    self.embedding.dimensions, self.vector_storage.vector_dimension
                ),
            });
        }

        Ok(())
    }
}

fn parsed<T: FromStr>(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key = %key, value = %raw, "Ignoring unparseable configuration override");
            None
        }
    }
}
