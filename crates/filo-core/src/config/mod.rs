//! Configuration management
//!
//! Persistent JSON configuration at `<home>/.filo/config.json`. The loaded
//! value is threaded immutably into constructors; command-line overrides are
//! applied before any engine component is built.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat model used for classification
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Model used for the optional LLM-backed embedder
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Base URL of the Ollama service
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Sampling temperature for classification requests
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Generation cap for chat requests
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whether classification results feed back into the memory store
    #[serde(default = "default_enable_learning")]
    pub enable_learning: bool,

    /// Gating threshold for tier short-circuit decisions
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Results below this confidence are surfaced for interactive review
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Minimum confirmed samples before a pattern is promoted to a rule
    #[serde(default = "default_min_samples_for_rule")]
    pub min_samples_for_rule: u32,

    /// Number of files per LLM classification batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_llm_model() -> String {
    "qwen3:8b".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_enable_learning() -> bool {
    true
}

fn default_similarity_threshold() -> f64 {
    0.85
}

fn default_confidence_threshold() -> f64 {
    0.7
}

fn default_min_samples_for_rule() -> u32 {
    3
}

fn default_batch_size() -> usize {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_model: default_llm_model(),
            embedding_model: default_embedding_model(),
            ollama_url: default_ollama_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            enable_learning: default_enable_learning(),
            similarity_threshold: default_similarity_threshold(),
            confidence_threshold: default_confidence_threshold(),
            min_samples_for_rule: default_min_samples_for_rule(),
            batch_size: default_batch_size(),
        }
    }
}

impl Config {
    /// Load config from the default path, falling back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override the chat model (applied before the classifier is built)
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.llm_model = model.into();
    }
}

/// Data directory holding the database and config file.
///
/// `FILO_DATA_DIR` overrides the default `<home>/.filo`, which keeps
/// integration tests away from real user state.
pub fn data_dir() -> PathBuf {
    std::env::var("FILO_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(crate::DATA_DIR_NAME)
        })
}

/// Default database path
pub fn db_path() -> PathBuf {
    data_dir().join("memory.db")
}

/// Default config file path
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}
