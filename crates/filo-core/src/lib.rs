//! Filo Core Library
//!
//! The adaptive classification engine behind the `filo` organizer.
//!
//! # Features
//! - Three-tier decision pipeline: learned rules, vector similarity, history
//! - SQLite-backed learning memory that improves with confirmations
//! - Ollama LLM fallback with batched JSON-mode classification
//! - Plan generation and per-file atomic execution with undo
//! - Adaptive model recommendation from accumulated telemetry

pub mod classify;
pub mod config;
pub mod db;
pub mod embed;
pub mod error;
pub mod llm;
pub mod memory;
pub mod organize;
pub mod scan;

pub use classify::{
    extension_of, extract_keywords, Classification, Classifier, Source, Statistics,
};
pub use config::Config;
pub use db::{
    BatchSummary, ClassificationRecord, Database, LearnedRule, MemoryStatistics, ModelSummary,
    OpStatus, OperationLog, PatternKind, VectorRecord,
};
pub use embed::{cosine_similarity, Embedder, LocalEmbedder, OllamaEmbedder};
pub use error::{exit_codes, Error, FiloError, Result};
pub use llm::{BatchClassification, ChatMessage, FileClassification, OllamaClient};
pub use memory::{Memory, TierMatch};
pub use organize::{
    execute, generate_plan, resolve_collision, undo_batch, ExecuteOutcome, Learner, MoveOutcome,
    Plan, UndoOutcome,
};
pub use scan::{collect_statistics, scan_directory, FileRecord, ScanStatistics};

/// Data directory name under the user's home
pub const DATA_DIR_NAME: &str = ".filo";
