//! Database layer for filo
//!
//! SQLite-backed memory store: classification history, learned rules,
//! filename vectors, user feedback, operation logs and model telemetry.
//! Opened in WAL mode so read-only tools can observe state mid-run.

mod feedback;
mod history;
mod model_stats;
mod op_logs;
mod rules;
mod schema;
mod stats;
pub mod vectors;

pub use history::ClassificationRecord;
pub use model_stats::ModelSummary;
pub use op_logs::{BatchSummary, OpStatus, OperationLog};
pub use rules::{LearnedRule, PatternKind};
pub use schema::Database;
pub use stats::MemoryStatistics;
pub use vectors::VectorRecord;

use std::path::PathBuf;

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        crate::config::db_path()
    }
}
