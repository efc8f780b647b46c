//! Database schema and initialization

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

/// Main database handle
pub struct Database {
    pub(crate) conn: Connection,
}

const CREATE_TABLES: &str = r#"
-- Classification history; confirmed rows feed rule learning
CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    extension TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL,
    subcategory TEXT NOT NULL DEFAULT '',
    confidence REAL NOT NULL DEFAULT 0.5,
    keywords TEXT NOT NULL DEFAULT '[]',
    user_confirmed INTEGER NOT NULL DEFAULT 0,
    source TEXT NOT NULL DEFAULT 'llm',
    created_at TEXT NOT NULL
);

-- Learned rules; pattern stored lowercase
CREATE TABLE IF NOT EXISTS rules (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pattern TEXT NOT NULL,
    pattern_type TEXT NOT NULL DEFAULT 'keyword',
    category TEXT NOT NULL,
    subcategory TEXT NOT NULL DEFAULT '',
    priority INTEGER NOT NULL DEFAULT 0,
    hit_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(pattern, pattern_type, category)
);

-- Filename embeddings; vector is a little-endian f64 blob
CREATE TABLE IF NOT EXISTS vectors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    category TEXT NOT NULL,
    subcategory TEXT NOT NULL DEFAULT '',
    vector BLOB NOT NULL,
    created_at TEXT NOT NULL
);

-- User corrections of classification results
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    original_category TEXT,
    corrected_category TEXT NOT NULL,
    original_subcategory TEXT NOT NULL DEFAULT '',
    corrected_subcategory TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

-- File moves, the unit of undo
CREATE TABLE IF NOT EXISTS op_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    batch_id TEXT NOT NULL,
    source_path TEXT NOT NULL,
    dest_path TEXT NOT NULL,
    filename TEXT NOT NULL,
    category TEXT NOT NULL,
    subcategory TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'success',
    created_at TEXT NOT NULL
);

-- Per-batch model telemetry for adaptive model selection
CREATE TABLE IF NOT EXISTS model_stats (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    model_name TEXT NOT NULL,
    batch_id TEXT NOT NULL,
    file_count INTEGER NOT NULL DEFAULT 0,
    total_time_ms INTEGER NOT NULL DEFAULT 0,
    avg_time_per_file_ms REAL NOT NULL DEFAULT 0,
    avg_confidence REAL NOT NULL DEFAULT 0,
    confirmed_count INTEGER NOT NULL DEFAULT 0,
    corrected_count INTEGER NOT NULL DEFAULT 0,
    accuracy_rate REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_history_filename ON history(filename);
CREATE INDEX IF NOT EXISTS idx_history_category ON history(category);
CREATE INDEX IF NOT EXISTS idx_history_confirmed ON history(user_confirmed);
CREATE INDEX IF NOT EXISTS idx_rules_pattern ON rules(pattern);
CREATE INDEX IF NOT EXISTS idx_rules_category ON rules(category);
CREATE INDEX IF NOT EXISTS idx_vectors_category ON vectors(category);
CREATE INDEX IF NOT EXISTS idx_vectors_subcategory ON vectors(subcategory);
CREATE INDEX IF NOT EXISTS idx_op_logs_batch ON op_logs(batch_id);
CREATE INDEX IF NOT EXISTS idx_op_logs_time ON op_logs(created_at);
CREATE INDEX IF NOT EXISTS idx_model_stats_name ON model_stats(model_name);
CREATE INDEX IF NOT EXISTS idx_model_stats_time ON model_stats(created_at);
"#;

impl Database {
    /// Open database at path, creating parent directories if necessary
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Initialize schema; idempotent against databases created by any
    /// version sharing the same table shapes
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        self.conn.execute_batch(CREATE_TABLES)?;

        Ok(())
    }
}

/// Current timestamp in the format stored in every table
pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
