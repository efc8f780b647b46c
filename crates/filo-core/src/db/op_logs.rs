//! Operation log, the unit of undo

use super::schema::{now, Database};
use crate::error::Result;
use rusqlite::params;

/// Outcome of one recorded file move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    Success,
    Failed,
    Undone,
}

impl OpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpStatus::Success => "success",
            OpStatus::Failed => "failed",
            OpStatus::Undone => "undone",
        }
    }
}

/// One recorded file move
#[derive(Debug, Clone)]
pub struct OperationLog {
    pub id: i64,
    pub batch_id: String,
    pub source_path: String,
    pub dest_path: String,
    pub filename: String,
    pub category: String,
    pub subcategory: String,
    pub status: String,
    pub created_at: String,
}

/// Aggregate view of one undoable batch
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub batch_id: String,
    pub file_count: i64,
    pub created_at: String,
    pub categories: String,
}

impl Database {
    /// Record one file move
    #[allow(clippy::too_many_arguments)]
    pub fn add_op_log(
        &self,
        batch_id: &str,
        source_path: &str,
        dest_path: &str,
        filename: &str,
        category: &str,
        subcategory: &str,
        status: OpStatus,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO op_logs (batch_id, source_path, dest_path, filename, category, subcategory, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                batch_id,
                source_path,
                dest_path,
                filename,
                category,
                subcategory,
                status.as_str(),
                now()
            ],
        )?;
        Ok(())
    }

    /// Recent batches that still have successful moves to reverse
    pub fn get_recent_batches(&self, limit: usize) -> Result<Vec<BatchSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT batch_id,
                    COUNT(*) as file_count,
                    MIN(created_at) as created_at,
                    GROUP_CONCAT(DISTINCT category) as categories
             FROM op_logs
             WHERE status = 'success'
             GROUP BY batch_id
             ORDER BY created_at DESC
             LIMIT ?1",
        )?;
        let batches = stmt
            .query_map(params![limit as i64], |row| {
                Ok(BatchSummary {
                    batch_id: row.get(0)?,
                    file_count: row.get(1)?,
                    created_at: row.get(2)?,
                    categories: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(batches)
    }

    /// Successful moves of one batch, in execution order
    pub fn get_batch_logs(&self, batch_id: &str) -> Result<Vec<OperationLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, batch_id, source_path, dest_path, filename, category, subcategory, status, created_at
             FROM op_logs
             WHERE batch_id = ?1 AND status = 'success'
             ORDER BY id ASC",
        )?;
        let logs = stmt
            .query_map(params![batch_id], |row| {
                Ok(OperationLog {
                    id: row.get(0)?,
                    batch_id: row.get(1)?,
                    source_path: row.get(2)?,
                    dest_path: row.get(3)?,
                    filename: row.get(4)?,
                    category: row.get(5)?,
                    subcategory: row.get(6)?,
                    status: row.get(7)?,
                    created_at: row.get(8)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Flip every row of a batch to undone in one update
    pub fn mark_batch_undone(&self, batch_id: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE op_logs SET status = 'undone' WHERE batch_id = ?1",
            params![batch_id],
        )?;
        Ok(())
    }

    /// Batch id of the most recent successful operation, if any
    pub fn get_latest_batch(&self) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT batch_id
             FROM op_logs
             WHERE status = 'success'
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
            [],
            |row| row.get(0),
        );
        match result {
            Ok(batch_id) => Ok(Some(batch_id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
