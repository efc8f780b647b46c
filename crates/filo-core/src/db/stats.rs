//! Memory statistics and reset operations

use super::schema::Database;
use crate::error::Result;

/// Counters describing the learned state
#[derive(Debug, Clone, serde::Serialize)]
pub struct MemoryStatistics {
    pub total_records: i64,
    pub confirmed_records: i64,
    pub learned_rules: i64,
    pub vector_count: i64,
    pub feedback_count: i64,
    /// Top-10 categories by record count
    pub category_distribution: Vec<(String, i64)>,
}

impl Database {
    /// Counters over the learned state
    pub fn get_statistics(&self) -> Result<MemoryStatistics> {
        let count = |query: &str| -> Result<i64> {
            Ok(self.conn.query_row(query, [], |row| row.get(0))?)
        };

        let total_records = count("SELECT COUNT(*) FROM history")?;
        let confirmed_records =
            count("SELECT COUNT(*) FROM history WHERE user_confirmed = 1")?;
        let learned_rules = count("SELECT COUNT(*) FROM rules WHERE hit_count > 0")?;
        let vector_count = count("SELECT COUNT(*) FROM vectors")?;
        let feedback_count = count("SELECT COUNT(*) FROM feedback")?;

        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) as cnt
             FROM history
             GROUP BY category
             ORDER BY cnt DESC
             LIMIT 10",
        )?;
        let category_distribution = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(MemoryStatistics {
            total_records,
            confirmed_records,
            learned_rules,
            vector_count,
            feedback_count,
            category_distribution,
        })
    }

    /// Clear classification history
    pub fn reset_history(&self) -> Result<()> {
        self.conn.execute("DELETE FROM history", [])?;
        Ok(())
    }

    /// Clear learned rules
    pub fn reset_rules(&self) -> Result<()> {
        self.conn.execute("DELETE FROM rules", [])?;
        Ok(())
    }

    /// Clear stored vectors
    pub fn reset_vectors(&self) -> Result<()> {
        self.conn.execute("DELETE FROM vectors", [])?;
        Ok(())
    }

    /// Clear all learned state: history, rules, feedback, vectors, op logs
    pub fn reset_all(&self) -> Result<()> {
        for table in ["history", "rules", "feedback", "vectors", "op_logs"] {
            self.conn
                .execute(&format!("DELETE FROM {}", table), [])?;
        }
        Ok(())
    }
}
