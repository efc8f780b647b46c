//! User feedback operations

use super::schema::{now, Database};
use crate::error::Result;
use rusqlite::params;

impl Database {
    /// Record a user correction of a classification result
    pub fn add_feedback(
        &self,
        filename: &str,
        original_category: &str,
        corrected_category: &str,
        original_subcategory: &str,
        corrected_subcategory: &str,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO feedback (filename, original_category, corrected_category, original_subcategory, corrected_subcategory, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                filename,
                original_category,
                corrected_category,
                original_subcategory,
                corrected_subcategory,
                now()
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_feedback() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();

        db.add_feedback("draft.doc", "Documents", "Work", "", "Proposals")
            .unwrap();

        let count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
