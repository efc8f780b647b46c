//! Classification history operations

use super::schema::{now, Database};
use crate::error::Result;
use rusqlite::params;

/// One row of classification history
#[derive(Debug, Clone)]
pub struct ClassificationRecord {
    pub id: i64,
    pub filename: String,
    pub extension: String,
    pub category: String,
    pub subcategory: String,
    pub confidence: f64,
    pub keywords: Vec<String>,
    pub user_confirmed: bool,
    pub source: String,
    pub created_at: String,
}

impl Database {
    /// Insert a classification row, returning its id
    #[allow(clippy::too_many_arguments)]
    pub fn add_classification(
        &self,
        filename: &str,
        extension: &str,
        category: &str,
        subcategory: &str,
        source: &str,
        confidence: f64,
        keywords: &[String],
        user_confirmed: bool,
    ) -> Result<i64> {
        let keywords_json = serde_json::to_string(keywords)?;
        self.conn.execute(
            "INSERT INTO history (filename, extension, category, subcategory, confidence, keywords, user_confirmed, source, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                filename,
                extension,
                category,
                subcategory,
                confidence,
                keywords_json,
                user_confirmed,
                source,
                now()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Mark a classification row as user-confirmed
    pub fn confirm_classification(&self, id: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE history SET user_confirmed = 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    /// Confirmed history rows whose lowercased filename contains at least
    /// one keyword of length >= 2, newest first.
    ///
    /// Keywords shorter than two bytes are ignored; with none left the
    /// result is empty.
    pub fn get_similar_classifications(
        &self,
        keywords: &[String],
        limit: usize,
    ) -> Result<Vec<ClassificationRecord>> {
        let usable: Vec<String> = keywords
            .iter()
            .filter(|kw| kw.len() >= 2)
            .map(|kw| format!("%{}%", kw.to_lowercase()))
            .collect();
        if usable.is_empty() {
            return Ok(Vec::new());
        }

        let conditions = vec!["LOWER(filename) LIKE ?"; usable.len()].join(" OR ");
        let query = format!(
            "SELECT id, filename, extension, category, subcategory, confidence, keywords, user_confirmed, source, created_at
             FROM history
             WHERE user_confirmed = 1 AND ({})
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
            conditions
        );

        let mut stmt = self.conn.prepare(&query)?;
        let mut args: Vec<&dyn rusqlite::ToSql> =
            usable.iter().map(|p| p as &dyn rusqlite::ToSql).collect();
        let limit = limit as i64;
        args.push(&limit);

        let records = stmt
            .query_map(args.as_slice(), scan_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn scan_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClassificationRecord> {
    let keywords_json: String = row.get(6)?;
    Ok(ClassificationRecord {
        id: row.get(0)?,
        filename: row.get(1)?,
        extension: row.get(2)?,
        category: row.get(3)?,
        subcategory: row.get(4)?,
        confidence: row.get(5)?,
        keywords: serde_json::from_str(&keywords_json).unwrap_or_default(),
        user_confirmed: row.get(7)?,
        source: row.get(8)?,
        created_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    #[test]
    fn test_add_and_recall() {
        let db = test_db();
        let id = db
            .add_classification(
                "invoice_2024.pdf",
                ".pdf",
                "Documents",
                "Finance",
                "llm",
                0.8,
                &["invoice".to_string(), "2024".to_string()],
                true,
            )
            .unwrap();
        assert!(id > 0);

        let records = db
            .get_similar_classifications(&["invoice".to_string()], 5)
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "Documents");
        assert_eq!(records[0].keywords, vec!["invoice", "2024"]);
    }

    #[test]
    fn test_similar_is_confirmed_only() {
        let db = test_db();
        db.add_classification(
            "invoice_a.pdf",
            ".pdf",
            "Documents",
            "",
            "llm",
            0.8,
            &["invoice".to_string()],
            false,
        )
        .unwrap();

        let records = db
            .get_similar_classifications(&["invoice".to_string()], 5)
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_short_keywords_ignored() {
        let db = test_db();
        db.add_classification(
            "a_file.txt",
            ".txt",
            "Documents",
            "",
            "llm",
            0.8,
            &[],
            true,
        )
        .unwrap();

        let records = db
            .get_similar_classifications(&["a".to_string()], 5)
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_newest_first() {
        let db = test_db();
        for name in ["report_v1.doc", "report_v2.doc", "report_v3.doc"] {
            db.add_classification(name, ".doc", "Documents", "", "llm", 0.9, &[], true)
                .unwrap();
        }

        let records = db
            .get_similar_classifications(&["report".to_string()], 2)
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].filename, "report_v3.doc");
    }

    #[test]
    fn test_confirm_classification() {
        let db = test_db();
        let id = db
            .add_classification("x_notes.md", ".md", "Documents", "", "llm", 0.5, &[], false)
            .unwrap();
        db.confirm_classification(id).unwrap();

        let records = db
            .get_similar_classifications(&["notes".to_string()], 5)
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].user_confirmed);
    }
}
