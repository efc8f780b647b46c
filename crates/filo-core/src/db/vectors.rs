//! Vector storage operations
//!
//! Filename embeddings stored as little-endian f64 blobs; cosine scoring
//! happens in Rust over a pre-filtered candidate pool.

use super::schema::{now, Database};
use crate::error::Result;
use rusqlite::params;

/// One stored filename embedding
#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub filename: String,
    pub category: String,
    pub subcategory: String,
    pub vector: Vec<f64>,
}

impl Database {
    /// Store a filename embedding with its classification
    pub fn save_vector(
        &self,
        filename: &str,
        category: &str,
        subcategory: &str,
        vector: &[f64],
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO vectors (filename, category, subcategory, vector, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                filename,
                category,
                subcategory,
                vector_to_bytes(vector),
                now()
            ],
        )?;
        Ok(())
    }

    /// Most recent vectors, unfiltered
    pub fn search_vectors(&self, limit: usize) -> Result<Vec<VectorRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT filename, category, subcategory, vector
             FROM vectors
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;
        let records = stmt
            .query_map(params![limit as i64], scan_vector)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Most recent vectors restricted to the given categories
    pub fn search_vectors_by_categories(
        &self,
        categories: &[String],
        limit: usize,
    ) -> Result<Vec<VectorRecord>> {
        if categories.is_empty() {
            return self.search_vectors(limit);
        }

        let placeholders = vec!["?"; categories.len()].join(",");
        let query = format!(
            "SELECT filename, category, subcategory, vector
             FROM vectors
             WHERE category IN ({})
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
            placeholders
        );

        let mut stmt = self.conn.prepare(&query)?;
        let mut args: Vec<&dyn rusqlite::ToSql> = categories
            .iter()
            .map(|c| c as &dyn rusqlite::ToSql)
            .collect();
        let limit = limit as i64;
        args.push(&limit);

        let records = stmt
            .query_map(args.as_slice(), scan_vector)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Vectors for the categories this extension usually lands in,
    /// falling through to the unfiltered pool when history has nothing.
    pub fn search_vectors_by_extension(
        &self,
        extension: &str,
        limit: usize,
    ) -> Result<Vec<VectorRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT category
             FROM history
             WHERE extension = ?1 AND user_confirmed = 1
             GROUP BY category
             ORDER BY COUNT(*) DESC
             LIMIT 5",
        )?;
        let categories = stmt
            .query_map(params![extension], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if categories.is_empty() {
            return self.search_vectors(limit);
        }
        self.search_vectors_by_categories(&categories, limit)
    }
}

fn scan_vector(row: &rusqlite::Row<'_>) -> rusqlite::Result<VectorRecord> {
    let bytes: Vec<u8> = row.get(3)?;
    Ok(VectorRecord {
        filename: row.get(0)?,
        category: row.get(1)?,
        subcategory: row.get(2)?,
        vector: bytes_to_vector(&bytes),
    })
}

/// Convert f64 vector to bytes (little-endian)
pub fn vector_to_bytes(vector: &[f64]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to an f64 vector
pub fn bytes_to_vector(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut arr = [0u8; 8];
            arr.copy_from_slice(chunk);
            f64::from_le_bytes(arr)
        })
        .collect()
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
    fn test_vector_bytes_roundtrip() {
        let original = vec![1.0f64, -2.5, 0.0, 1e-12];
        assert_eq!(bytes_to_vector(&vector_to_bytes(&original)), original);
    }

    #[test]
    fn test_save_and_search() {
        let db = test_db();
        db.save_vector("a.sh", "Code", "Scripts", &[0.5, 0.5]).unwrap();
        db.save_vector("b.pdf", "Documents", "", &[1.0, 0.0]).unwrap();

        let all = db.search_vectors(10).unwrap();
        assert_eq!(all.len(), 2);
        // Newest first
        assert_eq!(all[0].filename, "b.pdf");
        assert_eq!(all[0].vector, vec![1.0, 0.0]);
    }

    #[test]
    fn test_search_by_categories_filters() {
        let db = test_db();
        db.save_vector("a.sh", "Code", "Scripts", &[0.5, 0.5]).unwrap();
        db.save_vector("b.pdf", "Documents", "", &[1.0, 0.0]).unwrap();

        let code = db
            .search_vectors_by_categories(&["Code".to_string()], 10)
            .unwrap();
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].filename, "a.sh");

        // Empty filter falls through to unfiltered
        let all = db.search_vectors_by_categories(&[], 10).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_search_by_extension_uses_history() {
        let db = test_db();
        db.save_vector("a.sh", "Code", "Scripts", &[0.5, 0.5]).unwrap();
        db.save_vector("b.pdf", "Documents", "", &[1.0, 0.0]).unwrap();
        db.add_classification("c.sh", ".sh", "Code", "Scripts", "llm", 0.9, &[], true)
            .unwrap();

        let hits = db.search_vectors_by_extension(".sh", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "Code");

        // Unknown extension falls through to the unfiltered pool
        let fallback = db.search_vectors_by_extension(".xyz", 10).unwrap();
        assert_eq!(fallback.len(), 2);
    }
}
