//! Model performance telemetry and adaptive model selection

use super::schema::{now, Database};
use crate::error::Result;
use rusqlite::params;
use std::cmp::Ordering;

/// Minimum files a model must have processed before it can be recommended
const MIN_FILES_FOR_RECOMMENDATION: i64 = 10;

/// Aggregate performance of one model across all its batches
#[derive(Debug, Clone)]
pub struct ModelSummary {
    pub model_name: String,
    pub total_batches: i64,
    pub total_files: i64,
    pub avg_time_per_file_ms: f64,
    pub avg_confidence: f64,
    pub total_confirmed: i64,
    pub total_corrected: i64,
    pub accuracy_rate: f64,
    pub score: f64,
    pub last_used: String,
}

impl Database {
    /// Record telemetry for one classification batch
    pub fn add_model_stats(
        &self,
        model_name: &str,
        batch_id: &str,
        file_count: usize,
        total_time_ms: i64,
        avg_confidence: f64,
    ) -> Result<()> {
        let avg_time_per_file = if file_count > 0 {
            total_time_ms as f64 / file_count as f64
        } else {
            0.0
        };

        self.conn.execute(
            "INSERT INTO model_stats (model_name, batch_id, file_count, total_time_ms, avg_time_per_file_ms, avg_confidence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                model_name,
                batch_id,
                file_count as i64,
                total_time_ms,
                avg_time_per_file,
                avg_confidence,
                now()
            ],
        )?;
        Ok(())
    }

    /// Apply confirmation/correction deltas to a batch and recompute its
    /// accuracy rate from the cumulative counts
    pub fn update_model_accuracy(
        &self,
        batch_id: &str,
        confirmed: i64,
        corrected: i64,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE model_stats
             SET confirmed_count = confirmed_count + ?1,
                 corrected_count = corrected_count + ?2
             WHERE batch_id = ?3",
            params![confirmed, corrected, batch_id],
        )?;
        self.conn.execute(
            "UPDATE model_stats
             SET accuracy_rate = CAST(confirmed_count AS REAL) / (confirmed_count + corrected_count)
             WHERE batch_id = ?1 AND confirmed_count + corrected_count > 0",
            params![batch_id],
        )?;
        Ok(())
    }

    /// Per-model aggregates with the composite score, best first.
    ///
    /// score = 0.5 * accuracy + 0.3 * confidence + 0.2 * speed, where
    /// speed = clamp(1 - avg_ms_per_file / 1000, 0, 1). Models without any
    /// feedback fall back to their average confidence as accuracy.
    pub fn get_model_summaries(&self) -> Result<Vec<ModelSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT model_name,
                    COUNT(*) as total_batches,
                    SUM(file_count) as total_files,
                    AVG(avg_time_per_file_ms) as avg_time_per_file,
                    AVG(avg_confidence) as avg_confidence,
                    SUM(confirmed_count) as total_confirmed,
                    SUM(corrected_count) as total_corrected,
                    MAX(created_at) as last_used
             FROM model_stats
             GROUP BY model_name",
        )?;

        let mut summaries = stmt
            .query_map([], |row| {
                let mut s = ModelSummary {
                    model_name: row.get(0)?,
                    total_batches: row.get(1)?,
                    total_files: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                    avg_time_per_file_ms: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
                    avg_confidence: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
                    total_confirmed: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
                    total_corrected: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
                    accuracy_rate: 0.0,
                    score: 0.0,
                    last_used: row.get(7)?,
                };

                let feedback = s.total_confirmed + s.total_corrected;
                s.accuracy_rate = if feedback > 0 {
                    s.total_confirmed as f64 / feedback as f64
                } else {
                    s.avg_confidence
                };

                let speed_score = (1.0 - s.avg_time_per_file_ms / 1000.0).clamp(0.0, 1.0);
                s.score = s.accuracy_rate * 0.5 + s.avg_confidence * 0.3 + speed_score * 0.2;
                Ok(s)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        summaries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Ok(summaries)
    }

    /// Highest-scoring model that has seen enough files, if any
    pub fn get_best_model(&self) -> Result<Option<String>> {
        let summaries = self.get_model_summaries()?;
        Ok(summaries
            .into_iter()
            .find(|s| s.total_files >= MIN_FILES_FOR_RECOMMENDATION)
            .map(|s| s.model_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    /// Seed a model with one batch and explicit feedback counts
    fn seed_model(
        db: &Database,
        model: &str,
        batch: &str,
        files: usize,
        avg_ms: f64,
        avg_conf: f64,
        confirmed: i64,
        corrected: i64,
    ) {
        db.add_model_stats(model, batch, files, (avg_ms * files as f64) as i64, avg_conf)
            .unwrap();
        if confirmed + corrected > 0 {
            db.update_model_accuracy(batch, confirmed, corrected).unwrap();
        }
    }

    #[test]
    fn test_score_ranking() {
        let db = test_db();
        // Model A: accuracy 0.9, confidence 0.8, 500 ms -> 0.45+0.24+0.10 = 0.79
        seed_model(&db, "model-a", "b1", 10, 500.0, 0.8, 9, 1);
        // Model B: accuracy 0.7, confidence 0.9, 200 ms -> 0.35+0.27+0.16 = 0.78
        seed_model(&db, "model-b", "b2", 10, 200.0, 0.9, 7, 3);

        let summaries = db.get_model_summaries().unwrap();
        assert_eq!(summaries[0].model_name, "model-a");
        assert!((summaries[0].score - 0.79).abs() < 1e-9);
        assert!((summaries[1].score - 0.78).abs() < 1e-9);

        assert_eq!(db.get_best_model().unwrap().as_deref(), Some("model-a"));
    }

    #[test]
    fn test_best_model_needs_enough_files() {
        let db = test_db();
        seed_model(&db, "tiny", "b1", 3, 100.0, 0.95, 3, 0);
        assert!(db.get_best_model().unwrap().is_none());

        seed_model(&db, "tiny", "b2", 7, 100.0, 0.95, 7, 0);
        assert_eq!(db.get_best_model().unwrap().as_deref(), Some("tiny"));
    }

    #[test]
    fn test_accuracy_recomputed_from_cumulative_counts() {
        let db = test_db();
        db.add_model_stats("m", "b1", 5, 1000, 0.8).unwrap();

        db.update_model_accuracy("b1", 1, 0).unwrap();
        db.update_model_accuracy("b1", 1, 0).unwrap();
        db.update_model_accuracy("b1", 0, 1).unwrap();

        let accuracy: f64 = db
            .conn
            .query_row(
                "SELECT accuracy_rate FROM model_stats WHERE batch_id = 'b1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!((accuracy - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_falls_back_to_confidence() {
        let db = test_db();
        seed_model(&db, "fresh", "b1", 12, 300.0, 0.6, 0, 0);

        let summaries = db.get_model_summaries().unwrap();
        assert!((summaries[0].accuracy_rate - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_speed_score_clamped() {
        let db = test_db();
        // 2000 ms per file: speed score clamps to 0 rather than going negative
        seed_model(&db, "slow", "b1", 10, 2000.0, 1.0, 10, 0);

        let summaries = db.get_model_summaries().unwrap();
        assert!((summaries[0].score - 0.8).abs() < 1e-9);
    }
}
