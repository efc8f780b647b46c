//! The classifier: memory tiers with LLM fallback

use super::{extract_keywords, Classification, Source};
use crate::config::Config;
use crate::db::{Database, MemoryStatistics};
use crate::embed::LocalEmbedder;
use crate::error::{FiloError, Result};
use crate::llm::{OllamaClient, MAX_PROMPT_RULES};
use crate::memory::Memory;
use crate::scan::FileRecord;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Memory statistics plus the learning switch
#[derive(Debug, Clone)]
pub struct Statistics {
    pub store: MemoryStatistics,
    pub learning_enabled: bool,
}

/// Classifier combining the learning memory with the LLM gateway
pub struct Classifier<'a> {
    memory: Memory<'a>,
    db: &'a Database,
    llm: OllamaClient,
    config: Config,
    batch_id: String,
}

impl<'a> Classifier<'a> {
    /// Build a classifier over an initialized database.
    ///
    /// The batch id is assigned here and scopes both undo and model
    /// telemetry for this invocation.
    pub fn new(db: &'a Database, config: Config) -> Self {
        let memory = Memory::new(
            db,
            Box::new(LocalEmbedder::new()),
            config.similarity_threshold,
        );
        let llm = OllamaClient::new(&config);
        let batch_id = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

        Self {
            memory,
            db,
            llm,
            config,
            batch_id,
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classify files, preserving input order (directories removed).
    ///
    /// Memory tiers run per file; misses are batched to the LLM. Service
    /// and model availability are only checked once something actually
    /// needs the LLM. A failed batch degrades to per-file error results
    /// and never corrupts learned state.
    pub async fn classify(
        &self,
        files: &[FileRecord],
        progress: Option<&(dyn Fn(usize, usize) + Send + Sync)>,
    ) -> Result<Vec<Classification>> {
        let mut results = Vec::new();
        let mut deferred: Vec<FileRecord> = Vec::new();

        for file in files.iter().filter(|f| !f.is_dir) {
            match self.memory.query(&file.name).await? {
                Some(m) => results.push(Classification {
                    file: file.clone(),
                    category: m.category,
                    subcategory: m.subcategory,
                    confidence: m.confidence,
                    reasoning: m.reasoning,
                    source: m.source,
                    keywords: extract_keywords(&file.name),
                }),
                None => deferred.push(file.clone()),
            }
        }

        if !deferred.is_empty() {
            results.extend(self.classify_deferred(&deferred, progress).await?);
        }

        let order: HashMap<&Path, usize> = files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.path.as_path(), i))
            .collect();
        results.sort_by_key(|r| order.get(r.file.path.as_path()).copied().unwrap_or(usize::MAX));

        Ok(results)
    }

    /// Send memory misses to the LLM in batches
    async fn classify_deferred(
        &self,
        deferred: &[FileRecord],
        progress: Option<&(dyn Fn(usize, usize) + Send + Sync)>,
    ) -> Result<Vec<Classification>> {
        if !self.llm.is_available().await {
            return Err(FiloError::ServiceUnavailable(self.llm.base_url().to_string()));
        }
        if !self.llm.has_model(&self.config.llm_model).await {
            return Err(FiloError::ModelNotFound(self.config.llm_model.clone()));
        }

        let rules = self.memory.top_rules(MAX_PROMPT_RULES)?;
        let batch_size = self.config.batch_size.max(1);
        let start = Instant::now();

        let mut results = Vec::with_capacity(deferred.len());
        let mut processed = 0;
        for chunk in deferred.chunks(batch_size) {
            match self.llm.classify_files(chunk, &rules).await {
                Ok(batch) => {
                    for (i, file) in chunk.iter().enumerate() {
                        match batch.classifications.get(i) {
                            Some(c) => results.push(Classification {
                                file: file.clone(),
                                category: c.category.clone(),
                                subcategory: c.subcategory.clone(),
                                confidence: c.confidence.clamp(0.0, 1.0),
                                reasoning: c.reasoning.clone(),
                                source: Source::Llm,
                                keywords: c.keywords.clone(),
                            }),
                            None => results.push(error_result(
                                file,
                                "missing from model response",
                            )),
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("classification batch failed: {}", e);
                    for file in chunk {
                        results.push(error_result(file, &e.to_string()));
                    }
                }
            }

            processed += chunk.len();
            if let Some(cb) = progress {
                cb(processed, deferred.len());
            }
        }

        let elapsed_ms = start.elapsed().as_millis() as i64;
        if !results.is_empty() {
            let avg_confidence =
                results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64;
            if let Err(e) = self.db.add_model_stats(
                &self.config.llm_model,
                &self.batch_id,
                results.len(),
                elapsed_ms,
                avg_confidence,
            ) {
                tracing::warn!("could not record model stats: {}", e);
            }
        }

        if self.config.enable_learning {
            for r in results.iter().filter(|r| r.source == Source::Llm) {
                if let Err(e) = self
                    .memory
                    .learn(&r.file.name, &r.category, &r.subcategory, r.source, r.confidence, false)
                    .await
                {
                    // The decision stands even when learning fails
                    tracing::warn!("learning skipped for {}: {}", r.file.name, e);
                }
            }
        }

        Ok(results)
    }

    /// User approved a result: learn it as confirmed, and credit the
    /// batch's model when the LLM produced it
    pub async fn confirm(&self, result: &Classification) -> Result<()> {
        self.memory
            .learn(
                &result.file.name,
                &result.category,
                &result.subcategory,
                result.source,
                result.confidence,
                true,
            )
            .await?;

        if result.source == Source::Llm {
            self.db.update_model_accuracy(&self.batch_id, 1, 0)?;
        }
        Ok(())
    }

    /// User corrected a result: record feedback, learn high-priority rules
    /// against the new labels, and debit the batch's model
    pub async fn correct(
        &self,
        result: &Classification,
        category: &str,
        subcategory: &str,
    ) -> Result<()> {
        self.memory.learn_from_correction(
            &result.file.name,
            &result.category,
            category,
            &result.subcategory,
            subcategory,
        )?;

        if result.source == Source::Llm {
            self.db.update_model_accuracy(&self.batch_id, 0, 1)?;
        }
        Ok(())
    }

    /// Memory counters plus the learning switch
    pub fn get_statistics(&self) -> Result<Statistics> {
        Ok(Statistics {
            store: self.db.get_statistics()?,
            learning_enabled: self.config.enable_learning,
        })
    }
}

fn error_result(file: &FileRecord, message: &str) -> Classification {
    Classification {
        file: file.clone(),
        category: "Uncategorized".to_string(),
        subcategory: "Other".to_string(),
        confidence: 0.0,
        reasoning: format!("classification failed: {}", message),
        source: Source::Error,
        keywords: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::LocalEmbedder;
    use std::time::SystemTime;

    fn record(name: &str, is_dir: bool) -> FileRecord {
        FileRecord {
            path: Path::new("/scan").join(name),
            name: name.to_string(),
            extension: super::super::extension_of(name),
            size: 10,
            modified: SystemTime::UNIX_EPOCH,
            is_dir,
        }
    }

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    #[tokio::test]
    async fn test_order_preserved_and_dirs_skipped() {
        let db = test_db();
        let mem = Memory::new(&db, Box::new(LocalEmbedder::new()), 0.0);
        // One confirmed .pdf teaches an extension rule covering all inputs
        mem.learn("seed_notes.pdf", "Documents", "", Source::Llm, 0.9, true)
            .await
            .unwrap();

        let mut config = Config::default();
        config.similarity_threshold = 0.0;
        let classifier = Classifier::new(&db, config);

        let files = vec![
            record("zeta.pdf", false),
            record("subdir", true),
            record("alpha.pdf", false),
            record("midway.pdf", false),
        ];
        let results = classifier.classify(&files, None).await.unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.file.name.as_str()).collect();
        assert_eq!(names, vec!["zeta.pdf", "alpha.pdf", "midway.pdf"]);
        assert!(results.iter().all(|r| r.confidence >= 0.0 && r.confidence <= 1.0));
    }

    #[tokio::test]
    async fn test_deferred_files_require_the_service() {
        let db = test_db();
        let mut config = Config::default();
        config.ollama_url = "http://127.0.0.1:1".to_string();
        let classifier = Classifier::new(&db, config);

        // Empty memory: the file defers to tier D, which needs the service
        let err = classifier
            .classify(&[record("zxqfoo.bin", false)], None)
            .await
            .unwrap_err();
        assert!(matches!(err, FiloError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_no_deferred_files_never_touch_the_service() {
        let db = test_db();
        let mem = Memory::new(&db, Box::new(LocalEmbedder::new()), 0.0);
        mem.learn("report.pdf", "Documents", "", Source::Llm, 0.9, true)
            .await
            .unwrap();

        let mut config = Config::default();
        config.similarity_threshold = 0.0;
        // An unreachable service is fine as long as memory answers everything
        config.ollama_url = "http://127.0.0.1:1".to_string();
        let classifier = Classifier::new(&db, config);

        let results = classifier
            .classify(&[record("report_v2.pdf", false)], None)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, Source::Rule);
    }

    #[tokio::test]
    async fn test_confirm_learns_rules() {
        let db = test_db();
        let config = Config::default();
        let classifier = Classifier::new(&db, config);

        let result = Classification {
            file: record("invoice_2024.pdf", false),
            category: "Documents".to_string(),
            subcategory: "Finance".to_string(),
            confidence: 0.8,
            reasoning: String::new(),
            source: Source::Llm,
            keywords: vec!["invoice".to_string(), "2024".to_string()],
        };
        classifier.confirm(&result).await.unwrap();

        let stats = classifier.get_statistics().unwrap();
        assert_eq!(stats.store.total_records, 1);
        assert_eq!(stats.store.confirmed_records, 1);
        // One extension rule plus one rule per extracted keyword
        assert_eq!(stats.store.learned_rules, 3);
        assert!(stats.learning_enabled);
    }

    #[tokio::test]
    async fn test_correct_records_feedback_without_history() {
        let db = test_db();
        let classifier = Classifier::new(&db, Config::default());

        let result = Classification {
            file: record("sketch_old.psd", false),
            category: "Documents".to_string(),
            subcategory: "".to_string(),
            confidence: 0.5,
            reasoning: String::new(),
            source: Source::Llm,
            keywords: vec!["sketch".to_string()],
        };
        classifier.correct(&result, "Images", "Designs").await.unwrap();

        let stats = classifier.get_statistics().unwrap();
        assert_eq!(stats.store.feedback_count, 1);
        assert_eq!(stats.store.total_records, 0, "corrections do not touch history");
        assert!(stats.store.learned_rules > 0);
    }

    #[test]
    fn test_batch_id_shape() {
        let db = test_db();
        let classifier = Classifier::new(&db, Config::default());
        let id = classifier.batch_id();
        assert_eq!(id.len(), 15);
        assert_eq!(&id[8..9], "_");
        assert!(id[..8].chars().all(|c| c.is_ascii_digit()));
    }
}
