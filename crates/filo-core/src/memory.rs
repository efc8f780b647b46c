//! Learning memory
//!
//! Composes the database and an embedder into the three lookup tiers the
//! classifier consults before falling back to the LLM: learned rules,
//! vector similarity, confirmed history. Each tier has the same shape —
//! it either produces a match or it doesn't — which keeps them
//! independently testable and replaceable.

use crate::classify::{extension_of, extract_keywords, filename_similarity, Source};
use crate::db::{Database, LearnedRule, PatternKind};
use crate::embed::{cosine_similarity, Embedder};
use crate::error::Result;

/// Cap on the candidate vector pool per lookup
const MAX_VECTOR_CANDIDATES: usize = 200;

/// Priorities for learned rules; corrections outrank confirmations,
/// which outrank extension hints
const EXTENSION_RULE_PRIORITY: i64 = 5;
const KEYWORD_RULE_PRIORITY: i64 = 10;
const CORRECTION_RULE_PRIORITY: i64 = 20;

/// A match produced by one of the memory tiers
#[derive(Debug, Clone)]
pub struct TierMatch {
    pub category: String,
    pub subcategory: String,
    pub confidence: f64,
    pub source: Source,
    pub reasoning: String,
}

/// The learning memory behind the classifier
pub struct Memory<'a> {
    db: &'a Database,
    embedder: Box<dyn Embedder>,
    similarity_threshold: f64,
}

impl<'a> Memory<'a> {
    pub fn new(db: &'a Database, embedder: Box<dyn Embedder>, similarity_threshold: f64) -> Self {
        Self {
            db,
            embedder,
            similarity_threshold,
        }
    }

    pub fn db(&self) -> &Database {
        self.db
    }

    /// Query the tiers in order, returning the first match that clears the
    /// similarity threshold
    pub async fn query(&self, filename: &str) -> Result<Option<TierMatch>> {
        if let Some(m) = self.match_rules(filename)? {
            if m.confidence >= self.similarity_threshold {
                return Ok(Some(m));
            }
        }

        if let Some(m) = self.match_vectors(filename).await? {
            if m.confidence >= self.similarity_threshold {
                return Ok(Some(m));
            }
        }

        if let Some(m) = self.match_history(filename)? {
            if m.confidence >= self.similarity_threshold {
                return Ok(Some(m));
            }
        }

        Ok(None)
    }

    /// Tier A: learned rules.
    ///
    /// Confidence grows with the best rule's hit count, capped at 0.95.
    pub fn match_rules(&self, filename: &str) -> Result<Option<TierMatch>> {
        let keywords = extract_keywords(filename);
        let ext = extension_of(filename);

        let rules = self.db.get_matching_rules(filename, &keywords, &ext)?;
        let best = match rules.first() {
            Some(rule) => rule,
            None => return Ok(None),
        };

        let confidence = (0.60 + best.hit_count as f64 / 50.0 * 0.35).min(0.95);

        Ok(Some(TierMatch {
            category: best.category.clone(),
            subcategory: best.subcategory.clone(),
            confidence,
            source: Source::Rule,
            reasoning: format!(
                "matched rule: {} \u{ab}{}\u{bb}",
                best.pattern_type, best.pattern
            ),
        }))
    }

    /// Tier B: vector similarity over a pre-filtered candidate pool
    /// (candidate categories, then extension, then unfiltered).
    pub async fn match_vectors(&self, filename: &str) -> Result<Option<TierMatch>> {
        let query_vec = self.embedder.embed(filename).await;

        let keywords = extract_keywords(filename);
        let ext = extension_of(filename);
        let candidates = self.db.get_candidate_categories(&keywords, &ext)?;

        let vectors = if !candidates.is_empty() {
            self.db
                .search_vectors_by_categories(&candidates, MAX_VECTOR_CANDIDATES)?
        } else {
            self.db
                .search_vectors_by_extension(&ext, MAX_VECTOR_CANDIDATES)?
        };

        let best = vectors
            .iter()
            .map(|v| (v, cosine_similarity(&query_vec, &v.vector)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let (record, similarity) = match best {
            Some(hit) => hit,
            None => return Ok(None),
        };

        if similarity < self.similarity_threshold {
            return Ok(None);
        }

        Ok(Some(TierMatch {
            category: record.category.clone(),
            subcategory: record.subcategory.clone(),
            // Rounding can push the cosine of two unit vectors past 1
            confidence: similarity.min(1.0),
            source: Source::Vector,
            reasoning: format!("similar file: {}", record.filename),
        }))
    }

    /// Tier C: keyword lookup in confirmed history, scored by Jaccard
    /// similarity discounted to 0.9.
    pub fn match_history(&self, filename: &str) -> Result<Option<TierMatch>> {
        let keywords = extract_keywords(filename);
        if keywords.is_empty() {
            return Ok(None);
        }

        let records = self.db.get_similar_classifications(&keywords, 5)?;
        let best = match records.first() {
            Some(record) => record,
            None => return Ok(None),
        };

        let confidence = filename_similarity(filename, &best.filename) * 0.9;

        Ok(Some(TierMatch {
            category: best.category.clone(),
            subcategory: best.subcategory.clone(),
            confidence,
            source: Source::History,
            reasoning: format!("history record: {}", best.filename),
        }))
    }

    /// Record a classification: always a history row and a vector row;
    /// user confirmation additionally learns rules.
    pub async fn learn(
        &self,
        filename: &str,
        category: &str,
        subcategory: &str,
        source: Source,
        confidence: f64,
        user_confirmed: bool,
    ) -> Result<()> {
        let ext = extension_of(filename);
        let keywords = extract_keywords(filename);

        self.db.add_classification(
            filename,
            &ext,
            category,
            subcategory,
            source.as_str(),
            confidence,
            &keywords,
            user_confirmed,
        )?;

        let vector = self.embedder.embed(filename).await;
        self.db.save_vector(filename, category, subcategory, &vector)?;

        if user_confirmed {
            self.learn_rules(filename, category, subcategory)?;
        }

        Ok(())
    }

    fn learn_rules(&self, filename: &str, category: &str, subcategory: &str) -> Result<()> {
        let ext = extension_of(filename);
        if !ext.is_empty() {
            self.db.add_or_update_rule(
                &ext,
                PatternKind::Extension,
                category,
                subcategory,
                EXTENSION_RULE_PRIORITY,
            )?;
        }

        for kw in extract_keywords(filename) {
            if kw.len() >= 2 {
                self.db.add_or_update_rule(
                    &kw.to_lowercase(),
                    PatternKind::Keyword,
                    category,
                    subcategory,
                    KEYWORD_RULE_PRIORITY,
                )?;
            }
        }
        Ok(())
    }

    /// Learn from a user correction: a feedback row plus high-priority
    /// keyword rules against the corrected labels. History stays untouched.
    pub fn learn_from_correction(
        &self,
        filename: &str,
        original_category: &str,
        corrected_category: &str,
        original_subcategory: &str,
        corrected_subcategory: &str,
    ) -> Result<()> {
        self.db.add_feedback(
            filename,
            original_category,
            corrected_category,
            original_subcategory,
            corrected_subcategory,
        )?;

        for kw in extract_keywords(filename) {
            if kw.len() >= 2 {
                self.db.add_or_update_rule(
                    &kw.to_lowercase(),
                    PatternKind::Keyword,
                    corrected_category,
                    corrected_subcategory,
                    CORRECTION_RULE_PRIORITY,
                )?;
            }
        }
        Ok(())
    }

    /// Most-used rules for the LLM prompt
    pub fn top_rules(&self, limit: usize) -> Result<Vec<LearnedRule>> {
        self.db.get_top_rules(limit)
    }
}
