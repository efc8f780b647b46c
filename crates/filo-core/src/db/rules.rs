//! Learned rule operations
//!
//! Rules are patterns extracted from user-confirmed classifications. Only
//! keyword and extension kinds are produced and consulted; the column is
//! free text so foreign rows are tolerated.

use super::schema::{now, Database};
use crate::error::Result;
use rusqlite::params;
use std::collections::{HashMap, HashSet};

/// Kind of pattern a rule matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Keyword,
    Extension,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Keyword => "keyword",
            PatternKind::Extension => "extension",
        }
    }
}

/// One learned rule row
#[derive(Debug, Clone)]
pub struct LearnedRule {
    pub id: i64,
    pub pattern: String,
    pub pattern_type: String,
    pub category: String,
    pub subcategory: String,
    pub priority: i64,
    pub hit_count: i64,
}

impl Database {
    /// Upsert a rule on `(pattern, kind, category)`: existing rows gain a
    /// hit and keep the higher priority, new rows start at hit_count 1.
    pub fn add_or_update_rule(
        &self,
        pattern: &str,
        kind: PatternKind,
        category: &str,
        subcategory: &str,
        priority: i64,
    ) -> Result<()> {
        let pattern = pattern.to_lowercase();

        let affected = self.conn.execute(
            "UPDATE rules
             SET hit_count = hit_count + 1,
                 priority = MAX(priority, ?1),
                 updated_at = ?2
             WHERE pattern = ?3 AND pattern_type = ?4 AND category = ?5",
            params![priority, now(), pattern, kind.as_str(), category],
        )?;

        if affected == 0 {
            self.conn.execute(
                "INSERT INTO rules (pattern, pattern_type, category, subcategory, priority, hit_count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
                params![pattern, kind.as_str(), category, subcategory, priority, now()],
            )?;
        }
        Ok(())
    }

    /// Rules matching a file: up to 3 extension rules with `pattern = ext`
    /// plus, per keyword of length >= 2, up to 3 keyword rules whose pattern
    /// occurs in the lowercased filename. Deduplicated by (pattern, category).
    pub fn get_matching_rules(
        &self,
        filename: &str,
        keywords: &[String],
        extension: &str,
    ) -> Result<Vec<LearnedRule>> {
        let filename = filename.to_lowercase();
        let extension = extension.to_lowercase();
        let mut rules = Vec::new();

        if !extension.is_empty() {
            let mut stmt = self.conn.prepare(
                "SELECT id, pattern, pattern_type, category, subcategory, priority, hit_count
                 FROM rules
                 WHERE pattern_type = 'extension' AND pattern = ?1
                 ORDER BY priority DESC, hit_count DESC
                 LIMIT 3",
            )?;
            rules.extend(
                stmt.query_map(params![extension], scan_rule)?
                    .collect::<std::result::Result<Vec<_>, _>>()?,
            );
        }

        // The keyword sub-query matches patterns against the filename, so
        // running it once per usable keyword only produces duplicates; one
        // pass behind the length gate yields the identical deduped set.
        if keywords.iter().any(|kw| kw.len() >= 2) {
            let mut stmt = self.conn.prepare(
                "SELECT id, pattern, pattern_type, category, subcategory, priority, hit_count
                 FROM rules
                 WHERE pattern_type = 'keyword' AND ?1 LIKE '%' || pattern || '%'
                 ORDER BY priority DESC, hit_count DESC
                 LIMIT 3",
            )?;
            rules.extend(
                stmt.query_map(params![filename], scan_rule)?
                    .collect::<std::result::Result<Vec<_>, _>>()?,
            );
        }

        let mut seen = HashSet::new();
        rules.retain(|r| seen.insert((r.pattern.clone(), r.category.clone())));
        Ok(rules)
    }

    /// Most-used rules, for feeding back to the LLM prompt
    pub fn get_top_rules(&self, limit: usize) -> Result<Vec<LearnedRule>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, pattern, pattern_type, category, subcategory, priority, hit_count
             FROM rules
             WHERE hit_count >= 1
             ORDER BY hit_count DESC, priority DESC
             LIMIT ?1",
        )?;
        let rules = stmt
            .query_map(params![limit as i64], scan_rule)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rules)
    }

    /// Candidate categories for a file, highest weight first, capped at 5.
    ///
    /// Weights accumulate from keyword rules (hit_count), extension rules
    /// (2x hit_count) and confirmed history rows containing a keyword.
    pub fn get_candidate_categories(
        &self,
        keywords: &[String],
        extension: &str,
    ) -> Result<Vec<String>> {
        let mut weights: HashMap<String, i64> = HashMap::new();

        for kw in keywords.iter().filter(|kw| kw.len() >= 2) {
            let kw = kw.to_lowercase();
            let mut stmt = self.conn.prepare(
                "SELECT category, hit_count
                 FROM rules
                 WHERE pattern = ?1 OR pattern LIKE ?2
                 ORDER BY hit_count DESC
                 LIMIT 3",
            )?;
            let rows = stmt
                .query_map(params![kw, format!("%{}%", kw)], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            for (cat, count) in rows {
                *weights.entry(cat).or_insert(0) += count;
            }
        }

        if !extension.is_empty() {
            let mut stmt = self.conn.prepare(
                "SELECT category, hit_count
                 FROM rules
                 WHERE pattern_type = 'extension' AND pattern = ?1
                 ORDER BY hit_count DESC
                 LIMIT 3",
            )?;
            let rows = stmt
                .query_map(params![extension.to_lowercase()], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            for (cat, count) in rows {
                // Extension hits carry double weight
                *weights.entry(cat).or_insert(0) += count * 2;
            }
        }

        for kw in keywords.iter().filter(|kw| kw.len() >= 2) {
            let mut stmt = self.conn.prepare(
                "SELECT category, COUNT(*) as cnt
                 FROM history
                 WHERE user_confirmed = 1 AND LOWER(filename) LIKE ?1
                 GROUP BY category
                 ORDER BY cnt DESC
                 LIMIT 3",
            )?;
            let rows = stmt
                .query_map(params![format!("%{}%", kw.to_lowercase())], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            for (cat, count) in rows {
                *weights.entry(cat).or_insert(0) += count;
            }
        }

        let mut scored: Vec<(String, i64)> = weights.into_iter().collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(scored.into_iter().take(5).map(|(cat, _)| cat).collect())
    }
}

fn scan_rule(row: &rusqlite::Row<'_>) -> rusqlite::Result<LearnedRule> {
    Ok(LearnedRule {
        id: row.get(0)?,
        pattern: row.get(1)?,
        pattern_type: row.get(2)?,
        category: row.get(3)?,
        subcategory: row.get(4)?,
        priority: row.get(5)?,
        hit_count: row.get(6)?,
    })
}
