//! Batched file classification over the chat endpoint
//!
//! The request carries only file names, extensions and sizes; responses are
//! materialized into closed types so structurally-invalid payloads fail the
//! batch instead of leaking untyped maps into the pipeline.

use super::client::{ChatMessage, OllamaClient};
use crate::db::LearnedRule;
use crate::error::{FiloError, Result};
use crate::scan::FileRecord;
use serde::{Deserialize, Serialize};

/// Most learned rules to include in the system prompt
pub const MAX_PROMPT_RULES: usize = 20;

/// Parsed classification response for one batch
#[derive(Debug, Clone, Deserialize)]
pub struct BatchClassification {
    #[serde(default)]
    pub classifications: Vec<FileClassification>,
}

/// Classification of a single file as returned by the model
#[derive(Debug, Clone, Deserialize)]
pub struct FileClassification {
    #[serde(default)]
    pub filename: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_subcategory")]
    pub subcategory: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

fn default_subcategory() -> String {
    "Other".to_string()
}

fn default_confidence() -> f64 {
    0.5
}

impl OllamaClient {
    /// Classify a batch of files, consulting learned rules as hints
    pub async fn classify_files(
        &self,
        files: &[FileRecord],
        rules: &[LearnedRule],
    ) -> Result<BatchClassification> {
        let messages = [
            ChatMessage::system(build_system_prompt(rules)),
            ChatMessage::user(build_user_prompt(files)?),
        ];

        let response = self.chat(&messages, true).await?;
        parse_batch_response(&response)
    }
}

fn build_system_prompt(rules: &[LearnedRule]) -> String {
    let mut prompt = String::from(
        "You are a file-classification assistant. Classify files by what \
their names mean, understanding purpose and context.

Principles:
1. Classify by name semantics, not the extension alone
2. Identify project, client and domain names
3. Watch for dates, version numbers and keywords
4. Group related files under the same category

Suggested top-level categories:
- Documents: contracts, reports, proposals, notes, resumes
- Images: photos, screenshots, designs, icons
- Videos: movies, tutorials, recordings, meetings
- Audio: music, voice memos, podcasts
- Code: sources, configs, scripts
- Archives: backups, bundles
- Installers: software, tools
- Data: spreadsheets, databases, exports

You must return valid JSON.",
    );

    if !rules.is_empty() {
        prompt.push_str("\n\nLearned classification rules (prefer these):\n");
        for rule in rules.iter().take(MAX_PROMPT_RULES) {
            prompt.push_str(&format!(
                "- \u{ab}{}\u{bb} \u{2192} {}/{}\n",
                rule.pattern, rule.category, rule.subcategory
            ));
        }
    }

    prompt
}

fn build_user_prompt(files: &[FileRecord]) -> Result<String> {
    #[derive(Serialize)]
    struct FileEntry<'a> {
        name: &'a str,
        extension: &'a str,
        size: u64,
    }

    let entries: Vec<FileEntry<'_>> = files
        .iter()
        .map(|f| FileEntry {
            name: &f.name,
            extension: &f.extension,
            size: f.size,
        })
        .collect();
    let files_json = serde_json::to_string_pretty(&entries)?;

    Ok(format!(
        r#"Classify the following {} files:

{}

Return JSON in this format:
{{
  "classifications": [
    {{
      "filename": "file name",
      "category": "main category",
      "subcategory": "subcategory",
      "confidence": 0.95,
      "reasoning": "why",
      "keywords": ["keyword"]
    }}
  ]
}}"#,
        files.len(),
        files_json
    ))
}

/// Parse a chat response: strict JSON first, then the longest `{...}`
/// substring to shed any prose the model wrapped around it
fn parse_batch_response(response: &str) -> Result<BatchClassification> {
    if let Ok(batch) = serde_json::from_str::<BatchClassification>(response) {
        return Ok(batch);
    }

    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if start < end {
            if let Ok(batch) = serde_json::from_str::<BatchClassification>(&response[start..=end])
            {
                return Ok(batch);
            }
        }
    }

    Err(FiloError::Llm(
        "could not parse classification response".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, category: &str, subcategory: &str) -> LearnedRule {
        LearnedRule {
            id: 1,
            pattern: pattern.to_string(),
            pattern_type: "keyword".to_string(),
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            priority: 10,
            hit_count: 1,
        }
    }

    #[test]
    fn test_parse_strict_json() {
        let batch = parse_batch_response(
            r#"{"classifications":[{"filename":"a.pdf","category":"Documents","subcategory":"Reports","confidence":0.9,"reasoning":"","keywords":["report"]}]}"#,
        )
        .unwrap();
        assert_eq!(batch.classifications.len(), 1);
        assert_eq!(batch.classifications[0].category, "Documents");
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let batch = parse_batch_response(
            "Sure, here you go:\n{\"classifications\":[{\"filename\":\"a.pdf\",\"category\":\"Documents\"}]}\nHope that helps!",
        )
        .unwrap();
        assert_eq!(batch.classifications.len(), 1);
        // Missing fields take the closed defaults
        assert_eq!(batch.classifications[0].subcategory, "Other");
        assert!((batch.classifications[0].confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_batch_response("I cannot classify these files.").is_err());
        assert!(parse_batch_response("{not json}").is_err());
    }

    #[test]
    fn test_system_prompt_includes_rules_capped() {
        let rules: Vec<LearnedRule> = (0..30)
            .map(|i| rule(&format!("kw{}", i), "Documents", "Reports"))
            .collect();
        let prompt = build_system_prompt(&rules);
        assert!(prompt.contains("\u{ab}kw0\u{bb} \u{2192} Documents/Reports"));
        assert!(prompt.contains("kw19"));
        assert!(!prompt.contains("kw20"));
    }

    #[test]
    fn test_user_prompt_carries_name_extension_size() {
        let files = vec![FileRecord {
            path: "/tmp/invoice_2024.pdf".into(),
            name: "invoice_2024.pdf".to_string(),
            extension: ".pdf".to_string(),
            size: 1024,
            modified: std::time::SystemTime::UNIX_EPOCH,
            is_dir: false,
        }];
        let prompt = build_user_prompt(&files).unwrap();
        assert!(prompt.contains("invoice_2024.pdf"));
        assert!(prompt.contains("\".pdf\""));
        assert!(prompt.contains("1024"));
        assert!(prompt.contains("\"classifications\""));
    }
}
