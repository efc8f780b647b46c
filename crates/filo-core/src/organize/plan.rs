//! Organization plan

use crate::classify::Classification;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Subcategories that do not earn their own folder level
const GENERIC_SUBCATEGORIES: &[&str] = &["\u{5176}\u{4ed6}", "\u{672a}\u{77e5}"];

/// Grouping of classification results by target folder
#[derive(Debug, Clone)]
pub struct Plan {
    pub target_dir: PathBuf,
    /// Folder name (relative to `target_dir`) to the results assigned to it
    pub actions: BTreeMap<String, Vec<Classification>>,
}

impl Plan {
    pub fn total_files(&self) -> usize {
        self.actions.values().map(|files| files.len()).sum()
    }

    pub fn total_folders(&self) -> usize {
        self.actions.len()
    }

    /// Flatten the plan back into a result list
    pub fn all_results(&self) -> Vec<Classification> {
        self.actions.values().flatten().cloned().collect()
    }
}

/// Group results into folders under `target_dir`.
///
/// A result lands in `category/subcategory` unless the subcategory is
/// empty or generic, in which case the category alone is used.
pub fn generate_plan(results: &[Classification], target_dir: &Path) -> Plan {
    let mut actions: BTreeMap<String, Vec<Classification>> = BTreeMap::new();

    for result in results {
        let folder = folder_for(result);
        actions.entry(folder).or_default().push(result.clone());
    }

    Plan {
        target_dir: target_dir.to_path_buf(),
        actions,
    }
}

fn folder_for(result: &Classification) -> String {
    let sub = result.subcategory.as_str();
    if !sub.is_empty() && !GENERIC_SUBCATEGORIES.contains(&sub) {
        Path::new(&result.category)
            .join(sub)
            .to_string_lossy()
            .into_owned()
    } else {
        result.category.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Source;
    use crate::scan::FileRecord;
    use std::time::SystemTime;

    fn classified(name: &str, category: &str, subcategory: &str) -> Classification {
        Classification {
            file: FileRecord {
                path: Path::new("/in").join(name),
                name: name.to_string(),
                extension: crate::classify::extension_of(name),
                size: 1,
                modified: SystemTime::UNIX_EPOCH,
                is_dir: false,
            },
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            confidence: 0.9,
            reasoning: String::new(),
            source: Source::Llm,
            keywords: Vec::new(),
        }
    }

    #[test]
    fn test_grouping_with_subcategory() {
        let results = vec![
            classified("a.pdf", "Documents", "Reports"),
            classified("b.pdf", "Documents", "Reports"),
            classified("c.sh", "Code", "Scripts"),
        ];
        let plan = generate_plan(&results, Path::new("/out"));

        assert_eq!(plan.total_files(), 3);
        assert_eq!(plan.total_folders(), 2);
        let expected = Path::new("Documents").join("Reports");
        assert_eq!(
            plan.actions[&expected.to_string_lossy().into_owned()].len(),
            2
        );
    }

    #[test]
    fn test_generic_subcategories_collapse_to_category() {
        for sub in ["", "\u{5176}\u{4ed6}", "\u{672a}\u{77e5}"] {
            let plan = generate_plan(&[classified("x.bin", "Misc", sub)], Path::new("/out"));
            assert!(plan.actions.contains_key("Misc"), "subcategory {:?}", sub);
        }
    }

    #[test]
    fn test_all_results_roundtrip() {
        let results = vec![
            classified("a.pdf", "Documents", ""),
            classified("b.jpg", "Images", "Photos"),
        ];
        let plan = generate_plan(&results, Path::new("/out"));
        assert_eq!(plan.all_results().len(), 2);
    }
}
