//! Keyword extraction and filename similarity

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// Keywords: Han runs, words of 2+ letters, numbers of 4+ digits
    static ref KEYWORD_RE: Regex = Regex::new(r"[\p{Han}]+|[a-zA-Z]{2,}|\d{4,}").unwrap();
    /// Wider tokenization used for Jaccard similarity
    static ref TOKEN_RE: Regex = Regex::new(r"[\p{Han}]+|[a-zA-Z]+|\d+").unwrap();
}

/// Extension of a filename: from the last dot, lowercased, or empty
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => name[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Split a filename at the extension, preserving case
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => (&name[..idx], &name[idx..]),
        None => (name, ""),
    }
}

/// Extract keywords from a filename, in match order.
///
/// The extension is stripped first; case is preserved for display and
/// lowercased only when a keyword becomes a persisted rule pattern.
pub fn extract_keywords(filename: &str) -> Vec<String> {
    let stem = match filename.rfind('.') {
        Some(idx) => &filename[..idx],
        None => filename,
    };
    KEYWORD_RE
        .find_iter(stem)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Jaccard similarity over the token sets of two lowercased filenames
pub fn filename_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<String> = TOKEN_RE
        .find_iter(&a.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect();
    let tokens_b: HashSet<String> = TOKEN_RE
        .find_iter(&b.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.len() + tokens_b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.PDF"), ".pdf");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".gitignore"), ".gitignore");
    }

    #[test]
    fn test_extract_keywords_rules() {
        // Single letters and short digit runs are not keywords
        assert_eq!(
            extract_keywords("a_invoice_2024_v2.pdf"),
            vec!["invoice", "2024"]
        );
        // Case preserved for display
        assert_eq!(extract_keywords("Quarterly_Report.docx"), vec!["Quarterly", "Report"]);
    }

    #[test]
    fn test_extract_keywords_han() {
        assert_eq!(
            extract_keywords("\u{5408}\u{540c}_final.docx"),
            vec!["\u{5408}\u{540c}", "final"]
        );
    }

    #[test]
    fn test_extension_not_a_keyword() {
        assert_eq!(extract_keywords("notes.markdown"), vec!["notes"]);
    }

    #[test]
    fn test_filename_similarity() {
        // {invoice,2024,pdf} vs {invoice,2025,pdf}: 2 shared of 4
        let sim = filename_similarity("invoice_2024.pdf", "invoice_2025.pdf");
        assert!((sim - 0.5).abs() < 1e-12);

        assert!((filename_similarity("a.txt", "a.txt") - 1.0).abs() < 1e-12);
        assert_eq!(filename_similarity("", "a.txt"), 0.0);
        assert_eq!(
            filename_similarity("report.doc", "holiday.jpg"),
            0.0
        );
    }
}
