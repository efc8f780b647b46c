//! Filename embedding
//!
//! A deterministic hash-based sketch turns a filename into a unit-length
//! vector; matching is about surface lexical overlap, so this is sufficient
//! and orders of magnitude faster than an embedding-model call. An optional
//! Ollama-backed embedder can be substituted and falls back to the local
//! sketch whenever the service misbehaves.

use crate::llm::OllamaClient;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

/// Default vector dimension; must stay homogeneous across one database file
pub const DEFAULT_DIMENSION: usize = 256;

lazy_static! {
    /// Token runs: Han ideographs, ASCII letters, digits
    static ref TOKEN_RE: Regex = Regex::new(r"[\p{Han}]+|[a-zA-Z]+|\d+").unwrap();
}

/// Text-to-vector seam shared by the local and the Ollama-backed embedder
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed text into a vector (never fails; implementations fall back)
    async fn embed(&self, text: &str) -> Vec<f64>;

    /// Vector dimension produced by this embedder
    fn dimensions(&self) -> usize;
}

/// Local hash-based embedder
#[derive(Debug, Clone)]
pub struct LocalEmbedder {
    dimension: usize,
}

impl Default for LocalEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalEmbedder {
    pub fn new() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
        }
    }

    /// Build the feature sketch: character, token and 3-gram passes, each
    /// written into `fnv1a64(feature) mod dimension`, then L2-normalized.
    pub fn sketch(&self, text: &str) -> Vec<f64> {
        let mut vec = vec![0.0f64; self.dimension];
        let text = text.to_lowercase();
        let dim = self.dimension as u64;

        // Characters, weighted down by position
        let mut buf = [0u8; 4];
        for (pos, ch) in text.char_indices() {
            let idx = (fnv1a_64(ch.encode_utf8(&mut buf).as_bytes()) % dim) as usize;
            vec[idx] += 1.0 / (pos + 1) as f64;
        }

        // Tokens carry twice the character weight
        for (i, token) in TOKEN_RE.find_iter(&text).enumerate() {
            let idx = (fnv1a_64(token.as_str().as_bytes()) % dim) as usize;
            vec[idx] += 2.0 / (i + 1) as f64;
        }

        // Byte-wise 3-grams capture local patterns
        for gram in text.as_bytes().windows(3) {
            let idx = (fnv1a_64(gram) % dim) as usize;
            vec[idx] += 0.5;
        }

        normalize(vec)
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, text: &str) -> Vec<f64> {
        self.sketch(text)
    }

    fn dimensions(&self) -> usize {
        self.dimension
    }
}

/// Embedder backed by the Ollama embeddings endpoint
pub struct OllamaEmbedder {
    client: OllamaClient,
    fallback: LocalEmbedder,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient) -> Self {
        Self {
            client,
            fallback: LocalEmbedder::new(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Vec<f64> {
        match self.client.embed(text).await {
            Ok(vec) if !vec.is_empty() => vec,
            Ok(_) => self.fallback.sketch(text),
            Err(e) => {
                tracing::debug!("embedding service failed, using local sketch: {}", e);
                self.fallback.sketch(text)
            }
        }
    }

    fn dimensions(&self) -> usize {
        self.fallback.dimensions()
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

/// FNV-1a 64-bit hash
fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Scale a vector to unit length; the zero vector is returned unchanged
fn normalize(vec: Vec<f64>) -> Vec<f64> {
    let norm = vec.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 {
        return vec;
    }
    vec.into_iter().map(|v| v / norm).collect()
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0 when the lengths differ or either norm is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sketch_is_unit_length() {
        let embedder = LocalEmbedder::new();
        for name in ["invoice_2024.pdf", "报告_最终版.docx", "a", "build_script.sh"] {
            let vec = embedder.sketch(name);
            let norm = vec.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() <= 1e-9, "norm {} for {}", norm, name);
        }
    }

    #[test]
    fn test_sketch_empty_input_is_zero_vector() {
        let embedder = LocalEmbedder::new();
        let vec = embedder.sketch("");
        assert_eq!(vec.len(), DEFAULT_DIMENSION);
        assert!(vec.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_sketch_deterministic_and_case_insensitive() {
        let embedder = LocalEmbedder::new();
        assert_eq!(embedder.sketch("Report.PDF"), embedder.sketch("report.pdf"));
    }

    #[test]
    fn test_similarity_symmetry() {
        let embedder = LocalEmbedder::new();
        let a = embedder.sketch("meeting_notes_jan.md");
        let b = embedder.sketch("meeting_notes_feb.md");
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-12);

        let self_sim = cosine_similarity(&a, &a);
        assert!(self_sim > 1.0 - 1e-9 && self_sim <= 1.0 + 1e-9);
    }

    #[test]
    fn test_similarity_zero_and_mismatched() {
        assert_eq!(cosine_similarity(&[0.0; 4], &[1.0, 0.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_related_names_score_higher() {
        let embedder = LocalEmbedder::new();
        let query = embedder.sketch("invoice_2025.pdf");
        let related = embedder.sketch("invoice_2024.pdf");
        let unrelated = embedder.sketch("holiday_photo.jpg");
        assert!(
            cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated),
            "lexically related names should be closer"
        );
    }

    #[test]
    fn test_fnv1a_known_values() {
        // Reference values for the 64-bit FNV-1a parameters
        assert_eq!(fnv1a_64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
    }
}
