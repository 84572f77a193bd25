use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::info;

use super::data_types::Digest;

/// Vocabulary cap: only the most informative terms of the batch are kept.
pub const MAX_VOCABULARY: usize = 3000;

/// Lowercased runs of two or more word characters, Unicode-aware.
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Per-batch TF-IDF vectorizer. The vocabulary is rebuilt from each batch's
/// documents alone, so similarity scores are only meaningful within one run.
pub struct TfidfVectorizer {
    token_re: Regex,
    max_features: usize,
}

impl TfidfVectorizer {
    #[must_use]
    pub fn new(max_features: usize) -> Self {
        Self {
            token_re: Regex::new(TOKEN_PATTERN).unwrap(),
            max_features,
        }
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_re
            .find_iter(&lowered)
            .map(|token| token.as_str().to_string())
            .collect()
    }

    /// Fit the batch vocabulary and return one L2-normalized TF-IDF row per
    /// document. The vocabulary is the `max_features` terms with the highest
    /// total count across the batch, ties broken alphabetically; IDF is
    /// smoothed as ln((1 + n) / (1 + df)) + 1.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit_transform(&self, texts: &[String]) -> Vec<Vec<f64>> {
        let tokenized: Vec<Vec<String>> = texts.iter().map(|text| self.tokenize(text)).collect();

        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            for token in tokens {
                *term_counts.entry(token.as_str()).or_insert(0) += 1;
            }
        }
        let mut terms: Vec<(&str, usize)> = term_counts.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(self.max_features);
        let vocabulary: HashMap<&str, usize> = terms
            .iter()
            .enumerate()
            .map(|(index, (term, _))| (*term, index))
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let mut seen: HashSet<usize> = HashSet::new();
            for token in tokens {
                if let Some(&index) = vocabulary.get(token.as_str()) {
                    seen.insert(index);
                }
            }
            for index in seen {
                doc_freq[index] += 1;
            }
        }

        let doc_count = texts.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + doc_count) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        tokenized
            .iter()
            .map(|tokens| {
                let mut row = vec![0.0; vocabulary.len()];
                for token in tokens {
                    if let Some(&index) = vocabulary.get(token.as_str()) {
                        row[index] += 1.0;
                    }
                }
                for (weight, idf) in row.iter_mut().zip(&idf) {
                    *weight *= idf;
                }
                let norm = row.iter().map(|weight| weight * weight).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for weight in &mut row {
                        *weight /= norm;
                    }
                }
                row
            })
            .collect()
    }
}

/// Cosine similarity between two vectors. Zero-norm inputs score 0.0.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Remove near-duplicate records by text similarity, preserving order.
///
/// A single forward pass walks the precomputed similarity matrix: an
/// unmarked anchor marks every other record whose similarity to it strictly
/// exceeds `threshold`. Marked records are skipped as anchors but remain
/// comparable as targets, so the lowest-index member of a similarity
/// cluster is the one that survives.
pub fn deduplicate_similar(records: Digest, threshold: f64) -> Digest {
    // TF-IDF is undefined over zero documents
    if records.is_empty() {
        return records;
    }

    let texts: Vec<String> = records
        .iter()
        .map(|record| format!("{} {}", record.title, record.summary))
        .collect();
    let vectorizer = TfidfVectorizer::new(MAX_VOCABULARY);
    let rows = vectorizer.fit_transform(&texts);

    let total = rows.len();
    let mut matrix = vec![vec![0.0; total]; total];
    for i in 0..total {
        for j in 0..total {
            matrix[i][j] = cosine_similarity(&rows[i], &rows[j]);
        }
    }

    let mut to_drop: HashSet<usize> = HashSet::new();
    for anchor in 0..total {
        if to_drop.contains(&anchor) {
            continue;
        }
        for other in 0..total {
            if other != anchor && matrix[anchor][other] > threshold {
                to_drop.insert(other);
            }
        }
    }

    let kept: Digest = records
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !to_drop.contains(index))
        .map(|(_, record)| record)
        .collect();

    if kept.len() < total {
        info!(
            removed = total - kept.len(),
            threshold, "suppressed near-duplicate articles"
        );
    }

    kept
}

#[cfg(test)]
mod test {
    use super::{cosine_similarity, deduplicate_similar, TfidfVectorizer, MAX_VOCABULARY};
    use crate::digest::data_types::ArticleRecord;

    fn record(link: &str, title: &str, summary: &str) -> ArticleRecord {
        ArticleRecord {
            competitor: "쿠팡".to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            link: link.to_string(),
            published_at: None,
        }
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let c = vec![0.0, 1.0, 0.0];
        let zero = vec![0.0, 0.0, 0.0];

        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&a, &c).abs() < 1e-9);
        assert!(cosine_similarity(&a, &zero).abs() < 1e-9);
    }

    #[test]
    fn test_vectorizer_identical_documents() {
        let vectorizer = TfidfVectorizer::new(MAX_VOCABULARY);
        let texts = vec![
            "coupang expands rocket delivery".to_string(),
            "coupang expands rocket delivery".to_string(),
        ];
        let rows = vectorizer.fit_transform(&texts);
        assert!((cosine_similarity(&rows[0], &rows[1]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vectorizer_disjoint_documents() {
        let vectorizer = TfidfVectorizer::new(MAX_VOCABULARY);
        let texts = vec![
            "coupang expands rocket delivery".to_string(),
            "naver launches shopping search".to_string(),
        ];
        let rows = vectorizer.fit_transform(&texts);
        assert!(cosine_similarity(&rows[0], &rows[1]).abs() < 1e-9);
    }

    #[test]
    fn test_vectorizer_caps_vocabulary() {
        let vectorizer = TfidfVectorizer::new(1);
        // "aa" is the most frequent term, so it is the whole vocabulary and
        // both rows collapse onto it
        let texts = vec!["aa bb".to_string(), "aa cc".to_string()];
        let rows = vectorizer.fit_transform(&texts);
        assert_eq!(rows[0].len(), 1);
        assert!((cosine_similarity(&rows[0], &rows[1]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vectorizer_skips_single_char_tokens() {
        let vectorizer = TfidfVectorizer::new(MAX_VOCABULARY);
        let tokens = vectorizer.tokenize("A 쿠팡 b rocket");
        assert_eq!(tokens, vec!["쿠팡", "rocket"]);
    }

    #[test]
    fn test_deduplicate_empty_batch() {
        assert!(deduplicate_similar(Vec::new(), 0.5).is_empty());
    }

    #[test]
    fn test_deduplicate_drops_near_duplicate_pair() {
        let records = vec![
            record("u1", "coupang expands rocket delivery", "same day rollout"),
            record("u2", "coupang expands rocket delivery", "same day rollout"),
        ];
        let kept = deduplicate_similar(records, 0.1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].link, "u1", "The lower-index record survives");
    }

    #[test]
    fn test_deduplicate_keeps_dissimilar_records() {
        let records = vec![
            record("u1", "coupang expands rocket delivery", ""),
            record("u2", "naver launches shopping search", ""),
        ];
        let kept = deduplicate_similar(records.clone(), 0.0);
        assert_eq!(kept, records, "Zero similarity never exceeds any threshold");
    }

    #[test]
    /// The anchor suppresses both neighbours even though they are not
    /// similar to each other.
    fn test_deduplicate_transitive_suppression() {
        let records = vec![
            record("u1", "alpha bravo charlie delta", ""),
            record("u2", "alpha bravo echo foxtrot", ""),
            record("u3", "charlie delta golf hotel", ""),
        ];
        let kept = deduplicate_similar(records, 0.3);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].link, "u1");
    }

    #[test]
    /// A marked record never acts as an anchor, so its own neighbours are
    /// not explored through it.
    fn test_deduplicate_marked_records_skip_anchoring() {
        let records = vec![
            record("u1", "alpha bravo echo foxtrot", ""),
            record("u2", "alpha bravo charlie delta", ""),
            record("u3", "charlie delta golf hotel", ""),
        ];
        // u1 marks u2 (shared "alpha bravo"); u2, being marked, never
        // anchors, so u3 survives as its own anchor despite overlapping u2
        let kept = deduplicate_similar(records, 0.3);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].link, "u1");
        assert_eq!(kept[1].link, "u3");
    }

    #[test]
    fn test_deduplicate_preserves_relative_order() {
        let records = vec![
            record("u1", "coupang expands rocket delivery", ""),
            record("u2", "naver launches shopping search", ""),
            record("u3", "coupang expands rocket delivery", ""),
            record("u4", "baemin tests robot couriers", ""),
        ];
        let kept = deduplicate_similar(records, 0.5);
        let links: Vec<&str> = kept.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["u1", "u2", "u4"]);
    }
}
