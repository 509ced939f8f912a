//! Lexical and semantic similarity between short texts
//!
//! Lexical similarity is the Ratcliff/Obershelp "gestalt" ratio computed on
//! lower-cased characters. Semantic similarity is the cosine of two sentence
//! embeddings and silently degrades to 0.0 whenever no embedder is available.

use std::collections::HashMap;
use std::sync::Arc;

use crate::providers::EmbeddingProvider;

/// Reference length from which frequent characters stop seeding matches
const AUTOJUNK_MIN_LEN: usize = 200;

/// Case-insensitive matching-blocks ratio in `[0, 1]`
///
/// `2 * M / (len(a) + len(b))` where `M` is the number of characters covered
/// by the matching blocks. Two empty strings are identical (1.0).
///
/// When `b` has at least 200 characters, every character occurring more than
/// `1 + len(b) / 100` times in it is "popular": it can extend a match but
/// never start one. Long references therefore only score well against
/// candidates that share real substrings with them, not just common letters.
pub fn lexical_similarity(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matches = matching_characters(&a, &b);
    (2.0 * matches as f64 / total as f64) as f32
}

/// Positions of every non-popular character of `b`
fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    if b.len() >= AUTOJUNK_MIN_LEN {
        let limit = b.len() / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= limit);
    }

    b2j
}

/// Total size of the matching blocks between `a` and `b`
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let b2j = index_positions(b);

    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block in `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Blocks are seeded from `b2j` only. Among equally long seeds the one
/// starting earliest in `a` wins, then the one starting earliest in `b`. The
/// winning seed is then grown over equal neighbours, popular ones included.
fn longest_match(
    a: &[char],
    b: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // j -> length of the match ending at a[i - 1], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_j2len = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = next_j2len;
    }

    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_size += 1;
    }
    while best_i + best_size < ahi
        && best_j + best_size < bhi
        && a[best_i + best_size] == b[best_j + best_size]
    {
        best_size += 1;
    }

    (best_i, best_j, best_size)
}

/// Cosine similarity clamped to `[0, 1]`; 0.0 for empty or mismatched vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Both similarity signals for one candidate against a reference
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimilarityScores {
    pub lexical: f32,
    pub semantic: f32,
}

impl SimilarityScores {
    pub fn sum(&self) -> f32 {
        self.lexical + self.semantic
    }

    /// Either signal strictly above the threshold
    pub fn exceeds(&self, threshold: f32) -> bool {
        self.lexical > threshold || self.semantic > threshold
    }
}

/// A reference text, embedded once so many candidates can be compared to it
#[derive(Debug, Clone)]
pub struct Reference {
    text: String,
    embedding: Option<Vec<f32>>,
}

impl Reference {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Scores text pairs; semantic scoring needs an embedding provider
#[derive(Clone, Default)]
pub struct SimilarityScorer {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl SimilarityScorer {
    pub fn new(embedder: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        Self { embedder }
    }

    /// Lexical-only scorer
    pub fn lexical_only() -> Self {
        Self::default()
    }

    /// Whether semantic similarity is available
    pub fn has_semantic(&self) -> bool {
        self.embedder.is_some()
    }

    /// Embedding of `text`, or `None` when unavailable
    async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        let embedder = self.embedder.as_ref()?;
        if text.trim().is_empty() {
            return None;
        }

        match embedder.embed(text).await {
            Ok(embedding) => Some(embedding),
            Err(e) => {
                tracing::debug!("Semantic similarity unavailable ({}): {}", embedder.name(), e);
                None
            }
        }
    }

    /// Cosine similarity of the sentence embeddings of `a` and `b`.
    ///
    /// Never fails: no embedder, an empty input or an embedding error all give 0.0.
    pub async fn semantic_similarity(&self, a: &str, b: &str) -> f32 {
        let Some(ea) = self.embed(a).await else {
            return 0.0;
        };
        let Some(eb) = self.embed(b).await else {
            return 0.0;
        };
        cosine_similarity(&ea, &eb)
    }

    /// Prepare a reference text for repeated comparisons
    pub async fn reference(&self, text: &str) -> Reference {
        Reference {
            text: text.to_string(),
            embedding: self.embed(text).await,
        }
    }

    /// Lexical and semantic similarity of `candidate` to `reference`
    pub async fn compare(&self, reference: &Reference, candidate: &str) -> SimilarityScores {
        let lexical = lexical_similarity(candidate, &reference.text);

        let semantic = match &reference.embedding {
            Some(reference_embedding) => match self.embed(candidate).await {
                Some(embedding) => cosine_similarity(&embedding, reference_embedding),
                None => 0.0,
            },
            None => 0.0,
        };

        SimilarityScores { lexical, semantic }
    }
}
