//! Answer memory that persists scored answer candidates per question
//!
//! The whole store lives in memory and is written back to a single JSON file
//! after every mutation:
//!
//! ```json
//! { "What is the sky color?": [ { "answer": "Blue", "score": 1 } ] }
//! ```
//!
//! Keys are the exact question text. No case folding or punctuation
//! stripping is applied, so two phrasings of the same question never share
//! candidates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A stored answer and its reinforcement weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCandidate {
    pub answer: String,
    #[serde(default)]
    pub score: u32,
}

impl AnswerCandidate {
    pub fn new(answer: impl Into<String>, score: u32) -> Self {
        Self {
            answer: answer.into(),
            score,
        }
    }
}

/// Question -> insertion-ordered answer candidates, backed by a JSON file
#[derive(Debug)]
pub struct AnswerMemory {
    storage_path: PathBuf,
    entries: BTreeMap<String, Vec<AnswerCandidate>>,
}

impl AnswerMemory {
    /// Load the store from `path`.
    ///
    /// A missing file gives an empty store. So does an unreadable or
    /// malformed one, after a warning.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let storage_path = path.into();

        let entries = match Self::read_entries(&storage_path) {
            Ok(entries) => {
                tracing::info!(
                    "Loaded {} questions from answer memory {}",
                    entries.len(),
                    storage_path.display()
                );
                entries
            }
            Err(e) => {
                tracing::warn!(
                    "Could not load answer memory {}: {}; starting empty",
                    storage_path.display(),
                    e
                );
                BTreeMap::new()
            }
        };

        Self {
            storage_path,
            entries,
        }
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, Vec<AnswerCandidate>>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the whole store back to disk, overwriting prior content
    pub fn save(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.entries)?;

        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.storage_path, data)?;
        tracing::debug!("Saved answer memory to {}", self.storage_path.display());
        Ok(())
    }

    /// Candidates stored for the exact question text
    pub fn get(&self, question: &str) -> &[AnswerCandidate] {
        self.entries
            .get(question)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Add a candidate, creating the question's list if needed
    pub fn append(&mut self, question: &str, answer: impl Into<String>, score: u32) {
        self.entries
            .entry(question.to_string())
            .or_default()
            .push(AnswerCandidate::new(answer, score));
    }

    /// Increment the score of every candidate matching `predicate`.
    ///
    /// The predicate sees each candidate with its insertion index. Returns the
    /// number of candidates bumped.
    pub fn bump_score<F>(&mut self, question: &str, mut predicate: F) -> usize
    where
        F: FnMut(usize, &AnswerCandidate) -> bool,
    {
        let Some(candidates) = self.entries.get_mut(question) else {
            return 0;
        };

        let mut bumped = 0;
        for (index, candidate) in candidates.iter_mut().enumerate() {
            if predicate(index, candidate) {
                candidate.score = candidate.score.saturating_add(1);
                bumped += 1;
            }
        }
        bumped
    }

    /// Number of questions with stored candidates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    /// Get statistics about stored answers
    pub fn stats(&self) -> MemoryStats {
        let candidates = self.entries.values().map(Vec::len).sum();
        let total_score = self
            .entries
            .values()
            .flatten()
            .map(|c| u64::from(c.score))
            .sum();

        MemoryStats {
            questions: self.entries.len(),
            candidates,
            total_score,
        }
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub questions: usize,
    pub candidates: usize,
    pub total_score: u64,
}
