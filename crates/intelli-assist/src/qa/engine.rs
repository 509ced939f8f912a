//! Self-reinforcing question answering engine
//!
//! Every call fetches an online reference answer (when a summary provider is
//! configured), ranks the stored candidates for the question against it,
//! reinforces the candidates that agree with it, and falls back to learning
//! the reference answer when nothing is stored yet.

use std::sync::Arc;

use crate::config::{AssistConfig, QaConfig};
use crate::error::Result;
use crate::learning::{AnswerCandidate, AnswerMemory};
use crate::providers::{
    EmbeddingProvider, OllamaEmbedder, SummaryProvider, WikipediaSummary,
};
use crate::similarity::{Reference, SimilarityScorer, SimilarityScores};

/// Score a learned answer starts with
const INITIAL_SCORE: u32 = 1;

/// A stored candidate ranked for one query. Never persisted.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    /// Insertion index in the question's candidate list
    pub index: usize,
    pub candidate: AnswerCandidate,
    pub similarity: SimilarityScores,
    /// `score + lexical + semantic`
    pub combined_score: f32,
}

/// Question answering engine backed by an [`AnswerMemory`]
pub struct QaEngine {
    memory: AnswerMemory,
    scorer: SimilarityScorer,
    summaries: Option<Arc<dyn SummaryProvider>>,
    config: QaConfig,
}

impl QaEngine {
    /// Engine with no online collaborators: lexical scoring only, no fetches
    pub fn new(memory: AnswerMemory, config: QaConfig) -> Self {
        Self {
            memory,
            scorer: SimilarityScorer::lexical_only(),
            summaries: None,
            config,
        }
    }

    /// Use `provider` for online reference answers
    pub fn with_summary_provider(mut self, provider: Arc<dyn SummaryProvider>) -> Self {
        self.summaries = Some(provider);
        self
    }

    /// Use `embedder` for semantic similarity
    pub fn with_embeddings(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.scorer = SimilarityScorer::new(Some(embedder));
        self
    }

    /// Build the engine and its providers from configuration.
    ///
    /// The embedder is probed once; an unreachable embedding server leaves
    /// semantic scoring off for the lifetime of the engine.
    pub async fn from_config(config: &AssistConfig) -> Result<Self> {
        let memory = AnswerMemory::load(&config.memory.path);
        let mut engine = Self::new(memory, config.qa.clone());

        if config.summary.enabled {
            let wikipedia = WikipediaSummary::new(&config.summary)?;
            tracing::info!("Online summaries enabled ({})", config.summary.base_url);
            engine = engine.with_summary_provider(Arc::new(wikipedia));
        } else {
            tracing::info!("Online summaries disabled");
        }

        if config.embeddings.enabled {
            let embedder = OllamaEmbedder::new(&config.embeddings)?;
            if embedder.health_check().await.unwrap_or(false) {
                tracing::info!(
                    "Semantic similarity enabled ({} at {})",
                    config.embeddings.model,
                    config.embeddings.base_url
                );
                engine = engine.with_embeddings(Arc::new(embedder));
            } else {
                tracing::warn!(
                    "Embedding server not available at {}; using lexical similarity only",
                    config.embeddings.base_url
                );
            }
        }

        Ok(engine)
    }

    /// Answer a question. Always returns a non-empty string.
    pub async fn answer(&mut self, question: &str) -> String {
        let question = question.trim();

        let online = self.fetch_summary(question).await;
        let reference = match &online {
            Some(text) => Some(self.scorer.reference(text).await),
            None => None,
        };

        let scored = self.score_candidates(question, reference.as_ref()).await;

        if let Some(best) = select_best(&scored) {
            if !best.candidate.answer.trim().is_empty() {
                let answer = best.candidate.answer.clone();
                tracing::debug!(
                    "Answering \"{}\" from memory (combined score {:.3})",
                    question,
                    best.combined_score
                );
                if let Some(reference) = &reference {
                    self.reinforce(question, reference, &scored);
                }
                return answer;
            }
        }

        if let Some(online) = online {
            tracing::info!("Learned a new answer for \"{}\"", question);
            self.memory.append(question, online.clone(), INITIAL_SCORE);
            self.persist();
            return online;
        }

        self.config.fallback_answer.clone()
    }

    /// Online reference answer; every failure is treated as "none"
    pub async fn fetch_summary(&self, question: &str) -> Option<String> {
        let provider = self.summaries.as_ref()?;

        match provider.summarize(question).await {
            Ok(Some(summary)) if !summary.trim().is_empty() => Some(summary),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Online summary from {} failed: {}", provider.name(), e);
                None
            }
        }
    }

    /// Rank the stored candidates of `question` against the reference.
    ///
    /// Without a reference the combined score is just the stored score.
    pub async fn score_candidates(
        &self,
        question: &str,
        reference: Option<&Reference>,
    ) -> Vec<ScoredCandidate> {
        let mut scored = Vec::with_capacity(self.memory.get(question).len());

        for (index, candidate) in self.memory.get(question).iter().enumerate() {
            let similarity = match reference {
                Some(reference) => self.scorer.compare(reference, &candidate.answer).await,
                None => SimilarityScores::default(),
            };

            scored.push(ScoredCandidate {
                index,
                candidate: candidate.clone(),
                similarity,
                combined_score: candidate.score as f32 + similarity.sum(),
            });
        }

        scored
    }

    /// Bump every candidate that agrees with the reference answer
    fn reinforce(&mut self, question: &str, reference: &Reference, scored: &[ScoredCandidate]) {
        let threshold = self.config.reinforce_threshold;
        let bumped = self.memory.bump_score(question, |index, _| {
            scored
                .get(index)
                .is_some_and(|s| s.similarity.exceeds(threshold))
        });

        if bumped > 0 {
            tracing::debug!(
                "Reinforced {} answers for \"{}\" against \"{}\"",
                bumped,
                question,
                reference.text()
            );
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(e) = self.memory.save() {
            tracing::error!(
                "Failed to save answer memory {}: {}",
                self.memory.path().display(),
                e
            );
        }
    }

    /// Read access to the answer memory
    pub fn memory(&self) -> &AnswerMemory {
        &self.memory
    }

    /// Whether online reference answers are fetched
    pub fn has_online(&self) -> bool {
        self.summaries.is_some()
    }

    /// Whether semantic similarity is available
    pub fn has_semantic(&self) -> bool {
        self.scorer.has_semantic()
    }
}

/// Highest combined score; the earliest candidate wins ties
fn select_best(scored: &[ScoredCandidate]) -> Option<&ScoredCandidate> {
    scored.iter().fold(None, |best, current| match best {
        Some(best) if best.combined_score >= current.combined_score => Some(best),
        _ => Some(current),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedSummary(Option<&'static str>);

    #[async_trait]
    impl SummaryProvider for FixedSummary {
        async fn summarize(&self, _question: &str) -> Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingSummary;

    #[async_trait]
    impl SummaryProvider for FailingSummary {
        async fn summarize(&self, _question: &str) -> Result<Option<String>> {
            Err(Error::summary("network down"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn scored(index: usize, combined_score: f32) -> ScoredCandidate {
        ScoredCandidate {
            index,
            candidate: AnswerCandidate::new(format!("answer {}", index), 0),
            similarity: SimilarityScores::default(),
            combined_score,
        }
    }

    fn engine_in(dir: &TempDir) -> QaEngine {
        QaEngine::new(
            AnswerMemory::load(dir.path().join("memory.json")),
            QaConfig::default(),
        )
    }

    #[test]
    fn test_select_best_prefers_earliest_on_tie() {
        let candidates = vec![scored(0, 1.5), scored(1, 2.0), scored(2, 2.0)];
        assert_eq!(select_best(&candidates).unwrap().index, 1);
        assert!(select_best(&[]).is_none());
    }

    #[tokio::test]
    async fn test_fetch_summary_degrades() {
        let dir = TempDir::new().unwrap();

        let engine = engine_in(&dir);
        assert!(!engine.has_online());
        assert_eq!(engine.fetch_summary("q").await, None);

        let engine = engine_in(&dir).with_summary_provider(Arc::new(FailingSummary));
        assert_eq!(engine.fetch_summary("q").await, None);

        let engine = engine_in(&dir).with_summary_provider(Arc::new(FixedSummary(Some("  "))));
        assert_eq!(engine.fetch_summary("q").await, None);
    }

    #[tokio::test]
    async fn test_failing_summary_still_answers() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine_in(&dir).with_summary_provider(Arc::new(FailingSummary));

        let answer = engine.answer("What is love?").await;
        assert_eq!(answer, QaConfig::default().fallback_answer);
        assert!(engine.memory().is_empty());
    }

    #[tokio::test]
    async fn test_question_is_trimmed() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine_in(&dir)
            .with_summary_provider(Arc::new(FixedSummary(Some("Water is wet."))));

        engine.answer("  Is water wet?\n").await;
        assert_eq!(engine.memory().get("Is water wet?").len(), 1);
    }

    #[tokio::test]
    async fn test_blank_stored_answer_falls_through_to_learning() {
        let dir = TempDir::new().unwrap();
        let mut memory = AnswerMemory::load(dir.path().join("memory.json"));
        memory.append("q", "", 5);

        let mut engine = QaEngine::new(memory, QaConfig::default())
            .with_summary_provider(Arc::new(FixedSummary(Some("Something."))));

        assert_eq!(engine.answer("q").await, "Something.");
        assert_eq!(engine.memory().get("q").len(), 2);
    }

    #[tokio::test]
    async fn test_score_without_reference_is_stored_score() {
        let dir = TempDir::new().unwrap();
        let mut memory = AnswerMemory::load(dir.path().join("memory.json"));
        memory.append("q", "first", 2);
        memory.append("q", "second", 7);

        let engine = QaEngine::new(memory, QaConfig::default());
        let scored = engine.score_candidates("q", None).await;
        let combined: Vec<f32> = scored.iter().map(|s| s.combined_score).collect();
        assert_eq!(combined, vec![2.0, 7.0]);
    }
}
