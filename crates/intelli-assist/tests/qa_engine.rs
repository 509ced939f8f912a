//! End-to-end answer resolution through the public API

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use intelli_assist::config::QaConfig;
use intelli_assist::providers::{EmbeddingProvider, SummaryProvider};
use intelli_assist::{AnswerMemory, Error, QaEngine, Result};
use tempfile::TempDir;

const FALLBACK: &str = "I don't know yet. Please provide a correct answer, and I will learn it.";
const PARIS: &str = "Paris is the capital and largest city of France.";

/// Returns the same sentence for every question and counts the calls
struct StaticSummary {
    text: Option<String>,
    calls: AtomicUsize,
}

impl StaticSummary {
    fn new(text: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            text: text.map(str::to_string),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummaryProvider for StaticSummary {
    async fn summarize(&self, _question: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

struct UnreachableSummary;

#[async_trait]
impl SummaryProvider for UnreachableSummary {
    async fn summarize(&self, _question: &str) -> Result<Option<String>> {
        Err(Error::summary("connection refused"))
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

/// Embeds every text to the same direction, so all pairs are semantically equal
struct ConstantEmbedder;

#[async_trait]
impl EmbeddingProvider for ConstantEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.5, 0.5, 0.5])
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "constant"
    }
}

fn memory_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("memory.json")
}

fn seeded(path: &Path, question: &str, answers: &[(&str, u32)]) -> AnswerMemory {
    let mut memory = AnswerMemory::load(path);
    for (answer, score) in answers {
        memory.append(question, *answer, *score);
    }
    memory.save().unwrap();
    memory
}

fn scores(memory: &AnswerMemory, question: &str) -> Vec<u32> {
    memory.get(question).iter().map(|c| c.score).collect()
}

#[tokio::test]
async fn sky_color_offline_returns_stored_answer_without_reinforcing() {
    let dir = TempDir::new().unwrap();
    let question = "What is the sky color?";
    let memory = seeded(&memory_path(&dir), question, &[("Blue", 1)]);

    let mut engine = QaEngine::new(memory, QaConfig::default());
    assert_eq!(engine.answer(question).await, "Blue");
    assert_eq!(scores(engine.memory(), question), vec![1]);

    let reloaded = AnswerMemory::load(memory_path(&dir));
    assert_eq!(scores(&reloaded, question), vec![1]);
}

#[tokio::test]
async fn capital_of_france_is_learned_from_the_online_summary() {
    let dir = TempDir::new().unwrap();
    let question = "What is the capital of France?";
    let summary = StaticSummary::new(Some(PARIS));

    let mut engine = QaEngine::new(AnswerMemory::load(memory_path(&dir)), QaConfig::default())
        .with_summary_provider(summary.clone());

    assert_eq!(engine.answer(question).await, PARIS);
    assert_eq!(summary.calls(), 1);

    let stored = engine.memory().get(question);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].answer, PARIS);
    assert_eq!(stored[0].score, 1);

    let reloaded = AnswerMemory::load(memory_path(&dir));
    assert_eq!(reloaded.get(question), stored);
}

#[tokio::test]
async fn unknown_question_offline_returns_fallback_and_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let mut engine = QaEngine::new(AnswerMemory::load(memory_path(&dir)), QaConfig::default());

    assert_eq!(engine.answer("What is a zorblax?").await, FALLBACK);
    assert!(engine.memory().is_empty());
    assert!(!memory_path(&dir).exists());
}

#[tokio::test]
async fn unreachable_summary_behaves_like_offline() {
    let dir = TempDir::new().unwrap();
    let mut engine = QaEngine::new(AnswerMemory::load(memory_path(&dir)), QaConfig::default())
        .with_summary_provider(Arc::new(UnreachableSummary));

    assert_eq!(engine.answer("What is a zorblax?").await, FALLBACK);
    assert!(engine.memory().is_empty());
}

#[tokio::test]
async fn learn_then_recall_reinforces_the_learned_answer() {
    let dir = TempDir::new().unwrap();
    let question = "What is the capital of France?";
    let summary = StaticSummary::new(Some(PARIS));

    let mut engine = QaEngine::new(AnswerMemory::load(memory_path(&dir)), QaConfig::default())
        .with_summary_provider(summary.clone());

    let learned = engine.answer(question).await;
    let recalled = engine.answer(question).await;

    assert_eq!(learned, recalled);
    assert_eq!(summary.calls(), 2);
    // Identical text has lexical similarity 1.0
    assert_eq!(scores(engine.memory(), question), vec![2]);
    assert_eq!(scores(&AnswerMemory::load(memory_path(&dir)), question), vec![2]);
}

#[tokio::test]
async fn reinforcement_only_bumps_candidates_above_threshold() {
    let dir = TempDir::new().unwrap();
    let question = "What is the capital of France?";
    let memory = seeded(
        &memory_path(&dir),
        question,
        &[
            ("Paris is the capital and largest city of France", 0),
            ("qqqq", 5),
        ],
    );

    let mut engine = QaEngine::new(memory, QaConfig::default())
        .with_summary_provider(StaticSummary::new(Some(PARIS)));

    // "qqqq" still wins on its stored score
    assert_eq!(engine.answer(question).await, "qqqq");
    assert_eq!(scores(engine.memory(), question), vec![1, 5]);

    engine.answer(question).await;
    assert_eq!(scores(engine.memory(), question), vec![2, 5]);
}

#[tokio::test]
async fn semantic_agreement_reinforces_lexically_distant_answers() {
    let dir = TempDir::new().unwrap();
    let question = "What is the capital of France?";
    let memory = seeded(&memory_path(&dir), question, &[("qqqq", 3)]);

    let mut engine = QaEngine::new(memory, QaConfig::default())
        .with_summary_provider(StaticSummary::new(Some(PARIS)))
        .with_embeddings(Arc::new(ConstantEmbedder));

    assert!(engine.has_semantic());
    assert_eq!(engine.answer(question).await, "qqqq");
    assert_eq!(scores(engine.memory(), question), vec![4]);
}

#[tokio::test]
async fn ties_go_to_the_earliest_candidate() {
    let dir = TempDir::new().unwrap();
    let question = "Best colour?";
    let memory = seeded(
        &memory_path(&dir),
        question,
        &[("green", 2), ("red", 2), ("blue", 1)],
    );

    let mut engine = QaEngine::new(memory, QaConfig::default());
    for _ in 0..3 {
        assert_eq!(engine.answer(question).await, "green");
    }

    let order: Vec<_> = engine
        .memory()
        .get(question)
        .iter()
        .map(|c| c.answer.as_str())
        .collect();
    assert_eq!(order, vec!["green", "red", "blue"]);
}

#[tokio::test]
async fn answer_is_never_empty() {
    let dir = TempDir::new().unwrap();
    let mut engine = QaEngine::new(AnswerMemory::load(memory_path(&dir)), QaConfig::default())
        .with_summary_provider(StaticSummary::new(Some("   ")));

    for question in ["", "   ", "Why?", "What is the capital of France?"] {
        assert!(!engine.answer(question).await.trim().is_empty());
    }
    assert!(engine.memory().is_empty());
}

#[tokio::test]
async fn storage_round_trip_preserves_scores_and_order() {
    let dir = TempDir::new().unwrap();
    let path = memory_path(&dir);
    let mut memory = AnswerMemory::load(&path);
    memory.append("b question", "second", 0);
    memory.append("a question", "first", 7);
    memory.append("a question", "also first", 2);
    memory.save().unwrap();

    let reloaded = AnswerMemory::load(&path);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get("a question"), memory.get("a question"));
    assert_eq!(reloaded.get("b question"), memory.get("b question"));
    assert_eq!(reloaded.stats(), memory.stats());
}
