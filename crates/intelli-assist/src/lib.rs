//! intelli-assist: a small personal assistant with a self-reinforcing answer memory
//!
//! Free-text queries are classified into one of three intents and dispatched:
//! symptom triage from static rules, a place lookup against OpenStreetMap, or a
//! question-answering engine backed by a JSON answer memory that is scored and
//! reinforced against a freshly fetched Wikipedia summary.

pub mod assistant;
pub mod config;
pub mod error;
pub mod health;
pub mod intent;
pub mod learning;
pub mod places;
pub mod providers;
pub mod qa;
pub mod server;
pub mod similarity;

pub use assistant::{Assistant, Reply};
pub use config::AssistConfig;
pub use error::{Error, Result};
pub use intent::Intent;
pub use learning::{AnswerCandidate, AnswerMemory, MemoryStats};
pub use qa::QaEngine;
pub use similarity::{lexical_similarity, SimilarityScorer};
