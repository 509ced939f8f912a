//! Provider abstractions for embeddings and online summaries
//!
//! Both collaborators are optional: the QA engine holds them as
//! `Option<Arc<dyn ...>>` and treats absence as a normal state.

pub mod embedding;
pub mod ollama;
pub mod summary;
pub mod wikipedia;

pub use embedding::EmbeddingProvider;
pub use ollama::OllamaEmbedder;
pub use summary::SummaryProvider;
pub use wikipedia::WikipediaSummary;
