//! Question answering over the answer memory

pub mod engine;

pub use engine::{QaEngine, ScoredCandidate};
