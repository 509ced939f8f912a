//! Answer memory: what the assistant has learned so far

pub mod memory_store;

pub use memory_store::{AnswerCandidate, AnswerMemory, MemoryStats};
