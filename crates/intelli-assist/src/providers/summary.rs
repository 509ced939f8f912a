//! Online summary provider trait

use async_trait::async_trait;
use crate::error::Result;

/// Best-effort lookup of a one-sentence reference answer for a question
///
/// `Ok(None)` means the source had nothing usable (no hit, ambiguous page).
/// Callers treat errors the same way as `Ok(None)`.
///
/// Implementations:
/// - `WikipediaSummary`: Wikipedia search + page summary
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Fetch a single-sentence summary for the question
    async fn summarize(&self, question: &str) -> Result<Option<String>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
