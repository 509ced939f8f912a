//! Wikipedia summary provider
//!
//! Resolves a free-text question to the best matching article through the
//! search API, then reads the article summary from the REST API and keeps its
//! first sentence.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::config::SummaryConfig;
use crate::error::{Error, Result};

use super::summary::SummaryProvider;

/// Wikipedia search + summary client
pub struct WikipediaSummary {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    page_type: String,
    #[serde(default)]
    extract: String,
}

impl WikipediaSummary {
    /// Create a new Wikipedia client
    pub fn new(config: &SummaryConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::Config(format!("Invalid Wikipedia URL {}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Wikipedia URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Best matching article title for the question
    async fn search_title(&self, question: &str) -> Result<Option<String>> {
        let url = self.endpoint(&["w", "api.php"])?;

        let response = self
            .client
            .get(url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", question),
                ("srlimit", "1"),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::summary(format!(
                "Search failed: HTTP {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await?;
        Ok(top_title(body))
    }

    /// Summary extract of an article
    async fn page_summary(&self, title: &str) -> Result<PageSummary> {
        let page = title.replace(' ', "_");
        let url = self.endpoint(&["api", "rest_v1", "page", "summary", &page])?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::summary(format!(
                "Summary for '{}' failed: HTTP {}",
                title,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SummaryProvider for WikipediaSummary {
    async fn summarize(&self, question: &str) -> Result<Option<String>> {
        let Some(title) = self.search_title(question).await? else {
            tracing::debug!("No Wikipedia article for \"{}\"", question);
            return Ok(None);
        };

        let page = self.page_summary(&title).await?;
        if page.page_type == "disambiguation" {
            tracing::debug!("Wikipedia article '{}' is a disambiguation page", title);
            return Ok(None);
        }

        Ok(first_sentence(&page.extract))
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}

fn top_title(body: SearchResponse) -> Option<String> {
    body.query?
        .search
        .into_iter()
        .map(|hit| hit.title)
        .find(|title| !title.trim().is_empty())
}

/// Words that end in a full stop without ending the sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "mt", "ft", "vs", "ca", "approx", "inc",
    "ltd", "co", "e.g", "i.e", "lit",
];

/// First sentence of a text.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text. A full stop does not end it after an initial or an uppercase
/// acronym ("John F. Kennedy", "U.S."), after a known abbreviation
/// ("Dr.", "e.g."), or when the next word starts in lowercase.
pub fn first_sentence(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        match chars.peek() {
            None => break,
            Some((_, next)) if next.is_whitespace() => {
                let end = i + c.len_utf8();
                if c != '.' || full_stop_ends_sentence(&text[..i], &text[end..]) {
                    return Some(text[..end].to_string());
                }
            }
            _ => {}
        }
    }

    Some(text.to_string())
}

fn full_stop_ends_sentence(before: &str, after: &str) -> bool {
    let word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric());

    if word.chars().last().is_some_and(char::is_uppercase) {
        return false;
    }
    if ABBREVIATIONS.contains(&word.to_lowercase().as_str()) {
        return false;
    }

    !after
        .trim_start()
        .chars()
        .next()
        .is_some_and(char::is_lowercase)
}
