//! Query dispatch: classify the intent, then hand the text to its handler

use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::AssistConfig;
use crate::error::Result;
use crate::health::{HealthAdvisor, HealthReport};
use crate::intent::Intent;
use crate::learning::MemoryStats;
use crate::places::{PlacesResolver, PlacesResult};
use crate::qa::QaEngine;

/// What a handler produced for one query
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "intent", content = "result", rename_all = "snake_case")]
pub enum Reply {
    Health(HealthReport),
    Places(PlacesResult),
    General(String),
}

impl Reply {
    pub fn intent(&self) -> Intent {
        match self {
            Self::Health(_) => Intent::Health,
            Self::Places(_) => Intent::Places,
            Self::General(_) => Intent::General,
        }
    }

    /// Compact plain-text rendering used by the web page
    pub fn to_text(&self) -> String {
        match self {
            Self::Health(report) => report.message.clone(),
            Self::Places(result) if result.results.is_empty() => "No places found.".to_string(),
            Self::Places(result) => result
                .results
                .iter()
                .map(|place| {
                    let address = if place.address.is_empty() {
                        "No address"
                    } else {
                        place.address.as_str()
                    };
                    format!("{} - {}", place.name, address)
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Self::General(answer) => answer.clone(),
        }
    }
}

/// The three handlers behind one entry point.
///
/// The QA engine mutates its memory on every answer, so it sits behind an
/// async mutex; concurrent general questions are answered one at a time.
pub struct Assistant {
    health: HealthAdvisor,
    places: PlacesResolver,
    qa: Mutex<QaEngine>,
}

impl Assistant {
    pub fn new(health: HealthAdvisor, places: PlacesResolver, qa: QaEngine) -> Self {
        Self {
            health,
            places,
            qa: Mutex::new(qa),
        }
    }

    /// Build every handler from configuration
    pub async fn from_config(config: &AssistConfig) -> Result<Self> {
        let qa = QaEngine::from_config(config).await?;
        let places = PlacesResolver::new(&config.places)?;

        tracing::info!(
            "Assistant ready (memory: {}, online: {}, semantic: {})",
            qa.memory().path().display(),
            qa.has_online(),
            qa.has_semantic()
        );

        Ok(Self::new(HealthAdvisor::new(), places, qa))
    }

    /// Classify and answer a query
    pub async fn respond(&self, text: &str) -> Reply {
        let intent = Intent::classify(text);
        tracing::debug!("Intent for \"{}\": {}", text, intent);

        match intent {
            Intent::Health => Reply::Health(self.health.handle(text)),
            Intent::Places => Reply::Places(self.places.search_from_text(text).await),
            Intent::General => Reply::General(self.qa.lock().await.answer(text).await),
        }
    }

    /// Answer memory statistics
    pub async fn memory_stats(&self) -> MemoryStats {
        self.qa.lock().await.memory().stats()
    }
}
