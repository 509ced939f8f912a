//! Configuration for the assistant

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const USER_AGENT: &str = "IntelliAssist/0.1 (contact: example@example.com)";

/// Main assistant configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Answer memory storage
    #[serde(default)]
    pub memory: MemoryConfig,
    /// QA engine tuning
    #[serde(default)]
    pub qa: QaConfig,
    /// Online summary provider (Wikipedia)
    #[serde(default)]
    pub summary: SummaryConfig,
    /// Sentence embeddings (Ollama)
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Geocoding (Nominatim)
    #[serde(default)]
    pub places: PlacesConfig,
}

impl AssistConfig {
    /// Load configuration from an optional TOML file.
    ///
    /// With no path the defaults are returned. A path that cannot be read or
    /// parsed is a configuration error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content)?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Turn off both online providers (Wikipedia and embeddings)
    pub fn offline(mut self) -> Self {
        self.summary.enabled = false;
        self.embeddings.enabled = false;
        self
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Answer memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// JSON file holding question -> answer candidates
    pub path: PathBuf,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("memory.json"),
        }
    }
}

/// QA engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Similarity above which a stored answer is reinforced (0.0-1.0)
    pub reinforce_threshold: f32,
    /// Returned when nothing is stored and nothing could be fetched
    pub fallback_answer: String,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            reinforce_threshold: 0.7,
            fallback_answer:
                "I don't know yet. Please provide a correct answer, and I will learn it."
                    .to_string(),
        }
    }
}

/// Wikipedia summary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Fetch online summaries at all
    pub enabled: bool,
    /// Wikipedia base URL (language edition)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://en.wikipedia.org".to_string(),
            timeout_secs: 10,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Use semantic similarity at all
    pub enabled: bool,
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model (all-minilm is all-MiniLM-L6-v2)
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Nominatim configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    /// Nominatim base URL
    pub base_url: String,
    /// Maximum number of results
    pub limit: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Nominatim usage policy requires a descriptive User-Agent
    pub user_agent: String,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            limit: 5,
            timeout_secs: 15,
            user_agent: USER_AGENT.to_string(),
        }
    }
}
