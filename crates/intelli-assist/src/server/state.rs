//! Application state for the assistant server

use minijinja::Environment;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::assistant::Assistant;
use crate::config::AssistConfig;
use crate::error::Result;
use crate::server::routes::pages::INDEX_TEMPLATE;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AssistConfig,
    /// Intent dispatch and the three handlers
    assistant: Assistant,
    /// HTML page templates
    templates: Environment<'static>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state, building every provider from config
    pub async fn new(config: AssistConfig) -> Result<Self> {
        tracing::info!("Initializing assistant state...");
        let assistant = Assistant::from_config(&config).await?;
        Self::with_assistant(config, assistant)
    }

    /// Create state around an already built assistant
    pub fn with_assistant(config: AssistConfig, assistant: Assistant) -> Result<Self> {
        let mut templates = Environment::new();
        templates.add_template("index.html", INDEX_TEMPLATE)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                assistant,
                templates,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AssistConfig {
        &self.inner.config
    }

    /// Get the assistant
    pub fn assistant(&self) -> &Assistant {
        &self.inner.assistant
    }

    /// Get page templates
    pub fn templates(&self) -> &Environment<'static> {
        &self.inner.templates
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
