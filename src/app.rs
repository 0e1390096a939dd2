//! App Core for Recall.
//!
//! Composition root: owns the settings, the model client and the bookmark store.

use std::sync::Arc;

use crate::managers::bookmark_manager::BookmarkManager;
use crate::services::analysis_client::{AnalysisClientTrait, GeminiClient};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Central application struct holding the store and its collaborators.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub bookmark_manager: BookmarkManager,
}

impl App {
    /// Creates a new App, loading settings and connecting the Gemini client.
    pub fn new(config_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(config_path);
        let settings = settings_engine.load()?;

        let client = GeminiClient::new(&settings.ai)
            .map_err(|e| format!("GeminiClient init failed: {}", e))?;
        if !client.has_api_key() {
            log::warn!("No API key configured; media analysis and recaps will fail");
        }
        log::info!(
            "Using model {} (settings: {})",
            client.model(),
            settings_engine.get_config_path()
        );

        Ok(Self::with_client(settings_engine, Arc::new(client)))
    }

    /// Creates an App around an arbitrary analysis client.
    pub fn with_client(settings_engine: SettingsEngine, client: Arc<dyn AnalysisClientTrait>) -> Self {
        Self {
            settings_engine,
            bookmark_manager: BookmarkManager::new(client),
        }
    }
}
