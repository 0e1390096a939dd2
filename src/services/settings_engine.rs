// Recall Settings Engine
// Loads settings from a JSON file and layers environment overrides on top.
// Settings are read-only at runtime; nothing is written back.

use std::fs;
use std::path::Path;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::RecallSettings;

/// Environment variable naming an explicit settings file.
pub const CONFIG_PATH_ENV: &str = "RECALL_CONFIG";

/// Environment variables checked, in order, for the model API key.
pub const API_KEY_ENVS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Environment variable overriding the configured model name.
pub const MODEL_ENV: &str = "RECALL_MODEL";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<RecallSettings, SettingsError>;
    fn get_settings(&self) -> &RecallSettings;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation reading JSON from disk.
pub struct SettingsEngine {
    config_path: String,
    settings: RecallSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// Path precedence: `path_override`, then `$RECALL_CONFIG`, then
    /// `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty()))
            .unwrap_or_else(|| {
                platform::get_config_dir()
                    .join("settings.json")
                    .to_string_lossy()
                    .to_string()
            });

        Self {
            config_path,
            settings: RecallSettings::default(),
        }
    }

    /// Applies overrides from a variable lookup (the process environment in production).
    pub fn apply_overrides<F>(settings: &mut RecallSettings, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = API_KEY_ENVS.iter().find_map(|name| non_empty(*name)) {
            settings.ai.api_key = Some(key);
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            settings.ai.model = model;
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file, then applies environment overrides.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    fn load(&mut self) -> Result<RecallSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        let mut settings = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                SettingsError::IoError(format!("Failed to read config file: {}", e))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
            })?
        } else {
            log::debug!("No settings file at {}, using defaults", self.config_path);
            RecallSettings::default()
        };

        Self::apply_overrides(&mut settings, |name| std::env::var(name).ok());

        self.settings = settings;
        Ok(self.settings.clone())
    }

    fn get_settings(&self) -> &RecallSettings {
        &self.settings
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
