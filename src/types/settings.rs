use serde::{Deserialize, Serialize};

/// Top-level Recall settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecallSettings {
    #[serde(default)]
    pub ai: AISettings,
}

/// Settings for the generative model used for analysis and recaps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AISettings {
    pub model: String,
    pub api_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Upper bound on one model call. Unset means the call may wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for AISettings {
    fn default() -> Self {
        Self {
            model: "gemini-3-pro-preview".to_string(),
            api_endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            request_timeout_secs: None,
        }
    }
}
