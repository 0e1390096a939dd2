// Recall services
// Stateless building blocks: URL heuristics, media encoding, the model client, and settings.

pub mod analysis_client;
pub mod media_encoder;
pub mod settings_engine;
pub mod url_classifier;
