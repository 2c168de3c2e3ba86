use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::document::FallbackAnchor;
use crate::sections::Section;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    /// Per-section prompt overrides, keyed by section identifier
    #[serde(default)]
    pub prompts: HashMap<String, String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    /// Directory holding canned generator responses (`intro.txt`, ...).
    /// The built-in demo texts are used when unset.
    #[serde(default)]
    pub responses_dir: Option<String>,
    #[serde(default)]
    pub fallback_anchor: FallbackAnchor,
    /// Simulated generator latency in milliseconds
    #[serde(default)]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub responses_dir: Option<PathBuf>,
    pub fallback_anchor: FallbackAnchor,
    pub latency_ms: u64,
    pub prompts: HashMap<Section, String>,
    pub logging: LoggingConfig,
}
