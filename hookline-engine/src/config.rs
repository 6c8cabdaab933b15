//! Engine settings, read from the `[engine]` table of a Hookline config file.

use hookline_model::ConfigResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Pipeline behavior knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reject input keys that are not declared on the list. When off, unknown
    /// keys pass through field resolution untouched.
    #[serde(default = "default_reject_unknown_fields")]
    pub reject_unknown_fields: bool,
    /// Extra secret mixed into password hashes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_pepper: Option<String>,
}

fn default_reject_unknown_fields() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reject_unknown_fields: default_reject_unknown_fields(),
            password_pepper: None,
        }
    }
}

/// Raw TOML structure; other tables (such as `[[lists]]`) are ignored.
#[derive(Deserialize, Default)]
struct EngineFile {
    #[serde(default)]
    engine: EngineConfig,
}

impl EngineConfig {
    /// Parses the `[engine]` table from TOML text. Missing table means defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let file: EngineFile = toml::from_str(contents)?;
        Ok(file.engine)
    }

    /// Loads engine settings from a file.
    /// Falls back to defaults with a warning when the file is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No engine config at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded engine config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse engine config {:?}: {}. Using defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read engine config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
