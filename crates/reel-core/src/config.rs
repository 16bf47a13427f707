use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ReelError, Result};

/// Top-level configuration for a Reel deployment.
///
/// Loaded from a TOML file; every section and field has a default so a
/// partial (or absent) file is always usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReelConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl ReelConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ReelConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| ReelError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Session settings. Advisory for hosting services; the core itself never
/// reaps sessions on a timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minutes of user silence after which a host may discard a session.
    pub timeout_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout_minutes: 30 }
    }
}

/// Dialog-policy tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Maximum number of candidates presented in a short list.
    pub max_list_size: usize,
    /// Minimum number of active constraints before the policy will try to
    /// disambiguate (below this, alternatives requests are rejected and a
    /// broad match triggers the specific-or-suggestion confirmation).
    pub min_constraints: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_list_size: 3,
            min_constraints: 2,
        }
    }
}
