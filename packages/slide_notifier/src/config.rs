use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::dispatch::{DEFAULT_BASE_URL, NotificationTarget};
use crate::error::NotifierError;

// =============================================================================
// File config (figment-deserialized from defaults / slide-notifier.toml / env)
// =============================================================================
//
//   slide-notifier.toml:   poll_interval_ms = 250
//                          [target]
//                          base_url = "http://127.0.0.1:9000"
//
//   env var:               SLIDE_NOTIFIER_TARGET__BASE_URL=http://127.0.0.1:9000
//                          (double underscore = nesting)

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "slide-notifier.toml";

const ENV_PREFIX: &str = "SLIDE_NOTIFIER_";

/// Top-level tunable configuration, deserialized by figment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub target: TargetFileConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            target: TargetFileConfig::default(),
        }
    }
}

/// Destination tunables (lives under `[target]`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetFileConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TargetFileConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Build a figment that layers: defaults → config file → SLIDE_NOTIFIER_* env vars.
pub fn load_config(config_path: &Path) -> figment::Figment {
    use figment::{
        Figment,
        providers::{Env, Format, Serialized, Toml},
    };

    Figment::from(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(config_path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

// =============================================================================
// Runtime config (validated, fixed for the life of the process)
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotifierConfig {
    pub target: NotificationTarget,
    pub poll_interval: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            target: NotificationTarget::default(),
            poll_interval: Duration::from_millis(default_poll_interval_ms()),
        }
    }
}

impl NotifierConfig {
    pub fn from_file(fc: &FileConfig) -> Result<Self, NotifierError> {
        if fc.poll_interval_ms == 0 {
            return Err(NotifierError::InvalidPollInterval);
        }
        Ok(Self {
            target: NotificationTarget::new(&fc.target.base_url)?,
            poll_interval: Duration::from_millis(fc.poll_interval_ms),
        })
    }

    /// Extract and validate the layered config.
    pub fn load(config_path: &Path) -> Result<Self, NotifierError> {
        let fc: FileConfig = load_config(config_path).extract()?;
        Self::from_file(&fc)
    }
}
