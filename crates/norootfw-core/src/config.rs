//! Policy store configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use norootfw_policy::filtering_mode;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the policy database file
    pub database_path: PathBuf,
    /// Filtering mode used until one is stored in settings
    #[serde(default = "default_filtering_mode")]
    pub default_filtering_mode: String,
}

fn default_filtering_mode() -> String {
    filtering_mode::BLACKLIST.to_string()
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("policy_db"),
            default_filtering_mode: default_filtering_mode(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("norootfw"))
            .unwrap_or_else(|| PathBuf::from(".norootfw"))
    }

    /// Read a JSON config file. A missing file gives the default config.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;

        if config.database_path.as_os_str().is_empty() {
            return Err(CoreError::Config("database_path cannot be empty".to_string()));
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
