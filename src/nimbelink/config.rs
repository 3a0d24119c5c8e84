use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{NimbelinkError, Result};

const CONFIG_FILENAME: &str = "config.json";

/// CLI display options, stored in the user config directory as
/// `config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NimbelinkConfig {
    /// Show each command's contributing package in help listings
    #[serde(default)]
    pub show_origins: bool,
}

impl NimbelinkConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: NimbelinkConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory, creating it if needed
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }
}

/// Where the CLI's config lives. `NIMBELINK_CONFIG_DIR` overrides the
/// platform config directory, which keeps tests hermetic.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("NIMBELINK_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "nimbelink", "nimbelink")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| NimbelinkError::Config("could not determine config dir".to_string()))
}
