//! Subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use airis_core::AirisConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("airis")
        .join("config.json")
}

/// Resolve the configuration file: explicit path, else the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, or defaults when the file has not been created.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<AirisConfig> {
    load_config_at(&config_path(explicit))
}

pub fn load_config_at(path: &Path) -> anyhow::Result<AirisConfig> {
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(AirisConfig::from_file(path)?)
    } else {
        debug!("No configuration at {}, using defaults", path.display());
        Ok(AirisConfig::default())
    }
}
