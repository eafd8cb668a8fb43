use std::path::PathBuf;

use crate::common::{CONFIG_DIR, CONFIG_DIR_ENV};

/// Configuration directory, overridable through the environment for
/// unprivileged runs.
pub fn config_dir() -> PathBuf {
    match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(CONFIG_DIR),
    }
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}
