use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub daemon: DaemonSection,
    #[serde(default)]
    pub monitor: MonitorSection,
    #[serde(default)]
    pub ipc: IpcSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DaemonSection {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorSection {
    #[serde(default = "default_log_transitions")]
    pub log_transitions: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IpcSection {
    #[serde(default = "default_socket")]
    pub socket: String,
}

impl Default for DaemonSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            log_transitions: default_log_transitions(),
        }
    }
}

impl Default for IpcSection {
    fn default() -> Self {
        Self {
            socket: default_socket(),
        }
    }
}

impl Settings {
    /// Load settings from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).context("Failed to parse settings.toml")
    }

    /// Missing or unreadable settings fall back to the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                debug!(target: "appstated::config", "Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!(target: "appstated::config", "Using default settings: {:#}", e);
                Self::default()
            }
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_transitions() -> bool {
    true
}

fn default_socket() -> String {
    crate::common::SOCKET_PATH.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[daemon]\nlog_level = \"debug\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.daemon.log_level, "debug");
        assert!(settings.monitor.log_transitions);
        assert_eq!(settings.ipc.socket, crate::common::SOCKET_PATH);
    }

    #[test]
    fn test_full_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            concat!(
                "[daemon]\n",
                "log_level = \"warn\"\n",
                "[monitor]\n",
                "log_transitions = false\n",
                "[ipc]\n",
                "socket = \"/tmp/appstated-test.sock\"\n",
            ),
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.daemon.log_level, "warn");
        assert!(!settings.monitor.log_transitions);
        assert_eq!(settings.ipc.socket, "/tmp/appstated-test.sock");
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(dir.path().join("settings.toml"));
        assert_eq!(settings.daemon.log_level, "info");
        assert!(settings.monitor.log_transitions);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not toml [").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
