use crate::core::config::{self, Settings};

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub settings: Settings,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            settings: Settings::load_or_default(config::settings_path()),
        }
    }
}
