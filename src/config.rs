//! Plugin configuration.
//!
//! Everything has a default from [`crate::constants`]; embedders that want to
//! override a value can deserialize a [`PluginConfig`] from JSON.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::constants;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    /// Method channel the plugin listens on.
    pub channel_name: String,
    /// Bundle/process identity scoping single-instance arbitration.
    pub app_identity: String,
    /// Fallback delay before the startup payload is flushed.
    pub startup_flush_delay_ms: u64,
    /// Directory holding the single-instance endpoint.
    pub ipc_dir: PathBuf,
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig {
            channel_name: constants::METHOD_CHANNEL_NAME.to_string(),
            app_identity: constants::DEFAULT_APP_IDENTITY.to_string(),
            startup_flush_delay_ms: constants::STARTUP_PAYLOAD_FLUSH_DELAY.as_millis() as u64,
            ipc_dir: std::env::temp_dir(),
        }
    }
}

impl PluginConfig {
    /// Parses a JSON object; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing window_plus plugin config")
    }

    pub fn with_app_identity(mut self, identity: impl Into<String>) -> Self {
        self.app_identity = identity.into();
        self
    }

    pub fn startup_flush_delay(&self) -> Duration {
        Duration::from_millis(self.startup_flush_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PluginConfig::from_json(r#"{ "appIdentity": "com.example.editor" }"#).unwrap();
        assert_eq!(config.app_identity, "com.example.editor");
        assert_eq!(config.channel_name, constants::METHOD_CHANNEL_NAME);
        assert_eq!(config.startup_flush_delay(), constants::STARTUP_PAYLOAD_FLUSH_DELAY);
    }

    #[test]
    fn rejects_ill_typed_values() {
        assert!(PluginConfig::from_json(r#"{ "startupFlushDelayMs": "soon" }"#).is_err());
    }
}
