//! Application configuration management.
//!
//! This module handles loading and saving the portal configuration: where
//! contact requests go, the simulated network delays, and the last email
//! and role used to sign in.
//!
//! Configuration is stored at `~/.config/ayni-portal/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// Application name used for config/data directory paths
const APP_NAME: &str = "ayni-portal";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_CONTACT_EMAIL: &str = "contacto@ayniabogados.cl";
const DEFAULT_WHATSAPP_NUMBER: &str = "56223456789";

/// Simulated round trip for a login request.
const DEFAULT_LOGIN_DELAY_MS: u64 = 1000;

/// Simulated round trip for a contact form submission.
const DEFAULT_SUBMIT_DELAY_MS: u64 = 1500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub last_email: Option<String>,
    pub last_role: Option<Role>,
    pub contact_email: String,
    pub whatsapp_number: String,
    pub login_delay_ms: u64,
    pub submit_delay_ms: u64,
    /// Overrides where the session snapshot is stored.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            last_email: None,
            last_role: None,
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            login_delay_ms: DEFAULT_LOGIN_DELAY_MS,
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            data_dir: None,
        }
    }
}

impl Config {
    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `~/.config/ayni-portal/config.json`, or the platform equivalent.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the local key-value store.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.contact_email, "contacto@ayniabogados.cl");
        assert_eq!(config.login_delay(), Duration::from_millis(1000));
        assert_eq!(config.submit_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "last_email": "ana.silva@example.com",
                "last_role": "cliente",
                "login_delay_ms": 0
            }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.last_email.as_deref(), Some("ana.silva@example.com"));
        assert_eq!(config.last_role, Some(Role::Client));
        assert_eq!(config.login_delay_ms, 0);
        assert_eq!(config.whatsapp_number, "56223456789");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            last_email: Some("juan.perez@ayniabogados.cl".to_string()),
            last_role: Some(Role::Lawyer),
            data_dir: Some(dir.path().join("data")),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.data_dir().unwrap(), dir.path().join("data"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
