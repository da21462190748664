//! Configuration handling for the wizard

use crate::schema::PasswordPolicy;
use crate::service::Organization;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration for the wizard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WizardConfig {
    /// Minimum password length; clamped to the policy floor
    pub password_min_length: Option<usize>,
    /// Organizations the offline backend offers to doctors
    #[serde(default)]
    pub organizations: Vec<Organization>,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl WizardConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "regwiz", "regwiz")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the user config directory
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, defaulting when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: WizardConfig = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Save configuration to the user config directory
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        self.password_min_length
            .map(PasswordPolicy::new)
            .unwrap_or_default()
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("regwiz=info")
    }
}
