use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CbrProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FmpProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub cbr: Option<CbrProviderConfig>,
    pub fmp: Option<FmpProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            cbr: Some(CbrProviderConfig {
                base_url: "https://cbr.ru".to_string(),
            }),
            fmp: Some(FmpProviderConfig {
                base_url: "https://financialmodelingprep.com".to_string(),
                api_key: String::new(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// CSV export of bank operations.
    pub operations_path: String,
    /// JSON file with `user_currencies` and `user_stocks`.
    pub user_settings_path: String,
    /// Where spending reports land. Must exist before a report runs.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Reporting currency all amounts are normalized to.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_reports_dir() -> String {
    "data".to_string()
}

fn default_currency() -> String {
    "RUB".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "moneta")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

/// Dashboard preferences: currencies to quote and stocks to watch.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct UserSettings {
    pub user_currencies: Vec<String>,
    pub user_stocks: Vec<String>,
}

impl UserSettings {
    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read user settings: {}", path.as_ref().display())
        })?;

        let settings: Self = serde_json::from_str(&raw).with_context(|| {
            format!("Failed to parse user settings: {}", path.as_ref().display())
        })?;
        debug!("Successfully loaded user settings");
        Ok(settings)
    }
}
