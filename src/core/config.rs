use crate::core::filter::PrefixSet;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FirestoreConfig {
    #[serde(default = "default_firestore_url")]
    pub base_url: String,
    pub project_id: String,
    pub api_key: Option<String>,
}

fn default_firestore_url() -> String {
    DEFAULT_FIRESTORE_URL.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RealtimeDatabaseConfig {
    pub url: String,
    pub auth: Option<String>,
}

/// Backend sections. A missing section means that backend is not provisioned.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct BackendsConfig {
    pub firestore: Option<FirestoreConfig>,
    pub realtime_database: Option<RealtimeDatabaseConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct FiltersConfig {
    #[serde(default)]
    pub prefixes: PrefixSet,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub backends: BackendsConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "clientboard", "clientboard")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
backends:
  firestore:
    project_id: "balance-t"
    api_key: "abc"
  realtime_database:
    url: "https://balance-t-default-rtdb.firebaseio.com"
filters:
  prefixes: ["ah", "", "ch"]
currency_symbol: "€"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        let firestore = config.backends.firestore.unwrap();
        assert_eq!(firestore.project_id, "balance-t");
        assert_eq!(firestore.base_url, DEFAULT_FIRESTORE_URL);
        assert_eq!(firestore.api_key.as_deref(), Some("abc"));
        let rtdb = config.backends.realtime_database.unwrap();
        assert_eq!(rtdb.url, "https://balance-t-default-rtdb.firebaseio.com");
        assert!(rtdb.auth.is_none());
        assert_eq!(config.filters.prefixes.as_slice(), ["AH", "", "CH"]);
        assert_eq!(config.currency_symbol, "€");
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.backends.firestore.is_none());
        assert!(config.backends.realtime_database.is_none());
        assert_eq!(config.filters.prefixes, PrefixSet::default());
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_load_from_missing_path_fails_with_context() {
        let err = AppConfig::load_from_path("/nonexistent/clientboard.yaml").unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }
}
