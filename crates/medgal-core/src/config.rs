//! Configuration management for the portal.
//!
//! Loads configuration from ${MEDGAL_HOME}/config.toml with sensible defaults.
//! The API base URL and the OAuth client id are resolved once at startup;
//! environment variables win over the config file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::UserType;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL for every API call, e.g. `http://localhost:9090/api`.
    pub api_base_url: String,

    /// OAuth client identifier for the federated sign-in flow.
    pub google_client_id: Option<String>,

    /// Role preselected on the login screen.
    pub default_role: UserType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            google_client_id: None,
            default_role: UserType::Patient,
        }
    }
}

impl Config {
    const DEFAULT_API_BASE_URL: &str = "http://localhost:9090/api";

    /// Loads configuration from the default config path and applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Applies `MEDGAL_API_URL` / `MEDGAL_GOOGLE_CLIENT_ID` overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MEDGAL_API_URL") {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.api_base_url = trimmed.trim_end_matches('/').to_string();
            }
        }
        if let Ok(id) = std::env::var("MEDGAL_GOOGLE_CLIENT_ID") {
            let trimmed = id.trim();
            if !trimmed.is_empty() {
                self.google_client_id = Some(trimmed.to_string());
            }
        }
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base_url))?;
        Ok(())
    }

    /// Writes the default config template to the default path.
    ///
    /// # Errors
    /// Fails if the file already exists or the directory can't be created.
    pub fn init() -> Result<std::path::PathBuf> {
        let path = paths::config_path();
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, default_config_template())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Default config file contents written by `medgal config init`.
pub fn default_config_template() -> &'static str {
    r#"# Medical Gallery portal configuration

# Base URL for all API calls (env override: MEDGAL_API_URL)
api_base_url = "http://localhost:9090/api"

# OAuth client id for Google sign-in (env override: MEDGAL_GOOGLE_CLIENT_ID)
# google_client_id = ""

# Role preselected on the login screen: "PATIENT" or "HOSPITAL"
default_role = "PATIENT"
"#
}

pub mod paths {
    //! Path resolution for portal configuration and data files.
    //!
    //! MEDGAL_HOME resolution order:
    //! 1. MEDGAL_HOME environment variable (if set)
    //! 2. ~/.medgal (default)

    use std::path::PathBuf;

    /// Returns the user's home directory, if known.
    pub fn home_dir() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
    }

    /// Returns the portal home directory.
    pub fn medgal_home() -> PathBuf {
        if let Some(home) = std::env::var_os("MEDGAL_HOME") {
            return PathBuf::from(home);
        }

        home_dir()
            .map(|h| h.join(".medgal"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        medgal_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        medgal_home().join("session.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        medgal_home().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9090/api");
        assert_eq!(config.default_role, UserType::Patient);
        assert!(config.google_client_id.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
api_base_url = "https://gallery.example.com/api"
google_client_id = "client-123"
default_role = "HOSPITAL"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://gallery.example.com/api");
        assert_eq!(config.google_client_id.as_deref(), Some("client-123"));
        assert_eq!(config.default_role, UserType::Hospital);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base_url = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(config.api_base_url, Config::DEFAULT_API_BASE_URL);
    }
}
