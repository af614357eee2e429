use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::api::auth::TOKEN_ENV_VAR;
use crate::api::{ApiClient, CredentialProvider, EnvToken, NoCredentials, StaticToken};

/// Environment variable overriding the configured API URL
pub const API_URL_ENV_VAR: &str = "CONTACTS_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_preview_rows() -> usize {
    crate::import::DEFAULT_PREVIEW_ROWS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            // XDG config directory on Linux
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("contacts-cli")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".contacts-cli")
        };

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
            info!("Created config directory: {:?}", config_dir);
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        debug!("Saving config to: {:?}", config_path);

        let config_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("API URL must start with http:// or https://, got '{}'", url);
        }
        info!("Setting API URL to: {}", url);
        self.api_url = Some(url.to_string());
        Ok(())
    }

    pub fn set_api_token(&mut self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            anyhow::bail!("API token cannot be empty");
        }
        info!("Storing API token");
        self.api_token = Some(token.to_string());
        Ok(())
    }

    pub fn clear_api_token(&mut self) -> bool {
        info!("Clearing stored API token");
        self.api_token.take().is_some()
    }

    pub fn set_request_timeout(&mut self, secs: u64) -> Result<()> {
        if secs == 0 {
            anyhow::bail!("request-timeout must be greater than 0");
        }
        self.settings.request_timeout_secs = secs;
        Ok(())
    }

    pub fn set_preview_rows(&mut self, rows: usize) -> Result<()> {
        if rows == 0 {
            anyhow::bail!("preview-rows must be greater than 0");
        }
        self.settings.preview_rows = rows;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }

    /// API URL, with the environment taking precedence over the file
    pub fn resolved_api_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
            if !url.trim().is_empty() {
                return Ok(url.trim().trim_end_matches('/').to_string());
            }
        }

        self.api_url.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "No API URL configured. Run 'contacts-cli settings set api-url <URL>' or set {}.",
                API_URL_ENV_VAR
            )
        })
    }

    /// Credentials for the API client: environment token first, then the stored one
    pub fn credential_provider(&self) -> Arc<dyn CredentialProvider> {
        let env = EnvToken::new(TOKEN_ENV_VAR);
        if env.bearer_token().is_some() {
            return Arc::new(env);
        }

        match &self.api_token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(NoCredentials),
        }
    }

    pub fn build_client(&self) -> Result<ApiClient> {
        let base_url = self.resolved_api_url()?;
        let client = ApiClient::with_timeout(base_url, self.credential_provider(), self.request_timeout())
            .context("Failed to create API client")?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.settings.preview_rows, 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_api_url("https://api.example.com/").unwrap();
        config.set_api_token("tok-1234").unwrap();
        config.set_preview_rows(10).unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(loaded.api_token.as_deref(), Some("tok-1234"));
        assert_eq!(loaded.settings.preview_rows, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"http://localhost:3000\"\n[settings]\npreview_rows = 3\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.preview_rows, 3);
        assert_eq!(config.settings.request_timeout_secs, 30);
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        assert!(config.set_api_url("ftp://example.com").is_err());
        assert!(config.set_api_token("   ").is_err());
        assert!(config.set_request_timeout(0).is_err());
        assert!(config.set_preview_rows(0).is_err());
    }

    #[test]
    fn test_clear_token() {
        let mut config = Config::default();
        assert!(!config.clear_api_token());
        config.set_api_token("abc").unwrap();
        assert!(config.clear_api_token());
        assert_eq!(config.api_token, None);
    }
}
