//! Service configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::{gemini, youtube};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT '{0}': expected a number between 0 and 65535")]
    InvalidPort(String),

    #[error("Invalid bind address '{0}'")]
    InvalidAddress(String),
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub youtube_api_key: Option<String>,
    pub youtube_base_url: String,
    pub index_path: PathBuf,
    pub static_dir: PathBuf,
}

// Keys stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<set>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("youtube_api_key", &self.youtube_api_key.as_ref().map(|_| "<set>"))
            .field("youtube_base_url", &self.youtube_base_url)
            .field("index_path", &self.index_path)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            gemini_api_key: None,
            gemini_model: gemini::DEFAULT_MODEL.to_string(),
            gemini_base_url: gemini::DEFAULT_BASE_URL.to_string(),
            youtube_api_key: None,
            youtube_base_url: youtube::DEFAULT_BASE_URL.to_string(),
            index_path: PathBuf::from("index.html"),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        Ok(Config {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            youtube_api_key: get("YOUTUBE_API_KEY"),
            youtube_base_url: get("YOUTUBE_BASE_URL").unwrap_or(defaults.youtube_base_url),
            index_path: get("INDEX_HTML_PATH").map(PathBuf::from).unwrap_or(defaults.index_path),
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert!(config.gemini_api_key.is_none());
        assert!(config.youtube_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.index_path, PathBuf::from("index.html"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("GEMINI_API_KEY", "g-key"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("YOUTUBE_API_KEY", "y-key"),
            ("INDEX_HTML_PATH", "/srv/www/index.html"),
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));
        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.youtube_api_key.as_deref(), Some("y-key"));
        assert_eq!(config.index_path, PathBuf::from("/srv/www/index.html"));
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = load(&[("GEMINI_API_KEY", "   ")]).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(load(&[("PORT", "http")]), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(load(&[("PORT", "70000")]), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn test_invalid_host() {
        let config = load(&[("HOST", "not a host")]).unwrap();
        assert!(matches!(config.bind_addr(), Err(ConfigError::InvalidAddress(_))));
    }

    #[test]
    fn test_debug_hides_keys() {
        let config = load(&[("GEMINI_API_KEY", "secret-value")]).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-value"));
        assert!(rendered.contains("<set>"));
    }
}
