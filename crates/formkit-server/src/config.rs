//! Server configuration

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid bind address {0}")]
    Bind(String),
}

/// Settings read from `formkit-server.toml`; flags and env override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub log_filter: String,
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            log_filter: "info".to_string(),
            token: None,
        }
    }
}

impl ServerConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply command-line and environment overrides
    pub fn merge(mut self, bind: Option<String>, token: Option<String>) -> Self {
        if let Some(bind) = bind {
            self.bind = bind;
        }
        if token.is_some() {
            self.token = token;
        }
        self.token = self.token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Bind(self.bind.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_file() {
        let config = ServerConfig::load(Path::new("/nonexistent/formkit-server.toml")).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_partial_toml() {
        let config = ServerConfig::from_toml("bind = \"127.0.0.1:9090\"\n").unwrap();
        assert_eq!(config.bind, "127.0.0.1:9090");
        assert_eq!(config.log_filter, "info");
        assert!(config.token.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_toml("token = \"from-file\"\n")
            .unwrap()
            .merge(Some("127.0.0.1:1".into()), None);
        assert_eq!(config.bind, "127.0.0.1:1");
        assert_eq!(config.token.as_deref(), Some("from-file"));

        let config = config.merge(None, Some("  ".into()));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_bad_bind() {
        let config = ServerConfig::default().merge(Some("localhost".into()), None);
        assert!(matches!(config.socket_addr(), Err(ConfigError::Bind(_))));
    }
}
