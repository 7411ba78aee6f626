//! CLI Configuration

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const KEYS: [&str; 3] = ["api_url", "api_key", "format"];

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn save(&self, profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot find home directory"))?;
        Ok(home.join(".formkit").join(file_name(profile)))
    }

    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "api_key" => self.api_key.as_deref().map(mask),
            "format" => self.format.clone(),
            _ => bail!("unknown config key: {} (expected one of {})", key, KEYS.join(", ")),
        })
    }

    pub fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        let slot = match key {
            "api_url" => &mut self.api_url,
            "api_key" => &mut self.api_key,
            "format" => &mut self.format,
            _ => bail!("unknown config key: {} (expected one of {})", key, KEYS.join(", ")),
        };
        *slot = Some(value);
        Ok(())
    }
}

fn file_name(profile: Option<&str>) -> String {
    match profile {
        Some(p) => format!("config.{}.toml", p),
        None => "config.toml".to_string(),
    }
}

/// Show only the first few characters of a secret
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}
