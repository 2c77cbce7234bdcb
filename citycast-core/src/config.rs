use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const ENV_API_URL: &str = "OPENWEATHER_API_URL";
pub const ENV_GEO_URL: &str = "OPENWEATHER_GEO_URL";
pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";

/// Public OpenWeather endpoints, offered as defaults by `citycast configure`.
pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_url = "https://api.openweathermap.org/data/2.5"
/// geo_url = "https://api.openweathermap.org/geo/1.0"
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the current-weather and forecast endpoints.
    pub api_url: Option<String>,
    /// Base URL of the geocoding endpoint.
    pub geo_url: Option<String>,
    pub api_key: Option<String>,
}

/// Resolved values handed to the HTTP client. Missing values are empty
/// strings; they are not validated and fail at request time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    pub weather_base: String,
    pub geo_base: String,
    pub api_key: String,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citycast", "citycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay values from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_API_URL) {
            self.api_url = Some(v);
        }
        if let Some(v) = non_empty(ENV_GEO_URL) {
            self.geo_url = Some(v);
        }
        if let Some(v) = non_empty(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        self
    }

    pub fn endpoints(&self) -> Endpoints {
        let trimmed = |v: &Option<String>| {
            v.as_deref()
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .unwrap_or_default()
        };

        Endpoints {
            weather_base: trimmed(&self.api_url),
            geo_base: trimmed(&self.geo_url),
            api_key: self.api_key.clone().unwrap_or_default(),
        }
    }

    /// Names of the settings that are still unset, for hints only.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.api_url.is_none() {
            out.push(ENV_API_URL);
        }
        if self.geo_url.is_none() {
            out.push(ENV_GEO_URL);
        }
        if self.api_key.is_none() {
            out.push(ENV_API_KEY);
        }
        out
    }
}
