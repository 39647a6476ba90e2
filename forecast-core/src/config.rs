use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "ACCUWEATHER_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Base URLs of the three endpoints the app talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub search: String,
    pub forecast: String,
    pub icons: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search: "https://dataservice.accuweather.com/locations/v1/cities/search".to_string(),
            forecast: "https://dataservice.accuweather.com/forecasts/v1/daily/5day".to_string(),
            icons: "https://developer.accuweather.com/sites/default/files".to_string(),
        }
    }
}

impl Endpoints {
    /// Points every endpoint at one host, laid out like the real service.
    /// Used to aim the client at a local mock server.
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            search: format!("{base}/locations/v1/cities/search"),
            forecast: format!("{base}/forecasts/v1/daily/5day"),
            icons: format!("{base}/sites/default/files"),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// metric = false
/// timeout_secs = 10
///
/// [endpoints]
/// search = "https://dataservice.accuweather.com/locations/v1/cities/search"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Ask the service for Celsius instead of Fahrenheit.
    pub metric: bool,

    pub timeout_secs: u64,

    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            metric: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Load config from the platform location, then apply the environment
    /// override. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_override(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-gui")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// A non-blank value from the environment wins over the file.
    pub fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// The configured API key, or a startup error explaining how to set one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No AccuWeather API key configured.\n\
                     Hint: run `forecast configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No AccuWeather API key configured"));
        assert!(msg.contains("forecast configure"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config { api_key: Some("   ".into()), ..Config::default() };
        assert!(cfg.require_api_key().is_err());
    }

    #[test]
    fn env_override_replaces_file_key() {
        let mut cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() };

        cfg.apply_env_override(Some(" ENV_KEY ".into()));
        assert_eq!(cfg.require_api_key().unwrap(), "ENV_KEY");

        cfg.apply_env_override(Some(String::new()));
        assert_eq!(cfg.require_api_key().unwrap(), "ENV_KEY");

        cfg.apply_env_override(None);
        assert_eq!(cfg.require_api_key().unwrap(), "ENV_KEY");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config { metric: true, timeout_secs: 3, ..Config::default() };
        cfg.set_api_key("KEY".into());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"abc\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
        assert!(!cfg.metric);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.endpoints, Endpoints::default());
    }

    #[test]
    fn rooted_endpoints_follow_service_layout() {
        let e = Endpoints::rooted_at("http://127.0.0.1:9000/");
        assert_eq!(e.search, "http://127.0.0.1:9000/locations/v1/cities/search");
        assert_eq!(e.forecast, "http://127.0.0.1:9000/forecasts/v1/daily/5day");
        assert_eq!(e.icons, "http://127.0.0.1:9000/sites/default/files");
    }
}
