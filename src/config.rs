//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Courtesy delay between catalog page requests in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default)]
    pub delay_jitter_ms: u64,

    /// Concurrent browser sessions during spec scraping
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Directory for exported files; created if absent
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Output filename override; derived from the query when unset
    #[serde(default)]
    pub filename: Option<String>,

    /// Path to the WebDriver binary; `chromedriver` on PATH when unset
    #[serde(default)]
    pub driver_path: Option<PathBuf>,

    /// Attach to an already-running WebDriver instead of spawning one
    #[serde(default)]
    pub webdriver_url: Option<String>,

    /// Port for a spawned WebDriver process
    #[serde(default = "default_driver_port")]
    pub driver_port: u16,

    /// Bounded wait for detail-page elements, in seconds
    #[serde(default = "default_element_timeout_secs")]
    pub element_timeout_secs: u64,
}

fn default_delay_ms() -> u64 {
    500
}

fn default_max_workers() -> usize {
    6
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_driver_port() -> u16 {
    9515
}

fn default_element_timeout_secs() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy: None,
            delay_ms: default_delay_ms(),
            delay_jitter_ms: 0,
            max_workers: default_max_workers(),
            output_dir: default_output_dir(),
            filename: None,
            driver_path: None,
            webdriver_url: None,
            driver_port: default_driver_port(),
            element_timeout_secs: default_element_timeout_secs(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("poya-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("POYA_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("POYA_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        if let Ok(workers) = std::env::var("POYA_WORKERS") {
            if let Ok(w) = workers.parse() {
                self.max_workers = w;
            }
        }

        if let Ok(url) = std::env::var("POYA_WEBDRIVER") {
            self.webdriver_url = Some(url);
        }

        self
    }
}
