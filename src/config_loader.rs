use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{anyhow, bail, Result};
use dotenvy::dotenv;

/// Settings block for one host in still.yaml. Every key is optional; missing
/// keys come from the `default` block, then from the built-in values.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", deny_unknown_fields)]
pub struct HostConfig {
    pub serial_port: Option<String>,
    pub baud_rate: Option<u32>,
    pub poll_interval_ms: Option<u64>,
    pub check_interval_ms: Option<u64>,
    pub temp_min: Option<i32>,
    pub temp_max: Option<i32>,
    pub initial_low: Option<i32>,
    pub initial_high: Option<i32>,
}

impl HostConfig {
    /// Keys set in `over` replace ours
    pub fn merged(self, over: &HostConfig) -> HostConfig {
        HostConfig {
            serial_port: over.serial_port.clone().or(self.serial_port),
            baud_rate: over.baud_rate.or(self.baud_rate),
            poll_interval_ms: over.poll_interval_ms.or(self.poll_interval_ms),
            check_interval_ms: over.check_interval_ms.or(self.check_interval_ms),
            temp_min: over.temp_min.or(self.temp_min),
            temp_max: over.temp_max.or(self.temp_max),
            initial_low: over.initial_low.or(self.initial_low),
            initial_high: over.initial_high.or(self.initial_high),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub default: Option<HostConfig>,
    #[serde(rename = "RaspberryPi")]
    pub rpi: Option<HashMap<String, HostConfig>>, // hostname -> HostConfig
    #[serde(rename = "Ubuntu")]
    pub ubuntu: Option<HashMap<String, HostConfig>>,
    #[serde(rename = "macOS")]
    pub macos: Option<HashMap<String, HostConfig>>,
}

impl Config {
    /// Host block for `hostname`, searched across the OS sections
    pub fn host(&self, hostname: &str) -> Option<&HostConfig> {
        [&self.rpi, &self.ubuntu, &self.macos]
            .into_iter()
            .flatten()
            .find_map(|m| m.get(hostname))
    }
}

/// Fully resolved panel settings
#[derive(Debug, Clone, PartialEq)]
pub struct StillSettings {
    pub serial_port: String,
    pub baud_rate: u32,
    pub poll_interval: Duration,
    pub check_interval: Duration,
    pub temp_min: i32,
    pub temp_max: i32,
    pub initial_low: i32,
    pub initial_high: i32,
}

impl Default for StillSettings {
    fn default() -> Self {
        Self {
            serial_port: "/dev/ttyACM0".to_string(),
            baud_rate: 9600,
            poll_interval: Duration::from_millis(250),
            check_interval: Duration::from_millis(30_000),
            temp_min: 150,
            temp_max: 250,
            initial_low: 178,
            initial_high: 190,
        }
    }
}

impl StillSettings {
    fn from_host(cfg: &HostConfig) -> Self {
        let d = Self::default();
        Self {
            serial_port: cfg.serial_port.clone().unwrap_or(d.serial_port),
            baud_rate: cfg.baud_rate.unwrap_or(d.baud_rate),
            poll_interval: cfg.poll_interval_ms.map(Duration::from_millis).unwrap_or(d.poll_interval),
            check_interval: cfg.check_interval_ms.map(Duration::from_millis).unwrap_or(d.check_interval),
            temp_min: cfg.temp_min.unwrap_or(d.temp_min),
            temp_max: cfg.temp_max.unwrap_or(d.temp_max),
            initial_low: cfg.initial_low.unwrap_or(d.initial_low),
            initial_high: cfg.initial_high.unwrap_or(d.initial_high),
        }
    }

    /// Fail loudly on settings the slider or timers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.serial_port.trim().is_empty() {
            bail!("SERIAL_PORT is empty");
        }
        if self.baud_rate == 0 {
            bail!("BAUD_RATE must be positive");
        }
        if self.poll_interval.is_zero() || self.check_interval.is_zero() {
            bail!("POLL_INTERVAL_MS and CHECK_INTERVAL_MS must be positive");
        }
        if self.temp_min > self.temp_max {
            bail!("TEMP_MIN {} is above TEMP_MAX {}", self.temp_min, self.temp_max);
        }
        if self.initial_low >= self.initial_high {
            bail!("INITIAL_LOW {} must be below INITIAL_HIGH {}", self.initial_low, self.initial_high);
        }
        if self.initial_low < self.temp_min || self.initial_high > self.temp_max {
            bail!(
                "initial band {}..{} is outside {}..{}",
                self.initial_low, self.initial_high, self.temp_min, self.temp_max
            );
        }
        Ok(())
    }
}

/// still.yaml next to Cargo.toml
pub fn default_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("still.yaml")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let file = File::open(path)
        .map_err(|e| anyhow!("Missing required still.yaml at {:?}: {}", path, e))?;
    let config: Config = serde_yaml::from_reader(file)
        .map_err(|e| anyhow!("Invalid YAML in {:?}: {}", path, e))?;
    Ok(config)
}

/// Merge built-in values, the `default` block and the host block
pub fn resolve_settings(config: &Config, hostname: &str) -> Result<StillSettings> {
    let mut merged = config.default.clone().unwrap_or_default();
    match config.host(hostname) {
        Some(host) => merged = merged.merged(host),
        None => log::info!(target: "config_loader", "No host entry for '{}', using default block", hostname),
    }
    let settings = StillSettings::from_host(&merged);
    settings.validate()?;
    Ok(settings)
}

/// Load settings for `hostname` from `path` (or still.yaml), then apply the
/// `STILL_SERIAL_PORT` override from the environment or `.env`.
pub fn load_still_settings(path: Option<&Path>, hostname: &str) -> Result<StillSettings> {
    let _ = dotenv();
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let config = load_config(&path)?;
    let mut settings = resolve_settings(&config, hostname)?;
    if let Ok(port) = env::var("STILL_SERIAL_PORT") {
        if !port.trim().is_empty() {
            settings.serial_port = port;
        }
    }
    log::info!(target: "config_loader", "StillSettings: port={} baud={} range={}..{} band={}..{} (hostname={})",
               settings.serial_port, settings.baud_rate, settings.temp_min, settings.temp_max,
               settings.initial_low, settings.initial_high, hostname);
    Ok(settings)
}

pub fn current_hostname() -> String {
    gethostname::gethostname().to_string_lossy().to_string()
}
