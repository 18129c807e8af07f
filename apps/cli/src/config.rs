use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use snus_core::{Coordinates, DEFAULT_MARKER_JITTER};

const CONFIG_DIR_NAME: &str = "snus-tracker";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_LOCATION_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LocationConfig> for Coordinates {
    fn from(value: LocationConfig) -> Self {
        Coordinates::new(value.latitude, value.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    /// Where entries are logged. Without it entries carry no location.
    pub location: Option<LocationConfig>,
    pub location_timeout_ms: u64,
    pub marker_jitter: f64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            location: None,
            location_timeout_ms: DEFAULT_LOCATION_TIMEOUT_MS,
            marker_jitter: DEFAULT_MARKER_JITTER,
        }
    }
}

impl CliConfig {
    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub file: PathBuf,
    pub created: bool,
}

pub fn load_or_create() -> Result<ConfigLoad> {
    let dir = dirs::config_dir()
        .context("resolve config dir")?
        .join(CONFIG_DIR_NAME);
    load_or_create_in(&dir)
}

pub fn load_or_create_in(dir: &Path) -> Result<ConfigLoad> {
    fs::create_dir_all(dir).with_context(|| format!("create config dir {}", dir.display()))?;
    let file = dir.join(CONFIG_FILE_NAME);

    if file.exists() {
        let contents = fs::read_to_string(&file)
            .with_context(|| format!("read config {}", file.display()))?;
        let config: CliConfig = toml::from_str(&contents)
            .with_context(|| format!("parse config {}", file.display()))?;
        return Ok(ConfigLoad {
            config,
            file,
            created: false,
        });
    }

    let config = CliConfig::default();
    let contents = toml::to_string_pretty(&config).context("serialize config")?;
    fs::write(&file, contents).with_context(|| format!("write config {}", file.display()))?;

    Ok(ConfigLoad {
        config,
        file,
        created: true,
    })
}
