use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;
use log::info;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::location::DeviceFix;
use crate::viewport::{Pointer, Viewport};

const DEFAULT_PATH: &str = "daynight.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sun_api_url: String,
    pub geocode_url: String,
    pub ip_api_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub stage_timeout_secs: u64,
    pub viewport: Viewport,
    pub pointer: Option<Pointer>,
    pub output_path: String,
    pub city: Option<String>,
    pub device: Option<DeviceFix>,
    pub max_device_accuracy_m: f64,
    pub date: Option<NaiveDate>,
    pub timezone: Option<String>,
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sun_api_url: "https://api.sunrisesunset.io/json".to_string(),
            geocode_url: "https://nominatim.openstreetmap.org/reverse".to_string(),
            ip_api_url: "https://ipapi.co/json/".to_string(),
            user_agent: format!("daynight/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 20,
            stage_timeout_secs: 10,
            viewport: Viewport::default(),
            pointer: None,
            output_path: "output.png".to_string(),
            city: None,
            device: None,
            max_device_accuracy_m: 5_000.0,
            date: None,
            timezone: None,
            interactive: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = env::var("DAYNIGHT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PATH));
        let mut config = Self::from_path(&path)?;
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// A missing file is not an error, it just means defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let file = File::open(path)?;
        serde_json::from_reader(file)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(city) = var("DAYNIGHT_CITY") {
            self.city = Some(city);
        }
        if let Some(position) = var("DAYNIGHT_DEVICE_POSITION") {
            self.device = Some(position.parse()?);
        }
        if let Some(output) = var("DAYNIGHT_OUTPUT") {
            self.output_path = output;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::Config("viewport must not be empty".to_string()));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|e| Error::Config(format!("timezone {name:?}: {e}")))
            })
            .transpose()
    }
}
