use std::time::Duration;

use aishub_core::{DEFAULT_BOX_SIZE_KM, Position};
use config::{Config, ConfigError, File};
use serde::Deserialize;
use strum::{AsRefStr, EnumString};
use tracing::Level;

static MAX_RATE_LIMITED_UPDATE_RATE: Duration = Duration::from_secs(60);
static MIN_UPDATE_RATE: Duration = Duration::from_secs(61);

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    #[serde(default)]
    pub log_level: LogLevel,
    pub environment: Environment,
    /// AisHub user name.
    pub api_key: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(with = "humantime_serde", default = "default_update_rate")]
    pub update_rate: Duration,
    /// Diameter of the area to track in km.
    #[serde(default)]
    pub box_size: Option<f64>,
    /// Identity of the observer, e.g. `urn:mrn:imo:mmsi:257999999`.
    pub self_id: String,
    #[serde(default)]
    pub observer: Option<Position>,
    #[serde(default = "default_channel_buffer_size")]
    pub channel_buffer_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Local,
    Development,
    Production,
    Test,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Settings {
    pub fn new() -> Result<Settings, ConfigError> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| Environment::Local.as_ref().to_string())
            .parse()
            .map_err(|e| ConfigError::Message(format!("failed to parse APP_ENVIRONMENT: {e}")))?;

        let config = Config::builder()
            .add_source(File::with_name(&format!("config/{}", environment.as_ref())).required(false))
            .add_source(config::Environment::with_prefix("AISHUB_CONSUMER").separator("__"))
            .set_override("environment", environment.as_ref())?
            .build()?;

        config.try_deserialize()
    }

    /// Polling interval, AisHub rejects clients polling more often than once a minute.
    pub fn update_interval(&self) -> Duration {
        if self.update_rate <= MAX_RATE_LIMITED_UPDATE_RATE {
            MIN_UPDATE_RATE
        } else {
            self.update_rate
        }
    }

    /// The context the observer publishes under.
    pub fn self_context(&self) -> String {
        format!("vessels.{}", self.self_id)
    }

    pub fn box_size(&self) -> f64 {
        self.box_size
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_BOX_SIZE_KM)
    }
}

impl From<&LogLevel> for Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn default_url() -> String {
    "http://data.aishub.net/ws.php".into()
}

fn default_update_rate() -> Duration {
    MIN_UPDATE_RATE
}

fn default_channel_buffer_size() -> usize {
    1000
}

fn default_max_retries() -> u32 {
    3
}
