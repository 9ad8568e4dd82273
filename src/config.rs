//! Runtime configuration: provider endpoint, credentials, aggregation knobs

use log::LevelFilter;

use crate::error::ConfigError;
use crate::forecast::AggregatorOptions;

/// Environment variable (runtime or build time) holding the API key
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// API key baked in at compile time, if any
const BUILD_TIME_API_KEY: Option<&str> = option_env!("OPENWEATHER_API_KEY");

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Everything the weather client needs to talk to the provider
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub units: String,
}

impl WeatherConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            units: "metric".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Resolve the API key: explicit value (flag or runtime env) first, then the
/// key compiled into the binary. Blank values count as missing.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String, ConfigError> {
    resolve_api_key_with(explicit, BUILD_TIME_API_KEY)
}

fn resolve_api_key_with(
    explicit: Option<&str>,
    build_time: Option<&str>,
) -> Result<String, ConfigError> {
    [explicit, build_time]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingApiKey)
}

/// Fully resolved application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub city: String,
    pub weather: WeatherConfig,
    pub aggregator: AggregatorOptions,
    pub refresh_interval_secs: u64,
}

/// Log verbosity accepted on the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
