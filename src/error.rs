//! Error types

/// Startup configuration problems. Terminal for the session.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing OpenWeatherMap API key (set OPENWEATHER_API_KEY or pass --api-key)")]
    MissingApiKey,
    #[error("could not build HTTP client: {0}")]
    HttpClient(String),
}

/// A failed weather fetch. Recoverable: the previous model stays on screen.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("city not found: {0}")]
    CityNotFound(String),
    #[error("weather service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("response parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The URL carries the API key
        let err = err.without_url();
        if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

/// Logger setup failures, reported on stderr before the UI starts
#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    #[error("cannot open log file: {0}")]
    File(#[from] std::io::Error),
    #[error("invalid logger configuration: {0}")]
    Config(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("logger already installed: {0}")]
    Install(#[from] log::SetLoggerError),
}
