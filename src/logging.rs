//! File logging
//!
//! The terminal belongs to the dashboard, so log output goes to a file.

use std::path::{Path, PathBuf};

use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::LoggingError;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:<5} {t} - {m}{n}";

/// Default log location: `<temp dir>/weather-gauge.log`
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("weather-gauge.log")
}

/// Install a file logger at `level`. `LevelFilter::Off` installs nothing.
pub fn init(path: &Path, level: LevelFilter) -> Result<(), LoggingError> {
    if level == LevelFilter::Off {
        return Ok(());
    }

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(level))?;

    log4rs::init_config(config)?;
    log::info!("logging to {} at {}", path.display(), level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_in_temp_dir() {
        let path = default_log_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert_eq!(path.file_name().unwrap(), "weather-gauge.log");
    }

    #[test]
    fn test_off_level_is_noop() {
        let path = std::env::temp_dir().join("weather-gauge-never-created.log");
        init(&path, LevelFilter::Off).unwrap();
        assert!(!path.exists());
    }
}
