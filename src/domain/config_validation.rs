//! Configuration validation.
//!
//! Every key is optional; present keys must hold usable values.

use crate::domain::error::StocksimError;
use crate::ports::config_port::ConfigPort;
use tracing::level_filters::LevelFilter;

pub const INTERVALS: &[&str] = &[
    "1min", "5min", "15min", "30min", "60min", "daily", "weekly", "monthly",
];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    validate_not_blank(config, "data", "dir")?;
    validate_interval(config)?;
    validate_not_blank(config, "holdings", "file")?;
    validate_log_level(config)?;
    validate_chart_size(config)?;
    Ok(())
}

fn validate_not_blank(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), StocksimError> {
    if let Some(value) = config.get_string(section, key) {
        if value.trim().is_empty() {
            return Err(StocksimError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("{key} must not be blank"),
            });
        }
    }
    Ok(())
}

fn validate_interval(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    if let Some(value) = config.get_string("data", "interval") {
        let normalized = value.trim().to_lowercase();
        if !INTERVALS.contains(&normalized.as_str()) {
            return Err(StocksimError::ConfigInvalid {
                section: "data".to_string(),
                key: "interval".to_string(),
                reason: format!("expected one of {}", INTERVALS.join(", ")),
            });
        }
    }
    Ok(())
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    if let Some(value) = config.get_string("logging", "level") {
        if value.trim().parse::<LevelFilter>().is_err() {
            return Err(StocksimError::ConfigInvalid {
                section: "logging".to_string(),
                key: "level".to_string(),
                reason: format!("unknown log level {value:?}"),
            });
        }
    }
    Ok(())
}

fn validate_chart_size(config: &dyn ConfigPort) -> Result<(), StocksimError> {
    for key in ["width", "height"] {
        if config.get_string("chart", key).is_some() && config.get_int("chart", key, 0) < 100 {
            return Err(StocksimError::ConfigInvalid {
                section: "chart".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be an integer of at least 100"),
            });
        }
    }
    Ok(())
}
