//! Resolved runtime settings.

use std::path::PathBuf;

use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DATA_DIR: &str = "resources";
pub const DEFAULT_HOLDINGS_FILE: &str = "stock_record.json";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_CHART_WIDTH: u32 = 800;
pub const DEFAULT_CHART_HEIGHT: u32 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub interval: Option<String>,
    pub holdings_file: PathBuf,
    pub log_level: String,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Portfolio chart scales each holding by the quantity owned.
    pub weighted_graph: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            interval: None,
            holdings_file: PathBuf::from(DEFAULT_HOLDINGS_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
            weighted_graph: false,
        }
    }
}

impl Settings {
    /// Read settings from a validated config, falling back to defaults for
    /// absent keys.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Settings::default();
        let dimension = |key: &str, default: u32| {
            u32::try_from(config.get_int("chart", key, i64::from(default))).unwrap_or(default)
        };

        Settings {
            data_dir: config
                .get_string("data", "dir")
                .map(|s| PathBuf::from(s.trim()))
                .unwrap_or(defaults.data_dir),
            interval: config
                .get_string("data", "interval")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            holdings_file: config
                .get_string("holdings", "file")
                .map(|s| PathBuf::from(s.trim()))
                .unwrap_or(defaults.holdings_file),
            log_level: config
                .get_string("logging", "level")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or(defaults.log_level),
            chart_width: dimension("width", defaults.chart_width),
            chart_height: dimension("height", defaults.chart_height),
            weighted_graph: config.get_bool("graph", "weighted", defaults.weighted_graph),
        }
    }

    /// Apply command-line overrides on top of file settings.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, holdings_file: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(file) = holdings_file {
            self.holdings_file = file;
        }
        self
    }
}
