//! INI file configuration adapter.
//!
//! Values may carry a trailing `; comment` or `# comment` after whitespace,
//! as in the sample configuration; the comment is dropped before the value
//! is handed out.

use crate::domain::error::StocksimError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StocksimError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| StocksimError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        tracing::debug!(file = %path.display(), "loaded configuration");
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn value(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|raw| strip_inline_comment(&raw).to_string())
    }
}

fn strip_inline_comment(raw: &str) -> &str {
    let cut = raw
        .char_indices()
        .find(|&(i, c)| {
            (c == ';' || c == '#') && (i == 0 || raw[..i].ends_with(char::is_whitespace))
        })
        .map_or(raw.len(), |(i, _)| i);
    raw[..cut].trim()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.value(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.value(section, key)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(default)
    }
}
