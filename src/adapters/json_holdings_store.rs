//! JSON file holdings store.
//!
//! The file is a flat object mapping ticker to quantity, e.g.
//! `{"AAPL": 3, "TSLA": 0}`.

use crate::domain::error::StocksimError;
use crate::ports::holdings_store::{HoldingsStore, Quantities};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct JsonHoldingsStore {
    path: PathBuf,
}

impl JsonHoldingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn save_error(&self, e: impl std::fmt::Display) -> StocksimError {
        StocksimError::HoldingsSave {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

impl HoldingsStore for JsonHoldingsStore {
    fn load(&self) -> Result<Quantities, StocksimError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Quantities::new()),
            Err(e) => {
                return Err(StocksimError::HoldingsLoad {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(Quantities::new());
        }
        serde_json::from_str(&content).map_err(|e| StocksimError::HoldingsLoad {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn save(&self, holdings: &Quantities) -> Result<(), StocksimError> {
        let json = serde_json::to_string_pretty(holdings).map_err(|e| self.save_error(e))?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| self.save_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            self.save_error(e)
        })
    }
}
