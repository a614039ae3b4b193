//! Directory-scanning ticker discovery.

use crate::domain::error::StocksimError;
use crate::ports::ticker_discovery::{TickerDiscovery, TickerDocument};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Finds `*.json` documents under a data directory, recursively. The file
/// stem is the discovered name; stems found in more than one directory are
/// named by their relative path instead (`nested/AAPL`), so names are unique.
pub struct DirTickerDiscovery {
    base_path: PathBuf,
}

impl DirTickerDiscovery {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn collect(&self, dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), StocksimError> {
        let entries = fs::read_dir(dir).map_err(|e| StocksimError::Discovery {
            reason: format!("failed to read directory {}: {}", dir.display(), e),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| StocksimError::Discovery {
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            if path.is_dir() {
                self.collect(&path, found)?;
            } else if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            {
                found.push(path);
            }
        }
        Ok(())
    }

    fn relative_name(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?.with_extension("");
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

impl TickerDiscovery for DirTickerDiscovery {
    fn discover(&self) -> Result<Vec<TickerDocument>, StocksimError> {
        let mut paths = Vec::new();
        self.collect(&self.base_path, &mut paths)?;
        paths.sort();

        let stem = |path: &Path| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        };
        let mut stem_counts: HashMap<String, usize> = HashMap::new();
        for s in paths.iter().filter_map(|p| stem(p)) {
            *stem_counts.entry(s).or_default() += 1;
        }

        let documents: Vec<TickerDocument> = paths
            .into_iter()
            .filter_map(|path| {
                let name = stem(&path)?;
                let ticker = if stem_counts.get(&name).copied().unwrap_or(0) > 1 {
                    self.relative_name(&path).unwrap_or(name)
                } else {
                    name
                };
                Some(TickerDocument {
                    ticker,
                    source: path.display().to_string(),
                })
            })
            .collect();

        tracing::debug!(
            dir = %self.base_path.display(),
            documents = documents.len(),
            "discovered ticker documents"
        );
        Ok(documents)
    }

    fn read(&self, document: &TickerDocument) -> Result<String, StocksimError> {
        fs::read_to_string(&document.source).map_err(|e| StocksimError::Discovery {
            reason: format!("failed to read {}: {}", document.source, e),
        })
    }
}
