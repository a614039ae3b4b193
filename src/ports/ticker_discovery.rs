//! Enumeration of per-ticker time-series documents.

use crate::domain::error::StocksimError;

/// A discovered document and the ticker name it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerDocument {
    pub ticker: String,
    /// Adapter-specific handle, e.g. a file path.
    pub source: String,
}

pub trait TickerDiscovery {
    fn discover(&self) -> Result<Vec<TickerDocument>, StocksimError>;

    fn read(&self, document: &TickerDocument) -> Result<String, StocksimError>;
}
