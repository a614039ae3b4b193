//! Persistence port for the ticker -> quantity mapping.

use crate::domain::error::StocksimError;
use std::collections::BTreeMap;

pub type Quantities = BTreeMap<String, u64>;

pub trait HoldingsStore {
    /// Returns an empty mapping when nothing has been persisted yet.
    fn load(&self) -> Result<Quantities, StocksimError>;

    /// Replaces the persisted mapping as a whole.
    fn save(&self, holdings: &Quantities) -> Result<(), StocksimError>;
}
