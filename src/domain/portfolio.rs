//! Portfolio assembly and aggregate figures.

use serde::Serialize;
use std::collections::HashMap;

use super::error::StocksimError;
use super::graph::{sum_on_shared_grid, GraphPoint};
use super::holding::{Holding, HoldingSnapshot};
use super::loader::TimeSeriesLoader;
use super::money::round2;
use crate::ports::holdings_store::{HoldingsStore, Quantities};
use crate::ports::ticker_discovery::TickerDiscovery;

/// Holdings in discovery order, keyed by document name.
///
/// A name is normally the ticker symbol, but several documents may carry the
/// same symbol (one file per month, say), so lookups also accept a
/// case-insensitive name or a symbol that only one holding carries.
#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    holdings: Vec<Holding>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSnapshot {
    pub holdings: Vec<HoldingSnapshot>,
    pub total_equity: f64,
    pub total_return: f64,
}

impl Portfolio {
    /// Build a holding for every discovered document.
    ///
    /// Unreadable holdings state counts as "nothing persisted". The stored
    /// quantity is looked up under the document name, then under the
    /// series symbol; a holding with neither starts at zero. Any read or
    /// parse failure aborts the whole load.
    pub fn load(
        store: &dyn HoldingsStore,
        discovery: &dyn TickerDiscovery,
        loader: &TimeSeriesLoader,
    ) -> Result<Self, StocksimError> {
        let quantities = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "holdings state unavailable, starting from empty");
            Quantities::new()
        });

        let mut portfolio = Portfolio::default();
        for document in discovery.discover()? {
            let raw = discovery.read(&document)?;
            let series = loader.load(&raw).map_err(|source| StocksimError::Parse {
                ticker: document.ticker.clone(),
                source,
            })?;

            let quantity = quantities
                .get(&document.ticker)
                .or_else(|| quantities.get(series.ticker()))
                .copied()
                .unwrap_or_else(|| {
                    tracing::debug!(
                        name = %document.ticker,
                        source = %document.source,
                        "no persisted quantity, defaulting to 0"
                    );
                    0
                });

            tracing::debug!(
                name = %document.ticker,
                ticker = series.ticker(),
                quantity,
                points = series.len(),
                "loaded holding"
            );
            portfolio.insert(Holding::new(series, quantity).with_name(document.ticker))?;
        }

        tracing::info!(holdings = portfolio.len(), "portfolio assembled");
        Ok(portfolio)
    }

    pub fn from_holdings(holdings: Vec<Holding>) -> Result<Self, StocksimError> {
        let mut portfolio = Portfolio::default();
        for holding in holdings {
            portfolio.insert(holding)?;
        }
        Ok(portfolio)
    }

    fn insert(&mut self, holding: Holding) -> Result<(), StocksimError> {
        if self.index.contains_key(holding.name()) {
            return Err(StocksimError::DuplicateTicker(holding.name().to_string()));
        }
        self.index
            .insert(holding.name().to_string(), self.holdings.len());
        self.holdings.push(holding);
        Ok(())
    }

    fn position(&self, key: &str) -> Option<usize> {
        if let Some(&i) = self.index.get(key) {
            return Some(i);
        }
        if let Some(i) = self
            .holdings
            .iter()
            .position(|h| h.name().eq_ignore_ascii_case(key))
        {
            return Some(i);
        }
        let mut by_symbol = self
            .holdings
            .iter()
            .enumerate()
            .filter(|(_, h)| h.ticker().eq_ignore_ascii_case(key))
            .map(|(i, _)| i);
        match (by_symbol.next(), by_symbol.next()) {
            (Some(i), None) => Some(i),
            _ => None,
        }
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn holding(&self, key: &str) -> Option<&Holding> {
        self.position(key).map(|i| &self.holdings[i])
    }

    pub fn holding_mut(&mut self, key: &str) -> Option<&mut Holding> {
        self.position(key).map(|i| &mut self.holdings[i])
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn total_equity(&self) -> f64 {
        round2(self.holdings.iter().map(Holding::equity).sum())
    }

    pub fn total_return(&self) -> f64 {
        round2(self.holdings.iter().map(Holding::daily_return).sum())
    }

    /// Combined chart: timestamps of the first holding, values the sum of
    /// every holding's high price. Quantities are not applied.
    pub fn merged_graph_series(&self) -> Result<Vec<GraphPoint>, StocksimError> {
        let inputs: Vec<_> = self.holdings.iter().map(|h| (h.series(), 1.0)).collect();
        sum_on_shared_grid(&inputs)
    }

    /// Combined chart with each high price scaled by the quantity owned.
    pub fn equity_graph_series(&self) -> Result<Vec<GraphPoint>, StocksimError> {
        let inputs: Vec<_> = self
            .holdings
            .iter()
            .map(|h| (h.series(), h.quantity() as f64))
            .collect();
        sum_on_shared_grid(&inputs)
    }

    /// Current quantities by holding name, ready to persist.
    pub fn quantities(&self) -> Quantities {
        self.holdings
            .iter()
            .map(|h| (h.name().to_string(), h.quantity()))
            .collect()
    }

    pub fn save(&self, store: &dyn HoldingsStore) -> Result<(), StocksimError> {
        store.save(&self.quantities())?;
        tracing::info!(holdings = self.len(), "holdings saved");
        Ok(())
    }

    pub fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            holdings: self.holdings.iter().map(Holding::snapshot).collect(),
            total_equity: self.total_equity(),
            total_return: self.total_return(),
        }
    }
}
