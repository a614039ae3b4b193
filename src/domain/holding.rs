//! A ticker's price series bound to an owned quantity.

use serde::Serialize;

use super::error::StocksimError;
use super::graph::{high_series, GraphPoint};
use super::money::round2;
use super::time_series::TimeSeries;

/// One row of the portfolio: the series, the quantity owned, and cached
/// valuation figures derived from both.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    name: String,
    series: TimeSeries,
    quantity: u64,
    start_price: f64,
    end_price: f64,
    change: f64,
    equity: f64,
    daily_return: f64,
}

/// Plain-data view of a holding for rendering and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingSnapshot {
    pub name: String,
    pub ticker: String,
    pub quantity: u64,
    pub start_price: f64,
    pub end_price: f64,
    pub change: f64,
    pub equity: f64,
    pub daily_return: f64,
}

impl Holding {
    /// The holding is named after its ticker symbol until [`Holding::with_name`]
    /// says otherwise.
    pub fn new(series: TimeSeries, quantity: u64) -> Self {
        let mut holding = Holding {
            name: series.ticker().to_string(),
            series,
            quantity,
            start_price: 0.0,
            end_price: 0.0,
            change: 0.0,
            equity: 0.0,
            daily_return: 0.0,
        };
        holding.compute_metrics();
        holding
    }

    /// Key the holding under a document name such as `2023-01_hourly_AAPL`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Derive every cached field from the series and quantity.
    pub fn compute_metrics(&mut self) {
        self.start_price = round2(self.series.oldest().open);
        self.end_price = round2(self.series.newest().close);
        self.change = round2(self.end_price - self.start_price);
        self.refresh_position_values();
    }

    /// Replace the price series for the same ticker and recompute.
    pub fn reload(&mut self, series: TimeSeries) -> Result<(), StocksimError> {
        if series.ticker() != self.ticker() {
            return Err(StocksimError::UnknownTicker(series.ticker().to_string()));
        }
        self.series = series;
        self.compute_metrics();
        Ok(())
    }

    /// Apply a single-share buy (`+1`) or sell (`-1`).
    ///
    /// A sell at zero quantity is a no-op. Returns whether the quantity
    /// changed. Only equity and daily return are refreshed, from the cached
    /// end price and change; the series is not re-read.
    pub fn apply_delta(&mut self, delta: i64) -> Result<bool, StocksimError> {
        match delta {
            1 => {
                self.buy()?;
                Ok(true)
            }
            -1 => Ok(self.sell()),
            other => Err(StocksimError::InvalidDelta(other)),
        }
    }

    /// Fails without changing anything when the quantity is already `u64::MAX`.
    pub fn buy(&mut self) -> Result<(), StocksimError> {
        self.quantity = self
            .quantity
            .checked_add(1)
            .ok_or_else(|| StocksimError::QuantityOverflow(self.ticker().to_string()))?;
        self.refresh_position_values();
        Ok(())
    }

    pub fn sell(&mut self) -> bool {
        if self.quantity == 0 {
            return false;
        }
        self.quantity -= 1;
        self.refresh_position_values();
        true
    }

    fn refresh_position_values(&mut self) {
        let quantity = self.quantity as f64;
        self.equity = round2(quantity * self.end_price);
        self.daily_return = round2(quantity * self.change);
    }

    /// `(timestamp, high)` pairs, oldest first. Restartable.
    pub fn graph_series(&self) -> impl Iterator<Item = GraphPoint> + '_ {
        high_series(&self.series)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ticker(&self) -> &str {
        self.series.ticker()
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn start_price(&self) -> f64 {
        self.start_price
    }

    pub fn end_price(&self) -> f64 {
        self.end_price
    }

    pub fn change(&self) -> f64 {
        self.change
    }

    pub fn equity(&self) -> f64 {
        self.equity
    }

    pub fn daily_return(&self) -> f64 {
        self.daily_return
    }

    pub fn snapshot(&self) -> HoldingSnapshot {
        HoldingSnapshot {
            name: self.name.clone(),
            ticker: self.ticker().to_string(),
            quantity: self.quantity,
            start_price: self.start_price,
            end_price: self.end_price,
            change: self.change,
            equity: self.equity,
            daily_return: self.daily_return,
        }
    }
}
