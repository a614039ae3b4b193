//! Intraday price series for a single ticker.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::error::ParseError;

/// One OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Storage order of a [`TimeSeries`].
///
/// The quote provider emits entries newest-first and all positional lookups
/// (`newest`, `oldest`, chronological iteration) are defined against that
/// order. It is checked when the series is built, never re-sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesOrder {
    /// `points[0]` is the most recent observation, timestamps strictly decrease.
    NewestFirst,
}

/// A non-empty, newest-first price series.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    ticker: String,
    interval: Option<String>,
    order: SeriesOrder,
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Builds a series, rejecting empty input and input that is not strictly
    /// newest-first.
    pub fn new(
        ticker: impl Into<String>,
        interval: Option<String>,
        points: Vec<TimeSeriesPoint>,
    ) -> Result<Self, ParseError> {
        let ticker = ticker.into();
        if points.is_empty() {
            return Err(ParseError::EmptySeries(ticker));
        }
        for pair in points.windows(2) {
            if pair[1].timestamp >= pair[0].timestamp {
                return Err(ParseError::OutOfOrder {
                    earlier: pair[0].timestamp.to_string(),
                    later: pair[1].timestamp.to_string(),
                });
            }
        }
        Ok(Self {
            ticker,
            interval,
            order: SeriesOrder::NewestFirst,
            points,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn interval(&self) -> Option<&str> {
        self.interval.as_deref()
    }

    pub fn order(&self) -> SeriesOrder {
        self.order
    }

    /// Points in storage (newest-first) order.
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn newest(&self) -> &TimeSeriesPoint {
        &self.points[0]
    }

    pub fn oldest(&self) -> &TimeSeriesPoint {
        &self.points[self.points.len() - 1]
    }

    /// Points from oldest to newest.
    pub fn chronological(&self) -> impl DoubleEndedIterator<Item = &TimeSeriesPoint> + '_ {
        self.points.iter().rev()
    }
}
