//! Chart-ready (time, value) series.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::error::StocksimError;
use super::time_series::TimeSeries;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphPoint {
    pub time: NaiveDateTime,
    pub value: f64,
}

/// High prices in chronological order.
pub fn high_series(series: &TimeSeries) -> impl Iterator<Item = GraphPoint> + '_ {
    series.chronological().map(|p| GraphPoint {
        time: p.timestamp,
        value: p.high,
    })
}

/// Elementwise `Σ weight × high` across series sharing one timestamp grid.
///
/// The first series supplies the x-axis. Every other series must have the
/// same length and the same timestamps, otherwise `GridMismatch` is returned;
/// nothing is truncated or interpolated.
pub fn sum_on_shared_grid(inputs: &[(&TimeSeries, f64)]) -> Result<Vec<GraphPoint>, StocksimError> {
    let Some(&(reference, _)) = inputs.first() else {
        return Ok(Vec::new());
    };

    for &(other, _) in &inputs[1..] {
        check_grid(reference, other)?;
    }

    let mut merged: Vec<GraphPoint> = high_series(reference)
        .map(|p| GraphPoint {
            time: p.time,
            value: 0.0,
        })
        .collect();
    for &(series, weight) in inputs {
        for (slot, point) in merged.iter_mut().zip(series.chronological()) {
            slot.value += weight * point.high;
        }
    }
    Ok(merged)
}

fn check_grid(reference: &TimeSeries, other: &TimeSeries) -> Result<(), StocksimError> {
    let mismatch = |reason: String| StocksimError::GridMismatch {
        reference: reference.ticker().to_string(),
        ticker: other.ticker().to_string(),
        reason,
    };

    if reference.len() != other.len() {
        return Err(mismatch(format!(
            "{} points vs {}",
            other.len(),
            reference.len()
        )));
    }
    for (a, b) in reference.points().iter().zip(other.points()) {
        if a.timestamp != b.timestamp {
            return Err(mismatch(format!(
                "timestamp {} where {} expected",
                b.timestamp, a.timestamp
            )));
        }
    }
    Ok(())
}
