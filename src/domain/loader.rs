//! Time-series document parsing.
//!
//! Documents follow the quote provider's intraday layout:
//!
//! ```text
//! { "Meta Data": { "2. Symbol": "AAPL", "4. Interval": "5min", ... },
//!   "Time Series (5min)": { "2023-10-02 19:55:00": { "1. open": "173.9", ... }, ... } }
//! ```
//!
//! Entries are kept in document order (newest-first); `serde_json` is built
//! with `preserve_order` so object iteration follows the source text.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use super::error::ParseError;
use super::time_series::{TimeSeries, TimeSeriesPoint};

const META_SECTION: &str = "Meta Data";
const SYMBOL_FIELD: &str = "2. Symbol";
const INTERVAL_FIELD: &str = "4. Interval";
const SERIES_MARKER: &str = "Time Series";

const OPEN_FIELD: &str = "1. open";
const HIGH_FIELD: &str = "2. high";
const LOW_FIELD: &str = "3. low";
const CLOSE_FIELD: &str = "4. close";
const VOLUME_FIELD: &str = "5. volume";

/// Parses raw documents into [`TimeSeries`].
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesLoader {
    interval: Option<String>,
}

impl TimeSeriesLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the section for one interval (compared without case) instead
    /// of the first section whose name contains `"Time Series"`. See
    /// [`series_section_name`].
    pub fn with_interval(interval: impl Into<String>) -> Self {
        Self {
            interval: Some(interval.into()),
        }
    }

    pub fn load(&self, document: &str) -> Result<TimeSeries, ParseError> {
        let root: Value =
            serde_json::from_str(document).map_err(|e| ParseError::Json(e.to_string()))?;
        let root = root
            .as_object()
            .ok_or_else(|| ParseError::Json("document is not an object".into()))?;

        let meta = root
            .get(META_SECTION)
            .and_then(Value::as_object)
            .ok_or_else(|| ParseError::MissingSection(META_SECTION.into()))?;
        let ticker = meta
            .get(SYMBOL_FIELD)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ParseError::MissingField {
                section: META_SECTION.into(),
                field: SYMBOL_FIELD.into(),
            })?;
        let interval = meta
            .get(INTERVAL_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string);

        let (section_name, entries) = self.series_section(root)?;
        if entries.is_empty() {
            return Err(ParseError::EmptySeries(section_name.to_string()));
        }

        let points = entries
            .iter()
            .map(|(timestamp, fields)| parse_point(timestamp, fields))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(ticker, points = points.len(), "parsed time series");
        TimeSeries::new(ticker, interval, points)
    }

    fn series_section<'a>(
        &self,
        root: &'a Map<String, Value>,
    ) -> Result<(&'a str, &'a Map<String, Value>), ParseError> {
        let found = match &self.interval {
            Some(interval) => {
                let name = series_section_name(interval);
                match root.iter().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
                    Some(found) => found,
                    None => return Err(ParseError::MissingSection(name)),
                }
            }
            None => root
                .iter()
                .find(|(key, _)| key.contains(SERIES_MARKER))
                .ok_or_else(|| ParseError::MissingSection(format!("{SERIES_MARKER} (*)")))?,
        };
        let (name, value) = found;
        let entries = value
            .as_object()
            .ok_or_else(|| ParseError::MissingSection(name.clone()))?;
        Ok((name.as_str(), entries))
    }
}

/// The provider's section name for an interval: `Time Series (5min)`,
/// `Time Series (Daily)`, `Weekly Time Series`, `Monthly Time Series`.
pub fn series_section_name(interval: &str) -> String {
    match interval.trim().to_ascii_lowercase().as_str() {
        "weekly" => format!("Weekly {SERIES_MARKER}"),
        "monthly" => format!("Monthly {SERIES_MARKER}"),
        _ => format!("{SERIES_MARKER} ({})", interval.trim()),
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ParseError> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ParseError::InvalidTimestamp(raw.to_string()))
}

fn parse_point(timestamp: &str, fields: &Value) -> Result<TimeSeriesPoint, ParseError> {
    let ts = parse_timestamp(timestamp)?;
    let fields = fields.as_object().ok_or_else(|| ParseError::MissingField {
        section: timestamp.to_string(),
        field: OPEN_FIELD.into(),
    })?;

    Ok(TimeSeriesPoint {
        timestamp: ts,
        open: numeric_field(timestamp, fields, OPEN_FIELD)?,
        high: numeric_field(timestamp, fields, HIGH_FIELD)?,
        low: numeric_field(timestamp, fields, LOW_FIELD)?,
        close: numeric_field(timestamp, fields, CLOSE_FIELD)?,
        volume: volume_field(timestamp, fields)?,
    })
}

fn raw_field(timestamp: &str, fields: &Map<String, Value>, field: &str) -> Result<String, ParseError> {
    match fields.get(field) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(ParseError::NonNumeric {
            timestamp: timestamp.to_string(),
            field: field.to_string(),
            value: other.to_string(),
        }),
        None => Err(ParseError::MissingField {
            section: timestamp.to_string(),
            field: field.to_string(),
        }),
    }
}

fn numeric_field(timestamp: &str, fields: &Map<String, Value>, field: &str) -> Result<f64, ParseError> {
    let raw = raw_field(timestamp, fields, field)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::NonNumeric {
            timestamp: timestamp.to_string(),
            field: field.to_string(),
            value: raw,
        })
}

fn volume_field(timestamp: &str, fields: &Map<String, Value>) -> Result<i64, ParseError> {
    let raw = raw_field(timestamp, fields, VOLUME_FIELD)?;
    raw.parse::<i64>().map_err(|_| ParseError::NonNumeric {
        timestamp: timestamp.to_string(),
        field: VOLUME_FIELD.to_string(),
        value: raw,
    })
}
