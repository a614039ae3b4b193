//! CSV export of graph series.

use crate::domain::error::StocksimError;
use crate::domain::graph::GraphPoint;
use std::io::Write;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write `time,value` rows with a header line.
pub fn write_series<W: Write>(writer: W, points: &[GraphPoint]) -> Result<(), StocksimError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["time", "value"]).map_err(csv_error)?;
    for point in points {
        wtr.write_record([
            point.time.format(TIME_FORMAT).to_string(),
            format!("{:.2}", point.value),
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

fn csv_error(e: csv::Error) -> StocksimError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => StocksimError::Io(io),
        other => StocksimError::Io(std::io::Error::other(format!("CSV write error: {other:?}"))),
    }
}
