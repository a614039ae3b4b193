//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod csv_series_writer;
pub mod dir_ticker_discovery;
pub mod file_config_adapter;
pub mod json_holdings_store;
