//! Port traits implemented by adapters.

pub mod config_port;
pub mod holdings_store;
pub mod ticker_discovery;
