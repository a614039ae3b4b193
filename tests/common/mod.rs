#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;

use stocksim::domain::error::StocksimError;
use stocksim::ports::holdings_store::{HoldingsStore, Quantities};
use stocksim::ports::ticker_discovery::{TickerDiscovery, TickerDocument};

/// In-memory holdings store recording every save.
pub struct MemoryHoldingsStore {
    pub initial: Result<Quantities, String>,
    pub saved: RefCell<Vec<Quantities>>,
    pub fail_save: bool,
}

impl MemoryHoldingsStore {
    pub fn new() -> Self {
        Self {
            initial: Ok(Quantities::new()),
            saved: RefCell::new(Vec::new()),
            fail_save: false,
        }
    }

    pub fn with(mut self, ticker: &str, quantity: u64) -> Self {
        if let Ok(q) = &mut self.initial {
            q.insert(ticker.to_string(), quantity);
        }
        self
    }

    pub fn unreadable(mut self, reason: &str) -> Self {
        self.initial = Err(reason.to_string());
        self
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub fn last_saved(&self) -> Option<Quantities> {
        self.saved.borrow().last().cloned()
    }
}

impl HoldingsStore for MemoryHoldingsStore {
    fn load(&self) -> Result<Quantities, StocksimError> {
        self.initial
            .clone()
            .map_err(|reason| StocksimError::HoldingsLoad {
                path: "memory".into(),
                reason,
            })
    }

    fn save(&self, holdings: &Quantities) -> Result<(), StocksimError> {
        if self.fail_save {
            return Err(StocksimError::HoldingsSave {
                path: "memory".into(),
                reason: "disk full".into(),
            });
        }
        self.saved.borrow_mut().push(holdings.clone());
        Ok(())
    }
}

/// In-memory ticker discovery: name -> document text, in insertion order.
pub struct MemoryDiscovery {
    pub documents: Vec<(String, String)>,
}

impl MemoryDiscovery {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
        }
    }

    pub fn with_document(mut self, ticker: &str, document: String) -> Self {
        self.documents.push((ticker.to_string(), document));
        self
    }
}

impl TickerDiscovery for MemoryDiscovery {
    fn discover(&self) -> Result<Vec<TickerDocument>, StocksimError> {
        Ok(self
            .documents
            .iter()
            .map(|(ticker, _)| TickerDocument {
                ticker: ticker.clone(),
                source: format!("memory:{ticker}"),
            })
            .collect())
    }

    fn read(&self, document: &TickerDocument) -> Result<String, StocksimError> {
        self.documents
            .iter()
            .find(|(ticker, _)| *ticker == document.ticker)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| StocksimError::Discovery {
                reason: format!("no document {}", document.source),
            })
    }
}

/// One bar: (timestamp, open, high, low, close).
pub type Bar<'a> = (&'a str, f64, f64, f64, f64);

/// Build a provider-style document; bars are given newest-first.
pub fn make_document(symbol: &str, bars: &[Bar]) -> String {
    let mut series = serde_json::Map::new();
    for &(ts, open, high, low, close) in bars {
        series.insert(
            ts.to_string(),
            serde_json::json!({
                "1. open": format!("{open:.4}"),
                "2. high": format!("{high:.4}"),
                "3. low": format!("{low:.4}"),
                "4. close": format!("{close:.4}"),
                "5. volume": "1000",
            }),
        );
    }
    serde_json::json!({
        "Meta Data": {
            "1. Information": "Intraday (5min) open, high, low, close prices and volume",
            "2. Symbol": symbol,
            "4. Interval": "5min",
        },
        "Time Series (5min)": series,
    })
    .to_string()
}

/// A two-bar document: newest close `close`, oldest open `open`, highs
/// `open + 1` (oldest) and `close + 1` (newest).
pub fn simple_document(symbol: &str, open: f64, close: f64) -> String {
    make_document(
        symbol,
        &[
            ("2023-10-02 19:55:00", close, close + 1.0, close, close),
            ("2023-10-02 19:50:00", open, open + 1.0, open, open),
        ],
    )
}

pub fn quantities(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
    pairs.iter().map(|&(t, q)| (t.to_string(), q)).collect()
}
