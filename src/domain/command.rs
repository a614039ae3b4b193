//! Buy/sell/graph commands and their synchronous dispatch.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::StocksimError;
use super::graph::GraphPoint;
use super::portfolio::Portfolio;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Buy(String),
    Sell(String),
    SelectGraph(String),
    SelectPortfolioGraph,
}

/// Figures a front end needs to refresh after a buy or sell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionUpdate {
    pub ticker: String,
    pub changed: bool,
    pub quantity: u64,
    pub equity: f64,
    pub daily_return: f64,
    pub total_equity: f64,
    pub total_return: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Position(PositionUpdate),
    Graph {
        label: String,
        points: Vec<GraphPoint>,
    },
}

pub fn dispatch(portfolio: &mut Portfolio, command: Command) -> Result<CommandOutcome, StocksimError> {
    match command {
        Command::Buy(ticker) => apply(portfolio, ticker, 1),
        Command::Sell(ticker) => apply(portfolio, ticker, -1),
        Command::SelectGraph(ticker) => {
            let holding = portfolio
                .holding(&ticker)
                .ok_or_else(|| StocksimError::UnknownTicker(ticker.clone()))?;
            Ok(CommandOutcome::Graph {
                points: holding.graph_series().collect(),
                label: holding.name().to_string(),
            })
        }
        Command::SelectPortfolioGraph => Ok(CommandOutcome::Graph {
            label: "portfolio".to_string(),
            points: portfolio.merged_graph_series()?,
        }),
    }
}

fn apply(portfolio: &mut Portfolio, ticker: String, delta: i64) -> Result<CommandOutcome, StocksimError> {
    let holding = portfolio
        .holding_mut(&ticker)
        .ok_or_else(|| StocksimError::UnknownTicker(ticker.clone()))?;
    let changed = holding.apply_delta(delta)?;
    let name = holding.name().to_string();
    let (quantity, equity, daily_return) =
        (holding.quantity(), holding.equity(), holding.daily_return());

    if changed {
        tracing::debug!(name = %name, delta, quantity, "position updated");
    } else {
        tracing::debug!(name = %name, "sell ignored at zero quantity");
    }

    Ok(CommandOutcome::Position(PositionUpdate {
        ticker: name,
        changed,
        quantity,
        equity,
        daily_return,
        total_equity: portfolio.total_equity(),
        total_return: portfolio.total_return(),
    }))
}

impl FromStr for Command {
    type Err = String;

    /// `buy AAPL`, `sell aapl`, `graph MSFT`, or bare `graph`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| "empty command".to_string())?
            .to_lowercase();
        let ticker = parts.next().map(str::to_uppercase);
        if let Some(extra) = parts.next() {
            return Err(format!("unexpected argument {extra:?}"));
        }

        match (verb.as_str(), ticker) {
            ("buy", Some(t)) => Ok(Command::Buy(t)),
            ("sell", Some(t)) => Ok(Command::Sell(t)),
            ("graph", Some(t)) => Ok(Command::SelectGraph(t)),
            ("graph", None) => Ok(Command::SelectPortfolioGraph),
            ("buy" | "sell", None) => Err(format!("{verb} requires a ticker")),
            _ => Err(format!("unknown command {verb:?}")),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Buy(t) => write!(f, "buy {t}"),
            Command::Sell(t) => write!(f, "sell {t}"),
            Command::SelectGraph(t) => write!(f, "graph {t}"),
            Command::SelectPortfolioGraph => write!(f, "graph"),
        }
    }
}
