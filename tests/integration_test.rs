//! Portfolio assembly and valuation tests against in-memory ports.
//!
//! Tests cover:
//! - Loading holdings from discovery + store, with missing quantities defaulting to 0
//! - Holdings-load failure recovery and fatal parse failures
//! - Totals, buy/sell dispatch and persistence of quantities
//! - Merged chart series on shared and mismatched timestamp grids

mod common;

use approx::assert_relative_eq;
use common::*;
use stocksim::domain::command::{dispatch, Command, CommandOutcome};
use stocksim::domain::error::{ParseError, StocksimError};
use stocksim::domain::loader::TimeSeriesLoader;
use stocksim::domain::portfolio::Portfolio;

fn two_ticker_discovery() -> MemoryDiscovery {
    MemoryDiscovery::new()
        .with_document("AAPL", simple_document("AAPL", 100.0, 110.0))
        .with_document("TSLA", simple_document("TSLA", 240.0, 250.5))
}

mod assembly {
    use super::*;

    #[test]
    fn builds_holdings_with_persisted_quantities() {
        let store = MemoryHoldingsStore::new().with("AAPL", 10).with("TSLA", 1);
        let portfolio =
            Portfolio::load(&store, &two_ticker_discovery(), &TimeSeriesLoader::new()).unwrap();

        assert_eq!(portfolio.len(), 2);
        let aapl = portfolio.holding("AAPL").unwrap();
        assert_eq!(aapl.start_price(), 100.0);
        assert_eq!(aapl.end_price(), 110.0);
        assert_eq!(aapl.change(), 10.0);
        assert_eq!(aapl.equity(), 1100.0);
        assert_eq!(aapl.daily_return(), 100.0);

        assert_eq!(portfolio.holding("TSLA").unwrap().equity(), 250.5);
        assert_eq!(portfolio.total_equity(), 1350.5);
    }

    #[test]
    fn missing_quantity_defaults_to_zero() {
        let store = MemoryHoldingsStore::new().with("AAPL", 10);
        let portfolio =
            Portfolio::load(&store, &two_ticker_discovery(), &TimeSeriesLoader::new()).unwrap();
        let tsla = portfolio.holding("TSLA").unwrap();
        assert_eq!(tsla.quantity(), 0);
        assert_eq!(tsla.equity(), 0.0);
        assert_eq!(tsla.daily_return(), 0.0);
    }

    #[test]
    fn unreadable_store_treated_as_empty() {
        let store = MemoryHoldingsStore::new().unreadable("permission denied");
        let portfolio =
            Portfolio::load(&store, &two_ticker_discovery(), &TimeSeriesLoader::new()).unwrap();
        assert_eq!(portfolio.len(), 2);
        assert!(portfolio.holdings().iter().all(|h| h.quantity() == 0));
    }

    #[test]
    fn quantity_found_under_discovered_name() {
        let discovery = MemoryDiscovery::new()
            .with_document("2023-01_hourly_AAPL", simple_document("AAPL", 100.0, 110.0));
        let store = MemoryHoldingsStore::new().with("2023-01_hourly_AAPL", 2);
        let portfolio = Portfolio::load(&store, &discovery, &TimeSeriesLoader::new()).unwrap();

        let aapl = portfolio.holding("AAPL").unwrap();
        assert_eq!(aapl.name(), "2023-01_hourly_AAPL");
        assert_eq!(aapl.quantity(), 2);
        assert_eq!(
            portfolio.quantities(),
            quantities(&[("2023-01_hourly_AAPL", 2)])
        );
    }

    #[test]
    fn discovered_name_preferred_over_symbol() {
        let discovery = MemoryDiscovery::new()
            .with_document("aapl_5min", simple_document("AAPL", 100.0, 110.0));
        let store = MemoryHoldingsStore::new().with("aapl_5min", 2).with("AAPL", 7);
        let portfolio = Portfolio::load(&store, &discovery, &TimeSeriesLoader::new()).unwrap();
        assert_eq!(portfolio.holding("AAPL").unwrap().quantity(), 2);
    }

    #[test]
    fn symbol_used_when_name_has_no_quantity() {
        let discovery = MemoryDiscovery::new()
            .with_document("aapl_5min", simple_document("AAPL", 100.0, 110.0));
        let store = MemoryHoldingsStore::new().with("AAPL", 7);
        let portfolio = Portfolio::load(&store, &discovery, &TimeSeriesLoader::new()).unwrap();
        assert_eq!(portfolio.holding("aapl_5min").unwrap().quantity(), 7);
        assert_eq!(portfolio.quantities(), quantities(&[("aapl_5min", 7)]));
    }

    #[test]
    fn one_bad_document_aborts_load() {
        let discovery = two_ticker_discovery().with_document(
            "BROKEN",
            r#"{"Meta Data": {"2. Symbol": "BROKEN"}, "Time Series (5min)": {}}"#.to_string(),
        );
        let err = Portfolio::load(
            &MemoryHoldingsStore::new(),
            &discovery,
            &TimeSeriesLoader::new(),
        )
        .unwrap_err();
        match err {
            StocksimError::Parse { ticker, source } => {
                assert_eq!(ticker, "BROKEN");
                assert!(matches!(source, ParseError::EmptySeries(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn monthly_files_for_one_symbol_all_load() {
        let discovery = MemoryDiscovery::new()
            .with_document("2023-01_hourly_AAPL", simple_document("AAPL", 1.0, 2.0))
            .with_document("2023-02_hourly_AAPL", simple_document("AAPL", 3.0, 4.0));
        let store = MemoryHoldingsStore::new().with("2023-02_hourly_AAPL", 5);
        let mut portfolio = Portfolio::load(&store, &discovery, &TimeSeriesLoader::new()).unwrap();

        assert_eq!(portfolio.len(), 2);
        assert!(portfolio.holding("AAPL").is_none());
        assert_eq!(portfolio.holding("2023-02_hourly_AAPL").unwrap().equity(), 20.0);
        assert_eq!(portfolio.total_equity(), 20.0);

        // command-line tickers arrive upper-cased
        dispatch(&mut portfolio, Command::Buy("2023-01_HOURLY_AAPL".into())).unwrap();
        portfolio.save(&store).unwrap();
        assert_eq!(
            store.last_saved(),
            Some(quantities(&[
                ("2023-01_hourly_AAPL", 1),
                ("2023-02_hourly_AAPL", 5)
            ]))
        );
    }

    #[test]
    fn empty_discovery_gives_empty_portfolio() {
        let portfolio = Portfolio::load(
            &MemoryHoldingsStore::new().with("AAPL", 3),
            &MemoryDiscovery::new(),
            &TimeSeriesLoader::new(),
        )
        .unwrap();
        assert!(portfolio.is_empty());
        assert_eq!(portfolio.total_equity(), 0.0);
    }
}

mod trading {
    use super::*;

    #[test]
    fn sell_at_zero_then_buy() {
        let store = MemoryHoldingsStore::new();
        let mut portfolio =
            Portfolio::load(&store, &two_ticker_discovery(), &TimeSeriesLoader::new()).unwrap();

        let before = portfolio.holding("AAPL").unwrap().clone();
        let outcome = dispatch(&mut portfolio, Command::Sell("AAPL".into())).unwrap();
        assert!(matches!(outcome, CommandOutcome::Position(ref u) if !u.changed));
        assert_eq!(portfolio.holding("AAPL").unwrap(), &before);

        let outcome = dispatch(&mut portfolio, Command::Buy("AAPL".into())).unwrap();
        let CommandOutcome::Position(update) = outcome else {
            panic!("expected position update");
        };
        assert_eq!(update.quantity, 1);
        assert_eq!(update.equity, 110.0);
        assert_eq!(update.daily_return, 10.0);
        assert_eq!(update.total_equity, 110.0);
    }

    #[test]
    fn quantities_persisted_after_trades() {
        let store = MemoryHoldingsStore::new().with("TSLA", 2);
        let mut portfolio =
            Portfolio::load(&store, &two_ticker_discovery(), &TimeSeriesLoader::new()).unwrap();

        dispatch(&mut portfolio, Command::Buy("AAPL".into())).unwrap();
        dispatch(&mut portfolio, Command::Buy("AAPL".into())).unwrap();
        dispatch(&mut portfolio, Command::Sell("TSLA".into())).unwrap();
        portfolio.save(&store).unwrap();

        assert_eq!(
            store.last_saved(),
            Some(quantities(&[("AAPL", 2), ("TSLA", 1)]))
        );
    }

    #[test]
    fn save_failure_is_surfaced() {
        let store = MemoryHoldingsStore::new().failing_save();
        let portfolio =
            Portfolio::load(&store, &two_ticker_discovery(), &TimeSeriesLoader::new()).unwrap();
        let err = portfolio.save(&store).unwrap_err();
        assert!(matches!(err, StocksimError::HoldingsSave { .. }));
    }

    #[test]
    fn buy_at_stored_maximum_is_an_error() {
        let store = MemoryHoldingsStore::new().with("AAPL", u64::MAX);
        let mut portfolio =
            Portfolio::load(&store, &two_ticker_discovery(), &TimeSeriesLoader::new()).unwrap();

        let err = dispatch(&mut portfolio, Command::Buy("AAPL".into())).unwrap_err();
        assert!(matches!(err, StocksimError::QuantityOverflow(ref t) if t == "AAPL"));
        assert_eq!(portfolio.holding("AAPL").unwrap().quantity(), u64::MAX);
    }

    #[test]
    fn totals_follow_each_trade() {
        let store = MemoryHoldingsStore::new().with("AAPL", 10);
        let mut portfolio =
            Portfolio::load(&store, &two_ticker_discovery(), &TimeSeriesLoader::new()).unwrap();
        assert_eq!(portfolio.total_equity(), 1100.0);
        assert_eq!(portfolio.total_return(), 100.0);

        dispatch(&mut portfolio, Command::Buy("TSLA".into())).unwrap();
        assert_eq!(portfolio.total_equity(), 1350.5);
        assert_eq!(portfolio.total_return(), 110.5);

        dispatch(&mut portfolio, Command::Sell("TSLA".into())).unwrap();
        assert_eq!(portfolio.total_equity(), 1100.0);
        assert_eq!(portfolio.total_return(), 100.0);
    }
}

mod charts {
    use super::*;

    #[test]
    fn merged_series_sums_raw_highs() {
        let store = MemoryHoldingsStore::new().with("AAPL", 10);
        let portfolio =
            Portfolio::load(&store, &two_ticker_discovery(), &TimeSeriesLoader::new()).unwrap();

        let merged = portfolio.merged_graph_series().unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].time.to_string(), "2023-10-02 19:50:00");
        assert_relative_eq!(merged[0].value, 101.0 + 241.0);
        assert_relative_eq!(merged[1].value, 111.0 + 251.5);

        let weighted = portfolio.equity_graph_series().unwrap();
        assert_relative_eq!(weighted[0].value, 10.0 * 101.0);
        assert_relative_eq!(weighted[1].value, 10.0 * 111.0);
    }

    #[test]
    fn mismatched_grid_is_flagged() {
        let discovery = two_ticker_discovery().with_document(
            "MSFT",
            make_document(
                "MSFT",
                &[
                    ("2023-10-02 19:55:00", 300.0, 301.0, 299.0, 300.5),
                    ("2023-10-02 19:45:00", 298.0, 299.0, 297.0, 298.5),
                ],
            ),
        );
        let portfolio = Portfolio::load(
            &MemoryHoldingsStore::new(),
            &discovery,
            &TimeSeriesLoader::new(),
        )
        .unwrap();

        let err = portfolio.merged_graph_series().unwrap_err();
        assert!(matches!(
            err,
            StocksimError::GridMismatch { ref reference, ref ticker, .. }
                if reference == "AAPL" && ticker == "MSFT"
        ));
        // single-ticker charts are unaffected
        assert_eq!(portfolio.holding("MSFT").unwrap().graph_series().count(), 2);
    }

    #[test]
    fn holding_graph_is_chronological_and_restartable() {
        let portfolio = Portfolio::load(
            &MemoryHoldingsStore::new(),
            &two_ticker_discovery(),
            &TimeSeriesLoader::new(),
        )
        .unwrap();
        let aapl = portfolio.holding("AAPL").unwrap();
        let first: Vec<_> = aapl.graph_series().collect();
        let second: Vec<_> = aapl.graph_series().collect();
        assert_eq!(first, second);
        assert!(first[0].time < first[1].time);
        assert_relative_eq!(first[0].value, 101.0);
    }
}
