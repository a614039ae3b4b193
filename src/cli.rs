//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::chart_svg::render_line_chart;
use crate::adapters::csv_series_writer::write_series;
use crate::adapters::dir_ticker_discovery::DirTickerDiscovery;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_holdings_store::JsonHoldingsStore;
use crate::domain::command::{self as portfolio_command, dispatch, CommandOutcome, PositionUpdate};
use crate::domain::config_validation::validate_config;
use crate::domain::error::StocksimError;
use crate::domain::graph::GraphPoint;
use crate::domain::loader::TimeSeriesLoader;
use crate::domain::money::format_money;
use crate::domain::portfolio::Portfolio;
use crate::domain::settings::Settings;
use crate::logging::{init_logging, LoggingConfig};
use crate::ports::holdings_store::HoldingsStore;

#[derive(Parser, Debug)]
#[command(name = "stocksim", about = "Simulated stock portfolio tracker")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory scanned for per-ticker time-series documents
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Holdings file (ticker -> quantity)
    #[arg(long, global = true)]
    pub holdings: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the portfolio table and totals
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Buy one share
    Buy { ticker: String },
    /// Sell one share
    Sell { ticker: String },
    /// Export a chart series (one ticker, or the whole portfolio)
    Graph {
        ticker: Option<String>,
        /// Scale each holding by the quantity owned
        #[arg(long)]
        weighted: bool,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Read buy/sell/graph/show commands from stdin, save on exit
    Session,
}

pub fn run(cli: Cli) -> ExitCode {
    let settings = match resolve_settings(cli.config.as_ref(), cli.data_dir, cli.holdings) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if let Err(e) = init_logging(&LoggingConfig::from_env_or(&settings.log_level)) {
        eprintln!("warning: logging disabled: {e}");
    }

    let result = match cli.command {
        Command::Show { json } => run_show(&settings, json),
        Command::Buy { ticker } => {
            run_trade(&settings, portfolio_command::Command::Buy(ticker.to_uppercase()))
        }
        Command::Sell { ticker } => {
            run_trade(&settings, portfolio_command::Command::Sell(ticker.to_uppercase()))
        }
        Command::Graph {
            ticker,
            weighted,
            csv,
            svg,
        } => run_graph(&settings, ticker.as_deref(), weighted, csv.as_ref(), svg.as_ref()),
        Command::Session => run_stdin_session(&settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Config file (if any), validated, then command-line overrides.
pub fn resolve_settings(
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    holdings: Option<PathBuf>,
) -> Result<Settings, StocksimError> {
    let settings = match config_path {
        Some(path) => {
            let adapter = FileConfigAdapter::from_file(path)?;
            validate_config(&adapter)?;
            Settings::from_config(&adapter)
        }
        None => Settings::default(),
    };
    Ok(settings.with_overrides(data_dir, holdings))
}

pub fn open_portfolio(settings: &Settings) -> Result<(Portfolio, JsonHoldingsStore), StocksimError> {
    let store = JsonHoldingsStore::new(settings.holdings_file.clone());
    let discovery = DirTickerDiscovery::new(settings.data_dir.clone());
    let loader = match &settings.interval {
        Some(interval) => TimeSeriesLoader::with_interval(interval.clone()),
        None => TimeSeriesLoader::new(),
    };
    let portfolio = Portfolio::load(&store, &discovery, &loader)?;
    Ok((portfolio, store))
}

fn run_show(settings: &Settings, json: bool) -> Result<(), StocksimError> {
    let (portfolio, _) = open_portfolio(settings)?;
    let mut out = io::stdout().lock();
    if json {
        let text = serde_json::to_string_pretty(&portfolio.snapshot())
            .map_err(|e| StocksimError::Io(io::Error::other(e)))?;
        writeln!(out, "{text}")?;
    } else {
        write!(out, "{}", render_table(&portfolio))?;
    }
    Ok(())
}

fn run_trade(settings: &Settings, command: portfolio_command::Command) -> Result<(), StocksimError> {
    let (mut portfolio, store) = open_portfolio(settings)?;
    let outcome = dispatch(&mut portfolio, command)?;
    if let CommandOutcome::Position(update) = &outcome {
        print!("{}", render_update(update));
        if update.changed {
            portfolio.save(&store)?;
        }
    }
    Ok(())
}

fn run_graph(
    settings: &Settings,
    ticker: Option<&str>,
    weighted: bool,
    csv_path: Option<&PathBuf>,
    svg_path: Option<&PathBuf>,
) -> Result<(), StocksimError> {
    let (mut portfolio, _) = open_portfolio(settings)?;
    let (label, points) = match ticker {
        Some(t) => graph_outcome(dispatch(
            &mut portfolio,
            portfolio_command::Command::SelectGraph(t.to_uppercase()),
        )?),
        None if weighted || settings.weighted_graph => {
            ("portfolio (weighted)".to_string(), portfolio.equity_graph_series()?)
        }
        None => graph_outcome(dispatch(
            &mut portfolio,
            portfolio_command::Command::SelectPortfolioGraph,
        )?),
    };

    if let Some(path) = svg_path {
        let svg = render_line_chart(&label, &points, settings.chart_width, settings.chart_height);
        fs::write(path, svg)?;
        tracing::info!(path = %path.display(), points = points.len(), "wrote SVG chart");
    }
    match csv_path {
        Some(path) => {
            write_series(fs::File::create(path)?, &points)?;
            tracing::info!(path = %path.display(), points = points.len(), "wrote CSV series");
        }
        None if svg_path.is_none() => write_series(io::stdout().lock(), &points)?,
        None => {}
    }
    Ok(())
}

fn graph_outcome(outcome: CommandOutcome) -> (String, Vec<GraphPoint>) {
    match outcome {
        CommandOutcome::Graph { label, points } => (label, points),
        CommandOutcome::Position(update) => (update.ticker, Vec::new()),
    }
}

fn run_stdin_session(settings: &Settings) -> Result<(), StocksimError> {
    let (mut portfolio, store) = open_portfolio(settings)?;
    let stdin = io::stdin();
    run_session(&mut portfolio, &store, stdin.lock(), io::stdout().lock())
}

/// Process one command per input line until `quit` or end of input, then
/// persist quantities. Per-line command errors are reported and the session
/// goes on. Quantities are saved even when reading input or writing output
/// fails; that failure is returned, otherwise the save result is.
pub fn run_session<R: BufRead, W: Write>(
    portfolio: &mut Portfolio,
    store: &dyn HoldingsStore,
    input: R,
    mut out: W,
) -> Result<(), StocksimError> {
    let session = process_lines(portfolio, input, &mut out);
    let saved = portfolio.save(store);
    match (session, saved) {
        (Err(e), Err(save_err)) => {
            tracing::error!(error = %save_err, "holdings save failed after session error");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), saved) => saved,
    }
}

fn process_lines<R: BufRead, W: Write>(
    portfolio: &mut Portfolio,
    input: R,
    out: &mut W,
) -> Result<(), StocksimError> {
    write!(out, "{}", render_table(portfolio))?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "show" => {
                write!(out, "{}", render_table(portfolio))?;
                continue;
            }
            "help" => {
                writeln!(out, "commands: buy <TICKER>, sell <TICKER>, graph [TICKER], show, quit")?;
                continue;
            }
            _ => {}
        }

        let command = match line.parse::<portfolio_command::Command>() {
            Ok(c) => c,
            Err(reason) => {
                writeln!(out, "error: {reason}")?;
                continue;
            }
        };
        match dispatch(portfolio, command) {
            Ok(CommandOutcome::Position(update)) => write!(out, "{}", render_update(&update))?,
            Ok(CommandOutcome::Graph { points, .. }) => write_series(&mut *out, &points)?,
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }
    Ok(())
}

pub fn render_table(portfolio: &Portfolio) -> String {
    let mut text = format!(
        "{:<8} {:>12} {:>12} {:>12} {:>14} {:>12} {:>8}\n",
        "Ticker", "Open", "Price", "Change", "Equity", "Return", "Owned"
    );
    for h in portfolio.holdings() {
        text.push_str(&format!(
            "{:<8} {:>12} {:>12} {:>12} {:>14} {:>12} {:>8}\n",
            h.name(),
            format_money(h.start_price()),
            format_money(h.end_price()),
            format_money(h.change()),
            format_money(h.equity()),
            format_money(h.daily_return()),
            h.quantity()
        ));
    }
    text.push_str(&format!(
        "\nPortfolio Value: {}\nToday's Return: {}\n",
        format_money(portfolio.total_equity()),
        format_money(portfolio.total_return())
    ));
    text
}

pub fn render_update(update: &PositionUpdate) -> String {
    if !update.changed {
        return format!("{}: nothing to sell\n", update.ticker);
    }
    format!(
        "{}: owned {}, equity {}, return {}\nPortfolio Value: {}\nToday's Return: {}\n",
        update.ticker,
        update.quantity,
        format_money(update.equity),
        format_money(update.daily_return),
        format_money(update.total_equity),
        format_money(update.total_return)
    )
}
