//! Domain error types.

/// A malformed or incomplete time-series document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("missing section \"{0}\"")]
    MissingSection(String),

    #[error("missing field \"{field}\" in {section}")]
    MissingField { section: String, field: String },

    #[error("time series section \"{0}\" has no entries")]
    EmptySeries(String),

    #[error("non-numeric {field} at {timestamp}: {value:?}")]
    NonNumeric {
        timestamp: String,
        field: String,
        value: String,
    },

    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("time series not ordered newest-first: {later} follows {earlier}")]
    OutOfOrder { earlier: String, later: String },
}

/// Top-level error type for stocksim.
#[derive(Debug, thiserror::Error)]
pub enum StocksimError {
    #[error("failed to parse time series for {ticker}: {source}")]
    Parse {
        ticker: String,
        #[source]
        source: ParseError,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("ticker discovery failed: {reason}")]
    Discovery { reason: String },

    #[error("failed to load holdings from {path}: {reason}")]
    HoldingsLoad { path: String, reason: String },

    #[error("failed to save holdings to {path}: {reason}")]
    HoldingsSave { path: String, reason: String },

    #[error("ticker {0} appears more than once in the portfolio")]
    DuplicateTicker(String),

    #[error("unknown ticker {0}")]
    UnknownTicker(String),

    #[error("invalid quantity delta {0}: only +1 and -1 are supported")]
    InvalidDelta(i64),

    #[error("quantity of {0} is at its maximum")]
    QuantityOverflow(String),

    #[error("series for {ticker} does not share the timestamp grid of {reference}: {reason}")]
    GridMismatch {
        reference: String,
        ticker: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StocksimError> for std::process::ExitCode {
    fn from(err: &StocksimError) -> Self {
        let code: u8 = match err {
            StocksimError::Io(_) => 1,
            StocksimError::ConfigParse { .. }
            | StocksimError::ConfigMissing { .. }
            | StocksimError::ConfigInvalid { .. } => 2,
            StocksimError::HoldingsLoad { .. } | StocksimError::HoldingsSave { .. } => 3,
            StocksimError::Parse { .. } | StocksimError::Discovery { .. } => 4,
            StocksimError::DuplicateTicker(_)
            | StocksimError::UnknownTicker(_)
            | StocksimError::InvalidDelta(_)
            | StocksimError::QuantityOverflow(_)
            | StocksimError::GridMismatch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
