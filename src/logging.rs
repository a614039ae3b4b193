//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays clean for tables and exported series.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `warn` or `stocksim=debug`.
    pub log_level: String,
}

impl LoggingConfig {
    /// `RUST_LOG` wins over the configured level.
    pub fn from_env_or(level: &str) -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
        }
    }
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(&config.log_level)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_directive() {
        let config = LoggingConfig {
            log_level: "stocksim=loudest".to_string(),
        };
        assert!(init_logging(&config).is_err());
    }
}
