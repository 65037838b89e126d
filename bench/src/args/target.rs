use super::defaults::*;
use crate::error::HammerError;
use crate::invoker::http::HttpSessionFactory;
use crate::invoker::simulated::{SimulatedStore, SimulatedStoreConfig};
use crate::invoker::SessionFactory;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum TargetCommand {
    /// In-process store with configurable latency, timeouts and failures
    Simulated(SimulatedArgs),
    /// Store exposing its operations over HTTP
    Http(HttpArgs),
}

impl Default for TargetCommand {
    fn default() -> Self {
        TargetCommand::Simulated(SimulatedArgs::default())
    }
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SimulatedArgs {
    /// Minimum latency of a call in milliseconds
    #[arg(long, default_value_t = DEFAULT_SIMULATED_MIN_LATENCY_MS)]
    pub min_latency_ms: u64,

    /// Maximum latency of a call in milliseconds
    #[arg(long, default_value_t = DEFAULT_SIMULATED_MAX_LATENCY_MS)]
    pub max_latency_ms: u64,

    /// Share of calls (0.0 - 1.0) that stall until the query timeout
    #[arg(long, default_value_t = DEFAULT_SIMULATED_TIMEOUT_RATIO, value_parser = parse_ratio)]
    pub timeout_ratio: f64,

    /// Share of calls (0.0 - 1.0) that fail with an error
    #[arg(long, default_value_t = DEFAULT_SIMULATED_FAILURE_RATIO, value_parser = parse_ratio)]
    pub failure_ratio: f64,
}

impl Default for SimulatedArgs {
    fn default() -> Self {
        Self {
            min_latency_ms: DEFAULT_SIMULATED_MIN_LATENCY_MS,
            max_latency_ms: DEFAULT_SIMULATED_MAX_LATENCY_MS,
            timeout_ratio: DEFAULT_SIMULATED_TIMEOUT_RATIO,
            failure_ratio: DEFAULT_SIMULATED_FAILURE_RATIO,
        }
    }
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct HttpArgs {
    /// Base URL of the store
    #[arg(long, default_value_t = DEFAULT_HTTP_SERVER_URL.to_owned())]
    pub server_url: String,
}

fn parse_ratio(v: &str) -> Result<f64, String> {
    let ratio: f64 = v.parse().map_err(|e| format!("'{v}' is not a number: {e}"))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("'{v}' must be between 0.0 and 1.0"))
    }
}

impl TargetCommand {
    pub fn create_session_factory(&self) -> Result<Arc<dyn SessionFactory>, HammerError> {
        match self {
            TargetCommand::Simulated(args) => {
                let config = SimulatedStoreConfig {
                    min_latency: Duration::from_millis(args.min_latency_ms),
                    max_latency: Duration::from_millis(args.max_latency_ms.max(args.min_latency_ms)),
                    timeout_ratio: args.timeout_ratio,
                    failure_ratio: args.failure_ratio,
                };
                Ok(Arc::new(SimulatedStore::new(config)))
            }
            TargetCommand::Http(args) => Ok(Arc::new(HttpSessionFactory::new(&args.server_url)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_outside_unit_interval_should_be_rejected() {
        assert_eq!(parse_ratio("0.25"), Ok(0.25));
        assert!(parse_ratio("1.5").is_err());
        assert!(parse_ratio("-0.1").is_err());
        assert!(parse_ratio("often").is_err());
    }

    #[test]
    fn both_targets_should_build_a_session_factory() {
        let simulated = TargetCommand::default().create_session_factory().unwrap();
        assert!(simulated.describe().starts_with("simulated store"));

        let http = TargetCommand::Http(HttpArgs {
            server_url: "http://127.0.0.1:9000".to_owned(),
        })
        .create_session_factory()
        .unwrap();
        assert_eq!(http.describe(), "HTTP store at http://127.0.0.1:9000/");
    }
}
