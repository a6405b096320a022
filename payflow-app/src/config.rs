//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use payflow_engine::EngineConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub engine: EngineConfig,
    /// How often idle users are dropped from the rate limiter
    pub sweep_interval: Duration,
    pub json_logs: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = EngineConfig::default();

        let port = parse_or(&lookup, "PORT", 3000)?;
        let rate_limit_max_requests = parse_or(
            &lookup,
            "RATE_LIMIT_MAX_REQUESTS",
            defaults.rate_limit_max_requests,
        )?;
        let window_secs = parse_or(
            &lookup,
            "RATE_LIMIT_WINDOW_SECS",
            defaults.rate_limit_window.as_secs(),
        )?;
        let fraud_threshold = parse_or(&lookup, "FRAUD_THRESHOLD", defaults.fraud_threshold)?;
        let sweep_secs: u64 = parse_or(&lookup, "RATE_LIMIT_SWEEP_SECS", 300)?;

        if !(0.0..=1.0).contains(&fraud_threshold) {
            anyhow::bail!("FRAUD_THRESHOLD must be between 0 and 1, got {fraud_threshold}");
        }
        if window_secs == 0 || sweep_secs == 0 {
            anyhow::bail!("RATE_LIMIT_WINDOW_SECS and RATE_LIMIT_SWEEP_SECS must be positive");
        }

        let json_logs = lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        Ok(Self {
            port,
            engine: EngineConfig {
                rate_limit_max_requests,
                rate_limit_window: Duration::from_secs(window_secs),
                fraud_threshold,
            },
            sweep_interval: Duration::from_secs(sweep_secs),
            json_logs,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {key}={raw:?}: {e}")),
        None => Ok(default),
    }
}
