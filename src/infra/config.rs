//! Centralized configuration (environment variables + defaults).

use crate::app::validation::YearRange;
use crate::app::CarPolicy;
use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(key)) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Without it the server keeps everything in memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub year_range: YearRange,
    pub enforce_year_range_on_import: bool,
    pub notify_recipient: Option<String>,
}

impl Settings {
    /// Reads the process environment (after loading `.env` if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections =
            parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        let defaults = YearRange::default();
        let year_range = YearRange {
            min: parse_var(&lookup, "CAR_MIN_YEAR", defaults.min)?,
            max: parse_var(&lookup, "CAR_MAX_YEAR", defaults.max)?,
        };
        if year_range.min > year_range.max {
            bail!(
                "CAR_MIN_YEAR ({}) is greater than CAR_MAX_YEAR ({})",
                year_range.min,
                year_range.max
            );
        }

        let bind_default: SocketAddr = DEFAULT_BIND_ADDR.parse()?;

        Ok(Self {
            database_url: non_empty(lookup("DATABASE_URL")),
            max_connections,
            bind_addr: parse_var(&lookup, "BIND_ADDR", bind_default)?,
            year_range,
            enforce_year_range_on_import: parse_var(&lookup, "IMPORT_ENFORCE_YEAR_RANGE", false)?,
            notify_recipient: non_empty(lookup("NOTIFY_RECIPIENT")),
        })
    }

    pub fn car_policy(&self) -> CarPolicy {
        CarPolicy {
            year_range: self.year_range,
            enforce_year_range_on_import: self.enforce_year_range_on_import,
            import_report_recipient: self.notify_recipient.clone(),
        }
    }
}
