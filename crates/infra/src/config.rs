//! Environment-driven configuration.

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use retailpulse_replenishment::ReplenishmentConfig;

pub const DATABASE_URL_VAR: &str = "RETAILPULSE_DATABASE_URL";
pub const WINDOW_DAYS_VAR: &str = "RETAILPULSE_WINDOW_DAYS";
pub const LEAD_TIME_DAYS_VAR: &str = "RETAILPULSE_LEAD_TIME_DAYS";
pub const Z_SCORE_VAR: &str = "RETAILPULSE_Z_SCORE";
pub const AS_OF_VAR: &str = "RETAILPULSE_AS_OF";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://retail.db";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: invalid value {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Process configuration for a metrics run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub replenishment: ReplenishmentConfig,
    /// Last day of the demand window; `None` means today (UTC).
    pub as_of: Option<NaiveDate>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            replenishment: ReplenishmentConfig::default(),
            as_of: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup(DATABASE_URL_VAR).unwrap_or_else(|| {
            tracing::warn!("{DATABASE_URL_VAR} not set; using {DEFAULT_DATABASE_URL}");
            defaults.database_url.clone()
        });

        let mut replenishment = defaults.replenishment;
        if let Some(raw) = lookup(WINDOW_DAYS_VAR) {
            replenishment.window_days = parse_window_days(&raw)?;
        }
        if let Some(raw) = lookup(LEAD_TIME_DAYS_VAR) {
            replenishment.lead_time_days = parse_positive(LEAD_TIME_DAYS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(Z_SCORE_VAR) {
            replenishment.z_score = parse_positive(Z_SCORE_VAR, &raw)?;
        }

        let as_of = match lookup(AS_OF_VAR) {
            Some(raw) => Some(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                ConfigError::Invalid {
                    key: AS_OF_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            database_url,
            replenishment,
            as_of,
        })
    }

    /// Configured as-of date, or today (UTC).
    pub fn as_of_or_today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_window_days(raw: &str) -> Result<u32, ConfigError> {
    let days: u32 = parse(WINDOW_DAYS_VAR, raw)?;
    if !(1..=ReplenishmentConfig::MAX_WINDOW_DAYS).contains(&days) {
        return Err(ConfigError::Invalid {
            key: WINDOW_DAYS_VAR,
            value: raw.to_string(),
            reason: format!("must be between 1 and {}", ReplenishmentConfig::MAX_WINDOW_DAYS),
        });
    }
    Ok(days)
}

fn parse_positive(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    let value: f64 = parse(key, raw)?;
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "must be a finite positive number".to_string(),
        });
    }
    Ok(value)
}
