//! Analytics configuration: parsing, environment overrides, and validation.
//!
//! The configuration is a small TOML document:
//!
//! ```toml
//! timezone = "America/New_York"   # IANA zone for all calendar math (default "UTC")
//! week_start = "Monday"           # first day of a week (default "Sunday")
//! top_products = 5                # length of the top-products list (default 5)
//! database_url = "sales.db"       # SQLite file used by the CLI
//! ```
//!
//! Every key is optional. Environment variables win over the file:
//! `SALES_TIMEZONE`, `SALES_WEEK_START`, and `DATABASE_URL`.
//!
//! Entrypoints:
//! - Parse from a TOML string: [`load_config_str`]
//! - Parse from a file path: [`load_config_path`]
//! - Apply env overrides: [`AnalyticsConfig::apply_env_overrides`]

use std::path::Path;

use anyhow::{Context, bail};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::{
    calendar::Calendar,
    env::{MissingEnvVarError, get_optional_env_var},
    items::DEFAULT_TOP_PRODUCTS,
    tz::parse_tz,
};

pub const ENV_TIMEZONE: &str = "SALES_TIMEZONE";
pub const ENV_WEEK_START: &str = "SALES_WEEK_START";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Top-level analytics configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// IANA time zone name.
    pub timezone: String,
    /// Weekday name a calendar week starts on.
    pub week_start: String,
    /// Number of entries in the top-products list.
    pub top_products: usize,
    /// SQLite database path.
    pub database_url: Option<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            week_start: "Sunday".to_string(),
            top_products: DEFAULT_TOP_PRODUCTS,
            database_url: None,
        }
    }
}

impl AnalyticsConfig {
    /// Overlay `SALES_TIMEZONE`, `SALES_WEEK_START` and `DATABASE_URL` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(tz) = get_optional_env_var(ENV_TIMEZONE) {
            self.timezone = tz;
        }
        if let Some(ws) = get_optional_env_var(ENV_WEEK_START) {
            self.week_start = ws;
        }
        if let Some(url) = get_optional_env_var(ENV_DATABASE_URL) {
            self.database_url = Some(url);
        }
    }

    /// Check that every value can be used.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.calendar()?;
        if self.top_products == 0 {
            bail!("top_products must be > 0");
        }
        Ok(())
    }

    /// The calendar described by `timezone` and `week_start`.
    pub fn calendar(&self) -> anyhow::Result<Calendar> {
        let tz = parse_tz(&self.timezone)?;
        let week_start: Weekday = self
            .week_start
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("bad week_start: {}", self.week_start))?;
        Ok(Calendar::new(tz, week_start))
    }

    pub fn database_url(&self) -> Result<&str, MissingEnvVarError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| MissingEnvVarError(ENV_DATABASE_URL.to_string()))
    }
}

/// Parse and validate a configuration from TOML text.
pub fn load_config_str(s: &str) -> anyhow::Result<AnalyticsConfig> {
    let cfg: AnalyticsConfig = toml::from_str(s).context("invalid analytics config")?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read, parse and validate a configuration file.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<AnalyticsConfig> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    load_config_str(&s).with_context(|| format!("loading config {}", path.display()))
}
