//! Named reporting timeframes.
//!
//! A [`Timeframe`] picks both the reporting window (see [`crate::window`]) and the
//! granularity of the trend series (see [`crate::bucket`]). Parsing is
//! case-insensitive; [`Timeframe::parse_or_default`] maps anything unrecognised to
//! [`Timeframe::Today`] so request handling never fails on a bad label.
//!
//! ```
//! use sales_analytics::timeframe::Timeframe;
//!
//! assert_eq!("week".parse::<Timeframe>().unwrap(), Timeframe::Week);
//! assert_eq!(Timeframe::parse_or_default(Some("fortnight")), Timeframe::Today);
//! ```

use std::{fmt, str::FromStr};

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// A named reporting timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    /// Current calendar day, hourly trend.
    #[default]
    Today,
    /// Current calendar week, daily trend.
    Week,
    /// Rolling twelve months ending with the current one, monthly trend.
    Month,
    /// Current year and the two before it, yearly trend.
    Year,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Today,
        Timeframe::Week,
        Timeframe::Month,
        Timeframe::Year,
    ];

    /// Lenient parse used at the request edge: missing or unknown -> `Today`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Timeframe::default(),
            Some(s) => s.parse().unwrap_or_else(|_| {
                tracing::debug!(timeframe = s, "unknown timeframe, using Today");
                Timeframe::default()
            }),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Today => "Today",
            Timeframe::Week => "Week",
            Timeframe::Month => "Month",
            Timeframe::Year => "Year",
        };
        f.write_str(s)
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tf = match s.trim().to_ascii_lowercase().as_str() {
            "today" | "day" => Timeframe::Today,
            "week" => Timeframe::Week,
            "month" => Timeframe::Month,
            "year" => Timeframe::Year,
            other => bail!("unknown timeframe: {other}"),
        };
        Ok(tf)
    }
}
