//! Reporting windows.
//!
//! [`resolve`] turns a named [`Timeframe`] or an explicit start/end pair into a
//! [`Window`]: the span the report covers plus the span it is compared against.
//!
//! | Timeframe | Current span                                  | Previous span                          |
//! |-----------|-----------------------------------------------|----------------------------------------|
//! | `Today`   | today                                         | yesterday                              |
//! | `Week`    | this calendar week                            | the week before                        |
//! | `Month`   | first day 11 months back .. end of this month | the twelve months before that          |
//! | `Year`    | Jan 1 two years back .. end of this year      | Jan 1 three years back .. end of last year |
//! | explicit  | `start ..= end`                               | `start - (end - start) ..= start`      |
//!
//! Named spans are calendar spans in the configured zone and end on the last
//! nanosecond of their final unit.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use thiserror::Error;
use transaction_store::models::DateRange;

use crate::{
    calendar::{Calendar, add_days, first_of_month, first_of_year, shift_months, sub_days},
    timeframe::Timeframe,
};

/// Errors raised while deriving windows or bucket boundaries.
#[derive(Debug, Error)]
pub enum WindowError {
    /// An explicit range whose start lies after its end.
    #[error("start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A wall-clock time that cannot be mapped to an instant.
    #[error("cannot resolve local time {naive}: {message}")]
    LocalTime {
        naive: NaiveDateTime,
        message: String,
    },

    /// Calendar arithmetic left chrono's representable range.
    #[error("date out of range")]
    OutOfRange,
}

/// The span a report covers and the span it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Inclusive start of the current span.
    pub start: DateTime<Utc>,
    /// Inclusive end of the current span.
    pub end: DateTime<Utc>,
    /// Comparison span.
    pub previous: DateRange,
    /// Timeframe the window was derived from; `None` for explicit ranges.
    pub timeframe: Option<Timeframe>,
}

impl Window {
    pub fn current(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    fn named(timeframe: Timeframe, current: DateRange, previous: DateRange) -> Self {
        Self {
            start: current.start,
            end: current.end,
            previous,
            timeframe: Some(timeframe),
        }
    }
}

/// Resolve the reporting window.
///
/// When both `explicit_start` and `explicit_end` are given they win over
/// `timeframe`; a single bound on its own is ignored. Without an explicit range
/// the timeframe (default `Today`) is evaluated against `now` in the calendar's
/// zone.
pub fn resolve(
    cal: &Calendar,
    now: DateTime<Utc>,
    timeframe: Option<Timeframe>,
    explicit_start: Option<DateTime<Utc>>,
    explicit_end: Option<DateTime<Utc>>,
) -> Result<Window, WindowError> {
    if let (Some(start), Some(end)) = (explicit_start, explicit_end) {
        return explicit(start, end);
    }

    let timeframe = timeframe.unwrap_or_default();
    let today = cal.local_date(now);

    let window = match timeframe {
        Timeframe::Today => {
            let tomorrow = add_days(today, 1)?;
            let yesterday = sub_days(today, 1)?;
            Window::named(
                timeframe,
                cal.span(today, tomorrow)?,
                cal.span(yesterday, today)?,
            )
        }
        Timeframe::Week => {
            let first = cal.week_start_of(today)?;
            let next = add_days(first, 7)?;
            let prior = sub_days(first, 7)?;
            Window::named(timeframe, cal.span(first, next)?, cal.span(prior, first)?)
        }
        Timeframe::Month => {
            let this_month = first_of_month(today);
            let first = shift_months(this_month, -11)?;
            let next = shift_months(this_month, 1)?;
            let prior = shift_months(first, -12)?;
            Window::named(timeframe, cal.span(first, next)?, cal.span(prior, first)?)
        }
        Timeframe::Year => {
            let year = today.year();
            Window::named(
                timeframe,
                cal.span(first_of_year(year - 2)?, first_of_year(year + 1)?)?,
                cal.span(first_of_year(year - 3)?, first_of_year(year)?)?,
            )
        }
    };

    tracing::debug!(
        %timeframe,
        start = %window.start,
        end = %window.end,
        prev_start = %window.previous.start,
        prev_end = %window.previous.end,
        "resolved window"
    );
    Ok(window)
}

fn explicit(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Window, WindowError> {
    if start > end {
        return Err(WindowError::InvalidRange { start, end });
    }
    let length = end.signed_duration_since(start);
    Ok(Window {
        start,
        end,
        previous: DateRange::new(start - length, start),
        timeframe: None,
    })
}
