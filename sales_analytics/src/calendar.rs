//! Local calendar arithmetic.
//!
//! All report boundaries are calendar units (day, week, month, year) in one
//! configured time zone. [`Calendar`] converts between UTC instants and that
//! zone's wall clock and produces inclusive spans that end on the last
//! nanosecond before the next unit starts.

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday,
};
use chrono_tz::Tz;
use transaction_store::models::DateRange;

use crate::{
    tz::local_to_utc,
    window::WindowError,
};

/// Time zone plus week convention used for every calendar computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
    week_start: Weekday,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(Tz::UTC, Weekday::Sun)
    }
}

impl Calendar {
    pub const fn new(tz: Tz, week_start: Weekday) -> Self {
        Self { tz, week_start }
    }

    pub const fn tz(&self) -> Tz {
        self.tz
    }

    pub const fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Wall-clock reading of `ts` in the calendar's zone.
    pub fn local(&self, ts: DateTime<Utc>) -> NaiveDateTime {
        ts.with_timezone(&self.tz).naive_local()
    }

    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        self.local(ts).date()
    }

    /// First instant of a wall-clock reading.
    pub fn instant(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>, WindowError> {
        local_to_utc(naive, self.tz).map_err(|e| {
            WindowError::LocalTime {
                naive,
                message: e.to_string(),
            }
        })
    }

    /// First instant of `date`.
    pub fn start_of(&self, date: NaiveDate) -> Result<DateTime<Utc>, WindowError> {
        self.instant(date.and_time(NaiveTime::MIN))
    }

    /// Inclusive span from the start of `first` to the last nanosecond before
    /// `next` begins.
    pub fn span(&self, first: NaiveDate, next: NaiveDate) -> Result<DateRange, WindowError> {
        let start = self.start_of(first)?;
        let end = self.start_of(next)? - Duration::nanoseconds(1);
        Ok(DateRange::new(start, end))
    }

    /// The day the week containing `date` starts on.
    pub fn week_start_of(&self, date: NaiveDate) -> Result<NaiveDate, WindowError> {
        let offset = (7 + date.weekday().num_days_from_monday()
            - self.week_start.num_days_from_monday())
            % 7;
        sub_days(date, offset as u64)
    }
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub(crate) fn first_of_year(year: i32) -> Result<NaiveDate, WindowError> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or(WindowError::OutOfRange)
}

pub(crate) fn add_days(date: NaiveDate, n: u64) -> Result<NaiveDate, WindowError> {
    date.checked_add_days(Days::new(n))
        .ok_or(WindowError::OutOfRange)
}

pub(crate) fn sub_days(date: NaiveDate, n: u64) -> Result<NaiveDate, WindowError> {
    date.checked_sub_days(Days::new(n))
        .ok_or(WindowError::OutOfRange)
}

/// Move `date` by `n` calendar months (negative = backwards).
pub(crate) fn shift_months(date: NaiveDate, n: i32) -> Result<NaiveDate, WindowError> {
    let months = Months::new(n.unsigned_abs());
    if n >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
    .ok_or(WindowError::OutOfRange)
}
