//! bucket.rs: trend-series buckets
//!
//! - A bucket is one local calendar slot: an hour, a day, a month or a year.
//! - Slots are identified by a [`SlotKey`]: the hour of day for hourly series, the
//!   truncated wall-clock start ([`Granularity::truncate`]) otherwise. Two timestamps
//!   share a bucket iff their keys are equal.
//! - Each bucket also carries the UTC instant its slot starts at.
//! - Series are generated empty from `(timeframe, window)` alone and filled through a
//!   slot index, one lookup per transaction.
//!
//! Shapes per timeframe:
//!
//! | Timeframe | Granularity | Count                         | Label       |
//! |-----------|-------------|-------------------------------|-------------|
//! | `Today`   | hour        | 24                            | `9:00`      |
//! | `Week`    | day         | days in window (7)            | `Mon`       |
//! | `Month`   | month       | 12, ending at the window end  | `Jan`       |
//! | `Year`    | year        | years in window, at most 3    | `2024`      |
//! | explicit ≤ 1 day   | hour  | 24, from the start hour | `9:00`      |
//! | explicit ≤ 31 days | day   | days in window          | `Mar 05`    |
//! | explicit longer    | month | months in window        | `Mar 2024`  |

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    calendar::{Calendar, first_of_month, shift_months},
    timeframe::Timeframe,
    window::{Window, WindowError},
};

/// Hourly buckets in a day.
pub const HOURS_PER_DAY: usize = 24;
/// Months in the rolling monthly series.
pub const MONTHS_PER_SERIES: usize = 12;
/// Upper bound on yearly buckets.
pub const MAX_YEAR_BUCKETS: usize = 3;
/// Longest explicit range (in days) that still gets daily buckets.
pub const MAX_DAILY_RANGE_DAYS: i64 = 31;

/// Identity of a bucket within its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKey {
    /// Local hour of day, 0..=23.
    HourOfDay(u32),
    /// Local wall-clock start of a day, month or year.
    Start(NaiveDateTime),
}

/// Size of one bucket slot (local calendar units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Hour,
    Day,
    Month,
    Year,
}

impl Granularity {
    /// Start of the slot containing `local`.
    pub fn truncate(self, local: NaiveDateTime) -> NaiveDateTime {
        let date = local.date();
        let day = match self {
            Granularity::Hour => {
                return date.and_time(
                    NaiveTime::from_hms_opt(local.hour(), 0, 0).unwrap_or(NaiveTime::MIN),
                );
            }
            Granularity::Day => date,
            Granularity::Month => first_of_month(date),
            Granularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        };
        day.and_time(NaiveTime::MIN)
    }

    /// Key of the bucket `local` belongs to.
    pub fn key(self, local: NaiveDateTime) -> SlotKey {
        match self {
            Granularity::Hour => SlotKey::HourOfDay(local.hour()),
            _ => SlotKey::Start(self.truncate(local)),
        }
    }

    /// Start of the slot after `slot`.
    fn next(self, slot: NaiveDateTime) -> Result<NaiveDateTime, WindowError> {
        let next = match self {
            Granularity::Hour => slot.checked_add_signed(Duration::hours(1)),
            Granularity::Day => slot.checked_add_signed(Duration::days(1)),
            Granularity::Month => {
                return Ok(shift_months(slot.date(), 1)?.and_time(NaiveTime::MIN));
            }
            Granularity::Year => {
                return Ok(shift_months(slot.date(), 12)?.and_time(NaiveTime::MIN));
            }
        };
        next.ok_or(WindowError::OutOfRange)
    }
}

/// How a bucket's label is rendered from its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelStyle {
    /// `9:00`
    HourOfDay,
    /// `Mon`
    Weekday,
    /// `Jan`
    Month,
    /// `2024`
    Year,
    /// `Mar 05`
    MonthDay,
    /// `Mar 2024`
    MonthYear,
}

impl LabelStyle {
    fn render(self, slot: NaiveDateTime) -> String {
        match self {
            LabelStyle::HourOfDay => format!("{}:00", slot.hour()),
            LabelStyle::Weekday => slot.format("%a").to_string(),
            LabelStyle::Month => slot.format("%b").to_string(),
            LabelStyle::Year => slot.format("%Y").to_string(),
            LabelStyle::MonthDay => slot.format("%b %d").to_string(),
            LabelStyle::MonthYear => slot.format("%b %Y").to_string(),
        }
    }
}

/// One point of the trend series.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// Display label.
    pub label: String,
    /// UTC instant the slot starts at.
    ///
    /// Strictly increasing along a series, except for an hour skipped by a
    /// spring-forward transition: its slot maps to the first instant after the
    /// gap, so it shares the following hour's timestamp and never fills.
    pub timestamp: DateTime<Utc>,
    /// Local wall-clock start of the slot.
    pub slot: NaiveDateTime,
    /// Sum of matched transaction amounts.
    pub value: f64,
}

/// Output projection of a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub name: String,
    pub value: f64,
}

/// Ordered buckets of one granularity plus a slot index for O(1) assignment.
#[derive(Debug, Clone)]
pub struct TrendSeries {
    granularity: Granularity,
    buckets: Vec<Bucket>,
    index: IndexMap<SlotKey, usize>,
}

impl TrendSeries {
    fn build(
        cal: &Calendar,
        granularity: Granularity,
        first: NaiveDateTime,
        count: usize,
        style: LabelStyle,
    ) -> Result<Self, WindowError> {
        let mut buckets = Vec::with_capacity(count);
        let mut index = IndexMap::with_capacity(count);
        let mut slot = granularity.truncate(first);
        for i in 0..count {
            if i > 0 {
                slot = granularity.next(slot)?;
            }
            index.insert(granularity.key(slot), i);
            buckets.push(Bucket {
                label: style.render(slot),
                timestamp: cal.instant(slot)?,
                slot,
                value: 0.0,
            });
        }
        Ok(Self {
            granularity,
            buckets,
            index,
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Add `amount` to the bucket containing `local`. Returns `false` when no
    /// bucket covers it.
    pub fn add(&mut self, local: NaiveDateTime, amount: f64) -> bool {
        match self.index.get(&self.granularity.key(local)) {
            Some(&i) => {
                self.buckets[i].value += amount;
                true
            }
            None => false,
        }
    }

    pub fn total(&self) -> f64 {
        self.buckets.iter().fold(0.0, |acc, b| acc + b.value)
    }

    /// `{name, value}` pairs in generation order.
    pub fn into_points(self) -> Vec<TrendPoint> {
        self.buckets
            .into_iter()
            .map(|b| TrendPoint {
                name: b.label,
                value: b.value,
            })
            .collect()
    }
}

/// Generate the empty trend series for a window.
///
/// `timeframe` is the window's originating timeframe (`None` for explicit
/// ranges, which pick a granularity from the window length).
pub fn generate_buckets(
    cal: &Calendar,
    timeframe: Option<Timeframe>,
    window: &Window,
) -> Result<TrendSeries, WindowError> {
    let first_day = cal.local_date(window.start);
    let last_day = cal.local_date(window.end);
    let midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN);

    let series = match timeframe {
        Some(Timeframe::Today) => TrendSeries::build(
            cal,
            Granularity::Hour,
            midnight(first_day),
            HOURS_PER_DAY,
            LabelStyle::HourOfDay,
        )?,
        Some(Timeframe::Week) => TrendSeries::build(
            cal,
            Granularity::Day,
            midnight(first_day),
            days_between(first_day, last_day),
            LabelStyle::Weekday,
        )?,
        Some(Timeframe::Month) => {
            let last = first_of_month(last_day);
            let first = shift_months(last, 1 - MONTHS_PER_SERIES as i32)?;
            TrendSeries::build(
                cal,
                Granularity::Month,
                midnight(first),
                MONTHS_PER_SERIES,
                LabelStyle::Month,
            )?
        }
        Some(Timeframe::Year) => {
            let years = (last_day.year() - first_day.year() + 1).max(0) as usize;
            TrendSeries::build(
                cal,
                Granularity::Year,
                midnight(first_day),
                years.min(MAX_YEAR_BUCKETS),
                LabelStyle::Year,
            )?
        }
        None => {
            let length = window.duration();
            if length <= Duration::days(1) {
                TrendSeries::build(
                    cal,
                    Granularity::Hour,
                    cal.local(window.start),
                    HOURS_PER_DAY,
                    LabelStyle::HourOfDay,
                )?
            } else if length <= Duration::days(MAX_DAILY_RANGE_DAYS) {
                TrendSeries::build(
                    cal,
                    Granularity::Day,
                    midnight(first_day),
                    days_between(first_day, last_day),
                    LabelStyle::MonthDay,
                )?
            } else {
                TrendSeries::build(
                    cal,
                    Granularity::Month,
                    midnight(first_day),
                    months_between(first_day, last_day),
                    LabelStyle::MonthYear,
                )?
            }
        }
    };

    tracing::debug!(
        granularity = ?series.granularity(),
        buckets = series.len(),
        "generated trend buckets"
    );
    Ok(series)
}

/// Calendar days from `first` through `last`, inclusive.
fn days_between(first: NaiveDate, last: NaiveDate) -> usize {
    (last.signed_duration_since(first).num_days() + 1).max(0) as usize
}

/// Calendar months from `first` through `last`, inclusive.
fn months_between(first: NaiveDate, last: NaiveDate) -> usize {
    let months = (last.year() - first.year()) * 12 + last.month() as i32 - first.month() as i32;
    (months + 1).max(0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::resolve;
    use chrono::{TimeZone, Weekday};
    use chrono_tz::Tz;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn labels(s: &TrendSeries) -> Vec<&str> {
        s.buckets().iter().map(|b| b.label.as_str()).collect()
    }

    fn named(tf: Timeframe) -> TrendSeries {
        let cal = Calendar::default();
        let w = resolve(&cal, utc(2024, 6, 5, 15, 30), Some(tf), None, None).unwrap();
        generate_buckets(&cal, w.timeframe, &w).unwrap()
    }

    fn custom(start: DateTime<Utc>, end: DateTime<Utc>) -> TrendSeries {
        let cal = Calendar::default();
        let w = resolve(&cal, utc(2024, 6, 5, 15, 30), None, Some(start), Some(end)).unwrap();
        generate_buckets(&cal, w.timeframe, &w).unwrap()
    }

    #[test]
    fn today_has_24_unpadded_hour_labels() {
        let s = named(Timeframe::Today);
        assert_eq!(s.granularity(), Granularity::Hour);
        assert_eq!(s.len(), 24);
        assert_eq!(s.buckets()[0].label, "0:00");
        assert_eq!(s.buckets()[9].label, "9:00");
        assert_eq!(s.buckets()[23].label, "23:00");
        assert_eq!(s.buckets()[9].timestamp, utc(2024, 6, 5, 9, 0));
    }

    #[test]
    fn week_has_one_bucket_per_weekday() {
        let s = named(Timeframe::Week);
        assert_eq!(labels(&s), ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
        assert_eq!(s.buckets()[0].timestamp, utc(2024, 6, 2, 0, 0));
    }

    #[test]
    fn month_is_twelve_months_ending_now() {
        let s = named(Timeframe::Month);
        assert_eq!(
            labels(&s),
            ["Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun"]
        );
        assert_eq!(s.buckets()[11].timestamp, utc(2024, 6, 1, 0, 0));
    }

    #[test]
    fn year_is_capped_at_three() {
        let s = named(Timeframe::Year);
        assert_eq!(labels(&s), ["2022", "2023", "2024"]);

        // a hand-built five-year window still yields three buckets
        let cal = Calendar::default();
        let mut w = resolve(&cal, utc(2024, 6, 5, 0, 0), Some(Timeframe::Year), None, None).unwrap();
        w.start = utc(2019, 1, 1, 0, 0);
        let s = generate_buckets(&cal, Some(Timeframe::Year), &w).unwrap();
        assert_eq!(labels(&s), ["2019", "2020", "2021"]);
    }

    #[test]
    fn custom_granularity_follows_length() {
        let one_day = custom(utc(2024, 3, 5, 0, 0), utc(2024, 3, 6, 0, 0));
        assert_eq!(one_day.granularity(), Granularity::Hour);
        assert_eq!(one_day.len(), 24);

        let ten_days = custom(
            utc(2024, 3, 1, 0, 0),
            utc(2024, 3, 10, 23, 59) + Duration::milliseconds(59_999),
        );
        assert_eq!(ten_days.granularity(), Granularity::Day);
        assert_eq!(ten_days.len(), 10);
        assert_eq!(ten_days.buckets()[0].label, "Mar 01");
        assert_eq!(ten_days.buckets()[9].label, "Mar 10");

        let quarter = custom(utc(2024, 1, 15, 0, 0), utc(2024, 4, 2, 0, 0));
        assert_eq!(quarter.granularity(), Granularity::Month);
        assert_eq!(labels(&quarter), ["Jan 2024", "Feb 2024", "Mar 2024", "Apr 2024"]);
    }

    #[test]
    fn add_uses_the_slot_index() {
        let mut s = named(Timeframe::Today);
        let cal = Calendar::default();
        assert!(s.add(cal.local(utc(2024, 6, 5, 9, 15)), 100.0));
        assert!(s.add(cal.local(utc(2024, 6, 5, 9, 45)), 50.0));
        assert_eq!(s.buckets()[9].value, 150.0);
        assert_eq!(s.total(), 150.0);

        let mut months = named(Timeframe::Month);
        assert!(!months.add(cal.local(utc(2020, 6, 5, 9, 45)), 7.0));
        assert!(months.add(cal.local(utc(2024, 6, 30, 23, 59)), 7.0));
        assert_eq!(months.buckets()[11].value, 7.0);
    }

    #[test]
    fn short_custom_range_starts_at_its_first_hour() {
        let cal = Calendar::default();
        let mut s = custom(utc(2024, 3, 5, 18, 30), utc(2024, 3, 6, 6, 0));
        assert_eq!(s.len(), 24);
        assert_eq!(s.buckets()[0].label, "18:00");
        assert_eq!(s.buckets()[6].label, "0:00");
        assert_eq!(s.buckets()[0].timestamp, utc(2024, 3, 5, 18, 0));

        // after midnight still lands in its hour
        assert!(s.add(cal.local(utc(2024, 3, 6, 2, 10)), 5.0));
        assert_eq!(s.buckets()[8].value, 5.0);
    }

    #[test]
    fn skipped_hour_shares_the_next_timestamp() {
        // New York springs forward at 02:00 on 2024-03-10
        let cal = Calendar::new(Tz::America__New_York, Weekday::Sun);
        let w = resolve(&cal, utc(2024, 3, 10, 16, 0), Some(Timeframe::Today), None, None).unwrap();
        let mut s = generate_buckets(&cal, w.timeframe, &w).unwrap();
        assert_eq!(s.len(), 24);

        let (two, three) = (&s.buckets()[2], &s.buckets()[3]);
        assert_eq!(two.label, "2:00");
        assert_eq!(two.timestamp, utc(2024, 3, 10, 7, 0));
        assert_eq!(three.timestamp, two.timestamp);
        assert!(s.buckets()[1].timestamp < two.timestamp);
        assert!(three.timestamp < s.buckets()[4].timestamp);

        // 07:30Z reads 03:30 local
        assert!(s.add(cal.local(utc(2024, 3, 10, 7, 30)), 9.0));
        assert_eq!(s.buckets()[2].value, 0.0);
        assert_eq!(s.buckets()[3].value, 9.0);
    }

    #[test]
    fn timestamps_follow_the_configured_zone() {
        let cal = Calendar::new(Tz::Europe__Berlin, Weekday::Mon);
        let w = resolve(&cal, utc(2024, 1, 10, 12, 0), Some(Timeframe::Week), None, None).unwrap();
        let s = generate_buckets(&cal, w.timeframe, &w).unwrap();
        assert_eq!(s.buckets()[0].label, "Mon");
        // Berlin midnight in winter is 23:00Z the previous day
        assert_eq!(s.buckets()[0].timestamp, utc(2024, 1, 7, 23, 0));
    }
}
