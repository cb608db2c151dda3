use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use proptest::prelude::*;
use sales_analytics::{
    bucket::generate_buckets,
    calendar::Calendar,
    report::compute,
    timeframe::Timeframe,
    window::{Window, resolve},
};
use transaction_store::models::{LineItem, Transaction};

const ZONES: [Tz; 5] = [
    Tz::UTC,
    Tz::America__New_York,
    Tz::Europe__Berlin,
    Tz::Asia__Kolkata,
    Tz::Australia__Sydney,
];

fn calendar() -> impl Strategy<Value = Calendar> {
    const DAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    (0..ZONES.len(), 0..DAYS.len()).prop_map(|(z, w)| Calendar::new(ZONES[z], DAYS[w]))
}

fn timeframe() -> impl Strategy<Value = Timeframe> {
    (0..Timeframe::ALL.len()).prop_map(|i| Timeframe::ALL[i])
}

/// Somewhere between 2000 and 2040.
fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..2_208_988_800).prop_map(|s| Utc.timestamp_opt(s, 0).unwrap())
}

/// (position in window as a fraction, product index, category index, quantity, price)
type Order = (f64, Vec<(usize, usize, u32, u32)>);

fn orders() -> impl Strategy<Value = Vec<Order>> {
    proptest::collection::vec(
        (
            0.0f64..=1.0,
            proptest::collection::vec((0usize..8, 0usize..4, 1u32..5, 1u32..500), 1..4),
        ),
        0..40,
    )
}

fn materialize(window: &Window, orders: &[Order]) -> Vec<Transaction> {
    let span_ms = window.duration().num_milliseconds();
    orders
        .iter()
        .enumerate()
        .map(|(i, (pos, lines))| {
            let items: Vec<LineItem> = lines
                .iter()
                .map(|&(p, c, quantity, price)| LineItem {
                    product_id: format!("P{p}"),
                    product_name: format!("Product {p}"),
                    category: (c > 0).then(|| format!("C{c}")),
                    quantity,
                    price: price as f64,
                    total: (price * quantity) as f64,
                })
                .collect();
            let offset = (span_ms as f64 * pos) as i64;
            Transaction {
                id: format!("t{i}"),
                customer: "c".into(),
                total_amount: items.iter().map(|it| it.total).sum(),
                created_at: window.start + Duration::milliseconds(offset),
                items,
            }
        })
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn named_timeframes_have_fixed_bucket_counts(
        cal in calendar(),
        tf in timeframe(),
        now in instant(),
    ) {
        let w = resolve(&cal, now, Some(tf), None, None).unwrap();
        let series = generate_buckets(&cal, w.timeframe, &w).unwrap();
        let expected = match tf {
            Timeframe::Today => 24,
            Timeframe::Week => 7,
            Timeframe::Month => 12,
            Timeframe::Year => 3,
        };
        prop_assert_eq!(series.len(), expected);

        prop_assert!(w.start <= now && now <= w.end);
        prop_assert!(w.previous.start < w.previous.end);
        prop_assert!(w.previous.start < w.start);
    }

    #[test]
    fn day_and_longer_buckets_are_strictly_increasing(
        cal in calendar(),
        tf in timeframe(),
        now in instant(),
    ) {
        prop_assume!(tf != Timeframe::Today);
        let w = resolve(&cal, now, Some(tf), None, None).unwrap();
        let series = generate_buckets(&cal, w.timeframe, &w).unwrap();
        for pair in series.buckets().windows(2) {
            prop_assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn utc_hour_buckets_are_strictly_increasing(now in instant()) {
        let cal = Calendar::default();
        let w = resolve(&cal, now, Some(Timeframe::Today), None, None).unwrap();
        let series = generate_buckets(&cal, w.timeframe, &w).unwrap();
        for pair in series.buckets().windows(2) {
            prop_assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
    }

    #[test]
    fn reports_are_internally_consistent(
        cal in calendar(),
        tf in timeframe(),
        now in instant(),
        current in orders(),
        previous in orders(),
    ) {
        let w = resolve(&cal, now, Some(tf), None, None).unwrap();
        let prev_window = Window {
            start: w.previous.start,
            end: w.previous.end,
            previous: w.previous,
            timeframe: None,
        };
        let current = materialize(&w, &current);
        let previous = materialize(&prev_window, &previous);

        let report = compute(&cal, &w, &current, &previous, 5).unwrap();
        let m = report.metrics;

        prop_assert_eq!(m.total_orders, current.len() as u64);
        for v in [
            m.total_revenue,
            m.avg_order_value,
            m.previous_period_comparison.revenue,
            m.previous_period_comparison.sales,
            m.previous_period_comparison.avg_order,
            m.previous_period_comparison.orders,
        ] {
            prop_assert!(v.is_finite());
        }
        if current.is_empty() {
            prop_assert_eq!(m.avg_order_value, 0.0);
        }
        if previous.is_empty() {
            prop_assert_eq!(m.previous_period_comparison.revenue, 0.0);
        }

        let trend_sum: f64 = report.sales_trend.iter().map(|p| p.value).sum();
        prop_assert!(close(trend_sum, m.total_revenue), "{} vs {}", trend_sum, m.total_revenue);

        prop_assert!(report.top_products.len() <= 5);
        for pair in report.top_products.windows(2) {
            prop_assert!(pair[0].revenue >= pair[1].revenue);
        }

        if m.total_revenue > 0.0 {
            let pct: f64 = report.revenue_by_category.iter().map(|c| c.percentage).sum();
            prop_assert!(close(pct, 100.0), "{}", pct);
        } else {
            prop_assert!(report.revenue_by_category.is_empty());
        }
    }

    #[test]
    fn explicit_ranges_cover_every_order(
        start in instant(),
        length_s in 0i64..(400 * 86_400),
        current in orders(),
    ) {
        let cal = Calendar::default();
        let end = start + Duration::seconds(length_s);
        let w = resolve(&cal, Utc::now(), None, Some(start), Some(end)).unwrap();
        prop_assert_eq!(w.previous.end, w.start);
        prop_assert_eq!(w.previous.duration(), w.duration());

        let current = materialize(&w, &current);
        let report = compute(&cal, &w, &current, &[], 5).unwrap();

        prop_assert!(!report.sales_trend.is_empty());
        let trend_sum: f64 = report.sales_trend.iter().map(|p| p.value).sum();
        prop_assert!(close(trend_sum, report.metrics.total_revenue));
    }
}
