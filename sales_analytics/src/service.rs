//! Request handling: authorization, parameter parsing, concurrent fetches and
//! mapping failures onto the three response classes the API exposes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use transaction_store::{StoreError, TransactionStore, models::CallerId};

use crate::{
    calendar::{Calendar, add_days},
    items::DEFAULT_TOP_PRODUCTS,
    report::{SalesReport, compute},
    timeframe::Timeframe,
    tz::{parse_date, parse_ts_to_utc},
    window::{WindowError, resolve},
};

/// Query parameters of a report request.
///
/// `start` and `end` are RFC 3339 instants or bare `YYYY-MM-DD` dates. A bare
/// date means the start of that local day for `start` and its last instant for
/// `end`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportRequest {
    pub timeframe: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Failure classes visible to API consumers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized => 401,
            ApiError::BadRequest(_) => 400,
            ApiError::Internal => 500,
        }
    }

    /// JSON body `{"error": <message>}`.
    pub fn body(&self) -> serde_json::Value {
        json!({ "error": self.to_string() })
    }
}

/// Internal failures of the report pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Window(e @ WindowError::InvalidRange { .. }) => {
                ApiError::BadRequest(e.to_string())
            }
            other => {
                tracing::error!(error = %other, "sales report failed");
                ApiError::Internal
            }
        }
    }
}

/// Calendar and presentation settings applied to every report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    pub calendar: Calendar,
    pub top_products: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            calendar: Calendar::default(),
            top_products: DEFAULT_TOP_PRODUCTS,
        }
    }
}

/// Produces [`SalesReport`]s for authenticated callers.
#[derive(Clone)]
pub struct SalesReportService {
    store: Arc<dyn TransactionStore>,
    settings: ReportSettings,
}

impl SalesReportService {
    pub fn new(store: Arc<dyn TransactionStore>, settings: ReportSettings) -> Self {
        Self { store, settings }
    }

    /// Build a report relative to the current instant.
    pub async fn report(
        &self,
        caller: Option<&CallerId>,
        req: &ReportRequest,
    ) -> Result<SalesReport, ApiError> {
        self.report_at(caller, req, Utc::now()).await
    }

    /// Build a report with `now` as the reference instant for named timeframes.
    pub async fn report_at(
        &self,
        caller: Option<&CallerId>,
        req: &ReportRequest,
        now: DateTime<Utc>,
    ) -> Result<SalesReport, ApiError> {
        let caller = caller.ok_or(ApiError::Unauthorized)?;

        let (timeframe, start, end) = match (req.start.as_deref(), req.end.as_deref()) {
            (Some(start), Some(end)) => {
                let cal = &self.settings.calendar;
                (
                    None,
                    Some(parse_bound(cal, start, Bound::Start)?),
                    Some(parse_bound(cal, end, Bound::End)?),
                )
            }
            _ => (
                Some(Timeframe::parse_or_default(req.timeframe.as_deref())),
                None,
                None,
            ),
        };

        Ok(self.build(caller, now, timeframe, start, end).await?)
    }

    #[tracing::instrument(skip(self, now), fields(caller = %caller))]
    async fn build(
        &self,
        caller: &CallerId,
        now: DateTime<Utc>,
        timeframe: Option<Timeframe>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<SalesReport, ReportError> {
        let cal = &self.settings.calendar;
        let window = resolve(cal, now, timeframe, start, end)?;

        let (current, previous) = tokio::try_join!(
            self.store.fetch_range(caller, window.current()),
            self.store.fetch_range(caller, window.previous),
        )?;
        tracing::debug!(
            current = current.len(),
            previous = previous.len(),
            "fetched transactions"
        );

        let report = compute(cal, &window, &current, &previous, self.settings.top_products)?;
        tracing::info!(
            total_revenue = report.metrics.total_revenue,
            total_orders = report.metrics.total_orders,
            "sales report built"
        );
        Ok(report)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

fn parse_bound(cal: &Calendar, raw: &str, bound: Bound) -> Result<DateTime<Utc>, ApiError> {
    let ts_err = match parse_ts_to_utc(raw) {
        Ok(ts) => return Ok(ts),
        Err(e) => e,
    };
    let date = parse_date(raw).map_err(|_| ApiError::BadRequest(format!("{ts_err:#}")))?;
    let instant = match bound {
        Bound::Start => cal.start_of(date),
        Bound::End => add_days(date, 1)
            .and_then(|next| cal.span(date, next))
            .map(|span| span.end),
    };
    instant.map_err(|e| ApiError::BadRequest(e.to_string()))
}
