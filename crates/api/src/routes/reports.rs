//! Sales report handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::instrument;

use kasir_core::{RangeError, TimeRange, start_of_day};

use crate::error::{AppError, Result};
use crate::models::Report;
use crate::services::ReportError;
use crate::state::AppState;

/// Report query parameters.
///
/// Bounds are RFC 3339 instants or `YYYY-MM-DD` dates in the report
/// timezone. A date `end` covers that whole day.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(alias = "start_date")]
    pub start: Option<String>,
    #[serde(alias = "end_date")]
    pub end: Option<String>,
    /// Include per-product rows (default: true).
    pub breakdown: Option<bool>,
}

/// Which side of the range a bound is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

/// A parsed bound and whether it was given as a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedBound {
    at: DateTime<Utc>,
    date: bool,
}

/// Report over an explicit range, or over today when no bounds are given.
#[instrument(skip(state, query))]
pub async fn range(
    State(state): State<AppState>,
    query: std::result::Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<Report>> {
    let Query(query) = query?;
    let breakdown = query.breakdown.unwrap_or(true);
    let reports = state.reports();

    let report = match (query.start.as_deref(), query.end.as_deref()) {
        (None, None) => reports.report_today(breakdown).await?,
        (Some(start), Some(end)) => {
            let tz = state.report_timezone();
            let start = parse_bound(start, Bound::Start, tz)?;
            let end = parse_bound(end, Bound::End, tz)?;
            reports.report(bounded_range(start, end)?, breakdown).await?
        }
        _ => {
            return Err(AppError::BadRequest(
                "start and end must be given together".to_string(),
            ));
        }
    };

    Ok(Json(report))
}

/// Report over the current day in the report timezone.
#[instrument(skip(state, query))]
pub async fn today(
    State(state): State<AppState>,
    query: std::result::Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<Report>> {
    let Query(query) = query?;
    let report = state
        .reports()
        .report_today(query.breakdown.unwrap_or(true))
        .await?;
    Ok(Json(report))
}

/// Build the report range. A date `end` names a whole day, so the range
/// must reach into that day.
fn bounded_range(start: ParsedBound, end: ParsedBound) -> Result<TimeRange> {
    let range = TimeRange::new(start.at, end.at).map_err(ReportError::from)?;
    if end.date && range.is_empty() {
        return Err(ReportError::from(RangeError::Inverted {
            start: start.at,
            end: end.at,
        })
        .into());
    }
    Ok(range)
}

/// Parse a range bound as an RFC 3339 instant or a local calendar date.
fn parse_bound(raw: &str, bound: Bound, tz: Tz) -> Result<ParsedBound> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ParsedBound {
            at: instant.with_timezone(&Utc),
            date: false,
        });
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!(
            "invalid date '{raw}': expected YYYY-MM-DD or an RFC 3339 timestamp"
        ))
    })?;
    let day = match bound {
        Bound::Start => date,
        Bound::End => date
            .succ_opt()
            .ok_or_else(|| AppError::BadRequest(format!("date '{raw}' is out of range")))?,
    };
    Ok(ParsedBound {
        at: start_of_day(day, tz).map_err(ReportError::from)?,
        date: true,
    })
}
