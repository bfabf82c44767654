//! Compensation endpoint — POST /api/v1/compensation
//!
//! Request:
//! `{"scheduleIds": ["P1", "P2"], "startDate": "2026-01-01", "endDate": "2026-01-31",
//!   "rates": {"weekdayRate": 50, "weekendRate": 75}}`
//!
//! `rates` is optional; the configured standard rates apply without it.
//! Dates accept RFC 3339 instants or plain `YYYY-MM-DD` dates (UTC). A plain
//! `endDate` includes that whole day.
//!
//! Response: `{"reports": [...], "period": {"start": "...", "end": "..."}}`
//! Error:    `{"error": "...", "code": "..."}`

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Days, NaiveDate, Utc};
use rota_core::types::{Period, Rates, ScheduleCompensationReport, ScheduleId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::error::HttpError;
use crate::app::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationRequest {
    #[serde(default)]
    pub schedule_ids: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub rates: Option<Rates>,
}

#[derive(Debug, Serialize)]
pub struct CompensationResponse {
    pub reports: Vec<ScheduleCompensationReport>,
    pub period: Period,
}

/// POST /api/v1/compensation — per-schedule, per-person compensation.
pub async fn compensation_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompensationRequest>, JsonRejection>,
) -> Result<Json<CompensationResponse>, HttpError> {
    let Json(req) = payload.map_err(|e| HttpError::bad_request(e.body_text()))?;

    let schedule_ids: Vec<ScheduleId> = req
        .schedule_ids
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(ScheduleId::from)
        .collect();
    if schedule_ids.is_empty() {
        return Err(HttpError::bad_request("scheduleIds must contain at least one id"));
    }

    let start = parse_date(&req.start_date, "startDate", false)?;
    let end = parse_date(&req.end_date, "endDate", true)?;
    let period = Period::new(start, end)?;

    let rates = req
        .rates
        .unwrap_or_else(|| state.config.rates.as_rates());
    rates.validate()?;

    let outcome = rota_source::fetch_schedules(
        state.source.as_ref(),
        &schedule_ids,
        period,
        state.config.source.max_concurrent_fetches,
    )
    .await?;

    let reports = state
        .engine
        .attribute(&outcome.metadata(), &outcome.intervals(), rates)?;

    info!(
        requested = schedule_ids.len(),
        reported = reports.len(),
        omitted = outcome.failed.len(),
        "compensation computed"
    );
    Ok(Json(CompensationResponse { reports, period }))
}

/// Parse an RFC 3339 instant or a plain date. A plain date is midnight UTC,
/// or the following midnight when `end_of_day` is set.
fn parse_date(raw: &str, field: &str, end_of_day: bool) -> Result<DateTime<Utc>, HttpError> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        HttpError::bad_request(format!("{field} must be an ISO 8601 date or date-time, got {raw:?}"))
    })?;
    let day = if end_of_day {
        day.checked_add_days(Days::new(1))
    } else {
        Some(day)
    };
    day.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
        .ok_or_else(|| HttpError::bad_request(format!("{field} is out of range")))
}
