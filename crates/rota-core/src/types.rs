use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RotaError};

/// Standard weekday rate applied when neither the request nor the config sets one.
pub const DEFAULT_WEEKDAY_RATE: f64 = 50.0;
/// Standard weekend rate applied when neither the request nor the config sets one.
pub const DEFAULT_WEEKEND_RATE: f64 = 75.0;

/// Identifier of a schedule in the external scheduling provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(pub String);

impl ScheduleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ScheduleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ScheduleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of an on-call person in the external scheduling provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Descriptive data for one schedule, loaded once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMetadata {
    pub id: ScheduleId,
    pub display_name: String,
    /// Link to the schedule in the provider's web UI.
    pub external_url: String,
    /// IANA timezone name, e.g. `Europe/Paris`.
    pub timezone: String,
}

/// One stretch of on-call duty for one person in one schedule.
///
/// The interval is half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInterval {
    pub person_id: PersonId,
    pub person_display_name: String,
    pub schedule_id: ScheduleId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AssignmentInterval {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Per-day-equivalent compensation rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rates {
    pub weekday_rate: f64,
    pub weekend_rate: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            weekday_rate: DEFAULT_WEEKDAY_RATE,
            weekend_rate: DEFAULT_WEEKEND_RATE,
        }
    }
}

impl Rates {
    pub fn new(weekday_rate: f64, weekend_rate: f64) -> Self {
        Self {
            weekday_rate,
            weekend_rate,
        }
    }

    /// Both rates must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("weekdayRate", self.weekday_rate),
            ("weekendRate", self.weekend_rate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RotaError::InvalidRequest(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// One person's line in a schedule report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCompensationLine {
    pub person_id: PersonId,
    pub person_display_name: String,
    /// Currency amount, rounded to 2 decimals.
    pub total_compensation: f64,
    /// Rounded to 2 decimals.
    pub weekday_units: f64,
    /// Rounded to 2 decimals.
    pub weekend_units: f64,
    /// True iff the person accrued time in more than one requested schedule.
    pub is_overlapping: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCompensationReport {
    pub metadata: ScheduleMetadata,
    pub employees: Vec<EmployeeCompensationLine>,
}

/// The `[start, end)` window a computation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(RotaError::InvalidRequest(format!(
                "endDate ({end}) must be after startDate ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Clamp `[start, end)` to this period. Returns `None` if nothing remains.
    pub fn clip(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let s = start.max(self.start);
        let e = end.min(self.end);
        (s < e).then_some((s, e))
    }
}
