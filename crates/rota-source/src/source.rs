use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rota_core::types::{AssignmentInterval, Period, PersonId, ScheduleId, ScheduleMetadata};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One on-call entry inside a fetched schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub person_id: PersonId,
    pub person_display_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A schedule as returned by a source: metadata plus its on-call entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcedSchedule {
    #[serde(flatten)]
    pub metadata: ScheduleMetadata,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl SourcedSchedule {
    pub fn id(&self) -> &ScheduleId {
        &self.metadata.id
    }

    /// Entries tagged with this schedule's id.
    pub fn intervals(&self) -> impl Iterator<Item = AssignmentInterval> + '_ {
        self.assignments.iter().map(|a| AssignmentInterval {
            person_id: a.person_id.clone(),
            person_display_name: a.person_display_name.clone(),
            schedule_id: self.metadata.id.clone(),
            start: a.start,
            end: a.end,
        })
    }
}

/// Supplies schedules and their on-call entries for a time window.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch one schedule with the entries overlapping `window`.
    ///
    /// Entries may extend past the window; callers clip them.
    async fn fetch_schedule(&self, id: &ScheduleId, window: Period) -> Result<SourcedSchedule>;
}
