use futures_util::stream::{self, StreamExt};
use rota_core::types::{AssignmentInterval, Period, ScheduleId, ScheduleMetadata};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::{Result, SourceError};
use crate::source::{ScheduleSource, SourcedSchedule};

/// Schedules that loaded, in requested order, plus the ids that did not.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub schedules: Vec<SourcedSchedule>,
    pub failed: Vec<(ScheduleId, String)>,
}

impl FetchOutcome {
    pub fn metadata(&self) -> Vec<ScheduleMetadata> {
        self.schedules.iter().map(|s| s.metadata.clone()).collect()
    }

    pub fn intervals(&self) -> Vec<AssignmentInterval> {
        self.schedules.iter().flat_map(|s| s.intervals()).collect()
    }
}

/// Fetch every id concurrently, at most `max_concurrency` in flight.
///
/// Duplicate ids are fetched once. A failed fetch is logged and omitted;
/// only when every fetch fails is an error returned. Each loaded schedule
/// is sanitised with [`sanitize`] before it is handed back.
pub async fn fetch_schedules(
    source: &dyn ScheduleSource,
    ids: &[ScheduleId],
    window: Period,
    max_concurrency: usize,
) -> Result<FetchOutcome> {
    let mut seen = HashSet::new();
    let unique: Vec<ScheduleId> = ids.iter().filter(|id| seen.insert(*id)).cloned().collect();

    let results: Vec<_> = stream::iter(unique)
        .map(|id| async move {
            let result = source.fetch_schedule(&id, window).await;
            (id, result)
        })
        .buffered(max_concurrency.max(1))
        .collect()
        .await;

    let attempted = results.len();
    let mut outcome = FetchOutcome::default();
    for (id, result) in results {
        match result {
            Ok(schedule) => outcome.schedules.push(sanitize(&id, schedule, window)),
            Err(e) => {
                warn!(source = source.name(), schedule_id = %id, error = %e, "schedule fetch failed, omitting");
                outcome.failed.push((id, e.to_string()));
            }
        }
    }

    if attempted > 0 && outcome.schedules.is_empty() {
        return Err(SourceError::AllFailed { attempted });
    }

    info!(
        source = source.name(),
        loaded = outcome.schedules.len(),
        failed = outcome.failed.len(),
        "schedule fan-out complete"
    );
    Ok(outcome)
}

/// Make a fetched schedule safe for attribution.
///
/// The schedule id is forced to the requested one, entries are clipped to
/// `window`, and entries that are empty after clipping or have no person id
/// are dropped.
pub fn sanitize(requested: &ScheduleId, mut schedule: SourcedSchedule, window: Period) -> SourcedSchedule {
    if &schedule.metadata.id != requested {
        debug!(requested = %requested, returned = %schedule.metadata.id, "source returned a different schedule id");
        schedule.metadata.id = requested.clone();
    }

    let before = schedule.assignments.len();
    schedule.assignments.retain_mut(|a| {
        if a.person_id.is_empty() {
            return false;
        }
        match window.clip(a.start, a.end) {
            Some((start, end)) => {
                a.start = start;
                a.end = end;
                true
            }
            None => false,
        }
    });
    let dropped = before - schedule.assignments.len();
    if dropped > 0 {
        debug!(schedule_id = %requested, dropped, "dropped empty or out-of-window entries");
    }
    schedule
}
