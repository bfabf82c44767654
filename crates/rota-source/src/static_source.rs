use async_trait::async_trait;
use rota_core::types::{Period, ScheduleId};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::{Result, SourceError};
use crate::source::{ScheduleSource, SourcedSchedule};

/// Serves schedules held in memory, e.g. loaded from a JSON fixture.
///
/// Entries are returned as stored; window clipping happens in the fan-out.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    schedules: HashMap<ScheduleId, SourcedSchedule>,
}

impl StaticSource {
    pub fn new(schedules: Vec<SourcedSchedule>) -> Self {
        Self {
            schedules: schedules
                .into_iter()
                .map(|s| (s.metadata.id.clone(), s))
                .collect(),
        }
    }

    /// Load a JSON array of schedules.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let schedules: Vec<SourcedSchedule> =
            serde_json::from_str(&raw).map_err(|e| SourceError::Parse(e.to_string()))?;
        info!(path = %path.display(), count = schedules.len(), "loaded static schedules");
        Ok(Self::new(schedules))
    }
}

#[async_trait]
impl ScheduleSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_schedule(&self, id: &ScheduleId, _window: Period) -> Result<SourcedSchedule> {
        self.schedules
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound { id: id.to_string() })
    }
}
