use chrono_tz::Tz;
use rota_core::config::TimezonePolicySetting;
use tracing::warn;

use crate::error::{AttributionError, Result};

/// Decides which timezone classifies a segment when several schedules,
/// possibly in different timezones, cover it at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimezonePolicy {
    /// Timezone of the active schedule that comes first in the requested
    /// schedule order.
    #[default]
    FirstActive,
    /// Always this timezone, whatever the schedules say.
    Fixed(Tz),
    /// Always UTC.
    Utc,
}

impl TimezonePolicy {
    pub fn from_setting(setting: &TimezonePolicySetting) -> Result<Self> {
        Ok(match setting {
            TimezonePolicySetting::FirstActive => TimezonePolicy::FirstActive,
            TimezonePolicySetting::Fixed { timezone } => {
                TimezonePolicy::Fixed(parse_timezone(timezone)?)
            }
            TimezonePolicySetting::Utc => TimezonePolicy::Utc,
        })
    }

    /// Pick the classification timezone for a segment.
    ///
    /// `active` holds indices into `zones`, sorted ascending (requested
    /// order). An empty `active` only happens for uncovered segments, which
    /// are never classified; UTC is returned for completeness.
    pub fn resolve(&self, active: &[usize], zones: &[Tz]) -> Tz {
        match self {
            TimezonePolicy::FirstActive => active
                .first()
                .and_then(|&i| zones.get(i).copied())
                .unwrap_or(Tz::UTC),
            TimezonePolicy::Fixed(tz) => *tz,
            TimezonePolicy::Utc => Tz::UTC,
        }
    }
}

/// Config-style name: `first-active`, `fixed:<zone>` or `utc`.
impl std::fmt::Display for TimezonePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimezonePolicy::FirstActive => write!(f, "first-active"),
            TimezonePolicy::Fixed(tz) => write!(f, "fixed:{}", tz.name()),
            TimezonePolicy::Utc => write!(f, "utc"),
        }
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| AttributionError::UnknownTimezone(name.to_string()))
}

/// Parse a schedule's timezone, falling back to UTC when the provider sent
/// a name chrono-tz does not know.
pub fn schedule_timezone(schedule_id: &str, name: &str) -> Tz {
    parse_timezone(name).unwrap_or_else(|_| {
        warn!(schedule_id, timezone = name, "unknown schedule timezone, using UTC");
        Tz::UTC
    })
}
