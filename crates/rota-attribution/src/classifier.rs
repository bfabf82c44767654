use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

/// Compensable day-equivalents produced by classifying an interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitSplit {
    pub weekday_units: f64,
    pub weekend_units: f64,
}

impl UnitSplit {
    pub const ZERO: UnitSplit = UnitSplit {
        weekday_units: 0.0,
        weekend_units: 0.0,
    };

    pub fn new(weekday_units: f64, weekend_units: f64) -> Self {
        Self {
            weekday_units,
            weekend_units,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.weekday_units == 0.0 && self.weekend_units == 0.0
    }

    /// Equal share of this split for one of `parts` schedules.
    pub fn share(&self, parts: usize) -> UnitSplit {
        let parts = parts.max(1) as f64;
        UnitSplit {
            weekday_units: self.weekday_units / parts,
            weekend_units: self.weekend_units / parts,
        }
    }
}

impl std::ops::AddAssign for UnitSplit {
    fn add_assign(&mut self, rhs: Self) {
        self.weekday_units += rhs.weekday_units;
        self.weekend_units += rhs.weekend_units;
    }
}

/// Turns an on-call interval into weekday / weekend day-equivalents.
///
/// Implementations must be pure: identical inputs always give identical
/// output.
pub trait CompensableUnitClassifier: Send + Sync {
    fn classify(&self, start: DateTime<Utc>, end: DateTime<Utc>, timezone: Tz) -> UnitSplit;
}

/// Default classifier: each local calendar day counts as one unit, prorated
/// by the covered fraction of that day. Days shortened or lengthened by a DST
/// change still total one unit. Saturdays and Sundays in the given
/// timezone are weekend units, every other day is a weekday unit.
#[derive(Debug, Clone)]
pub struct CalendarDayClassifier {
    /// Intervals shorter than this contribute nothing.
    min_duration: Duration,
}

impl Default for CalendarDayClassifier {
    fn default() -> Self {
        Self {
            min_duration: Duration::zero(),
        }
    }
}

impl CalendarDayClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_duration(min_duration: Duration) -> Self {
        Self { min_duration }
    }
}

impl CompensableUnitClassifier for CalendarDayClassifier {
    fn classify(&self, start: DateTime<Utc>, end: DateTime<Utc>, timezone: Tz) -> UnitSplit {
        if end <= start || end - start < self.min_duration {
            return UnitSplit::ZERO;
        }

        let mut split = UnitSplit::ZERO;
        let mut cursor = start;
        while cursor < end {
            let local = cursor.with_timezone(&timezone);
            let day = local.date_naive();
            let day_end = next_local_midnight(day, timezone)
                .filter(|t| *t > cursor)
                .unwrap_or(cursor + Duration::days(1));
            let day_len = local_midnight(day, timezone)
                .filter(|t| *t <= cursor)
                .map(|day_start| day_end - day_start)
                .unwrap_or(Duration::days(1));
            let piece_end = day_end.min(end);

            let units = (piece_end - cursor).num_milliseconds() as f64
                / day_len.num_milliseconds() as f64;
            match local.weekday() {
                Weekday::Sat | Weekday::Sun => split.weekend_units += units,
                _ => split.weekday_units += units,
            }
            cursor = piece_end;
        }
        split
    }
}

/// Start of the local day `day`, as a UTC instant.
///
/// A few zones skip midnight on DST transitions; the first existing local
/// time within the next two hours is used instead.
fn local_midnight(day: NaiveDate, timezone: Tz) -> Option<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    (0..=2).find_map(|h| {
        timezone
            .from_local_datetime(&(midnight + Duration::hours(h)))
            .earliest()
            .map(|t| t.with_timezone(&Utc))
    })
}

/// Start of the local day after `day`.
fn next_local_midnight(day: NaiveDate, timezone: Tz) -> Option<DateTime<Utc>> {
    local_midnight(day.succ_opt()?, timezone)
}
