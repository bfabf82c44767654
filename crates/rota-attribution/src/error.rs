use thiserror::Error;

/// Precondition violations detected by the engine.
///
/// Every variant means malformed data slipped past the schedule source's
/// validation. None of them is recoverable for the request at hand.
#[derive(Debug, Error)]
pub enum AttributionError {
    /// `attribute` was called without any schedule.
    #[error("no schedules to attribute")]
    NoSchedules,

    /// Two schedules share the same id.
    #[error("duplicate schedule id: {id}")]
    DuplicateSchedule { id: String },

    /// An interval references a schedule that was not passed in.
    #[error("interval references unknown schedule {schedule_id}")]
    UnknownSchedule { schedule_id: String },

    /// An interval has a blank person id.
    #[error("interval in schedule {schedule_id} has no person id")]
    MissingPerson { schedule_id: String },

    /// An interval ends before it starts.
    #[error("interval for {person_id} in {schedule_id} ends ({end}) before it starts ({start})")]
    InvertedInterval {
        person_id: String,
        schedule_id: String,
        start: String,
        end: String,
    },

    /// Rates must be finite and strictly positive.
    #[error("invalid rates: {0}")]
    InvalidRates(String),

    /// Unparseable IANA timezone in configuration.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}

pub type Result<T> = std::result::Result<T, AttributionError>;
