//! `rota-source` — fetches on-call schedules from the scheduling provider.
//!
//! [`source::ScheduleSource`] is the seam: [`pagerduty::PagerDutySource`]
//! talks to the PagerDuty REST API, [`static_source::StaticSource`] serves
//! schedules held in memory. [`fanout::fetch_schedules`] queries many
//! schedule ids concurrently and drops the ones that fail.

pub mod error;
pub mod fanout;
pub mod pagerduty;
pub mod source;
pub mod static_source;

pub use error::{Result, SourceError};
pub use fanout::{fetch_schedules, FetchOutcome};
pub use pagerduty::PagerDutySource;
pub use source::{Assignment, ScheduleSource, SourcedSchedule};
pub use static_source::StaticSource;
