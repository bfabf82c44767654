//! `rota-attribution` — splits on-call compensation across overlapping schedules.
//!
//! # Overview
//!
//! A person can be on call in several schedules at once. The
//! [`engine::OverlapAttributionEngine`] sweeps each person's assignment
//! boundaries, cuts the timeline into segments with a constant set of active
//! schedules, classifies each segment once, and divides the resulting units
//! equally across the schedules active in it. Summed over all schedules, a
//! person never accrues more or less than they would on a single schedule.
//!
//! | Module       | Role                                                 |
//! |--------------|------------------------------------------------------|
//! | `sweep`      | Boundary sweep producing `ActiveSegment`s            |
//! | `classifier` | Interval → weekday / weekend day-equivalents          |
//! | `timezone`   | Which timezone classifies a multi-schedule segment   |
//! | `ledger`     | Per (person, schedule) accumulator                   |
//! | `engine`     | Orchestration, rate application, report assembly     |

pub mod classifier;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod sweep;
pub mod timezone;

pub use classifier::{CalendarDayClassifier, CompensableUnitClassifier, UnitSplit};
pub use engine::OverlapAttributionEngine;
pub use error::{AttributionError, Result};
pub use timezone::TimezonePolicy;
