use chrono_tz::Tz;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rota_core::types::{
    AssignmentInterval, EmployeeCompensationLine, PersonId, Rates, ScheduleCompensationReport,
    ScheduleId, ScheduleMetadata,
};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

use crate::{
    classifier::{CompensableUnitClassifier, UnitSplit},
    error::{AttributionError, Result},
    ledger::AccrualLedger,
    sweep::{sweep, Span},
    timezone::{schedule_timezone, TimezonePolicy},
};

/// Splits each person's compensable time across the schedules covering it.
///
/// Stateless between calls: every `attribute` builds its own ledger, so one
/// engine can be shared by concurrent requests.
pub struct OverlapAttributionEngine {
    classifier: Box<dyn CompensableUnitClassifier>,
    policy: TimezonePolicy,
}

impl OverlapAttributionEngine {
    pub fn new(classifier: Box<dyn CompensableUnitClassifier>, policy: TimezonePolicy) -> Self {
        Self { classifier, policy }
    }

    pub fn policy(&self) -> TimezonePolicy {
        self.policy
    }

    /// Produce one report per schedule, in the order `schedules` were given.
    ///
    /// Zero-length intervals are ignored. Any other malformed interval is an
    /// error: the schedule source is expected to have filtered it out.
    pub fn attribute(
        &self,
        schedules: &[ScheduleMetadata],
        intervals: &[AssignmentInterval],
        rates: Rates,
    ) -> Result<Vec<ScheduleCompensationReport>> {
        if schedules.is_empty() {
            return Err(AttributionError::NoSchedules);
        }
        rates
            .validate()
            .map_err(|e| AttributionError::InvalidRates(e.to_string()))?;

        let mut position: HashMap<&ScheduleId, usize> = HashMap::with_capacity(schedules.len());
        for (i, schedule) in schedules.iter().enumerate() {
            if position.insert(&schedule.id, i).is_some() {
                return Err(AttributionError::DuplicateSchedule {
                    id: schedule.id.to_string(),
                });
            }
        }
        let zones: Vec<Tz> = schedules
            .iter()
            .map(|s| schedule_timezone(s.id.as_str(), &s.timezone))
            .collect();

        let people = group_by_person(intervals, &position)?;

        let mut ledger = AccrualLedger::new();
        for person in &people {
            for segment in sweep(&person.spans) {
                let timezone = self.policy.resolve(&segment.active, &zones);
                let units = self.classifier.classify(segment.start, segment.end, timezone);
                let share = units.share(segment.active.len());
                for &i in &segment.active {
                    ledger.add(
                        person.id,
                        person.display_name,
                        &schedules[i].id,
                        share,
                    );
                }
            }
        }
        debug!(
            people = people.len(),
            accruals = ledger.entry_count(),
            "overlap attribution complete"
        );

        Ok(build_reports(schedules, ledger, rates))
    }
}

struct PersonSpans<'a> {
    id: &'a PersonId,
    display_name: &'a str,
    spans: Vec<Span>,
}

/// Validate intervals and group them by person in order of first appearance.
fn group_by_person<'a>(
    intervals: &'a [AssignmentInterval],
    position: &HashMap<&ScheduleId, usize>,
) -> Result<Vec<PersonSpans<'a>>> {
    let mut people: Vec<PersonSpans<'a>> = Vec::new();
    let mut slot: HashMap<&PersonId, usize> = HashMap::new();

    for interval in intervals {
        let schedule = *position.get(&interval.schedule_id).ok_or_else(|| {
            AttributionError::UnknownSchedule {
                schedule_id: interval.schedule_id.to_string(),
            }
        })?;
        if interval.person_id.is_empty() {
            return Err(AttributionError::MissingPerson {
                schedule_id: interval.schedule_id.to_string(),
            });
        }
        if interval.start > interval.end {
            return Err(AttributionError::InvertedInterval {
                person_id: interval.person_id.to_string(),
                schedule_id: interval.schedule_id.to_string(),
                start: interval.start.to_rfc3339(),
                end: interval.end.to_rfc3339(),
            });
        }
        if interval.is_empty() {
            continue;
        }

        let i = *slot.entry(&interval.person_id).or_insert_with(|| {
            people.push(PersonSpans {
                id: &interval.person_id,
                display_name: &interval.person_display_name,
                spans: Vec::new(),
            });
            people.len() - 1
        });
        people[i].spans.push(Span {
            schedule,
            start: interval.start,
            end: interval.end,
        });
    }
    Ok(people)
}

fn build_reports(
    schedules: &[ScheduleMetadata],
    ledger: AccrualLedger,
    rates: Rates,
) -> Vec<ScheduleCompensationReport> {
    let overlap: HashMap<PersonId, bool> = ledger
        .nonzero_schedule_counts()
        .into_iter()
        .map(|(person, n)| (person.clone(), n > 1))
        .collect();

    let mut employees: HashMap<ScheduleId, Vec<EmployeeCompensationLine>> = HashMap::new();
    for accrual in ledger.into_entries().into_iter().filter(|a| a.is_nonzero()) {
        let units = accrual.units;
        let is_overlapping = overlap.get(&accrual.person_id).copied().unwrap_or(false);
        employees
            .entry(accrual.schedule_id)
            .or_default()
            .push(EmployeeCompensationLine {
                person_id: accrual.person_id,
                person_display_name: accrual.person_display_name,
                total_compensation: compensation(units, rates),
                weekday_units: round_cents(units.weekday_units),
                weekend_units: round_cents(units.weekend_units),
                is_overlapping,
            });
    }

    schedules
        .iter()
        .map(|metadata| ScheduleCompensationReport {
            metadata: metadata.clone(),
            employees: employees.remove(&metadata.id).unwrap_or_default(),
        })
        .collect()
}

/// Units times rates, rounded half-up to cents.
///
/// The product is taken in decimal so `0.5 * 2.01` is exactly `1.005`
/// and rounds to `1.01`. Amounts too large for `Decimal` stay in `f64`.
fn compensation(units: UnitSplit, rates: Rates) -> f64 {
    match decimal_compensation(units, rates).and_then(|d| to_cents(d).to_f64()) {
        Some(amount) => amount,
        None => round_cents(units.weekday_units * rates.weekday_rate + units.weekend_units * rates.weekend_rate),
    }
}

/// Round half-up to 2 decimals. Values here are never negative.
///
/// Works on the shortest decimal form of `value`, so `1.005` becomes `1.01`
/// even though the nearest `f64` sits just below the midpoint.
pub fn round_cents(value: f64) -> f64 {
    to_decimal(value)
        .and_then(|d| to_cents(d).to_f64())
        .unwrap_or(value)
}

fn decimal_compensation(units: UnitSplit, rates: Rates) -> Option<Decimal> {
    let weekday = to_decimal(units.weekday_units)?.checked_mul(to_decimal(rates.weekday_rate)?)?;
    let weekend = to_decimal(units.weekend_units)?.checked_mul(to_decimal(rates.weekend_rate)?)?;
    weekday.checked_add(weekend)
}

fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
