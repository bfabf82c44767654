use rota_core::types::{PersonId, ScheduleId};
use std::collections::HashMap;

use crate::classifier::UnitSplit;

/// Units accrued by one person in one schedule during one computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonScheduleAccrual {
    pub person_id: PersonId,
    pub person_display_name: String,
    pub schedule_id: ScheduleId,
    pub units: UnitSplit,
}

impl PersonScheduleAccrual {
    pub fn is_nonzero(&self) -> bool {
        self.units.weekday_units > 0.0 || self.units.weekend_units > 0.0
    }
}

/// Accumulator keyed by (person, schedule), scoped to a single
/// `attribute` call.
///
/// Entries keep the order in which they were first created.
#[derive(Debug, Default)]
pub struct AccrualLedger {
    entries: Vec<PersonScheduleAccrual>,
    index: HashMap<(PersonId, ScheduleId), usize>,
}

impl AccrualLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `units` to the (person, schedule) entry, creating it on first use.
    pub fn add(
        &mut self,
        person_id: &PersonId,
        person_display_name: &str,
        schedule_id: &ScheduleId,
        units: UnitSplit,
    ) {
        let key = (person_id.clone(), schedule_id.clone());
        let slot = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.entries.push(PersonScheduleAccrual {
                    person_id: person_id.clone(),
                    person_display_name: person_display_name.to_string(),
                    schedule_id: schedule_id.clone(),
                    units: UnitSplit::ZERO,
                });
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[slot].units += units;
    }

    /// Number of (person, schedule) entries, zero ones included.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of schedules in which each person has a nonzero accrual.
    pub fn nonzero_schedule_counts(&self) -> HashMap<&PersonId, usize> {
        let mut counts = HashMap::new();
        for entry in self.entries.iter().filter(|e| e.is_nonzero()) {
            *counts.entry(&entry.person_id).or_insert(0) += 1;
        }
        counts
    }

    /// Consume the ledger, yielding entries in creation order.
    pub fn into_entries(self) -> Vec<PersonScheduleAccrual> {
        self.entries
    }
}
