use crate::domain::model::Location;
use std::collections::HashMap;

/// Everything seen for one canonical value during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceRecord {
    pub value: String,
    pub occurrences: u32,
    /// Every location that produced the value; the first entry is the original.
    pub locations: Vec<Location>,
}

impl OccurrenceRecord {
    pub fn first_location(&self) -> &Location {
        &self.locations[0]
    }
}

/// Result of observing one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub is_first: bool,
    pub occurrence: u32,
    pub first_location: Location,
}

/// Canonical value -> occurrence record, owned by a single run.
#[derive(Debug, Default)]
pub struct OccurrenceTracker {
    records: HashMap<String, OccurrenceRecord>,
}

impl OccurrenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, value: String, location: Location) -> Observation {
        match self.records.get_mut(&value) {
            Some(record) => {
                record.occurrences += 1;
                record.locations.push(location);
                Observation {
                    is_first: false,
                    occurrence: record.occurrences,
                    first_location: record.first_location().clone(),
                }
            }
            None => {
                let observation = Observation {
                    is_first: true,
                    occurrence: 1,
                    first_location: location.clone(),
                };
                self.records.insert(
                    value.clone(),
                    OccurrenceRecord {
                        value,
                        occurrences: 1,
                        locations: vec![location],
                    },
                );
                observation
            }
        }
    }

    pub fn get(&self, value: &str) -> Option<&OccurrenceRecord> {
        self.records.get(value)
    }

    /// Number of distinct canonical values.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values seen more than once.
    pub fn repeated_values(&self) -> usize {
        self.records.values().filter(|r| r.occurrences > 1).count()
    }
}
