//! Error map keyed by property name, backed by DashMap

use dashmap::DashMap;

use super::failure::FailureRecord;

/// Fired whenever the failures recorded for a property change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorsChanged {
    /// The property whose failures changed.
    pub property: String,
}

/// Current failures per property.
///
/// A property is present if and only if it has at least one failure. Safe to
/// read from one thread while another writes.
#[derive(Debug, Default)]
pub(crate) struct ErrorMap {
    store: DashMap<String, Vec<FailureRecord>>,
}

impl ErrorMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Failures recorded for `property`; empty if there are none.
    pub fn get(&self, property: &str) -> Vec<FailureRecord> {
        self.store
            .get(property)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Returns `true` if `property` currently has failures.
    pub fn contains(&self, property: &str) -> bool {
        self.store.contains_key(property)
    }

    /// Number of properties with failures.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no property has failures.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Total number of failure records across all properties.
    pub fn failure_count(&self) -> usize {
        self.store.iter().map(|entry| entry.value().len()).sum()
    }

    /// Names of the properties with failures, in no particular order.
    pub fn properties(&self) -> Vec<String> {
        self.store.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Every failure message, flattened, in no particular order.
    pub fn messages(&self) -> Vec<String> {
        self.store
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .map(|record| record.message().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Replace the failures of `property`, returning the previous ones.
    ///
    /// Identical records collapse into one. An empty set removes the entry.
    pub(crate) fn replace(
        &self,
        property: &str,
        records: Vec<FailureRecord>,
    ) -> Option<Vec<FailureRecord>> {
        let mut unique: Vec<FailureRecord> = Vec::with_capacity(records.len());
        for record in records {
            if !unique.contains(&record) {
                unique.push(record);
            }
        }

        if unique.is_empty() {
            self.remove(property)
        } else {
            self.store.insert(property.to_string(), unique)
        }
    }

    /// Keep only the records of `property` matching `keep`, pruning the entry
    /// if none remain. Returns `true` if anything was dropped.
    pub(crate) fn retain<F>(&self, property: &str, keep: F) -> bool
    where
        F: Fn(&FailureRecord) -> bool,
    {
        let dropped = match self.store.get_mut(property) {
            Some(mut entry) => {
                let before = entry.len();
                entry.retain(|record| keep(record));
                entry.len() != before
            }
            None => false,
        };

        if dropped {
            self.store
                .remove_if(property, |_, records| records.is_empty());
        }
        dropped
    }

    pub(crate) fn remove(&self, property: &str) -> Option<Vec<FailureRecord>> {
        self.store.remove(property).map(|(_, records)| records)
    }
}
