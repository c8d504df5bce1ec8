//! In-memory record of every incident observed so far.

use std::collections::HashMap;

/// Last-seen snapshot of a single incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentRecord {
    /// Status token at the most recent observation.
    pub status: String,
    /// Upstream `updated_at` value at the most recent observation.
    pub last_updated: Option<String>,
}

/// Tracks every incident id seen during this process's lifetime, keyed by
/// incident id.
///
/// Entries are never evicted. An incident that drops off the feed keeps its
/// record, so a later reappearance under the same id is not misreported as
/// new. The population grows by a handful of entries per real-world
/// incident, so unbounded retention is fine.
#[derive(Debug, Default)]
pub struct IncidentLedger {
    records: HashMap<String, IncidentRecord>,
}

impl IncidentLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` has been observed before.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Last-seen snapshot for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IncidentRecord> {
        self.records.get(id)
    }

    /// Records or overwrites the snapshot for `id`.
    pub fn upsert(&mut self, id: &str, status: &str, updated_at: Option<&str>) {
        self.records.insert(
            id.to_owned(),
            IncidentRecord {
                status: status.to_owned(),
                last_updated: updated_at.map(str::to_owned),
            },
        );
    }

    /// Number of distinct incidents observed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no incident has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_get_round_trips() {
        let mut ledger = IncidentLedger::new();
        assert!(ledger.is_empty());

        ledger.upsert("abc", "investigating", Some("2024-01-01T00:00:00Z"));

        assert!(ledger.contains("abc"));
        assert_eq!(ledger.len(), 1);
        let record = ledger.get("abc").unwrap();
        assert_eq!(record.status, "investigating");
        assert_eq!(record.last_updated.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn upsert_overwrites_existing_record() {
        let mut ledger = IncidentLedger::new();
        ledger.upsert("abc", "investigating", None);
        ledger.upsert("abc", "resolved", Some("2024-01-02T00:00:00Z"));

        assert_eq!(ledger.len(), 1);
        let record = ledger.get("abc").unwrap();
        assert_eq!(record.status, "resolved");
        assert_eq!(record.last_updated.as_deref(), Some("2024-01-02T00:00:00Z"));
    }

    #[test]
    fn unknown_id_is_absent() {
        let ledger = IncidentLedger::new();
        assert!(!ledger.contains("missing"));
        assert!(ledger.get("missing").is_none());
    }
}
