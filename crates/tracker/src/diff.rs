//! Diffs a fetched incident page against the ledger.

use statuspage::{Incident, IncidentsPage};

use crate::ledger::IncidentLedger;

/// A change worth notifying about.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// Incident id observed for the first time.
    New(Incident),
    /// Known incident whose status token moved.
    StatusChanged {
        /// The incident as currently reported.
        incident: Incident,
        /// Status recorded before this observation.
        previous_status: String,
    },
}

impl ChangeEvent {
    /// The incident this event describes.
    #[must_use]
    pub const fn incident(&self) -> &Incident {
        match self {
            Self::New(incident) | Self::StatusChanged { incident, .. } => incident,
        }
    }
}

/// Records every incident on `page` without emitting events and returns how
/// many were recorded.
///
/// Used for the startup fetch: incidents already on the page are known, not
/// new, so a restart does not replay history into the sink.
pub fn seed(page: IncidentsPage, ledger: &mut IncidentLedger) -> usize {
    let mut seeded = 0;
    for incident in page.incidents {
        let Some(id) = incident.tracking_id() else {
            continue;
        };
        ledger.upsert(id, &incident.status, incident.updated_at.as_deref());
        seeded += 1;
    }
    seeded
}

/// Diffs `page` against `ledger`, emitting events in page order and
/// refreshing the ledger entry for every usable incident.
///
/// Incidents without an id are skipped entirely. A known incident whose
/// status is unchanged produces no event but still has its record
/// refreshed; in particular a new update body posted under the same status
/// is deliberately not reported, keeping notifications to one per status
/// transition.
pub fn detect(page: IncidentsPage, ledger: &mut IncidentLedger) -> Vec<ChangeEvent> {
    let mut events = Vec::new();

    for incident in page.incidents {
        let Some(id) = incident.tracking_id().map(str::to_owned) else {
            continue;
        };

        let previous = ledger.get(&id).map(|record| record.status.clone());
        ledger.upsert(&id, &incident.status, incident.updated_at.as_deref());

        match previous {
            None => events.push(ChangeEvent::New(incident)),
            Some(previous_status) if previous_status != incident.status => {
                events.push(ChangeEvent::StatusChanged { incident, previous_status });
            }
            Some(_) => {}
        }
    }

    events
}
