//! Incident tracking engine: diffs fetched status pages against in-memory
//! state, renders notifications for the changes, and drives the poll loop.

/// Change detection between fetches
pub mod diff;
/// Process-lifetime incident state
pub mod ledger;
/// Notification rendering
pub mod notify;
/// Poll loop orchestration
pub mod poller;
/// Notification delivery targets
pub mod sink;

pub use diff::ChangeEvent;
pub use ledger::{IncidentLedger, IncidentRecord};
pub use notify::{ComponentDirectory, Notification};
pub use poller::Tracker;
pub use sink::{ConsoleSink, NotificationSink};
