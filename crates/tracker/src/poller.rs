//! The poll loop: fetch, diff, notify, sleep, repeat.

use std::{fmt, time::Duration};

use eyre::Result;
use runtime::shutdown::ShutdownToken;
use statuspage::{Client, FetchOutcome, IncidentsPage};
use tracing::{debug, error, info, warn};

use crate::{
    diff,
    ledger::IncidentLedger,
    notify::{self, ComponentDirectory},
    sink::NotificationSink,
};

/// Polls the status page and notifies a sink about incident changes.
///
/// Owns all cycle state: the incident ledger, the component name directory,
/// and one cache validator per monitored resource. Cycles run strictly
/// sequentially; the only suspension points are the bounded fetches and the
/// interruptible sleep between cycles.
pub struct Tracker {
    client: Client,
    sink: Box<dyn NotificationSink>,
    poll_interval: Duration,
    ledger: IncidentLedger,
    directory: ComponentDirectory,
    incidents_etag: Option<String>,
    components_etag: Option<String>,
    cycles: u64,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("poll_interval", &self.poll_interval)
            .field("tracked_incidents", &self.ledger.len())
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl Tracker {
    /// Creates a tracker that delivers one notification per detected change
    /// to `sink`.
    #[must_use]
    pub fn new(client: Client, sink: Box<dyn NotificationSink>, poll_interval: Duration) -> Self {
        Self {
            client,
            sink,
            poll_interval,
            ledger: IncidentLedger::new(),
            directory: ComponentDirectory::default(),
            incidents_etag: None,
            components_etag: None,
            cycles: 0,
        }
    }

    /// Runs until `token` reports shutdown: one seeding pass, then
    /// fetch, detect and notify cycles separated by the poll interval.
    ///
    /// No single cycle failure stops the loop. The error return exists for
    /// the caller's `?`; today every exit path is a clean shutdown.
    pub async fn run(mut self, mut token: ShutdownToken) -> Result<()> {
        if token.is_cancelled() {
            return Ok(());
        }

        self.bootstrap().await;
        info!(interval_secs = self.poll_interval.as_secs(), "watching for status changes");

        loop {
            if token.is_cancelled() {
                break;
            }

            if let Err(err) = self.poll_once().await {
                error!(error = %err, "poll cycle failed");
            }

            tokio::select! {
                () = token.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!(tracked_incidents = self.ledger.len(), "tracker stopped");
        Ok(())
    }

    /// Unconditional first fetch of both resources, recording current
    /// incidents without emitting events.
    ///
    /// Failure is not fatal: starting with an empty ledger just means the
    /// current incidents surface on a later cycle.
    async fn bootstrap(&mut self) {
        match self.client.fetch_incidents(None).await {
            FetchOutcome::Changed { payload, etag } => {
                if let Some(etag) = etag {
                    self.incidents_etag = Some(etag);
                }
                let seeded = diff::seed(payload, &mut self.ledger);
                info!(existing_incidents = seeded, "initialized from status page");
            }
            FetchOutcome::Unchanged => {
                // Unreachable without a validator; treat like an empty page.
                warn!("status page reported not-modified on first fetch");
            }
            FetchOutcome::Failed(err) => {
                warn!(error = %err, "initial incidents fetch failed, starting empty");
            }
        }

        self.refresh_components().await;
    }

    /// One poll cycle: revalidate the incidents resource and push
    /// notifications for whatever changed.
    async fn poll_once(&mut self) -> Result<()> {
        self.cycles += 1;
        debug!(cycle = self.cycles, "checking for updates");

        let page = match self.client.fetch_incidents(self.incidents_etag.as_deref()).await {
            FetchOutcome::Unchanged => {
                debug!(cycle = self.cycles, "incidents unchanged");
                return Ok(());
            }
            FetchOutcome::Changed { payload, etag } => {
                if let Some(etag) = etag {
                    self.incidents_etag = Some(etag);
                }
                payload
            }
            FetchOutcome::Failed(err) => {
                warn!(error = %err, "incidents fetch failed, skipping cycle");
                return Ok(());
            }
        };

        // Component names are only needed when there are changes to render.
        self.refresh_components().await;
        self.process_page(page).await;
        Ok(())
    }

    async fn process_page(&mut self, page: IncidentsPage) {
        let events = diff::detect(page, &mut self.ledger);
        if events.is_empty() {
            debug!("incident document changed without status transitions");
            return;
        }

        info!(changes = events.len(), "detected incident changes");
        for event in &events {
            let notification = notify::render(event, &self.directory);
            if let Err(err) = self.sink.deliver(&notification).await {
                warn!(error = %err, "notification delivery failed");
            }
        }
    }

    /// Best-effort refresh of the component name directory. On failure the
    /// cached directory stays in use; names never seen fall back to raw ids.
    async fn refresh_components(&mut self) {
        match self.client.fetch_components(self.components_etag.as_deref()).await {
            FetchOutcome::Unchanged => {}
            FetchOutcome::Changed { payload, etag } => {
                if let Some(etag) = etag {
                    self.components_etag = Some(etag);
                }
                self.directory = ComponentDirectory::from_page(&payload);
                debug!(components = self.directory.len(), "component directory refreshed");
            }
            FetchOutcome::Failed(err) => {
                warn!(error = %err, "components fetch failed, keeping cached names");
            }
        }
    }
}
