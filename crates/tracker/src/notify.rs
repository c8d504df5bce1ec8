//! Renders change events into human-readable notifications.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use statuspage::{ComponentsPage, Incident};

use crate::diff::ChangeEvent;

/// Display timestamp layout, `YYYY-MM-DD HH:MM:SS` in UTC.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Product label used when an incident lists no affected components.
pub const FALLBACK_PRODUCTS: &str = "general services";

/// Message used when an incident carries no update bodies.
pub const FALLBACK_MESSAGE: &str = "No status message available";

/// Lookup from component id to display name, built from the components
/// resource and cached by the poller between refreshes.
#[derive(Debug, Clone, Default)]
pub struct ComponentDirectory {
    names: HashMap<String, String>,
}

impl ComponentDirectory {
    /// Builds a directory from a fetched components page.
    ///
    /// Entries without an id cannot be addressed and are dropped; entries
    /// without a name are dropped too, leaving lookups for them to fall
    /// back to the raw id.
    #[must_use]
    pub fn from_page(page: &ComponentsPage) -> Self {
        let names = page
            .components
            .iter()
            .filter_map(|component| {
                let id = component.id.clone()?;
                let name = component.name.clone()?;
                Some((id, name))
            })
            .collect();
        Self { names }
    }

    /// Display name for `id`, when the directory knows one.
    #[must_use]
    pub fn name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Number of components the directory can name.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the directory can name anything at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A rendered notification, ready for delivery to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Display timestamp of the change.
    pub timestamp: String,
    /// Comma-joined names of the affected components.
    pub products: String,
    /// Latest status message of the incident.
    pub message: String,
}

/// Projects a change event into a displayable notification.
///
/// Pure rendering: no network access and no state mutation, so the same
/// event and directory always produce the same notification.
#[must_use]
pub fn render(event: &ChangeEvent, directory: &ComponentDirectory) -> Notification {
    let incident = event.incident();

    Notification {
        timestamp: display_timestamp(incident.updated_at.as_deref()),
        products: product_names(incident, directory),
        message: incident.latest_update_body().unwrap_or(FALLBACK_MESSAGE).to_owned(),
    }
}

/// Resolves the affected components to display names. An embedded name wins
/// over the directory, the directory wins over the raw id.
fn product_names(incident: &Incident, directory: &ComponentDirectory) -> String {
    if incident.components.is_empty() {
        return FALLBACK_PRODUCTS.to_owned();
    }

    incident
        .components
        .iter()
        .map(|component| {
            component
                .name()
                .or_else(|| directory.name(component.id()))
                .unwrap_or_else(|| component.id())
                .to_owned()
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats an upstream RFC 3339 timestamp as UTC wall time. Unparseable
/// values pass through verbatim; an absent value falls back to the current
/// time so the notification always carries a timestamp.
fn display_timestamp(updated_at: Option<&str>) -> String {
    match updated_at.filter(|raw| !raw.is_empty()) {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_or_else(|_| raw.to_owned(), |ts| {
                ts.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string()
            }),
        None => Utc::now().format(TIMESTAMP_FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statuspage::ComponentRef;

    fn directory(entries: &[(&str, &str)]) -> ComponentDirectory {
        let page = ComponentsPage {
            components: entries
                .iter()
                .map(|(id, name)| statuspage::Component {
                    id: Some((*id).to_owned()),
                    name: Some((*name).to_owned()),
                })
                .collect(),
        };
        ComponentDirectory::from_page(&page)
    }

    fn incident_with_components(components: Vec<ComponentRef>) -> Incident {
        Incident {
            id: Some("abc".to_owned()),
            status: "investigating".to_owned(),
            updated_at: Some("2024-01-01T12:30:45Z".to_owned()),
            components,
            incident_updates: Vec::new(),
        }
    }

    #[test]
    fn directory_drops_unaddressable_entries() {
        let page = ComponentsPage {
            components: vec![
                statuspage::Component { id: Some("c1".to_owned()), name: Some("API".to_owned()) },
                statuspage::Component { id: None, name: Some("Orphan".to_owned()) },
                statuspage::Component { id: Some("c2".to_owned()), name: None },
            ],
        };

        let directory = ComponentDirectory::from_page(&page);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.name("c1"), Some("API"));
        assert_eq!(directory.name("c2"), None);
    }

    #[test]
    fn no_components_uses_fallback_label() {
        let event = ChangeEvent::New(incident_with_components(vec![]));
        let note = render(&event, &ComponentDirectory::default());
        assert_eq!(note.products, FALLBACK_PRODUCTS);
    }

    #[test]
    fn directory_names_win_over_raw_ids() {
        let event = ChangeEvent::New(incident_with_components(vec![
            ComponentRef::Id("c1".to_owned()),
            ComponentRef::Id("c-unknown".to_owned()),
        ]));

        let note = render(&event, &directory(&[("c1", "API")]));
        assert_eq!(note.products, "API, c-unknown");
    }

    #[test]
    fn embedded_names_win_over_directory() {
        let event = ChangeEvent::New(incident_with_components(vec![ComponentRef::Named {
            id: "c1".to_owned(),
            name: Some("Embedded".to_owned()),
        }]));

        let note = render(&event, &directory(&[("c1", "Directory")]));
        assert_eq!(note.products, "Embedded");
    }

    #[test]
    fn missing_update_body_uses_fallback_message() {
        let event = ChangeEvent::New(incident_with_components(vec![]));
        let note = render(&event, &ComponentDirectory::default());
        assert_eq!(note.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn latest_update_body_becomes_the_message() {
        let mut incident = incident_with_components(vec![]);
        incident.incident_updates = vec![
            statuspage::IncidentUpdate { body: Some("Mitigated.".to_owned()) },
            statuspage::IncidentUpdate { body: Some("Investigating.".to_owned()) },
        ];

        let note = render(&ChangeEvent::New(incident), &ComponentDirectory::default());
        assert_eq!(note.message, "Mitigated.");
    }

    #[test]
    fn rfc3339_timestamp_renders_as_utc_wall_time() {
        let event = ChangeEvent::New(incident_with_components(vec![]));
        let note = render(&event, &ComponentDirectory::default());
        assert_eq!(note.timestamp, "2024-01-01 12:30:45");
    }

    #[test]
    fn offset_timestamp_is_converted_to_utc() {
        let mut incident = incident_with_components(vec![]);
        incident.updated_at = Some("2024-01-01T05:00:00-05:00".to_owned());

        let note = render(&ChangeEvent::New(incident), &ComponentDirectory::default());
        assert_eq!(note.timestamp, "2024-01-01 10:00:00");
    }

    #[test]
    fn unparseable_timestamp_passes_through() {
        let mut incident = incident_with_components(vec![]);
        incident.updated_at = Some("yesterday-ish".to_owned());

        let note = render(&ChangeEvent::New(incident), &ComponentDirectory::default());
        assert_eq!(note.timestamp, "yesterday-ish");
    }

    #[test]
    fn absent_timestamp_falls_back_to_now() {
        let mut incident = incident_with_components(vec![]);
        incident.updated_at = None;

        let note = render(&ChangeEvent::New(incident), &ComponentDirectory::default());
        // The fallback is wall-clock time, so only check the layout.
        assert!(chrono::NaiveDateTime::parse_from_str(&note.timestamp, TIMESTAMP_FORMAT).is_ok());
    }
}
