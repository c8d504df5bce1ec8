use serde::Deserialize;

fn unknown_status() -> String {
    "unknown".to_owned()
}

/// Document returned by the incidents resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentsPage {
    /// Tracked incidents, most recently updated first.
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

/// Document returned by the components resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentsPage {
    /// Components declared by the page.
    #[serde(default)]
    pub components: Vec<Component>,
}

/// A tracked service disruption with a lifecycle of status values and a log
/// of textual updates.
#[derive(Debug, Clone, Deserialize)]
pub struct Incident {
    /// Unique identifier, stable across polls. Entries without one are
    /// malformed and skipped by the detector.
    #[serde(default)]
    pub id: Option<String>,
    /// Lifecycle status token, e.g. `investigating` or `resolved`. Upstream
    /// may introduce values we have never seen, so this stays a plain
    /// string compared by equality.
    #[serde(default = "unknown_status")]
    pub status: String,
    /// Last-modified timestamp as reported upstream (ISO 8601). Display
    /// only; the detector never orders by it.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Affected components.
    #[serde(default)]
    pub components: Vec<ComponentRef>,
    /// Update log, most recent entry first.
    #[serde(default)]
    pub incident_updates: Vec<IncidentUpdate>,
}

impl Incident {
    /// Identifier used for change tracking, if the entry carries a usable
    /// one. Empty ids count as missing.
    pub fn tracking_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Body of the most recent update, when one exists.
    pub fn latest_update_body(&self) -> Option<&str> {
        self.incident_updates.first().and_then(|update| update.body.as_deref())
    }
}

/// One entry of an incident's update log.
#[derive(Debug, Clone, Deserialize)]
pub struct IncidentUpdate {
    /// Update text shown to subscribers.
    #[serde(default)]
    pub body: Option<String>,
}

/// Reference from an incident to an affected component.
///
/// The wire format mixes bare id strings with embedded component objects;
/// both shapes resolve to an id plus an optional display name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ComponentRef {
    /// Embedded component object carrying the display name.
    Named {
        /// Component identifier.
        id: String,
        /// Display name, when the page embeds one.
        #[serde(default)]
        name: Option<String>,
    },
    /// Bare component identifier.
    Id(String),
}

impl ComponentRef {
    /// Component identifier regardless of wire shape.
    pub fn id(&self) -> &str {
        match self {
            Self::Named { id, .. } | Self::Id(id) => id,
        }
    }

    /// Embedded display name, when the wire carried one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => name.as_deref(),
            Self::Id(_) => None,
        }
    }
}

/// A component declared by the status page.
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    /// Component identifier. Entries without one cannot be looked up and
    /// are ignored by the name directory.
    #[serde(default)]
    pub id: Option<String>,
    /// Human-readable display name.
    #[serde(default)]
    pub name: Option<String>,
}
