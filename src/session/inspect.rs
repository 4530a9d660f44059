//! JSON inspection of fetched events and records.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{error, info};

use super::state::BrowserSession;

/// Kind of item the JSON view can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Event,
    Record,
}

impl ItemKind {
    /// Route segment for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Record => "record",
        }
    }

    /// Modal title for item `id`.
    #[must_use]
    pub fn title(self, id: &str) -> String {
        match self {
            Self::Event => format!("Event: {id}"),
            Self::Record => format!("Memory Record: {id}"),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item kind string that is neither `event` nor `record`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item kind: {0}")]
pub struct UnknownItemKind(pub String);

impl FromStr for ItemKind {
    type Err = UnknownItemKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(Self::Event),
            "record" => Ok(Self::Record),
            other => Err(UnknownItemKind(other.to_string())),
        }
    }
}

/// The item currently shown in the JSON view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedItem {
    pub kind: ItemKind,
    pub id: String,
    pub title: String,
    /// Pretty-printed JSON, two-space indent.
    pub json: String,
}

impl BrowserSession {
    /// Look `id` up in the map for `kind` and make it the displayed item.
    ///
    /// Never fetches: an id missing from the last query's results is logged
    /// and yields `None`.
    pub fn inspect(&self, kind: ItemKind, id: &str) -> Option<InspectedItem> {
        let json = match kind {
            ItemKind::Event => self.events().get(id).map(pretty),
            ItemKind::Record => self.records().get(id).map(pretty),
        };

        let json = match json {
            Some(Ok(json)) => json,
            Some(Err(err)) => {
                error!(kind = %kind, id, error = %err, "Failed to serialize item");
                return None;
            }
            None => {
                error!(kind = %kind, id, "Item not found");
                return None;
            }
        };

        let item = InspectedItem {
            kind,
            id: id.to_string(),
            title: kind.title(id),
            json,
        };
        info!(name: "item.inspected", kind = %kind, id, "Showing item JSON");
        self.set_inspected(item.clone());
        Some(item)
    }
}

fn pretty<T: Serialize>(item: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(item)
}
