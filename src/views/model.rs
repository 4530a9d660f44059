//! View models: display-ready data built from API types.

use crate::format::{NOT_AVAILABLE, StatusTone, format_timestamp, or_not_available};
use crate::preview::{ContentPreview, content_preview};
use crate::sdk::{Event, Memory, MemorySummary, Record, Strategy};
use crate::session::{FormKind, InspectedItem, StrategyForms};

/// Placeholder shown for items with neither content nor metadata.
pub const NO_CONTENT: &str = "No Content";

/// A status label with its tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub tone: StatusTone,
}

impl StatusBadge {
    #[must_use]
    pub fn new(status: &str) -> Self {
        Self {
            label: or_not_available(Some(status)).to_string(),
            tone: StatusTone::for_status(status),
        }
    }
}

// ─── Memory list ──────────────────────────────────────────────────────────

/// One entry of the memory picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryOption {
    pub id: String,
    pub label: String,
}

/// The memory picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryListView {
    pub options: Vec<MemoryOption>,
}

impl MemoryListView {
    #[must_use]
    pub fn from_summaries(memories: &[MemorySummary]) -> Self {
        let options = memories
            .iter()
            .map(|m| MemoryOption {
                id: m.id.clone(),
                label: non_empty(m.name.as_deref())
                    .map_or_else(|| format!("Memory {}", m.id), ToString::to_string),
            })
            .collect();
        Self { options }
    }
}

/// Sidebar summary of the selected memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryInfoView {
    pub status: StatusBadge,
    pub created: String,
    pub updated: String,
}

impl MemoryInfoView {
    #[must_use]
    pub fn from_summary(summary: &MemorySummary) -> Self {
        Self {
            status: StatusBadge::new(&summary.status),
            created: format_timestamp(summary.created_at.as_ref()),
            updated: format_timestamp(summary.updated_at.as_ref()),
        }
    }
}

// ─── Memory detail ────────────────────────────────────────────────────────

/// The main panel for a selected memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDetailView {
    pub title: String,
    pub status: StatusBadge,
    pub created: String,
    pub updated: String,
    pub description: Option<String>,
    pub id: String,
    pub arn: String,
    pub encryption_key_arn: Option<String>,
    pub execution_role_arn: Option<String>,
    pub strategies: Vec<StrategyTabView>,
}

impl MemoryDetailView {
    #[must_use]
    pub fn from_memory(memory: &Memory) -> Self {
        Self {
            title: non_empty(memory.name.as_deref())
                .unwrap_or("Memory Details")
                .to_string(),
            status: StatusBadge::new(&memory.status),
            created: format_timestamp(memory.created_at.as_ref()),
            updated: format_timestamp(memory.updated_at.as_ref()),
            description: non_empty(memory.description.as_deref()).map(ToString::to_string),
            id: memory.id.clone(),
            arn: or_not_available(Some(&memory.arn)).to_string(),
            encryption_key_arn: non_empty(memory.encryption_key_arn.as_deref())
                .map(ToString::to_string),
            execution_role_arn: non_empty(memory.memory_execution_role_arn.as_deref())
                .map(ToString::to_string),
            strategies: memory
                .strategies
                .iter()
                .enumerate()
                .map(|(index, strategy)| StrategyTabView::new(index, strategy))
                .collect(),
        }
    }
}

/// One strategy tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyTabView {
    pub index: usize,
    pub label: String,
    pub strategy_id: String,
    pub name: String,
    pub kind: String,
    pub status: StatusBadge,
    pub namespaces: Vec<String>,
    pub created: String,
    pub updated: String,
    pub description: Option<String>,
}

impl StrategyTabView {
    #[must_use]
    pub fn new(index: usize, strategy: &Strategy) -> Self {
        Self {
            index,
            label: non_empty(Some(&strategy.name))
                .map_or_else(|| format!("Strategy {}", index + 1), ToString::to_string),
            strategy_id: strategy.strategy_id.clone(),
            name: or_not_available(Some(&strategy.name)).to_string(),
            kind: or_not_available(Some(&strategy.kind)).to_string(),
            status: StatusBadge::new(&strategy.status),
            namespaces: strategy.namespaces.clone(),
            created: format_timestamp(strategy.created_at.as_ref()),
            updated: format_timestamp(strategy.updated_at.as_ref()),
            description: non_empty(strategy.description.as_deref()).map(ToString::to_string),
        }
    }
}

// ─── Sub-query forms ──────────────────────────────────────────────────────

/// An opened sub-query form with its current field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub strategy_index: usize,
    pub kind: FormKind,
    pub fields: StrategyForms,
}

// ─── Result tables ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub event_id: String,
    pub event_type: String,
    pub created: String,
    pub preview: String,
}

/// Results of an events query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsTableView {
    pub rows: Vec<EventRow>,
}

impl EventsTableView {
    #[must_use]
    pub fn from_events(events: &[Event]) -> Self {
        let rows = events
            .iter()
            .map(|e| EventRow {
                event_id: e.event_id.clone(),
                event_type: or_not_available(e.event_type.as_deref()).to_string(),
                created: format_timestamp(e.created_at.as_ref()),
                preview: preview_text(e.data.as_ref(), e.metadata.as_ref()),
            })
            .collect();
        Self { rows }
    }

    /// `"{n} event(s)"`
    #[must_use]
    pub fn count_label(&self) -> String {
        format!("{} event(s)", self.rows.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    /// Resolved id; `None` rows cannot be inspected.
    pub record_id: Option<String>,
    pub strategy_id: String,
    pub created: String,
    pub preview: String,
}

impl RecordRow {
    /// Id cell text.
    #[must_use]
    pub fn display_id(&self) -> &str {
        self.record_id.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Results of a records listing or a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsTableView {
    pub title: String,
    pub namespace: String,
    pub rows: Vec<RecordRow>,
}

impl RecordsTableView {
    /// Table for a namespace listing.
    #[must_use]
    pub fn listing(namespace: &str, records: &[Record]) -> Self {
        Self::build("Memory Records".to_string(), namespace, records)
    }

    /// Table for a search.
    #[must_use]
    pub fn search(query: &str, namespace: &str, records: &[Record]) -> Self {
        Self::build(format!("Search results for \"{query}\""), namespace, records)
    }

    fn build(title: String, namespace: &str, records: &[Record]) -> Self {
        let rows = records
            .iter()
            .map(|r| RecordRow {
                record_id: r.id().map(ToString::to_string),
                strategy_id: or_not_available(r.memory_strategy_id.as_deref()).to_string(),
                created: format_timestamp(r.created_at.as_ref()),
                preview: preview_text(r.content.as_ref(), r.metadata.as_ref()),
            })
            .collect();
        Self {
            title,
            namespace: namespace.to_string(),
            rows,
        }
    }

    /// `"Found {n} record(s)"`
    #[must_use]
    pub fn count_label(&self) -> String {
        format!("Found {} record(s)", self.rows.len())
    }

    /// Shown instead of the table when there are no rows.
    #[must_use]
    pub fn empty_message(&self) -> String {
        format!("No records found in namespace: {}", self.namespace)
    }
}

// ─── JSON modal ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonView {
    pub title: String,
    pub json: String,
}

impl From<InspectedItem> for JsonView {
    fn from(item: InspectedItem) -> Self {
        Self {
            title: item.title,
            json: item.json,
        }
    }
}

fn preview_text(content: Option<&serde_json::Value>, metadata: Option<&serde_json::Value>) -> String {
    match content_preview(content, metadata) {
        ContentPreview::NoContent => NO_CONTENT.to_string(),
        ContentPreview::Text(text) => text,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
