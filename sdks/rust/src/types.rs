//! Shared types for the SDK.
//!
//! These types mirror the inspection API's JSON payloads. Field names on the
//! wire are camelCase. Event and record payloads keep any field the API sends
//! that is not modelled here, so re-serializing an item reproduces what was
//! fetched.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Common Types
// =============================================================================

/// A creation or update time as sent by the API.
///
/// The API emits either Unix seconds (possibly fractional) or an ISO-8601
/// string depending on the backing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Seconds since the Unix epoch.
    Epoch(serde_json::Number),
    /// ISO-8601 / RFC 3339 text.
    Text(String),
}

/// Lifecycle status of a memory or strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryStatus {
    Creating,
    Active,
    Updating,
    Deleting,
    Failed,
    Available,
}

impl MemoryStatus {
    /// Parse a status label, ignoring case. Unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "CREATING" => Some(Self::Creating),
            "ACTIVE" => Some(Self::Active),
            "UPDATING" => Some(Self::Updating),
            "DELETING" => Some(Self::Deleting),
            "FAILED" => Some(Self::Failed),
            "AVAILABLE" => Some(Self::Available),
            _ => None,
        }
    }

    /// Canonical upper-case label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creating => "CREATING",
            Self::Active => "ACTIVE",
            Self::Updating => "UPDATING",
            Self::Deleting => "DELETING",
            Self::Failed => "FAILED",
            Self::Available => "AVAILABLE",
        }
    }
}

impl fmt::Display for MemoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Memory Types
// =============================================================================

/// Summary entry returned by `GET /api/memories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySummary {
    /// Unique identifier.
    pub id: String,
    /// Resource ARN.
    #[serde(default)]
    pub arn: String,
    /// Raw status label.
    #[serde(default)]
    pub status: String,
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Full memory returned by `GET /api/memories/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    /// Unique identifier.
    pub id: String,
    /// Resource ARN.
    #[serde(default)]
    pub arn: String,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw status label.
    #[serde(default)]
    pub status: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// KMS key used to encrypt the memory, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key_arn: Option<String>,
    /// Execution role, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_execution_role_arn: Option<String>,
    /// Configured strategies, in declaration order.
    #[serde(default)]
    pub strategies: Vec<Strategy>,
}

impl Memory {
    /// Strategy at `index`, if present.
    #[must_use]
    pub fn strategy(&self, index: usize) -> Option<&Strategy> {
        self.strategies.get(index)
    }
}

/// A strategy nested inside a [`Memory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    /// Strategy identifier.
    pub strategy_id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Strategy type tag (e.g. `SEMANTIC`, `USER_PREFERENCE`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Raw status label.
    #[serde(default)]
    pub status: String,
    /// Namespace path templates, in declaration order.
    #[serde(default)]
    pub namespaces: Vec<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

// =============================================================================
// Event Types
// =============================================================================

/// An event recorded under a session/actor pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event identifier.
    pub event_id: String,
    /// Session the event belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Actor that produced the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    /// Optional type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Opaque content payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Opaque metadata payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query parameters for `GET /api/memories/{id}/events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    /// Session to list.
    pub session_id: String,
    /// Actor to list.
    pub actor_id: String,
    /// Page size.
    pub max_results: u32,
    /// Continuation token from a previous page.
    pub next_token: Option<String>,
}

/// Response from `GET /api/memories/{id}/events`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    /// Events in this page.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Token for the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

// =============================================================================
// Record Types
// =============================================================================

/// A stored memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Primary identifier field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Alternate identifier field used by some API versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_record_id: Option<String>,
    /// Owning strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_strategy_id: Option<String>,
    /// Namespace the record lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Opaque content payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    /// Opaque metadata payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Resolved identifier: the first non-empty of `recordId` and
    /// `memoryRecordId`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        [self.record_id.as_deref(), self.memory_record_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
    }
}

/// Query parameters for `GET /api/memories/{id}/records`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    /// Namespace to list.
    pub namespace: String,
    /// Restrict to one strategy.
    pub memory_strategy_id: Option<String>,
    /// Page size.
    pub max_results: u32,
    /// Continuation token from a previous page.
    pub next_token: Option<String>,
}

/// Body for `POST /api/memories/{id}/retrieve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveRequest {
    /// Free-text search query.
    pub query: String,
    /// Namespace to search.
    pub namespace: String,
    /// Maximum number of records.
    pub max_results: u32,
    /// Continuation token from a previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Response from the records listing and retrieve endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsPage {
    /// Records in this page.
    #[serde(default)]
    pub records: Vec<Record>,
    /// Token for the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
