//! Selection state: the current memory, its sub-query forms and the lookup
//! maps of the last fetched events and records.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Deserialize;
use tracing::debug;

use super::inspect::InspectedItem;
use crate::namespace::{resolve_namespace, seed_if_empty};
use crate::sdk::{Event, Memory, MemorySummary, Record, Strategy};

/// Errors raised by session lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No memory selected, or the index is out of range.
    #[error("strategy {index} not found")]
    StrategyNotFound {
        /// Requested strategy index.
        index: usize,
    },
}

/// The three sub-query forms of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    /// Session id + actor id.
    Events,
    /// Namespace listing.
    Records,
    /// Semantic search.
    Retrieve,
}

impl FormKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Events, Self::Records, Self::Retrieve];

    /// Route segment for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Records => "records",
            Self::Retrieve => "retrieve",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A form kind string that is not `events`, `records` or `retrieve`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form kind: {0}")]
pub struct UnknownFormKind(pub String);

impl FromStr for FormKind {
    type Err = UnknownFormKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "events" => Ok(Self::Events),
            "records" => Ok(Self::Records),
            "retrieve" => Ok(Self::Retrieve),
            other => Err(UnknownFormKind(other.to_string())),
        }
    }
}

/// Input fields of one strategy's sub-query forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyForms {
    /// Events form: session id.
    pub session_id: String,
    /// Events form: actor id.
    pub actor_id: String,
    /// Records form: namespace.
    pub namespace: String,
    /// Retrieve form: search query.
    pub search_query: String,
    /// Retrieve form: namespace.
    pub retrieve_namespace: String,
    /// The visible form, if any. Opening one hides the others.
    pub open: Option<FormKind>,
}

impl StrategyForms {
    /// Fresh forms with both namespace fields seeded from `strategy`.
    #[must_use]
    pub fn seeded(strategy: &Strategy) -> Self {
        let mut forms = Self::default();
        forms.seed_namespace(FormKind::Records, strategy);
        forms.seed_namespace(FormKind::Retrieve, strategy);
        forms
    }

    fn seed_namespace(&mut self, kind: FormKind, strategy: &Strategy) {
        let field = match kind {
            FormKind::Records => &mut self.namespace,
            FormKind::Retrieve => &mut self.retrieve_namespace,
            FormKind::Events => return,
        };
        seed_if_empty(field, || resolve_namespace(strategy));
    }

    fn apply(&mut self, edits: FieldEdits) {
        let FieldEdits {
            session_id,
            actor_id,
            namespace,
            search_query,
            retrieve_namespace,
        } = edits;
        for (field, edit) in [
            (&mut self.session_id, session_id),
            (&mut self.actor_id, actor_id),
            (&mut self.namespace, namespace),
            (&mut self.search_query, search_query),
            (&mut self.retrieve_namespace, retrieve_namespace),
        ] {
            if let Some(value) = edit {
                *field = value;
            }
        }
    }
}

/// User edits to a strategy's form fields. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldEdits {
    pub session_id: Option<String>,
    pub actor_id: Option<String>,
    pub namespace: Option<String>,
    pub search_query: Option<String>,
    pub retrieve_namespace: Option<String>,
}

/// The selected memory's id plus one of its strategies.
#[derive(Debug, Clone)]
pub struct StrategyContext {
    pub memory_id: String,
    pub strategy: Strategy,
}

pub(super) type EventMap = Arc<HashMap<String, Event>>;
pub(super) type RecordMap = Arc<HashMap<String, Record>>;

#[derive(Debug, Default)]
struct SessionInner {
    memories: RwLock<Arc<Vec<MemorySummary>>>,
    memory: RwLock<Option<Arc<Memory>>>,
    forms: RwLock<Vec<StrategyForms>>,
    events: RwLock<EventMap>,
    records: RwLock<RecordMap>,
    inspected: RwLock<Option<InspectedItem>>,
}

/// Shared handle to the viewer's selection state.
///
/// Clones share the same state. Every lock is held only for the duration of
/// a single read or swap.
#[derive(Debug, Clone, Default)]
pub struct BrowserSession {
    inner: Arc<SessionInner>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl BrowserSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Memory list ──────────────────────────────────────────────────

    /// Remember the last fetched memory list.
    pub fn set_memories(&self, memories: Vec<MemorySummary>) {
        *write(&self.inner.memories) = Arc::new(memories);
    }

    /// Last fetched memory list.
    #[must_use]
    pub fn memories(&self) -> Arc<Vec<MemorySummary>> {
        Arc::clone(&read(&self.inner.memories))
    }

    /// Summary of `memory_id` from the last fetched list.
    #[must_use]
    pub fn memory_summary(&self, memory_id: &str) -> Option<MemorySummary> {
        read(&self.inner.memories)
            .iter()
            .find(|m| m.id == memory_id)
            .cloned()
    }

    // ─── Selection ────────────────────────────────────────────────────

    /// The selected memory.
    #[must_use]
    pub fn current_memory(&self) -> Option<Arc<Memory>> {
        read(&self.inner.memory).clone()
    }

    /// Swap in a newly fetched memory.
    ///
    /// Forms are rebuilt fresh for its strategies with the namespace fields
    /// seeded. Items from the previous memory are dropped.
    pub fn replace_memory(&self, memory: Memory) -> Arc<Memory> {
        let memory = Arc::new(memory);
        let forms = memory.strategies.iter().map(StrategyForms::seeded).collect();

        *write(&self.inner.forms) = forms;
        *write(&self.inner.memory) = Some(Arc::clone(&memory));
        self.drop_items();

        debug!(memory_id = %memory.id, strategies = memory.strategies.len(), "Selected memory");
        memory
    }

    /// Drop the current memory along with its forms and items.
    pub fn clear_selection(&self) {
        *write(&self.inner.memory) = None;
        write(&self.inner.forms).clear();
        self.drop_items();
        debug!("Cleared selection");
    }

    fn drop_items(&self) {
        *write(&self.inner.events) = Arc::default();
        *write(&self.inner.records) = Arc::default();
        *write(&self.inner.inspected) = None;
    }

    // ─── Strategy forms ───────────────────────────────────────────────

    /// The selected memory's id and strategy `index`.
    ///
    /// # Errors
    ///
    /// [`SessionError::StrategyNotFound`] without a selection or when `index`
    /// is out of range.
    pub fn strategy(&self, index: usize) -> Result<StrategyContext, SessionError> {
        let memory = read(&self.inner.memory);
        let memory = memory
            .as_ref()
            .ok_or(SessionError::StrategyNotFound { index })?;
        let strategy = memory
            .strategy(index)
            .ok_or(SessionError::StrategyNotFound { index })?;
        Ok(StrategyContext {
            memory_id: memory.id.clone(),
            strategy: strategy.clone(),
        })
    }

    /// Snapshot of strategy `index`'s form fields.
    ///
    /// # Errors
    ///
    /// [`SessionError::StrategyNotFound`] when there is no such strategy.
    pub fn forms(&self, index: usize) -> Result<StrategyForms, SessionError> {
        read(&self.inner.forms)
            .get(index)
            .cloned()
            .ok_or(SessionError::StrategyNotFound { index })
    }

    /// Show form `kind` of strategy `index`, hiding its other forms.
    ///
    /// Records and retrieve forms get their namespace seeded when empty; a
    /// value the user typed is kept.
    ///
    /// # Errors
    ///
    /// [`SessionError::StrategyNotFound`] when there is no such strategy.
    pub fn open_form(
        &self,
        index: usize,
        kind: FormKind,
    ) -> Result<(Strategy, StrategyForms), SessionError> {
        let StrategyContext { strategy, .. } = self.strategy(index)?;
        let mut forms = write(&self.inner.forms);
        let form = forms
            .get_mut(index)
            .ok_or(SessionError::StrategyNotFound { index })?;
        form.open = Some(kind);
        form.seed_namespace(kind, &strategy);
        Ok((strategy, form.clone()))
    }

    /// Record user edits to strategy `index`'s fields.
    ///
    /// # Errors
    ///
    /// [`SessionError::StrategyNotFound`] when there is no such strategy.
    pub fn update_fields(&self, index: usize, edits: FieldEdits) -> Result<(), SessionError> {
        let mut forms = write(&self.inner.forms);
        let form = forms
            .get_mut(index)
            .ok_or(SessionError::StrategyNotFound { index })?;
        form.apply(edits);
        Ok(())
    }

    // ─── Item lookup maps ─────────────────────────────────────────────

    /// Replace the events map with `events`. Returns the number stored.
    pub fn replace_events(&self, events: &[Event]) -> usize {
        let map: HashMap<_, _> = events
            .iter()
            .map(|e| (e.event_id.clone(), e.clone()))
            .collect();
        let stored = map.len();
        *write(&self.inner.events) = Arc::new(map);
        stored
    }

    /// Replace the records map with `records`. Records without an id are
    /// not stored. Returns the number stored.
    pub fn replace_records(&self, records: &[Record]) -> usize {
        let map: HashMap<_, _> = records
            .iter()
            .filter_map(|r| r.id().map(|id| (id.to_string(), r.clone())))
            .collect();
        let stored = map.len();
        *write(&self.inner.records) = Arc::new(map);
        stored
    }

    /// Events of the last query.
    #[must_use]
    pub fn events(&self) -> EventMap {
        Arc::clone(&read(&self.inner.events))
    }

    /// Records of the last query.
    #[must_use]
    pub fn records(&self) -> RecordMap {
        Arc::clone(&read(&self.inner.records))
    }

    // ─── Inspection ───────────────────────────────────────────────────

    /// The item shown in the JSON view.
    #[must_use]
    pub fn inspected(&self) -> Option<InspectedItem> {
        read(&self.inner.inspected).clone()
    }

    pub(super) fn set_inspected(&self, item: InspectedItem) {
        *write(&self.inner.inspected) = Some(item);
    }
}
