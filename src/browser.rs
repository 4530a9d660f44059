//! The browser controller.
//!
//! [`MemoryBrowser`] binds the API, the session state and the display surfaces
//! into the user actions the UI exposes. Every API-backed action goes through
//! [`ApiCall`], so each surface shows a loading indicator, then either the
//! rendered result or an inline error.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::MemoryApi;
use crate::clipboard::{
    ClipboardWriter, CopyOutcome, Osc52Clipboard, SystemClipboard, copy_with_fallback,
};
use crate::orchestrator::{ApiCall, CallOutcome};
use crate::sdk::{
    EventQuery, EventsPage, Memory, MemorySummary, RecordQuery, RecordsPage, RetrieveRequest,
};
use crate::session::{
    BrowserSession, FieldEdits, FormKind, InspectedItem, ItemKind, SessionError, StrategyContext,
};
use crate::surface::Surface;
use crate::views::{
    EventsTableView, FormView, MemoryDetailView, MemoryInfoView, MemoryListView, Panel,
    RecordsTableView, ids,
};

/// User-facing message text.
pub mod messages {
    use crate::session::FormKind;

    pub const EVENTS_INPUT_MISSING: &str = "Please enter both Session ID and Actor ID.";
    pub const NAMESPACE_MISSING: &str = "Please enter a namespace.";
    pub const RETRIEVE_INPUT_MISSING: &str = "Please enter both search query and namespace.";

    pub const LOADING_MEMORIES: &str = "Loading memories...";
    pub const ERROR_MEMORIES: &str = "Error loading memories";
    pub const LOADING_MEMORY: &str = "Loading memory details...";
    pub const ERROR_MEMORY: &str = "Error loading memory";

    /// Loading message of a sub-query.
    #[must_use]
    pub fn loading(kind: FormKind) -> &'static str {
        match kind {
            FormKind::Events => "Loading events...",
            FormKind::Records => "Loading memory records...",
            FormKind::Retrieve => "Retrieving memory records...",
        }
    }

    /// Error prefix of a sub-query.
    #[must_use]
    pub fn error_prefix(kind: FormKind) -> &'static str {
        match kind {
            FormKind::Events => "Error loading events",
            FormKind::Records => "Error loading memory records",
            FormKind::Retrieve => "Error retrieving memory records",
        }
    }

    /// Label of the button that opens and submits a sub-query form.
    #[must_use]
    pub fn form_button(kind: FormKind) -> &'static str {
        match kind {
            FormKind::Events => "List Events",
            FormKind::Records => "List Memory Records",
            FormKind::Retrieve => "Retrieve Memory Records",
        }
    }
}

/// Page sizes requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    pub events_max_results: u32,
    pub records_max_results: u32,
    pub retrieve_max_results: u32,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            events_max_results: 50,
            records_max_results: 50,
            retrieve_max_results: 20,
        }
    }
}

/// Controller behind the viewer UI.
pub struct MemoryBrowser {
    api: Arc<dyn MemoryApi>,
    session: BrowserSession,
    limits: QueryLimits,
    memory_list: Surface,
    memory_info: Surface,
    memory_detail: Surface,
    /// One results surface per strategy of the current memory.
    strategy_results: RwLock<Vec<Surface>>,
    clipboard: Box<dyn ClipboardWriter>,
    clipboard_fallback: Box<dyn ClipboardWriter>,
}

impl std::fmt::Debug for MemoryBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBrowser")
            .field("session", &self.session)
            .field("limits", &self.limits)
            .finish()
    }
}

impl MemoryBrowser {
    /// Create a browser using the system clipboard with an OSC 52 fallback.
    pub fn new(api: Arc<dyn MemoryApi>, limits: QueryLimits) -> Self {
        let memory_detail = Surface::new(ids::MEMORY_DETAIL);
        memory_detail.show(Panel::Welcome);
        Self {
            api,
            session: BrowserSession::new(),
            limits,
            memory_list: Surface::new(ids::MEMORY_LIST),
            memory_info: Surface::new(ids::MEMORY_INFO),
            memory_detail,
            strategy_results: RwLock::new(Vec::new()),
            clipboard: Box::new(SystemClipboard::new()),
            clipboard_fallback: Box::new(Osc52Clipboard),
        }
    }

    /// Replace the clipboard writers.
    #[must_use]
    pub fn with_clipboard(
        mut self,
        primary: Box<dyn ClipboardWriter>,
        fallback: Box<dyn ClipboardWriter>,
    ) -> Self {
        self.clipboard = primary;
        self.clipboard_fallback = fallback;
        self
    }

    #[must_use]
    pub fn session(&self) -> &BrowserSession {
        &self.session
    }

    #[must_use]
    pub fn memory_list(&self) -> &Surface {
        &self.memory_list
    }

    #[must_use]
    pub fn memory_info(&self) -> &Surface {
        &self.memory_info
    }

    #[must_use]
    pub fn memory_detail(&self) -> &Surface {
        &self.memory_detail
    }

    /// Results surface of strategy `index` of the current memory.
    #[must_use]
    pub fn strategy_results(&self, index: usize) -> Option<Surface> {
        self.strategy_results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    // ─── Memory list & selection ──────────────────────────────────────

    /// Fetch the memory list into the list surface.
    pub async fn load_memories(&self) -> CallOutcome {
        let session = &self.session;
        ApiCall::new(&self.memory_list)
            .loading_message(messages::LOADING_MEMORIES)
            .error_prefix(messages::ERROR_MEMORIES)
            .run(
                |_| true,
                || self.api.list_memories(),
                |writer, memories: Vec<MemorySummary>| {
                    info!(name: "memories.loaded", count = memories.len(), "Loaded memories");
                    let view = MemoryListView::from_summaries(&memories);
                    session.set_memories(memories);
                    writer.show(Panel::MemoryList(view));
                },
            )
            .await
    }

    /// Select `memory_id`, or clear the selection when it is empty.
    ///
    /// Clearing performs no request and reports [`CallOutcome::Rejected`].
    pub async fn select_memory(&self, memory_id: &str) -> CallOutcome {
        let memory_id = memory_id.trim();
        if memory_id.is_empty() {
            self.clear_selection();
            return CallOutcome::Rejected;
        }

        match self.session.memory_summary(memory_id) {
            Some(summary) => self
                .memory_info
                .show(Panel::MemoryInfo(MemoryInfoView::from_summary(&summary))),
            None => self.memory_info.clear(),
        }

        ApiCall::new(&self.memory_detail)
            .loading_message(messages::LOADING_MEMORY)
            .error_prefix(messages::ERROR_MEMORY)
            .run(
                |_| true,
                || self.api.get_memory(memory_id),
                |writer, memory: Memory| {
                    let memory = self.session.replace_memory(memory);
                    self.reset_strategy_surfaces(memory.strategies.len());
                    info!(
                        name: "memory.selected",
                        memory_id = %memory.id,
                        strategies = memory.strategies.len(),
                        "Loaded memory details"
                    );
                    writer.show(Panel::MemoryDetail(MemoryDetailView::from_memory(&memory)));
                },
            )
            .await
    }

    /// Drop the selection and revert the detail panel to the welcome text.
    pub fn clear_selection(&self) {
        self.session.clear_selection();
        self.reset_strategy_surfaces(0);
        self.memory_info.clear();
        self.memory_detail.show(Panel::Welcome);
    }

    /// Clear the selection and reload the memory list.
    pub async fn refresh(&self) -> CallOutcome {
        self.clear_selection();
        self.load_memories().await
    }

    fn reset_strategy_surfaces(&self, count: usize) {
        let surfaces = (0..count)
            .map(|index| Surface::new(ids::strategy_results(index)))
            .collect();
        let old = std::mem::replace(
            &mut *self
                .strategy_results
                .write()
                .unwrap_or_else(PoisonError::into_inner),
            surfaces,
        );
        // Sub-queries still in flight hold these handles; bumping their
        // generation makes late results arrive as superseded.
        for surface in &old {
            surface.clear();
        }
    }

    // ─── Sub-query forms ──────────────────────────────────────────────

    /// Open form `kind` of strategy `index`.
    ///
    /// # Errors
    ///
    /// [`SessionError::StrategyNotFound`] when there is no such strategy.
    pub fn open_form(&self, index: usize, kind: FormKind) -> Result<FormView, SessionError> {
        let (_, fields) = self.session.open_form(index, kind).inspect_err(|err| {
            warn!(error = %err, kind = %kind, "Cannot open form");
        })?;
        Ok(FormView {
            strategy_index: index,
            kind,
            fields,
        })
    }

    /// Remember edits to strategy `index`'s form fields.
    ///
    /// # Errors
    ///
    /// [`SessionError::StrategyNotFound`] when there is no such strategy.
    pub fn update_fields(&self, index: usize, edits: FieldEdits) -> Result<(), SessionError> {
        self.session.update_fields(index, edits).inspect_err(|err| {
            warn!(error = %err, "Cannot update form fields");
        })
    }

    fn strategy_target(&self, index: usize, kind: FormKind) -> Option<(StrategyContext, Surface)> {
        let target = self
            .session
            .strategy(index)
            .ok()
            .zip(self.strategy_results(index));
        if target.is_none() {
            warn!(index, kind = %kind, "Sub-query for unknown strategy");
        }
        target
    }

    // ─── Sub-queries ──────────────────────────────────────────────────

    /// List events of a session/actor pair into strategy `index`'s results.
    pub async fn list_events(&self, index: usize, session_id: &str, actor_id: &str) -> CallOutcome {
        let Some((ctx, surface)) = self.strategy_target(index, FormKind::Events) else {
            return CallOutcome::Rejected;
        };
        self.remember(
            index,
            FieldEdits {
                session_id: Some(session_id.to_string()),
                actor_id: Some(actor_id.to_string()),
                ..FieldEdits::default()
            },
        );

        let query = EventQuery {
            session_id: session_id.trim().to_string(),
            actor_id: actor_id.trim().to_string(),
            max_results: self.limits.events_max_results,
            next_token: None,
        };

        ApiCall::new(&surface)
            .loading_message(messages::loading(FormKind::Events))
            .error_prefix(messages::error_prefix(FormKind::Events))
            .run(
                |surface| {
                    if query.session_id.is_empty() || query.actor_id.is_empty() {
                        surface.show_warning(messages::EVENTS_INPUT_MISSING);
                        return false;
                    }
                    true
                },
                || self.api.list_events(&ctx.memory_id, &query),
                |writer, page: EventsPage| {
                    let stored = self.session.replace_events(&page.events);
                    info!(name: "events.loaded", strategy = index, count = stored, "Loaded events");
                    writer.show(Panel::Events(EventsTableView::from_events(&page.events)));
                },
            )
            .await
    }

    /// List the records of `namespace` into strategy `index`'s results.
    pub async fn list_records(&self, index: usize, namespace: &str) -> CallOutcome {
        let Some((ctx, surface)) = self.strategy_target(index, FormKind::Records) else {
            return CallOutcome::Rejected;
        };
        self.remember(
            index,
            FieldEdits {
                namespace: Some(namespace.to_string()),
                ..FieldEdits::default()
            },
        );

        let query = RecordQuery {
            namespace: namespace.trim().to_string(),
            memory_strategy_id: None,
            max_results: self.limits.records_max_results,
            next_token: None,
        };

        ApiCall::new(&surface)
            .loading_message(messages::loading(FormKind::Records))
            .error_prefix(messages::error_prefix(FormKind::Records))
            .run(
                |surface| {
                    if query.namespace.is_empty() {
                        surface.show_warning(messages::NAMESPACE_MISSING);
                        return false;
                    }
                    true
                },
                || self.api.list_records(&ctx.memory_id, &query),
                |writer, page: RecordsPage| {
                    let stored = self.session.replace_records(&page.records);
                    info!(name: "records.loaded", strategy = index, count = stored, "Loaded records");
                    writer.show(Panel::Records(RecordsTableView::listing(
                        &query.namespace,
                        &page.records,
                    )));
                },
            )
            .await
    }

    /// Search records of `namespace` into strategy `index`'s results.
    pub async fn retrieve_records(&self, index: usize, search: &str, namespace: &str) -> CallOutcome {
        let Some((ctx, surface)) = self.strategy_target(index, FormKind::Retrieve) else {
            return CallOutcome::Rejected;
        };
        self.remember(
            index,
            FieldEdits {
                search_query: Some(search.to_string()),
                retrieve_namespace: Some(namespace.to_string()),
                ..FieldEdits::default()
            },
        );

        let request = RetrieveRequest {
            query: search.trim().to_string(),
            namespace: namespace.trim().to_string(),
            max_results: self.limits.retrieve_max_results,
            next_token: None,
        };

        ApiCall::new(&surface)
            .loading_message(messages::loading(FormKind::Retrieve))
            .error_prefix(messages::error_prefix(FormKind::Retrieve))
            .run(
                |surface| {
                    if request.query.is_empty() || request.namespace.is_empty() {
                        surface.show_warning(messages::RETRIEVE_INPUT_MISSING);
                        return false;
                    }
                    true
                },
                || self.api.retrieve(&ctx.memory_id, &request),
                |writer, page: RecordsPage| {
                    let stored = self.session.replace_records(&page.records);
                    info!(name: "records.retrieved", strategy = index, count = stored, "Retrieved records");
                    writer.show(Panel::Records(RecordsTableView::search(
                        &request.query,
                        &request.namespace,
                        &page.records,
                    )));
                },
            )
            .await
    }

    fn remember(&self, index: usize, edits: FieldEdits) {
        // The strategy was resolved just before; a miss means the selection
        // changed in between and there is nothing to remember.
        if let Err(err) = self.session.update_fields(index, edits) {
            debug!(error = %err, "Selection changed before fields were remembered");
        }
    }

    // ─── Inspection & clipboard ───────────────────────────────────────

    /// Show item `id` of `kind` in the JSON view. Never fetches.
    #[must_use]
    pub fn inspect(&self, kind: ItemKind, id: &str) -> Option<InspectedItem> {
        self.session.inspect(kind, id)
    }

    /// Copy `text` to the clipboard.
    pub fn copy_text(&self, text: &str, label: Option<&str>) -> CopyOutcome {
        copy_with_fallback(
            self.clipboard.as_ref(),
            self.clipboard_fallback.as_ref(),
            text,
            label,
        )
    }

    /// Copy the JSON of the displayed item.
    pub fn copy_inspected_json(&self) -> CopyOutcome {
        match self.session.inspected() {
            Some(item) => self.copy_text(&item.json, Some("JSON")),
            None => {
                warn!("No item is displayed; nothing to copy");
                CopyOutcome::NothingToCopy
            }
        }
    }
}
