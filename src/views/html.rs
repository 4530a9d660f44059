//! HTML rendering of view models.
//!
//! Fragments are plain strings swapped in by htmx. Element ids used as swap
//! targets come from [`super::ids`].

use std::fmt::Write;

use serde_json::json;

use crate::browser::messages;
use crate::format::escape_html;
use crate::session::FormKind;

use super::components::{
    ButtonVariant, NoticeKind, badge, button, field_row, hx_vals, loading, notice,
};
use super::ids;
use super::model::{
    EventsTableView, FormView, JsonView, MemoryDetailView, MemoryInfoView, MemoryListView,
    RecordsTableView, StrategyTabView,
};
use super::Panel;
use crate::surface::SurfaceState;

/// Shown in the memory detail panel when nothing is selected.
pub const WELCOME_TEXT: &str = "Select a memory from the sidebar to view its details and strategies.";

/// Render to an HTML fragment.
pub trait ToHtml {
    fn to_html(&self) -> String;
}

impl ToHtml for SurfaceState {
    fn to_html(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Warning(message) => notice(NoticeKind::Warning, message),
            Self::Loading(message) => loading(message),
            Self::Error(message) => notice(NoticeKind::Error, message),
            Self::Ready(panel) => panel.to_html(),
        }
    }
}

impl ToHtml for Panel {
    fn to_html(&self) -> String {
        match self {
            Self::Welcome => welcome(),
            Self::Info(message) => notice(NoticeKind::Info, message),
            Self::MemoryList(view) => view.to_html(),
            Self::MemoryInfo(view) => view.to_html(),
            Self::MemoryDetail(view) => view.to_html(),
            Self::Events(view) => view.to_html(),
            Self::Records(view) => view.to_html(),
        }
    }
}

fn welcome() -> String {
    format!(
        r#"<div class="card welcome">
  <h2>Memory Browser</h2>
  <p class="muted">{WELCOME_TEXT}</p>
</div>"#
    )
}

// ─── Sidebar ──────────────────────────────────────────────────────────────

impl ToHtml for MemoryListView {
    fn to_html(&self) -> String {
        let mut options = String::from(r#"<option value="">Choose a memory...</option>"#);
        for option in &self.options {
            let _ = write!(
                options,
                r#"<option value="{id}">{label}</option>"#,
                id = escape_html(&option.id),
                label = escape_html(&option.label),
            );
        }
        format!(
            r##"<select id="memory-select" name="memory_id" class="select"
        hx-post="/ui/select" hx-trigger="change" hx-target="#{detail}" hx-indicator="#detail-indicator">{options}</select>"##,
            detail = ids::MEMORY_DETAIL,
        )
    }
}

impl ToHtml for MemoryInfoView {
    fn to_html(&self) -> String {
        format!(
            r#"<dl class="fields">{status}{created}{updated}</dl>"#,
            status = field_row("Status", &badge(&self.status)),
            created = field_row("Created", &escape_html(&self.created)),
            updated = field_row("Updated", &escape_html(&self.updated)),
        )
    }
}

// ─── Detail ───────────────────────────────────────────────────────────────

impl ToHtml for MemoryDetailView {
    fn to_html(&self) -> String {
        let mut fields = String::new();
        fields.push_str(&field_row("Created", &escape_html(&self.created)));
        fields.push_str(&field_row("Updated", &escape_html(&self.updated)));
        if let Some(description) = &self.description {
            fields.push_str(&field_row("Description", &escape_html(description)));
        }
        fields.push_str(&field_row("ID", &code(&self.id)));
        fields.push_str(&field_row("ARN", &code(&self.arn)));
        if let Some(arn) = &self.encryption_key_arn {
            fields.push_str(&field_row("Encryption Key ARN", &code(arn)));
        }
        if let Some(arn) = &self.execution_role_arn {
            fields.push_str(&field_row("Execution Role ARN", &code(arn)));
        }

        format!(
            r#"<article class="card">
  <header class="card-header"><h2>{title}</h2>{status}</header>
  <dl class="fields">{fields}</dl>
</article>
<section class="card strategies">
  <h3>Strategies</h3>
  {tabs}
</section>"#,
            title = escape_html(&self.title),
            status = badge(&self.status),
            tabs = strategy_tabs(&self.strategies),
        )
    }
}

fn strategy_tabs(strategies: &[StrategyTabView]) -> String {
    if strategies.is_empty() {
        return notice(NoticeKind::Info, "No strategies configured for this memory.");
    }
    let mut html = String::from(r#"<div class="tabs">"#);
    for tab in strategies {
        let _ = write!(
            html,
            r#"<input type="radio" name="strategy-tab" id="strategy-tab-{i}"{checked}><label for="strategy-tab-{i}">{label}</label><div class="tab-panel">{body}</div>"#,
            i = tab.index,
            checked = if tab.index == 0 { " checked" } else { "" },
            label = escape_html(&tab.label),
            body = strategy_body(tab),
        );
    }
    html.push_str("</div>");
    html
}

fn strategy_body(tab: &StrategyTabView) -> String {
    let i = tab.index;
    let mut fields = String::new();
    fields.push_str(&field_row("ID", &code(&tab.strategy_id)));
    fields.push_str(&field_row("Name", &escape_html(&tab.name)));
    fields.push_str(&field_row("Type", &escape_html(&tab.kind)));
    fields.push_str(&field_row("Status", &badge(&tab.status)));
    fields.push_str(&field_row("Namespaces", &namespace_badges(&tab.namespaces)));
    fields.push_str(&field_row("Created", &escape_html(&tab.created)));
    fields.push_str(&field_row("Updated", &escape_html(&tab.updated)));
    if let Some(description) = &tab.description {
        fields.push_str(&field_row("Description", &escape_html(description)));
    }

    let actions: String = FormKind::ALL
        .iter()
        .map(|kind| {
            button(
                ButtonVariant::Secondary,
                &format!(
                    r##"hx-get="/ui/strategies/{i}/forms/{kind}" hx-target="#{target}""##,
                    target = ids::strategy_form(i),
                ),
                messages::form_button(*kind),
            )
        })
        .collect();

    format!(
        r#"<dl class="fields">{fields}</dl>
<div class="actions">{actions}</div>
<div id="{form}" class="subquery-form"></div>
<div id="{results}" class="results"></div>"#,
        form = ids::strategy_form(i),
        results = ids::strategy_results(i),
    )
}

fn namespace_badges(namespaces: &[String]) -> String {
    if namespaces.is_empty() {
        return r#"<span class="muted">No namespaces</span>"#.to_string();
    }
    namespaces
        .iter()
        .map(|ns| {
            let copy = button(
                ButtonVariant::Ghost,
                &format!(
                    r##"hx-post="/ui/copy" hx-target="#{toast}" {vals} title="Copy namespace""##,
                    toast = ids::TOAST,
                    vals = hx_vals(&json!({ "text": ns, "label": "namespace" })),
                ),
                "Copy",
            );
            format!(
                r#"<span class="namespace"><span class="badge bg-outline">{ns}</span>{copy}</span>"#,
                ns = escape_html(ns),
            )
        })
        .collect()
}

// ─── Sub-query forms ──────────────────────────────────────────────────────

impl ToHtml for FormView {
    fn to_html(&self) -> String {
        let i = self.strategy_index;
        let fields = &self.fields;
        let inputs = match self.kind {
            FormKind::Events => [
                text_input(i, "session_id", "Session ID", &fields.session_id),
                text_input(i, "actor_id", "Actor ID", &fields.actor_id),
            ]
            .concat(),
            FormKind::Records => text_input(i, "namespace", "Namespace", &fields.namespace),
            FormKind::Retrieve => [
                text_input(i, "search_query", "Search Query", &fields.search_query),
                text_input(i, "retrieve_namespace", "Namespace", &fields.retrieve_namespace),
            ]
            .concat(),
        };

        format!(
            r##"<form class="form" hx-post="/ui/strategies/{i}/{kind}" hx-target="#{results}" hx-indicator="#{indicator}">
  {inputs}
  <div class="actions">
    <button type="submit" class="{submit_classes}">{submit}</button>
    <span id="{indicator}" class="htmx-indicator">{loading}</span>
  </div>
</form>"##,
            kind = self.kind,
            results = ids::strategy_results(i),
            indicator = ids::strategy_indicator(i),
            submit_classes = ButtonVariant::Primary.classes(),
            submit = escape_html(messages::form_button(self.kind)),
            loading = loading(messages::loading(self.kind)),
        )
    }
}

fn text_input(index: usize, name: &str, label: &str, value: &str) -> String {
    format!(
        r#"<label class="form-row"><span>{label}</span><input type="text" name="{name}" value="{value}" hx-post="/ui/strategies/{index}/fields" hx-trigger="change" hx-swap="none"></label>"#,
        value = escape_html(value),
    )
}

// ─── Result tables ────────────────────────────────────────────────────────

impl ToHtml for EventsTableView {
    fn to_html(&self) -> String {
        if self.rows.is_empty() {
            return notice(NoticeKind::Info, "No events found.");
        }
        let rows: String = self
            .rows
            .iter()
            .map(|row| {
                format!(
                    r#"<tr><td>{id}</td><td>{kind}</td><td>{created}</td><td class="preview">{preview}</td><td>{view}</td></tr>"#,
                    id = code(&row.event_id),
                    kind = escape_html(&row.event_type),
                    created = escape_html(&row.created),
                    preview = escape_html(&row.preview),
                    view = view_json_button("event", &row.event_id),
                )
            })
            .collect();

        format!(
            r#"<div class="results-header"><h4>Events</h4><span class="muted">{count}</span></div>
<table class="table">
  <thead><tr><th>Event ID</th><th>Type</th><th>Created</th><th>Preview</th><th></th></tr></thead>
  <tbody>{rows}</tbody>
</table>"#,
            count = escape_html(&self.count_label()),
        )
    }
}

impl ToHtml for RecordsTableView {
    fn to_html(&self) -> String {
        if self.rows.is_empty() {
            return notice(NoticeKind::Info, &self.empty_message());
        }
        let rows: String = self
            .rows
            .iter()
            .map(|row| {
                let view = row
                    .record_id
                    .as_deref()
                    .map(|id| view_json_button("record", id))
                    .unwrap_or_default();
                format!(
                    r#"<tr><td>{id}</td><td>{strategy}</td><td>{created}</td><td class="preview">{preview}</td><td>{view}</td></tr>"#,
                    id = code(row.display_id()),
                    strategy = code(&row.strategy_id),
                    created = escape_html(&row.created),
                    preview = escape_html(&row.preview),
                )
            })
            .collect();

        format!(
            r#"<div class="results-header"><h4>{title}</h4><span class="muted">{count}</span></div>
<p class="muted">Namespace: {namespace}</p>
<table class="table">
  <thead><tr><th>Record ID</th><th>Strategy</th><th>Created</th><th>Preview</th><th></th></tr></thead>
  <tbody>{rows}</tbody>
</table>"#,
            title = escape_html(&self.title),
            count = escape_html(&self.count_label()),
            namespace = code(&self.namespace),
        )
    }
}

fn view_json_button(kind: &str, id: &str) -> String {
    button(
        ButtonVariant::Outline,
        &format!(
            r##"hx-get="/ui/inspect/{kind}/{id}" hx-target="#{modal}""##,
            id = escape_html(&urlencoding::encode(id)),
            modal = ids::MODAL,
        ),
        "View JSON",
    )
}

// ─── JSON modal ───────────────────────────────────────────────────────────

impl ToHtml for JsonView {
    fn to_html(&self) -> String {
        format!(
            r##"<div class="modal" role="dialog" aria-modal="true">
  <div class="modal-content">
    <header class="modal-header">
      <h3>{title}</h3>
      <button type="button" class="btn btn-ghost" onclick="this.closest('.modal').remove()" aria-label="Close">&times;</button>
    </header>
    <pre class="json">{json}</pre>
    <footer class="modal-footer">{copy}</footer>
  </div>
</div>"##,
            title = escape_html(&self.title),
            json = escape_html(&self.json),
            copy = button(
                ButtonVariant::Primary,
                &format!(r##"hx-post="/ui/inspect/copy" hx-target="#{}""##, ids::TOAST),
                "Copy JSON",
            ),
        )
    }
}

/// Transient confirmation shown after a copy.
#[must_use]
pub fn toast(message: &str) -> String {
    format!(
        r#"<div class="toast" role="status">{}</div>"#,
        escape_html(message)
    )
}

/// Out-of-band swap replacing the children of element `id` with `inner`.
#[must_use]
pub fn oob(id: &str, inner: &str) -> String {
    format!(r#"<div id="{id}" hx-swap-oob="innerHTML">{inner}</div>"#)
}

fn code(text: &str) -> String {
    format!("<code>{}</code>", escape_html(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{Event, Record};
    use crate::session::{StrategyForms, memory_with_strategies};

    #[test]
    fn test_surface_states() {
        assert_eq!(SurfaceState::Empty.to_html(), "");
        assert!(
            SurfaceState::Warning("Please enter a namespace.".into())
                .to_html()
                .contains("alert-warning")
        );
        let error = SurfaceState::Error("Error loading events: HTTP 500".into()).to_html();
        assert!(error.contains("alert-danger"));
        assert!(error.contains("Error loading events: HTTP 500"));
        assert!(SurfaceState::Loading("Loading events...".into()).to_html().contains("spinner"));
    }

    #[test]
    fn test_memory_list_has_placeholder_option() {
        let html = MemoryListView::default().to_html();
        assert!(html.contains(r#"<option value="">Choose a memory...</option>"#));
        assert!(html.contains(r#"hx-post="/ui/select""#));
    }

    #[test]
    fn test_detail_renders_tabs_and_targets() {
        let html = MemoryDetailView::from_memory(&memory_with_strategies()).to_html();
        assert!(html.contains("Support bot"));
        assert!(html.contains(r#"id="strategy-0-results""#));
        assert!(html.contains(r#"id="strategy-1-form""#));
        assert!(html.contains(r#"hx-get="/ui/strategies/1/forms/retrieve""#));
        assert!(html.contains("/{memoryStrategyId}/prefs/"));
        assert!(html.contains("No namespaces"));
    }

    #[test]
    fn test_detail_without_strategies() {
        let memory = serde_json::from_value(serde_json::json!({"id": "m"})).unwrap();
        let html = MemoryDetailView::from_memory(&memory).to_html();
        assert!(html.contains("No strategies configured for this memory."));
    }

    #[test]
    fn test_form_keeps_field_values_escaped() {
        let view = FormView {
            strategy_index: 2,
            kind: FormKind::Records,
            fields: StrategyForms {
                namespace: r#"/a"b/"#.to_string(),
                ..StrategyForms::default()
            },
        };
        let html = view.to_html();
        assert!(html.contains(r#"hx-post="/ui/strategies/2/records""#));
        assert!(html.contains(r#"value="/a&quot;b/""#));
        assert!(html.contains("Loading memory records..."));
    }

    #[test]
    fn test_events_table() {
        let events: Vec<Event> = serde_json::from_value(serde_json::json!([
            {"eventId": "e 1", "data": {"text": "<script>"}}
        ]))
        .unwrap();
        let html = EventsTableView::from_events(&events).to_html();
        assert!(html.contains("1 event(s)"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"hx-get="/ui/inspect/event/e%201""#));

        let empty = EventsTableView::from_events(&[]).to_html();
        assert!(empty.contains("No events found."));
    }

    #[test]
    fn test_records_table_skips_view_for_unidentified() {
        let records: Vec<Record> = serde_json::from_value(serde_json::json!([
            {"content": {"text": "orphan record"}}
        ]))
        .unwrap();
        let html = RecordsTableView::listing("/ns/", &records).to_html();
        assert!(html.contains("Found 1 record(s)"));
        assert!(!html.contains("View JSON"));

        let empty = RecordsTableView::search("tea", "/ns/", &[]).to_html();
        assert!(empty.contains("No records found in namespace: /ns/"));
    }

    #[test]
    fn test_json_modal_escapes() {
        let html = JsonView {
            title: "Event: e1".into(),
            json: "{\n  \"a\": \"<b>\"\n}".into(),
        }
        .to_html();
        assert!(html.contains("Event: e1"));
        assert!(html.contains("&quot;a&quot;: &quot;&lt;b&gt;&quot;"));
        assert!(html.contains(r#"hx-post="/ui/inspect/copy""#));
    }

    #[test]
    fn test_oob_wraps_inner() {
        assert_eq!(
            oob(ids::MEMORY_INFO, ""),
            r#"<div id="memory-info" hx-swap-oob="innerHTML"></div>"#
        );
    }
}
