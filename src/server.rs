//! HTTP host for the viewer.
//!
//! `/` serves the page shell; everything under `/ui` returns HTML fragments
//! for htmx to swap in. Handlers await the browser action, then render the
//! state of the surface it wrote to.

use std::str::FromStr;

use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::AppState;
use crate::browser::MemoryBrowser;
use crate::format::escape_html;
use crate::session::{FieldEdits, FormKind, ItemKind};
use crate::surface::Surface;
use crate::views::components::{ButtonVariant, NoticeKind, button, notice};
use crate::views::{JsonView, Panel, ToHtml, ids, oob, toast};

/// Build the router for `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/ui/memories", get(memories_handler))
        .route("/ui/refresh", post(refresh_handler))
        .route("/ui/select", post(select_handler))
        .route("/ui/strategies/{index}/forms/{kind}", get(form_handler))
        .route("/ui/strategies/{index}/fields", post(fields_handler))
        .route("/ui/strategies/{index}/events", post(events_handler))
        .route("/ui/strategies/{index}/records", post(records_handler))
        .route("/ui/strategies/{index}/retrieve", post(retrieve_handler))
        .route("/ui/inspect/copy", post(copy_json_handler))
        .route("/ui/inspect/{kind}/{id}", get(inspect_handler))
        .route("/ui/copy", post(copy_handler))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `state.config.server` and serve until the process exits.
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve(listener, state).await
}

/// Serve on an already-bound listener.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    let address = listener.local_addr()?;
    let api = state.config.api.base_url.clone();
    let app = build_router(state);

    info!(
        name: "server.started",
        address = %address,
        api = %api,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(html_shell(&state.config.ui.htmx_src, &index_content()))
}

/// Page shell around `content`.
fn html_shell(htmx_src: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Memory inspection viewer">
    <title>Memory Browser</title>
    <script src="{htmx_src}"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <div id="app-shell" class="layout">
        {content}
    </div>
    <div id="{modal}"></div>
    <div id="{toast}" class="toast-slot" aria-live="polite"></div>
</body>
</html>"#,
        htmx_src = escape_html(htmx_src),
        modal = ids::MODAL,
        toast = ids::TOAST,
    )
}

fn index_content() -> String {
    let refresh = button(
        ButtonVariant::Ghost,
        &format!(
            r##"hx-post="/ui/refresh" hx-target="#{list}" title="Reload memories""##,
            list = ids::MEMORY_LIST,
        ),
        "Refresh",
    );
    format!(
        r#"<aside class="sidebar">
            <header class="sidebar-header"><h1>Memories</h1>{refresh}</header>
            <div id="{list}" hx-get="/ui/memories" hx-trigger="load"></div>
            <div id="{info}"></div>
        </aside>
        <main class="main">
            <span id="detail-indicator" class="htmx-indicator"><span class="spinner"></span></span>
            <div id="{detail}">{welcome}</div>
        </main>"#,
        list = ids::MEMORY_LIST,
        info = ids::MEMORY_INFO,
        detail = ids::MEMORY_DETAIL,
        welcome = Panel::Welcome.to_html(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory list & selection
// ─────────────────────────────────────────────────────────────────────────────

/// GET /ui/memories - Load the memory list.
async fn memories_handler(State(state): State<AppState>) -> Html<String> {
    state.browser.load_memories().await;
    render(state.browser.memory_list())
}

/// POST /ui/refresh - Clear the selection and reload the list.
async fn refresh_handler(State(state): State<AppState>) -> Html<String> {
    let browser = &state.browser;
    browser.refresh().await;
    Html(format!(
        "{list}{info}{detail}",
        list = browser.memory_list().state().to_html(),
        info = oob(ids::MEMORY_INFO, &browser.memory_info().state().to_html()),
        detail = oob(ids::MEMORY_DETAIL, &browser.memory_detail().state().to_html()),
    ))
}

#[derive(Debug, Deserialize)]
struct SelectForm {
    #[serde(default)]
    memory_id: String,
}

/// POST /ui/select - Select a memory, or clear with an empty id.
async fn select_handler(
    State(state): State<AppState>,
    Form(form): Form<SelectForm>,
) -> Html<String> {
    let browser = &state.browser;
    browser.select_memory(&form.memory_id).await;
    Html(format!(
        "{detail}{info}",
        detail = browser.memory_detail().state().to_html(),
        info = oob(ids::MEMORY_INFO, &browser.memory_info().state().to_html()),
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Sub-query forms
// ─────────────────────────────────────────────────────────────────────────────

/// GET /ui/strategies/{index}/forms/{kind} - Open a sub-query form.
async fn form_handler(
    State(state): State<AppState>,
    Path((index, kind)): Path<(usize, String)>,
) -> Response {
    let kind = match FormKind::from_str(&kind) {
        Ok(kind) => kind,
        Err(err) => {
            warn!(error = %err, "Form request with unknown kind");
            return not_found(&err.to_string());
        }
    };
    match state.browser.open_form(index, kind) {
        Ok(view) => Html(view.to_html()).into_response(),
        Err(err) => not_found(&err.to_string()),
    }
}

/// POST /ui/strategies/{index}/fields - Remember edited field values.
async fn fields_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(edits): Form<FieldEdits>,
) -> Response {
    match state.browser.update_fields(index, edits) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => not_found(&err.to_string()),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EventsForm {
    session_id: String,
    actor_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecordsForm {
    namespace: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RetrieveForm {
    search_query: String,
    retrieve_namespace: String,
}

/// POST /ui/strategies/{index}/events - List events.
async fn events_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(form): Form<EventsForm>,
) -> Response {
    let browser = &state.browser;
    browser
        .list_events(index, &form.session_id, &form.actor_id)
        .await;
    strategy_results(browser, index)
}

/// POST /ui/strategies/{index}/records - List records of a namespace.
async fn records_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(form): Form<RecordsForm>,
) -> Response {
    let browser = &state.browser;
    browser.list_records(index, &form.namespace).await;
    strategy_results(browser, index)
}

/// POST /ui/strategies/{index}/retrieve - Search records.
async fn retrieve_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(form): Form<RetrieveForm>,
) -> Response {
    let browser = &state.browser;
    browser
        .retrieve_records(index, &form.search_query, &form.retrieve_namespace)
        .await;
    strategy_results(browser, index)
}

fn strategy_results(browser: &MemoryBrowser, index: usize) -> Response {
    match browser.strategy_results(index) {
        Some(surface) => render(&surface).into_response(),
        None => not_found(&format!("strategy {index} not found")),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inspection & clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// GET /ui/inspect/{kind}/{id} - JSON modal for a listed item.
async fn inspect_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    let kind = match ItemKind::from_str(&kind) {
        Ok(kind) => kind,
        Err(err) => {
            warn!(error = %err, "Inspect request with unknown kind");
            return StatusCode::NO_CONTENT.into_response();
        }
    };
    match state.browser.inspect(kind, &id) {
        Some(item) => Html(JsonView::from(item).to_html()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// POST /ui/inspect/copy - Copy the displayed JSON.
async fn copy_json_handler(State(state): State<AppState>) -> Html<String> {
    let outcome = state.browser.copy_inspected_json();
    Html(outcome.message().map(toast).unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CopyForm {
    text: String,
    label: Option<String>,
}

/// POST /ui/copy - Copy arbitrary text.
async fn copy_handler(State(state): State<AppState>, Form(form): Form<CopyForm>) -> Html<String> {
    let outcome = state.browser.copy_text(&form.text, form.label.as_deref());
    Html(outcome.message().map(toast).unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn render(surface: &Surface) -> Html<String> {
    Html(surface.state().to_html())
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(notice(NoticeKind::Error, message)),
    )
        .into_response()
}
