//! Memory Browser
//!
//! An HTML-first viewer for a memory inspection API: list memories, inspect a
//! memory's strategies, query its events and records, and view any listed item
//! as JSON.
//!
//! # Architecture
//!
//! - **SDK**: [`sdk`] is the typed HTTP client for `/api/memories`
//! - **Controller**: [`browser`] turns user actions into orchestrated API calls
//! - **Surfaces**: [`surface`] holds what each panel shows; [`orchestrator`]
//!   drives them through loading, error and ready states
//! - **UI**: [`views`] renders surfaces to HTMX fragments served by [`server`]
//!
//! # Modules
//!
//! - [`api`]: seam between the controller and the SDK
//! - [`session`]: selection, form fields and item lookup
//! - [`preview`]: one-line previews of arbitrary JSON payloads
//! - [`namespace`]: namespace template resolution
//! - [`clipboard`]: copy with fallback

#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod browser;
pub mod clipboard;
pub mod config;
pub mod format;
pub mod namespace;
pub mod orchestrator;
pub mod preview;
pub mod server;
pub mod session;
pub mod surface;
pub mod views;

pub use memory_browser_sdk as sdk;

use std::sync::Arc;

use crate::browser::MemoryBrowser;
use crate::config::AppConfig;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Controller behind every `/ui` route.
    pub browser: Arc<MemoryBrowser>,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(browser: MemoryBrowser, config: AppConfig) -> Self {
        Self {
            browser: Arc::new(browser),
            config: Arc::new(config),
        }
    }
}
