//! View renderers.
//!
//! [`model`] turns API types into display-ready view models; [`html`] renders
//! those to the fragments htmx swaps into the page.

pub mod components;
pub mod html;
pub mod model;

pub use html::{ToHtml, oob, toast};
pub use model::{
    EventsTableView, FormView, JsonView, MemoryDetailView, MemoryInfoView, MemoryListView,
    RecordsTableView, StatusBadge, StrategyTabView,
};

/// Content a surface can show once ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// Detail placeholder shown while nothing is selected.
    Welcome,
    /// Informational notice.
    Info(String),
    MemoryList(MemoryListView),
    MemoryInfo(MemoryInfoView),
    MemoryDetail(MemoryDetailView),
    Events(EventsTableView),
    Records(RecordsTableView),
}

/// Element ids of swap targets.
pub mod ids {
    pub const MEMORY_LIST: &str = "memory-list";
    pub const MEMORY_INFO: &str = "memory-info";
    pub const MEMORY_DETAIL: &str = "memory-detail";
    pub const MODAL: &str = "modal-slot";
    pub const TOAST: &str = "toast";

    #[must_use]
    pub fn strategy_form(index: usize) -> String {
        format!("strategy-{index}-form")
    }

    #[must_use]
    pub fn strategy_results(index: usize) -> String {
        format!("strategy-{index}-results")
    }

    #[must_use]
    pub fn strategy_indicator(index: usize) -> String {
        format!("strategy-{index}-indicator")
    }
}
