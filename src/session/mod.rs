//! Selection and inspection state.
//!
//! One [`BrowserSession`] holds everything the viewer remembers between
//! requests: the selected memory, per-strategy form fields, and lookup maps of
//! the events and records returned by the last query. Lookup maps are replaced
//! wholesale on every query, so an id from an earlier query is no longer
//! inspectable.
//!
//! # Example
//!
//! ```rust
//! use memory_browser::session::{BrowserSession, ItemKind};
//! use memory_browser::sdk::Event;
//!
//! let session = BrowserSession::new();
//! let event: Event = serde_json::from_value(serde_json::json!({"eventId": "e1"})).unwrap();
//! session.replace_events(&[event]);
//!
//! let item = session.inspect(ItemKind::Event, "e1").unwrap();
//! assert_eq!(item.title, "Event: e1");
//! assert!(session.inspect(ItemKind::Record, "e1").is_none());
//! ```

mod inspect;
mod state;

pub use inspect::{InspectedItem, ItemKind, UnknownItemKind};
pub use state::{
    BrowserSession, FieldEdits, FormKind, SessionError, StrategyContext, StrategyForms,
    UnknownFormKind,
};

#[cfg(test)]
pub(crate) use state::tests::memory_with_strategies;
