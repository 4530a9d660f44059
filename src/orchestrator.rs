//! API-call orchestration.
//!
//! Every user-triggered query goes through [`ApiCall::run`]:
//!
//! 1. the validator runs synchronously and writes its own warning on rejection,
//! 2. the surface switches to a loading indicator,
//! 3. the producer performs exactly one request,
//! 4. either the render function or the error message finishes the surface.
//!
//! Per call the surface sees either the validator's warning alone, or loading
//! followed by exactly one of success or error. Nothing is retried.
//!
//! # Example
//!
//! ```rust
//! use memory_browser::orchestrator::{ApiCall, CallOutcome};
//! use memory_browser::surface::{Surface, SurfaceState};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let surface = Surface::new("results");
//! let outcome = ApiCall::new(&surface)
//!     .loading_message("Loading events...")
//!     .error_prefix("Error loading events")
//!     .run(
//!         |_| true,
//!         || async { Err::<(), _>("HTTP 500: Internal Server Error") },
//!         |_, ()| unreachable!(),
//!     )
//!     .await;
//!
//! assert!(matches!(outcome, CallOutcome::Failed(_)));
//! assert_eq!(
//!     surface.state(),
//!     SurfaceState::Error("Error loading events: HTTP 500: Internal Server Error".into())
//! );
//! # });
//! ```

use std::borrow::Cow;
use std::fmt::Display;
use std::future::Future;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::surface::{Surface, SurfaceState, SurfaceWriter};

/// Default loading message.
pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";

/// Default error prefix.
pub const DEFAULT_ERROR_PREFIX: &str = "Error";

/// How an orchestrated call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The validator rejected the input; no request was made.
    Rejected,
    /// The render function ran.
    Rendered,
    /// The request failed; carries the message written to the surface.
    Failed(String),
    /// A newer write took the surface while the request was in flight; the
    /// result was ignored on arrival.
    Superseded,
}

/// One orchestrated request against a display surface.
#[derive(Debug)]
pub struct ApiCall<'a> {
    surface: &'a Surface,
    loading_message: Cow<'static, str>,
    error_prefix: Cow<'static, str>,
}

impl<'a> ApiCall<'a> {
    /// Target `surface` with the default messages.
    pub fn new(surface: &'a Surface) -> Self {
        Self {
            surface,
            loading_message: Cow::Borrowed(DEFAULT_LOADING_MESSAGE),
            error_prefix: Cow::Borrowed(DEFAULT_ERROR_PREFIX),
        }
    }

    /// Message shown while the request is in flight.
    #[must_use]
    pub fn loading_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.loading_message = message.into();
        self
    }

    /// Prefix of the error message (`"{prefix}: {error}"`).
    #[must_use]
    pub fn error_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.error_prefix = prefix.into();
        self
    }

    /// Validate, load, request once, then render or report the error.
    pub async fn run<T, E, V, P, Fut, R>(self, validate: V, produce: P, render: R) -> CallOutcome
    where
        V: FnOnce(&Surface) -> bool,
        P: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        R: FnOnce(&SurfaceWriter<'_>, T),
    {
        let call_id = Uuid::new_v4();
        let surface = self.surface.name().to_string();

        if !validate(self.surface) {
            debug!(%call_id, surface = %surface, "Validation rejected call");
            return CallOutcome::Rejected;
        }

        let ticket = self.surface.begin_loading(self.loading_message.into_owned());
        info!(
            name: "api_call.started",
            %call_id,
            surface = %surface,
            generation = ticket.generation(),
            "API call started"
        );

        match produce().await {
            Ok(result) => {
                if !self.surface.is_current(ticket) {
                    warn!(
                        name: "api_call.superseded",
                        %call_id,
                        surface = %surface,
                        "Result arrived after a newer write; ignoring"
                    );
                    return CallOutcome::Superseded;
                }
                render(&SurfaceWriter::new(self.surface, ticket), result);
                info!(name: "api_call.rendered", %call_id, surface = %surface, "API call rendered");
                CallOutcome::Rendered
            }
            Err(err) => {
                let message = format!("{}: {err}", self.error_prefix);
                error!(
                    name: "api_call.failed",
                    %call_id,
                    surface = %surface,
                    error = %err,
                    "{}", self.error_prefix
                );
                if self.surface.write(ticket, SurfaceState::Error(message.clone())) {
                    CallOutcome::Failed(message)
                } else {
                    warn!(
                        name: "api_call.superseded",
                        %call_id,
                        surface = %surface,
                        "Error arrived after a newer write; ignoring"
                    );
                    CallOutcome::Superseded
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::Panel;
    use std::cell::Cell;

    fn notice(text: &str) -> Panel {
        Panel::Info(text.to_string())
    }

    #[tokio::test]
    async fn test_rejected_call_never_produces() {
        let surface = Surface::new("results");
        let produced = Cell::new(false);

        let outcome = ApiCall::new(&surface)
            .run(
                |s| {
                    s.show_warning("Please enter a namespace.");
                    false
                },
                || async {
                    produced.set(true);
                    Ok::<_, String>(())
                },
                |_, ()| {},
            )
            .await;

        assert_eq!(outcome, CallOutcome::Rejected);
        assert!(!produced.get());
        assert_eq!(
            surface.state(),
            SurfaceState::Warning("Please enter a namespace.".to_string())
        );
    }

    #[tokio::test]
    async fn test_loading_is_shown_before_producing() {
        let surface = Surface::new("results");
        let seen_during_request = std::cell::RefCell::new(None);

        let outcome = ApiCall::new(&surface)
            .loading_message("Loading events...")
            .run(
                |_| true,
                || async {
                    *seen_during_request.borrow_mut() = Some(surface.state());
                    Ok::<_, String>(3)
                },
                |writer, n: i32| {
                    writer.show(notice(&format!("{n} event(s)")));
                },
            )
            .await;

        assert_eq!(outcome, CallOutcome::Rendered);
        assert_eq!(
            seen_during_request.into_inner(),
            Some(SurfaceState::Loading("Loading events...".to_string()))
        );
        assert_eq!(surface.state(), SurfaceState::Ready(notice("3 event(s)")));
    }

    #[tokio::test]
    async fn test_failure_writes_prefixed_error_and_skips_render() {
        let surface = Surface::new("results");
        let rendered = Cell::new(false);

        let outcome = ApiCall::new(&surface)
            .error_prefix("Error loading memory records")
            .run(
                |_| true,
                || async { Err::<(), _>("HTTP 503: Service Unavailable") },
                |_, ()| rendered.set(true),
            )
            .await;

        let expected = "Error loading memory records: HTTP 503: Service Unavailable";
        assert_eq!(outcome, CallOutcome::Failed(expected.to_string()));
        assert!(!rendered.get());
        assert_eq!(surface.state(), SurfaceState::Error(expected.to_string()));
    }

    #[tokio::test]
    async fn test_default_messages() {
        let surface = Surface::new("results");
        let outcome = ApiCall::new(&surface)
            .run(|_| true, || async { Err::<(), _>("boom") }, |_, ()| {})
            .await;
        assert_eq!(outcome, CallOutcome::Failed("Error: boom".to_string()));
    }

    #[tokio::test]
    async fn test_stale_success_is_ignored() {
        let surface = Surface::new("results");
        let rendered = Cell::new(false);

        let outcome = ApiCall::new(&surface)
            .run(
                |_| true,
                || async {
                    // A newer call starts while this one is in flight.
                    let _newer = surface.begin_loading("newer");
                    Ok::<_, String>(())
                },
                |_, ()| rendered.set(true),
            )
            .await;

        assert_eq!(outcome, CallOutcome::Superseded);
        assert!(!rendered.get());
        assert_eq!(surface.state(), SurfaceState::Loading("newer".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_older_call_loses_to_newer() {
        use std::time::Duration;

        let surface = Surface::new("results");
        let call = |delay_ms: u64, label: &'static str| {
            let surface = surface.clone();
            async move {
                ApiCall::new(&surface)
                    .run(
                        |_| true,
                        || async move {
                            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                            Ok::<_, String>(label)
                        },
                        |writer, label| {
                            writer.show(notice(label));
                        },
                    )
                    .await
            }
        };

        let slow = call(200, "older");
        // Started second, so it owns the newer generation.
        let fast = async {
            tokio::task::yield_now().await;
            call(10, "newer").await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(fast, CallOutcome::Rendered);
        assert_eq!(slow, CallOutcome::Superseded);
        assert_eq!(surface.state(), SurfaceState::Ready(notice("newer")));
    }

    #[tokio::test]
    async fn test_stale_error_is_ignored() {
        let surface = Surface::new("results");

        let outcome = ApiCall::new(&surface)
            .run(
                |_| true,
                || async {
                    surface.show(notice("newer result"));
                    Err::<(), _>("late failure")
                },
                |_, ()| {},
            )
            .await;

        assert_eq!(outcome, CallOutcome::Superseded);
        assert_eq!(surface.state(), SurfaceState::Ready(notice("newer result")));
    }
}
