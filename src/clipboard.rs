//! Copy-to-clipboard.
//!
//! The system clipboard (`arboard`) is tried first. When it is unavailable,
//! for example on a headless host, the text is sent to the controlling
//! terminal as an OSC 52 escape sequence instead. If both fail the copy is
//! only logged.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{info, warn};

/// Label used when the caller does not name what is being copied.
pub const DEFAULT_LABEL: &str = "content";

/// Clipboard failures.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("system clipboard unavailable: {0}")]
    System(#[from] arboard::Error),

    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can receive copied text.
pub trait ClipboardWriter: Send + Sync {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError`] when the text could not be written.
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(arboard::Clipboard::new()?);
        }
        if let Some(clipboard) = guard.as_mut() {
            clipboard.set_text(text.to_string())?;
        }
        Ok(())
    }
}

/// OSC 52 escape sequence written to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    /// The escape sequence that sets the clipboard to `text`.
    #[must_use]
    pub fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", BASE64.encode(text.as_bytes()))
    }
}

impl ClipboardWriter for Osc52Clipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(Self::sequence(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Result of a copy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Empty text; nothing was written.
    NothingToCopy,
    /// Copied; carries the confirmation message.
    Copied(String),
    /// Both writers failed.
    Failed,
}

impl CopyOutcome {
    /// Confirmation message, if the copy succeeded.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Copied(message) => Some(message),
            Self::NothingToCopy | Self::Failed => None,
        }
    }
}

/// Copy `text` with `primary`, falling back to `fallback`.
pub fn copy_with_fallback(
    primary: &dyn ClipboardWriter,
    fallback: &dyn ClipboardWriter,
    text: &str,
    label: Option<&str>,
) -> CopyOutcome {
    if text.is_empty() {
        warn!("No text to copy");
        return CopyOutcome::NothingToCopy;
    }
    let label = label.filter(|l| !l.is_empty()).unwrap_or(DEFAULT_LABEL);

    if let Err(err) = primary.set_text(text) {
        warn!(error = %err, "Clipboard write failed, trying fallback");
        if let Err(err) = fallback.set_text(text) {
            warn!(error = %err, label, "Fallback copy failed");
            return CopyOutcome::Failed;
        }
    }

    info!(name: "clipboard.copied", label, chars = text.chars().count(), "Copied to clipboard");
    CopyOutcome::Copied(format!("Copied {label} to clipboard!"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    /// In-memory clipboard that can be told to fail.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct MemoryClipboard {
        pub(crate) contents: Arc<Mutex<Vec<String>>>,
        pub(crate) fail: bool,
    }

    impl MemoryClipboard {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub(crate) fn writes(&self) -> Vec<String> {
            self.contents.lock().unwrap().clone()
        }
    }

    impl ClipboardWriter for MemoryClipboard {
        fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(std::io::Error::other("clipboard offline").into());
            }
            self.contents.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_primary_success() {
        let primary = MemoryClipboard::default();
        let fallback = MemoryClipboard::default();

        let outcome = copy_with_fallback(&primary, &fallback, "/strat-1/prefs/", Some("namespace"));
        assert_eq!(
            outcome,
            CopyOutcome::Copied("Copied namespace to clipboard!".to_string())
        );
        assert_eq!(primary.writes(), vec!["/strat-1/prefs/"]);
        assert!(fallback.writes().is_empty());
    }

    #[test]
    fn test_falls_back_when_primary_fails() {
        let primary = MemoryClipboard::failing();
        let fallback = MemoryClipboard::default();

        let outcome = copy_with_fallback(&primary, &fallback, "abc", None);
        assert_eq!(outcome.message(), Some("Copied content to clipboard!"));
        assert_eq!(fallback.writes(), vec!["abc"]);
    }

    #[test]
    fn test_both_failing_is_reported() {
        let outcome = copy_with_fallback(
            &MemoryClipboard::failing(),
            &MemoryClipboard::failing(),
            "abc",
            Some("JSON"),
        );
        assert_eq!(outcome, CopyOutcome::Failed);
        assert_eq!(outcome.message(), None);
    }

    #[test]
    fn test_empty_text_writes_nothing() {
        let primary = MemoryClipboard::default();
        let outcome = copy_with_fallback(&primary, &primary, "", Some("JSON"));
        assert_eq!(outcome, CopyOutcome::NothingToCopy);
        assert!(primary.writes().is_empty());
    }

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(Osc52Clipboard::sequence("hi"), "\x1b]52;c;aGk=\x07");
    }
}
