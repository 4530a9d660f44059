//! Small HTML building blocks shared by the view renderers.
//!
//! Every function here takes already-escaped attribute strings but escapes
//! the visible text it is given.

use crate::format::escape_html;

use super::model::StatusBadge;

/// Button visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary action button.
    #[default]
    Primary,
    /// Secondary action button.
    Secondary,
    /// Subtle ghost button.
    Ghost,
    /// Outline button.
    Outline,
}

impl ButtonVariant {
    /// CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Secondary => "btn btn-secondary",
            Self::Ghost => "btn btn-ghost",
            Self::Outline => "btn btn-outline",
        }
    }
}

/// Kind of inline notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    fn classes(self) -> &'static str {
        match self {
            Self::Info => "alert alert-info",
            Self::Warning => "alert alert-warning",
            Self::Error => "alert alert-danger",
        }
    }
}

/// `<button>` with htmx attributes in `attrs`.
#[must_use]
pub fn button(variant: ButtonVariant, attrs: &str, label: &str) -> String {
    format!(
        r#"<button type="button" class="{classes}" {attrs}>{label}</button>"#,
        classes = variant.classes(),
        label = escape_html(label),
    )
}

/// Status pill.
#[must_use]
pub fn badge(status: &StatusBadge) -> String {
    format!(
        r#"<span class="badge {tone}">{label}</span>"#,
        tone = status.tone.css_class(),
        label = escape_html(&status.label),
    )
}

/// Inline notice.
#[must_use]
pub fn notice(kind: NoticeKind, message: &str) -> String {
    format!(
        r#"<div class="{classes}" role="status">{message}</div>"#,
        classes = kind.classes(),
        message = escape_html(message),
    )
}

/// Spinner with a message.
#[must_use]
pub fn loading(message: &str) -> String {
    format!(
        r#"<div class="loading" role="status"><span class="spinner"></span><span>{message}</span></div>"#,
        message = escape_html(message),
    )
}

/// Label / value row for detail lists. `value_html` must already be escaped.
#[must_use]
pub fn field_row(label: &str, value_html: &str) -> String {
    format!(
        r#"<div class="field"><dt>{label}</dt><dd>{value_html}</dd></div>"#,
        label = escape_html(label),
    )
}

/// `hx-vals` attribute carrying `value` as JSON.
#[must_use]
pub fn hx_vals(value: &serde_json::Value) -> String {
    format!(r#"hx-vals="{}""#, escape_html(&value.to_string()))
}
