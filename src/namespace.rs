//! Namespace-template resolution.

use crate::sdk::Strategy;

/// Placeholder standing for the owning strategy's identifier.
pub const STRATEGY_ID_PLACEHOLDER: &str = "{memoryStrategyId}";

/// Used when a strategy declares no namespaces.
pub const DEFAULT_NAMESPACE: &str = "/default/";

/// Resolve the namespace a sub-query form starts from.
///
/// Takes the strategy's first namespace template and substitutes every
/// occurrence of [`STRATEGY_ID_PLACEHOLDER`] with the strategy identifier.
#[must_use]
pub fn resolve_namespace(strategy: &Strategy) -> String {
    strategy
        .namespaces
        .first()
        .map_or_else(
            || DEFAULT_NAMESPACE.to_string(),
            |template| template.replace(STRATEGY_ID_PLACEHOLDER, &strategy.strategy_id),
        )
}

/// Write `value` into `field` only when the field is empty.
///
/// Returns whether the field was written.
pub fn seed_if_empty(field: &mut String, value: impl FnOnce() -> String) -> bool {
    if !field.is_empty() {
        return false;
    }
    *field = value();
    true
}
