//! Directory conventions for dbt models.
//!
//! A model's layer is decided by its name prefix alone. The rule table is
//! ordered; the first matching prefix wins and anything unrecognised lands in
//! staging.

use crate::domain::value_objects::ModelLayer;

/// Prefix rules in evaluation order.
pub const LAYER_RULES: &[(&str, ModelLayer)] = &[
    ("stg_", ModelLayer::Staging),
    ("int_", ModelLayer::Intermediate),
    ("fct_", ModelLayer::Marts),
    ("dim_", ModelLayer::Marts),
];

/// Layer used when no prefix rule matches.
pub const FALLBACK_LAYER: ModelLayer = ModelLayer::Staging;

/// Map a model name to the layer directory it belongs in.
///
/// Total over all strings: never fails, never touches the filesystem.
pub fn resolve(name: &str) -> ModelLayer {
    LAYER_RULES
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix))
        .map(|(_, layer)| *layer)
        .unwrap_or(FALLBACK_LAYER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_prefix() {
        assert_eq!(resolve("stg_x"), ModelLayer::Staging);
        assert_eq!(resolve("int_x"), ModelLayer::Intermediate);
        assert_eq!(resolve("fct_x"), ModelLayer::Marts);
        assert_eq!(resolve("dim_x"), ModelLayer::Marts);
        assert_eq!(resolve("other_x"), ModelLayer::Staging);
    }

    #[test]
    fn bare_prefix_without_underscore_falls_back() {
        assert_eq!(resolve("fct"), ModelLayer::Staging);
        assert_eq!(resolve("intermediate_orders"), ModelLayer::Staging);
    }

    #[test]
    fn empty_and_odd_inputs_have_a_layer() {
        assert_eq!(resolve(""), ModelLayer::Staging);
        assert_eq!(resolve("DIM_upper"), ModelLayer::Staging);
        assert_eq!(resolve("dim_"), ModelLayer::Marts);
    }

    #[test]
    fn resolution_is_deterministic() {
        for name in ["stg_a", "int_b", "fct_c", "zzz"] {
            assert_eq!(resolve(name), resolve(name));
        }
    }
}
