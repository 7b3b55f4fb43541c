// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroU64;

use log::debug;
use serde_json::Value;

use crate::filter::{FilterInput, FilterVariables};
use crate::pagination::PaginationController;
use crate::variables::{VariableNames, VariablePatch};

/// Translates filter predicates into variable patches.
///
/// A changed filter invalidates every cursor of the previous result set, so each patch also
/// restarts pagination at the first page in forward mode.
#[derive(Clone, Debug, Default)]
pub struct FilterController {
    filters: FilterVariables,
    pagination: PaginationController,
}

impl FilterController {
    /// Returns a controller writing to the given pagination and filter variable names.
    pub fn new(names: VariableNames, filters: FilterVariables) -> Self {
        Self {
            filters,
            pagination: PaginationController::new(names),
        }
    }

    /// Returns the patch applying the given predicates.
    pub fn apply(&self, input: &FilterInput, rows_per_page: NonZeroU64) -> VariablePatch {
        let patch = self.patch(
            input.ref_list(),
            input.status_list(),
            input.type_list(),
            rows_per_page,
        );

        debug!("Apply filter {:?}", patch);
        patch
    }

    /// Returns the patch clearing all predicates.
    pub fn reset(&self, rows_per_page: NonZeroU64) -> VariablePatch {
        let patch = self.patch(None, None, None, rows_per_page);
        debug!("Reset filter {:?}", patch);
        patch
    }

    fn patch(
        &self,
        refs: Option<Vec<String>>,
        statuses: Option<Vec<String>>,
        types: Option<Vec<String>>,
        rows_per_page: NonZeroU64,
    ) -> VariablePatch {
        let names = self.pagination.names();
        let mut patch = self.pagination.restart(rows_per_page);

        for (name, values) in [
            (&self.filters.refs, refs),
            (&self.filters.statuses, statuses),
            (&self.filters.types, types),
        ]
        .iter()
        {
            let value = match values {
                Some(values) => Value::from(values.clone()),
                None => Value::Null,
            };

            patch.set(&names.resolve(name), value);
        }

        patch
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{json, Value};

    use crate::filter::{FilterInput, FilterVariables};
    use crate::test_helpers::rows;
    use crate::variables::VariableNames;

    use super::FilterController;

    #[test]
    fn apply_normalizes_empty_predicates() {
        let controller = FilterController::default();
        let patch = controller.apply(&FilterInput::new("  ", &[], &["HD"]), rows(10));

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({
                "page": 0,
                "first": 10,
                "last": null,
                "before": null,
                "after": null,
                "ref": null,
                "status": null,
                "type": ["HD"],
            })
        );
    }

    #[test]
    fn apply_splits_references() {
        let controller = FilterController::default();
        let patch = controller.apply(&FilterInput::new("A B", &["CREATED"], &[]), rows(10));

        assert_eq!(patch.get("ref"), Some(&json!(["A", "B"])));
        assert_eq!(patch.get("status"), Some(&json!(["CREATED"])));
        assert_eq!(patch.get("type"), Some(&Value::Null));
    }

    #[test]
    fn reset_clears_all_prefixed_filters() {
        let controller = FilterController::new(
            VariableNames::with_prefix("orders"),
            FilterVariables::default(),
        );
        let patch = controller.reset(rows(25));

        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({
                "page": 0,
                "orders_first": 25,
                "orders_last": null,
                "orders_before": null,
                "orders_after": null,
                "orders_ref": null,
                "orders_status": null,
                "orders_type": null,
            })
        );
    }

    #[test]
    fn custom_filter_variable_names() {
        let controller = FilterController::new(
            VariableNames::new(),
            FilterVariables {
                refs: "refs".into(),
                statuses: "statuses".into(),
                types: "kinds".into(),
            },
        );
        let patch = controller.apply(&FilterInput::new("X", &[], &["CC"]), rows(10));

        assert_eq!(patch.get("refs"), Some(&json!(["X"])));
        assert_eq!(patch.get("statuses"), Some(&Value::Null));
        assert_eq!(patch.get("kinds"), Some(&json!(["CC"])));
        assert!(!patch.contains("ref"));
    }

    proptest! {
        #[test]
        fn filters_always_restart_forward(
            refs in "[ A-Z0-9\\-]{0,20}",
            statuses in prop::collection::vec("[A-Z]{1,8}", 0..4),
            types in prop::collection::vec("[A-Z]{1,4}", 0..4),
            size in 1u64..200,
        ) {
            let controller = FilterController::default();
            let input = FilterInput { refs, statuses, types };

            for patch in [controller.apply(&input, rows(size)), controller.reset(rows(size))].iter() {
                prop_assert_eq!(patch.get("page"), Some(&json!(0)));
                prop_assert_eq!(patch.get("first"), Some(&json!(size)));
                prop_assert_eq!(patch.get("after"), Some(&Value::Null));
                prop_assert_eq!(patch.get("last"), Some(&Value::Null));
                prop_assert_eq!(patch.get("before"), Some(&Value::Null));

                // Filter values are either unset or a non-empty list
                for name in ["ref", "status", "type"].iter() {
                    match patch.get(name) {
                        Some(Value::Null) => {}
                        Some(Value::Array(values)) => prop_assert!(!values.is_empty()),
                        other => prop_assert!(false, "unexpected value {:?}", other),
                    }
                }
            }
        }
    }
}
