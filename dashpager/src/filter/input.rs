// SPDX-License-Identifier: AGPL-3.0-or-later

use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::filter::FilterVariables;
use crate::variables::{QueryVariables, VariableNames};

/// Filter predicates as entered into the filter form of a list view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterInput {
    /// Whitespace separated references.
    pub refs: String,

    /// Selected statuses.
    pub statuses: Vec<String>,

    /// Selected types.
    pub types: Vec<String>,
}

impl FilterInput {
    /// Returns filter input from form values.
    pub fn new(refs: &str, statuses: &[&str], types: &[&str]) -> Self {
        Self {
            refs: refs.to_owned(),
            statuses: statuses.iter().map(|status| (*status).to_owned()).collect(),
            types: types.iter().map(|kind| (*kind).to_owned()).collect(),
        }
    }

    /// Reads untyped form values, normalizing anything malformed to an empty predicate.
    ///
    /// Accepts the keys `refs`, `statuses` and `types` as well as the `filterRefs`,
    /// `filterStatus` and `filterType` keys used by form components.
    pub fn from_value(value: &Value) -> Self {
        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Self::default(),
            _ => {
                warn!("Ignore malformed filter input {}", value);
                return Self::default();
            }
        };

        let refs = match lookup(object, &["refs", "filterRefs"]) {
            Some(Value::String(refs)) => refs.clone(),
            None | Some(Value::Null) => String::new(),
            Some(value) => {
                warn!("Ignore non-string references {}", value);
                String::new()
            }
        };

        Self {
            refs,
            statuses: string_list(lookup(object, &["statuses", "filterStatus"])),
            types: string_list(lookup(object, &["types", "filterType"])),
        }
    }

    /// Restores the predicates which are currently active in the given variables.
    pub fn from_variables(
        variables: &QueryVariables,
        names: &VariableNames,
        filters: &FilterVariables,
    ) -> Self {
        let refs = string_list(variables.get(&names.resolve(&filters.refs))).join(" ");

        Self {
            refs,
            statuses: string_list(variables.get(&names.resolve(&filters.statuses))),
            types: string_list(variables.get(&names.resolve(&filters.types))),
        }
    }

    /// References split on whitespace, `None` if no reference was entered.
    pub fn ref_list(&self) -> Option<Vec<String>> {
        let refs: Vec<String> = self.refs.split_whitespace().map(String::from).collect();
        non_empty(refs)
    }

    /// Selected statuses, `None` if nothing was selected.
    pub fn status_list(&self) -> Option<Vec<String>> {
        non_empty(self.statuses.clone())
    }

    /// Selected types, `None` if nothing was selected.
    pub fn type_list(&self) -> Option<Vec<String>> {
        non_empty(self.types.clone())
    }

    /// Returns true if no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.ref_list().is_none() && self.statuses.is_empty() && self.types.is_empty()
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.clone()),
                _ => {
                    warn!("Drop non-string filter value {}", item);
                    None
                }
            })
            .collect(),
        Some(value) => {
            warn!("Ignore non-list filter value {}", value);
            Vec::new()
        }
    }
}

fn non_empty(list: Vec<String>) -> Option<Vec<String>> {
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
