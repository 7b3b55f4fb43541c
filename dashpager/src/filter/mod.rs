// SPDX-License-Identifier: AGPL-3.0-or-later

//! Filter predicates of a list view and the variable patches they produce.
mod controller;
mod input;

use serde::{Deserialize, Serialize};

use crate::variables::VariableNames;

pub use controller::FilterController;
pub use input::FilterInput;

/// Names of the query variables the filter predicates are written to.
///
/// Names get namespaced with the prefix of the connection variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterVariables {
    /// List of references, entered as whitespace separated text.
    pub refs: String,

    /// List of selected statuses.
    pub statuses: String,

    /// List of selected types.
    pub types: String,
}

impl FilterVariables {
    /// Returns all resolved filter variable names.
    pub fn resolve_all(&self, names: &VariableNames) -> Vec<String> {
        vec![
            names.resolve(&self.refs),
            names.resolve(&self.statuses),
            names.resolve(&self.types),
        ]
    }
}

impl Default for FilterVariables {
    fn default() -> Self {
        Self {
            refs: "ref".into(),
            statuses: "status".into(),
            types: "type".into(),
        }
    }
}
