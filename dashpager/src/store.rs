// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeSet;

use log::trace;

use crate::variables::{QueryVariables, VariablePatch};

/// Holder of the query variables of a view.
///
/// Setting variables merges the whole patch at once and triggers a new fetch of the connection.
/// Implementations must never expose a partially merged patch to the query layer.
pub trait VariableStore {
    /// Returns the current variables.
    fn current(&self) -> &QueryVariables;

    /// Merges a patch into the current variables.
    ///
    /// With `add_to_url` the touched variables are also mirrored into the URL of the view.
    fn set_variables(&mut self, patch: VariablePatch, add_to_url: bool);
}

/// Variable store keeping everything in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryVariableStore {
    variables: QueryVariables,
    url_variables: BTreeSet<String>,
    revision: u64,
}

impl MemoryVariableStore {
    /// Returns a new store holding the given variables.
    pub fn new(variables: QueryVariables) -> Self {
        Self {
            variables,
            url_variables: BTreeSet::new(),
            revision: 0,
        }
    }

    /// Names of all variables which were requested to be mirrored into the URL.
    pub fn url_variables(&self) -> &BTreeSet<String> {
        &self.url_variables
    }

    /// Number of patches merged so far. Each one stands for one fetch of the connection.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Consumes the store and returns its variables.
    pub fn into_variables(self) -> QueryVariables {
        self.variables
    }
}

impl VariableStore for MemoryVariableStore {
    fn current(&self) -> &QueryVariables {
        &self.variables
    }

    fn set_variables(&mut self, patch: VariablePatch, add_to_url: bool) {
        self.variables.merge(&patch);

        if add_to_url {
            self.url_variables
                .extend(patch.iter().map(|(name, _)| name.clone()));
        }

        self.revision += 1;
        trace!("Merged variables revision {}", self.revision);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::variables::{QueryVariables, VariablePatch};

    use super::{MemoryVariableStore, VariableStore};

    #[test]
    fn merge_patches_and_count_revisions() {
        let mut store = MemoryVariableStore::new(QueryVariables::new());

        let mut patch = VariablePatch::new();
        patch.set("first", 10);
        store.set_variables(patch, false);

        let mut patch = VariablePatch::new();
        patch.set("page", 1);
        patch.set("after", "C10");
        store.set_variables(patch, true);

        assert_eq!(store.revision(), 2);
        assert_eq!(
            store.url_variables().iter().cloned().collect::<Vec<String>>(),
            vec!["after".to_string(), "page".to_string()]
        );
        assert_eq!(
            serde_json::to_value(store.current()).unwrap(),
            json!({ "after": "C10", "first": 10, "page": 1 })
        );
    }
}
