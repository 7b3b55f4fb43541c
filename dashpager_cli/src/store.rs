// SPDX-License-Identifier: AGPL-3.0-or-later

use dashpager::{MemoryVariableStore, QueryVariables, VariablePatch, VariableStore};
use log::debug;

/// Variable store remembering the last merged patch, so it can be printed.
#[derive(Debug)]
pub struct RecordingStore {
    inner: MemoryVariableStore,
    last_patch: Option<VariablePatch>,
}

impl RecordingStore {
    pub fn new(variables: QueryVariables) -> Self {
        Self {
            inner: MemoryVariableStore::new(variables),
            last_patch: None,
        }
    }

    /// Returns the most recently merged patch, if any.
    pub fn last_patch(&self) -> Option<&VariablePatch> {
        self.last_patch.as_ref()
    }
}

impl VariableStore for RecordingStore {
    fn current(&self) -> &QueryVariables {
        self.inner.current()
    }

    fn set_variables(&mut self, patch: VariablePatch, add_to_url: bool) {
        debug!("Set variables {:?} (add to url: {})", patch, add_to_url);
        self.last_patch = Some(patch.clone());
        self.inner.set_variables(patch, add_to_url);
    }
}
