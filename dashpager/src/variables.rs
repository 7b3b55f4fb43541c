// SPDX-License-Identifier: AGPL-3.0-or-later

//! Named query variables and the patches which update them.
//!
//! Variables are kept as untyped JSON values since they are handed as-is to the GraphQL layer.
//! Setting a variable to `null` clears it.
use std::collections::btree_map::Iter;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the UI-only page counter variable. It is never prefixed.
pub const PAGE_VARIABLE: &str = "page";

const FIRST_VARIABLE: &str = "first";
const AFTER_VARIABLE: &str = "after";
const LAST_VARIABLE: &str = "last";
const BEFORE_VARIABLE: &str = "before";

/// Resolves the variable names of one paginated connection.
///
/// Views listing more than one connection on the same page namespace their variables with a
/// prefix, `orders` turns `first` into `orders_first`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableNames {
    /// Optional namespace of all connection variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl VariableNames {
    /// Returns variable names without any prefix.
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Returns variable names namespaced with the given prefix.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_owned()),
        }
    }

    /// Returns the full name of a connection variable.
    pub fn resolve(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => format!("{}_{}", prefix, name),
            _ => name.to_owned(),
        }
    }

    /// Name of the UI-only page counter, never prefixed.
    pub fn page(&self) -> String {
        PAGE_VARIABLE.to_owned()
    }

    /// Name of the forward page size variable.
    pub fn first(&self) -> String {
        self.resolve(FIRST_VARIABLE)
    }

    /// Name of the forward cursor variable.
    pub fn after(&self) -> String {
        self.resolve(AFTER_VARIABLE)
    }

    /// Name of the backward page size variable.
    pub fn last(&self) -> String {
        self.resolve(LAST_VARIABLE)
    }

    /// Name of the backward cursor variable.
    pub fn before(&self) -> String {
        self.resolve(BEFORE_VARIABLE)
    }
}

/// Current set of named query variables of a view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryVariables(BTreeMap<String, Value>);

impl QueryVariables {
    /// Returns an empty set of variables.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the value of a variable, `None` if it is not set or `null`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.0.get(name) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Returns true if the variable holds a non-null value.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets a single variable.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_owned(), value.into());
    }

    /// Merges all entries of a patch into the current variables in one step.
    ///
    /// Entries holding `null` are kept as explicit `null` values so that the GraphQL layer sends
    /// them as cleared arguments.
    pub fn merge(&mut self, patch: &VariablePatch) {
        for (name, value) in patch.iter() {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Returns the total number of variables, including cleared ones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no variable was ever set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over all variables in name order.
    pub fn iter(&self) -> Iter<String, Value> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, Value>> for QueryVariables {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Partial set of variables which gets merged atomically into the current variables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariablePatch(BTreeMap<String, Value>);

impl VariablePatch {
    /// Returns an empty patch.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets a variable to the given value, overwriting earlier entries for the same name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_owned(), value.into());
    }

    /// Clears a variable by setting it explicitly to `null`.
    pub fn clear(&mut self, name: &str) {
        self.0.insert(name.to_owned(), Value::Null);
    }

    /// Returns the value this patch assigns to a variable, `None` if it does not touch it.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns true if this patch touches the given variable, even when clearing it.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Adds all entries of another patch, entries of `other` win.
    pub fn extend(&mut self, other: VariablePatch) {
        self.0.extend(other.0);
    }

    /// Number of variables touched by this patch.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if merging this patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over all entries in name order.
    pub fn iter(&self) -> Iter<String, Value> {
        self.0.iter()
    }
}
