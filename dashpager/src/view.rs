// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroU64;

use log::{debug, warn};

use crate::config::Configuration;
use crate::connection::Connection;
use crate::errors::ConfigurationError;
use crate::filter::{FilterController, FilterInput};
use crate::pagination::{
    default_rows_per_page, ButtonState, PaginationController, PaginationState,
};
use crate::store::VariableStore;
use crate::variables::{QueryVariables, VariablePatch};

/// A paginated and filterable list backed by one connection.
///
/// The view binds pagination and filter controllers to the configured variable names and turns
/// every user interaction into exactly one merge into the variable store.
#[derive(Clone, Debug)]
pub struct ListView {
    config: Configuration,
    pagination: PaginationController,
    filter: FilterController,
}

impl ListView {
    /// Returns a new list view after validating its configuration.
    pub fn new(config: Configuration) -> Result<Self, ConfigurationError> {
        config.validate()?;

        Ok(Self {
            pagination: PaginationController::new(config.variables.clone()),
            filter: FilterController::new(config.variables.clone(), config.filters.clone()),
            config,
        })
    }

    /// Returns the validated configuration of this view.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    fn default_rows_per_page(&self) -> NonZeroU64 {
        NonZeroU64::new(self.config.rows_per_page).unwrap_or_else(default_rows_per_page)
    }

    /// Variables of a freshly loaded view: first page, forward, no filters.
    pub fn initial_variables(&self) -> QueryVariables {
        let mut variables = QueryVariables::new();
        variables.merge(&self.filter.reset(self.default_rows_per_page()));
        variables
    }

    /// Reconstructs the pagination state from the current variables.
    pub fn state(&self, variables: &QueryVariables) -> PaginationState {
        PaginationState::from_variables(
            variables,
            self.pagination.names(),
            self.default_rows_per_page(),
        )
    }

    /// Returns the predicates currently active in the variables, to populate the filter form.
    pub fn filter_input(&self, variables: &QueryVariables) -> FilterInput {
        FilterInput::from_variables(variables, &self.config.variables, &self.config.filters)
    }

    /// Decides which page buttons are enabled for the latest connection result.
    pub fn button_state<T>(
        &self,
        variables: &QueryVariables,
        connection: &Connection<T>,
    ) -> ButtonState {
        let state = self.state(variables);

        self.pagination.derive_button_state(
            state.page,
            &connection.page_info,
            &connection.edges,
            state.direction(),
        )
    }

    /// Handles a page change reported by the pagination widget.
    ///
    /// Returns false when nothing was changed, for example because the current page is empty.
    pub fn change_page<S, T>(&self, store: &mut S, connection: &Connection<T>, new_page: u64) -> bool
    where
        S: VariableStore,
    {
        let state = self.state(store.current());
        let patch = self.pagination.change_page(
            &connection.edges,
            state.rows_per_page(),
            state.page,
            new_page,
        );

        match patch {
            Some(patch) => {
                self.commit(store, patch);
                true
            }
            None => {
                debug!(
                    "Ignore page change from {} to {} on {} items",
                    state.page,
                    new_page,
                    connection.edges.len()
                );
                false
            }
        }
    }

    /// Handles a new page size selected by the user.
    pub fn change_rows_per_page<S>(&self, store: &mut S, rows_per_page: NonZeroU64)
    where
        S: VariableStore,
    {
        let options = &self.config.rows_per_page_options;
        if !options.is_empty() && !options.contains(&rows_per_page.get()) {
            warn!(
                "Rows per page {} is not one of the offered options {:?}",
                rows_per_page, options
            );
        }

        let patch = self.pagination.change_rows_per_page(rows_per_page);
        self.commit(store, patch);
    }

    /// Handles a submitted filter form.
    pub fn submit_filter<S>(&self, store: &mut S, input: &FilterInput)
    where
        S: VariableStore,
    {
        let state = self.state(store.current());
        let patch = self.filter.apply(input, state.rows_per_page());
        self.commit(store, patch);
    }

    /// Handles a reset of the filter form.
    pub fn reset_filter<S>(&self, store: &mut S)
    where
        S: VariableStore,
    {
        let state = self.state(store.current());
        let patch = self.filter.reset(state.rows_per_page());
        self.commit(store, patch);
    }

    fn commit<S>(&self, store: &mut S, patch: VariablePatch)
    where
        S: VariableStore,
    {
        store.set_variables(patch, self.config.add_to_url);
    }
}
