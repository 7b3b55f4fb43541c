// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::filter::FilterVariables;
use crate::variables::VariableNames;

/// Number of rows shown on one page when nothing else was configured.
pub const DEFAULT_ROWS_PER_PAGE: u64 = 10;

/// Configuration object of one paginated list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Page size used when the current variables do not hold one yet. Defaults to 10.
    pub rows_per_page: u64,

    /// Page sizes offered to the user. When not empty, `rows_per_page` needs to be one of them.
    pub rows_per_page_options: Vec<u64>,

    /// Names of the pagination variables of the connection.
    pub variables: VariableNames,

    /// Names of the filter variables of the connection.
    pub filters: FilterVariables,

    /// Mirror every variable change into the URL of the view, so that reloading the page restores
    /// the current window and filters.
    pub add_to_url: bool,

    /// Maximum number of pages fetched when walking a whole connection, for example to count its
    /// items.
    ///
    /// Connections do not expose a total count, counting them means following `hasNextPage`
    /// until the end. This limit stops data sources which never report the last page.
    pub max_pages: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            rows_per_page_options: vec![10, 25, 50],
            variables: VariableNames::default(),
            filters: FilterVariables::default(),
            add_to_url: false,
            max_pages: 10_000,
        }
    }
}

impl Configuration {
    /// Checks the configuration for values which would lead to an inconsistent view.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.rows_per_page == 0 || self.rows_per_page_options.contains(&0) {
            return Err(ConfigurationError::ZeroRowsPerPage);
        }

        if !self.rows_per_page_options.is_empty()
            && !self.rows_per_page_options.contains(&self.rows_per_page)
        {
            return Err(ConfigurationError::RowsPerPageNotAnOption(
                self.rows_per_page,
                self.rows_per_page_options.clone(),
            ));
        }

        if self.max_pages == 0 {
            return Err(ConfigurationError::ZeroMaxPages);
        }

        let reserved = [
            self.variables.page(),
            self.variables.first(),
            self.variables.after(),
            self.variables.last(),
            self.variables.before(),
        ];

        let mut seen: Vec<String> = Vec::new();
        for name in self.filters.resolve_all(&self.variables) {
            if reserved.contains(&name) {
                return Err(ConfigurationError::ReservedFilterVariable(name));
            }

            if seen.contains(&name) {
                return Err(ConfigurationError::DuplicateFilterVariable(name));
            }

            seen.push(name);
        }

        Ok(())
    }
}
