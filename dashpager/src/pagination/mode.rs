// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroU64;

use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::config::DEFAULT_ROWS_PER_PAGE;
use crate::connection::Cursor;
use crate::variables::{QueryVariables, VariableNames, VariablePatch};

/// Returns the fallback page size as a non-zero value.
pub fn default_rows_per_page() -> NonZeroU64 {
    NonZeroU64::new(DEFAULT_ROWS_PER_PAGE).unwrap_or(NonZeroU64::MIN)
}

/// Direction in which a connection is traversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Paginating with `first` and `after`.
    Forward,

    /// Paginating with `last` and `before`.
    Backward,
}

/// Cursor arguments of a connection query.
///
/// Forward and backward arguments are mutually exclusive. A mode is always rendered into all four
/// variables, the inactive pair is cleared explicitly so that no stale cursor survives a merge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaginationMode {
    /// Fetch `first` items after the `after` cursor, or from the start without a cursor.
    Forward {
        /// Number of items to fetch.
        first: NonZeroU64,

        /// Last item of the previous window.
        after: Option<Cursor>,
    },

    /// Fetch `last` items before the `before` cursor, or from the end without a cursor.
    Backward {
        /// Number of items to fetch.
        last: NonZeroU64,

        /// First item of the following window.
        before: Option<Cursor>,
    },
}

impl PaginationMode {
    /// Returns the mode of the very first page: forward, without a cursor.
    pub fn start(rows_per_page: NonZeroU64) -> Self {
        Self::Forward {
            first: rows_per_page,
            after: None,
        }
    }

    /// Returns the direction of this mode.
    pub fn direction(&self) -> Direction {
        match self {
            PaginationMode::Forward { .. } => Direction::Forward,
            PaginationMode::Backward { .. } => Direction::Backward,
        }
    }

    /// Number of items requested per page.
    pub fn rows_per_page(&self) -> NonZeroU64 {
        match self {
            PaginationMode::Forward { first, .. } => *first,
            PaginationMode::Backward { last, .. } => *last,
        }
    }

    /// Renders the cursor arguments into a patch, clearing the inactive pair.
    pub fn to_patch(&self, names: &VariableNames) -> VariablePatch {
        let mut patch = VariablePatch::new();

        match self {
            PaginationMode::Forward { first, after } => {
                patch.set(&names.first(), first.get());
                set_cursor(&mut patch, &names.after(), after);
                patch.clear(&names.last());
                patch.clear(&names.before());
            }
            PaginationMode::Backward { last, before } => {
                patch.clear(&names.first());
                patch.clear(&names.after());
                patch.set(&names.last(), last.get());
                set_cursor(&mut patch, &names.before(), before);
            }
        }

        patch
    }
}

fn set_cursor(patch: &mut VariablePatch, name: &str, cursor: &Option<Cursor>) {
    match cursor {
        Some(cursor) => patch.set(name, cursor.as_str()),
        None => patch.clear(name),
    }
}

/// Pagination state of a view, reconstructed from its current variables.
///
/// Nothing of this is retained between calls, the variables are the only source of truth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationState {
    /// UI-only page counter, starting at 0.
    pub page: u64,

    /// Cursor arguments of the current window.
    pub mode: PaginationMode,
}

impl PaginationState {
    /// Returns the state of a freshly loaded view.
    pub fn initial(rows_per_page: NonZeroU64) -> Self {
        Self {
            page: 0,
            mode: PaginationMode::start(rows_per_page),
        }
    }

    /// Reads page counter and cursor arguments from the current variables.
    ///
    /// Page size is taken from `first`, otherwise `last`, otherwise the given default. The state
    /// is only backward when no `first` is set and `last` or `before` is. Malformed values are
    /// logged and replaced by defaults.
    pub fn from_variables(
        variables: &QueryVariables,
        names: &VariableNames,
        default_rows_per_page: NonZeroU64,
    ) -> Self {
        let page = read_count(variables, &names.page()).unwrap_or(0);
        let first = read_rows(variables, &names.first());
        let last = read_rows(variables, &names.last());
        let after = read_cursor(variables, &names.after());
        let before = read_cursor(variables, &names.before());

        let mode = match (first, last) {
            (Some(first), _) => PaginationMode::Forward { first, after },
            (None, Some(last)) => PaginationMode::Backward { last, before },
            (None, None) if before.is_some() => PaginationMode::Backward {
                last: default_rows_per_page,
                before,
            },
            (None, None) => PaginationMode::Forward {
                first: default_rows_per_page,
                after,
            },
        };

        Self { page, mode }
    }

    /// Page size of the current window.
    pub fn rows_per_page(&self) -> NonZeroU64 {
        self.mode.rows_per_page()
    }

    /// Direction the current window was fetched in.
    pub fn direction(&self) -> Direction {
        self.mode.direction()
    }
}

/// Reads an unsigned integer, accepting numeric strings as they come back from URL parameters.
fn read_count(variables: &QueryVariables, name: &str) -> Option<u64> {
    let value = variables.get(name)?;

    let count = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    if count.is_none() {
        warn!("Ignore malformed value {} of variable '{}'", value, name);
    }

    count
}

fn read_rows(variables: &QueryVariables, name: &str) -> Option<NonZeroU64> {
    let count = read_count(variables, name)?;
    let rows = NonZeroU64::new(count);

    if rows.is_none() {
        warn!("Ignore zero page size in variable '{}'", name);
    }

    rows
}

fn read_cursor(variables: &QueryVariables, name: &str) -> Option<Cursor> {
    match variables.get(name)? {
        Value::String(token) => Some(Cursor::new(token.as_str())),
        value => {
            warn!("Ignore non-string cursor {} in variable '{}'", value, name);
            None
        }
    }
}
