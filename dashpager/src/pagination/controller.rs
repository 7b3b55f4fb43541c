// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroU64;

use log::debug;
use serde::Serialize;

use crate::connection::{Edge, PageInfo};
use crate::pagination::{Direction, PaginationMode};
use crate::variables::{VariableNames, VariablePatch};

/// Enabled state of the "previous" and "next" page buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonState {
    /// Disable the button moving one page back.
    pub disable_previous: bool,

    /// Disable the button moving one page forward.
    pub disable_next: bool,
}

/// Derives pagination affordances and produces the variable patches for page navigation.
///
/// The controller is stateless, page counter and page size are handed in with every call.
#[derive(Clone, Debug, Default)]
pub struct PaginationController {
    names: VariableNames,
}

impl PaginationController {
    /// Returns a controller writing to the given variable names.
    pub fn new(names: VariableNames) -> Self {
        Self { names }
    }

    /// Names of the variables this controller writes to.
    pub fn names(&self) -> &VariableNames {
        &self.names
    }

    /// Decides which page buttons are enabled.
    ///
    /// Without a total count the only hint about a following page is `hasNextPage`, which is only
    /// meaningful when paginating forward. A backward window is always reached by stepping back
    /// from a later page, so "next" stays enabled then.
    pub fn derive_button_state<T>(
        &self,
        page: u64,
        page_info: &PageInfo,
        edges: &[Edge<T>],
        direction: Direction,
    ) -> ButtonState {
        // Without items there is no cursor to continue from in either direction
        if edges.is_empty() {
            return ButtonState {
                disable_previous: true,
                disable_next: true,
            };
        }

        let disable_next = match direction {
            Direction::Forward => !page_info.has_next_page,
            Direction::Backward => false,
        };

        ButtonState {
            disable_previous: page == 0,
            disable_next,
        }
    }

    /// Returns the patch to move one page forward, continuing after the last item of the current
    /// page.
    ///
    /// Returns `None` when the current page is empty or the page counter is exhausted.
    pub fn next_page<T>(
        &self,
        edges: &[Edge<T>],
        rows_per_page: NonZeroU64,
        page: u64,
    ) -> Option<VariablePatch> {
        let cursor = edges.last()?.cursor.clone();
        let next = page.checked_add(1)?;
        let mode = PaginationMode::Forward {
            first: rows_per_page,
            after: Some(cursor),
        };

        let patch = self.patch(next, &mode);
        debug!("Move to next page {:?}", patch);
        Some(patch)
    }

    /// Returns the patch to move one page back, ending before the first item of the current page.
    ///
    /// Returns `None` when the current page is empty or already the first one.
    pub fn previous_page<T>(
        &self,
        edges: &[Edge<T>],
        rows_per_page: NonZeroU64,
        page: u64,
    ) -> Option<VariablePatch> {
        let cursor = edges.first()?.cursor.clone();
        let previous = page.checked_sub(1)?;
        let mode = PaginationMode::Backward {
            last: rows_per_page,
            before: Some(cursor),
        };

        let patch = self.patch(previous, &mode);
        debug!("Move to previous page {:?}", patch);
        Some(patch)
    }

    /// Returns the patch for a new page size. This always restarts at the first page.
    pub fn change_rows_per_page(&self, rows_per_page: NonZeroU64) -> VariablePatch {
        let patch = self.restart(rows_per_page);
        debug!("Change rows per page {:?}", patch);
        patch
    }

    /// Dispatches a page change requested by a page number, as pagination widgets report them.
    ///
    /// Only steps of one page are possible with cursors: any larger page number moves one page
    /// forward, any smaller one moves one page back.
    pub fn change_page<T>(
        &self,
        edges: &[Edge<T>],
        rows_per_page: NonZeroU64,
        page: u64,
        new_page: u64,
    ) -> Option<VariablePatch> {
        if new_page > page {
            self.next_page(edges, rows_per_page, page)
        } else if new_page < page {
            self.previous_page(edges, rows_per_page, page)
        } else {
            None
        }
    }

    /// Returns the patch resetting the view to the first page in forward mode.
    pub fn restart(&self, rows_per_page: NonZeroU64) -> VariablePatch {
        self.patch(0, &PaginationMode::start(rows_per_page))
    }

    fn patch(&self, page: u64, mode: &PaginationMode) -> VariablePatch {
        let mut patch = mode.to_patch(&self.names);
        patch.set(&self.names.page(), page);
        patch
    }
}
