// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bidirectional cursor pagination behind a page-number interface.
//!
//! Connections do not expose a total count. A view therefore only knows the page counter it keeps
//! itself and the cursors of the items it currently shows. Moving forward continues after the
//! last cursor with `first`/`after`, moving back ends before the first cursor with
//! `last`/`before`. Changing the page size or any filter starts over at the first page.
mod controller;
mod mode;

pub use controller::{ButtonState, PaginationController};
pub use mode::{default_rows_per_page, Direction, PaginationMode, PaginationState};
