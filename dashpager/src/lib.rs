// SPDX-License-Identifier: AGPL-3.0-or-later

//! # dashpager
//!
//! Pagination and filter state for dashboard list views backed by a cursor-paginated GraphQL
//! connection.
//!
//! Views keep all their state in named query variables. Every user interaction is turned into a
//! single `VariablePatch` which is merged atomically into a `VariableStore`, the store then
//! triggers a new fetch of the connection.
//!
//! ```
//! use dashpager::{Configuration, FilterInput, ListView, MemoryVariableStore, VariableStore};
//!
//! let view = ListView::new(Configuration::default()).unwrap();
//! let mut store = MemoryVariableStore::new(view.initial_variables());
//!
//! view.submit_filter(&mut store, &FilterInput::new("A B", &["CREATED"], &[]));
//! assert_eq!(view.state(store.current()).page, 0);
//! ```
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

mod config;
mod connection;
mod context;
mod count;
mod errors;
mod filter;
mod pagination;
mod store;
#[cfg(test)]
mod test_helpers;
mod variables;
mod view;

pub use crate::config::{Configuration, DEFAULT_ROWS_PER_PAGE};
pub use crate::connection::{Connection, Cursor, Edge, PageInfo};
pub use crate::context::{AuthToken, RequestContext};
pub use crate::count::{ConnectionSource, PageWalker, Tally};
pub use crate::errors::{ConfigurationError, CountError, SourceError};
pub use crate::filter::{FilterController, FilterInput, FilterVariables};
pub use crate::pagination::{
    default_rows_per_page, ButtonState, Direction, PaginationController, PaginationMode,
    PaginationState,
};
pub use crate::store::{MemoryVariableStore, VariableStore};
pub use crate::variables::{QueryVariables, VariableNames, VariablePatch, PAGE_VARIABLE};
pub use crate::view::ListView;
