// SPDX-License-Identifier: AGPL-3.0-or-later

use std::num::NonZeroU64;

use crate::connection::{Connection, Edge, PageInfo};

/// Returns a page size, panics on zero.
pub fn rows(count: u64) -> NonZeroU64 {
    NonZeroU64::new(count).expect("Page size needs to be larger than zero")
}

/// Returns `count` edges with nodes `1..=count` and cursors `C1` to `C<count>`.
pub fn edges(count: usize) -> Vec<Edge<u64>> {
    (1..=count)
        .map(|index| Edge::new(index as u64, format!("C{}", index)))
        .collect()
}

/// Returns a connection with `count` edges and the given page info.
pub fn connection(count: usize, has_next_page: bool) -> Connection<u64> {
    Connection::new(edges(count), PageInfo::new(has_next_page, false))
}
