// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Opaque position token of an item inside a paginated result set.
///
/// Cursors are handed out by the data source and only ever passed back to it unchanged. They can
/// be compared for equality but carry no ordering, their contents are not interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Returns a new cursor wrapping the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token, as it should be sent back to the data source.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Generic paginated response of a GraphQL connection API.
///
/// Connections do not expose a total count, the only information about the surroundings of the
/// current window is held in `page_info`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    /// Items of the current window, in connection order.
    pub edges: Vec<Edge<T>>,

    /// Surroundings of the current window.
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Returns a new connection from edges and page info.
    pub fn new(edges: Vec<Edge<T>>, page_info: PageInfo) -> Self {
        Self { edges, page_info }
    }

    /// Returns true if this page does not contain any items.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Cursor of the first item in this page.
    pub fn first_cursor(&self) -> Option<&Cursor> {
        self.edges.first().map(|edge| &edge.cursor)
    }

    /// Cursor of the last item in this page.
    pub fn last_cursor(&self) -> Option<&Cursor> {
        self.edges.last().map(|edge| &edge.cursor)
    }

    /// Consumes the connection and returns the nodes in page order.
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

/// A single item of a connection, paired with its cursor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    /// The item itself.
    pub node: T,

    /// Opaque position of the item in the connection.
    pub cursor: Cursor,
}

impl<T> Edge<T> {
    /// Returns a new edge.
    pub fn new(node: T, cursor: impl Into<Cursor>) -> Self {
        Self {
            node,
            cursor: cursor.into(),
        }
    }
}

/// Information about the current window of a connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether the data source reports more items after this window.
    pub has_next_page: bool,

    /// Whether the data source reports items before this window.
    ///
    /// Many APIs omit this field when paginating forward, it defaults to `false` then.
    #[serde(default)]
    pub has_previous_page: bool,
}

impl PageInfo {
    /// Returns page info with the given flags.
    pub fn new(has_next_page: bool, has_previous_page: bool) -> Self {
        Self {
            has_next_page,
            has_previous_page,
        }
    }
}
