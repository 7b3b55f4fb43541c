// SPDX-License-Identifier: AGPL-3.0-or-later

use thiserror::Error;

/// Invalid values found while validating a `Configuration`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Page sizes need to hold at least one item.
    #[error("Rows per page needs to be larger than zero")]
    ZeroRowsPerPage,

    /// The default page size is not selectable in the rows-per-page options.
    #[error("Default rows per page {0} is not part of the rows per page options {1:?}")]
    RowsPerPageNotAnOption(u64, Vec<u64>),

    /// Two filters write into the same query variable.
    #[error("Filter variable '{0}' is used more than once")]
    DuplicateFilterVariable(String),

    /// Filter variable name collides with a pagination variable.
    #[error("Filter variable '{0}' collides with a pagination variable")]
    ReservedFilterVariable(String),

    /// Walking a connection needs a limit to terminate on misbehaving data sources.
    #[error("Maximum number of pages needs to be larger than zero")]
    ZeroMaxPages,
}

/// Errors returned by a data source when fetching one page of a connection.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The request could not be sent or no response was received.
    #[error("Request to '{0}' failed: {1}")]
    Request(String, String),

    /// The data source responded with errors instead of data.
    #[error("Data source returned errors: {0}")]
    Response(String),

    /// The response could not be decoded into a connection.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

/// Errors which can occur when walking all pages of a connection.
#[derive(Error, Debug)]
pub enum CountError {
    /// Error returned from the data source.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The data source reported a next page but returned no items to continue from.
    #[error("Data source reported a next page after page {0} but returned no cursor to continue from")]
    Stalled(u64),

    /// The walk did not terminate within the configured number of pages.
    #[error("Stopped after reaching the maximum of {0} pages")]
    TooManyPages(u64),
}
