// SPDX-License-Identifier: AGPL-3.0-or-later

//! Walk all pages of a connection to count or collect its items.
//!
//! Connections do not report a total count. Counting their items means following `hasNextPage`
//! page by page until the data source reports the end. The walk state is an explicit accumulator
//! value which every step consumes and returns, nothing is shared between iterations.
use std::num::NonZeroU64;

use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, trace};
use serde_json::Value;

use crate::config::Configuration;
use crate::connection::{Connection, Cursor};
use crate::context::RequestContext;
use crate::errors::{CountError, SourceError};
use crate::pagination::PaginationMode;
use crate::variables::{QueryVariables, VariableNames};

/// Data source answering connection queries for a set of variables.
#[async_trait]
pub trait ConnectionSource {
    /// Item type of the connection.
    type Node: Send;

    /// Fetches one page of the connection.
    async fn fetch(
        &self,
        context: &RequestContext,
        variables: &QueryVariables,
    ) -> Result<Connection<Self::Node>, SourceError>;
}

/// State of a walk after a number of fetched pages.
#[derive(Debug, Clone, PartialEq)]
struct Walk<A> {
    /// Value accumulated from all pages so far.
    acc: A,

    /// Cursor to continue after, `None` before the first page.
    after: Option<Cursor>,

    /// Number of pages fetched so far.
    pages: u64,
}

/// Outcome of folding one page into a walk.
#[derive(Debug, PartialEq)]
enum Step<A> {
    Continue(Walk<A>),
    Done(A),
}

impl<A> Walk<A> {
    fn start(acc: A) -> Self {
        Self {
            acc,
            after: None,
            pages: 0,
        }
    }

    /// Folds a fetched page into the accumulator and decides whether to continue.
    fn step<N, F>(
        self,
        connection: Connection<N>,
        max_pages: u64,
        fold: &F,
    ) -> Result<Step<A>, CountError>
    where
        F: Fn(A, Vec<N>) -> A,
    {
        let pages = self.pages + 1;
        let has_next_page = connection.page_info.has_next_page;
        let last_cursor = connection.last_cursor().cloned();
        let acc = fold(self.acc, connection.into_nodes());

        if !has_next_page {
            return Ok(Step::Done(acc));
        }

        let after = match last_cursor {
            Some(cursor) => cursor,
            None => return Err(CountError::Stalled(pages)),
        };

        if pages >= max_pages {
            return Err(CountError::TooManyPages(max_pages));
        }

        Ok(Step::Continue(Walk {
            acc,
            after: Some(after),
            pages,
        }))
    }
}

/// Fetches all pages of a connection, moving forward with a fixed page size.
#[derive(Clone, Debug)]
pub struct PageWalker {
    names: VariableNames,
    page_size: NonZeroU64,
    max_pages: u64,
}

impl PageWalker {
    /// Returns a walker requesting `page_size` items per page.
    pub fn new(names: VariableNames, page_size: NonZeroU64) -> Self {
        Self {
            names,
            page_size,
            max_pages: Configuration::default().max_pages,
        }
    }

    /// Returns a walker using the variable names and page limit of a list view configuration.
    pub fn from_config(config: &Configuration, page_size: NonZeroU64) -> Self {
        Self {
            names: config.variables.clone(),
            page_size,
            max_pages: config.max_pages,
        }
    }

    /// Sets the number of pages after which the walk is aborted.
    pub fn max_pages(mut self, max_pages: u64) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Counts all items of the connection matching the base variables.
    pub async fn count<S>(
        &self,
        source: &S,
        context: &RequestContext,
        base: &QueryVariables,
    ) -> Result<u64, CountError>
    where
        S: ConnectionSource + Sync,
    {
        self.fold(source, context, base, 0, &|count: u64, nodes: Vec<S::Node>| {
            count + nodes.len() as u64
        })
        .await
    }

    /// Collects all items of the connection matching the base variables, in page order.
    pub async fn collect<S>(
        &self,
        source: &S,
        context: &RequestContext,
        base: &QueryVariables,
    ) -> Result<Vec<S::Node>, CountError>
    where
        S: ConnectionSource + Sync,
    {
        self.fold(source, context, base, Vec::new(), &|mut all: Vec<S::Node>, nodes: Vec<S::Node>| {
            all.extend(nodes);
            all
        })
        .await
    }

    /// Counts the items for every value of one filter variable, walking all variants concurrently.
    pub async fn count_by<S>(
        &self,
        source: &S,
        context: &RequestContext,
        base: &QueryVariables,
        variable: &str,
        values: &[&str],
    ) -> Result<Tally, CountError>
    where
        S: ConnectionSource + Sync,
    {
        let name = self.names.resolve(variable);

        let walks = values.iter().map(|value| {
            let mut variables = base.clone();
            variables.insert(&name, Value::from(vec![*value]));

            async move {
                let count = self.count(source, context, &variables).await?;
                Ok::<(String, u64), CountError>(((*value).to_owned(), count))
            }
        });

        Ok(Tally(try_join_all(walks).await?))
    }

    async fn fold<S, A, F>(
        &self,
        source: &S,
        context: &RequestContext,
        base: &QueryVariables,
        init: A,
        fold: &F,
    ) -> Result<A, CountError>
    where
        S: ConnectionSource + Sync,
        F: Fn(A, Vec<S::Node>) -> A,
    {
        let mut walk = Walk::start(init);

        loop {
            let variables = self.variables(base, &walk.after);
            trace!("Fetch page {} with {:?}", walk.pages + 1, variables);

            let connection = source.fetch(context, &variables).await?;

            walk = match walk.step(connection, self.max_pages, fold)? {
                Step::Continue(next) => next,
                Step::Done(acc) => {
                    debug!("Walked all pages of connection at {}", context.endpoint);
                    return Ok(acc);
                }
            };
        }
    }

    fn variables(&self, base: &QueryVariables, after: &Option<Cursor>) -> QueryVariables {
        let mode = PaginationMode::Forward {
            first: self.page_size,
            after: after.clone(),
        };

        let mut variables = base.clone();
        variables.merge(&mode.to_patch(&self.names));
        variables
    }
}

/// Item counts per filter value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally(Vec<(String, u64)>);

impl Tally {
    /// Returns the count of one filter value.
    pub fn get(&self, value: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(key, _)| key == value)
            .map(|(_, count)| *count)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }

    /// Returns an iterator over all values and their counts, in the requested order.
    pub fn iter(&self) -> std::slice::Iter<(String, u64)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::connection::{Connection, Cursor, Edge, PageInfo};
    use crate::context::{AuthToken, RequestContext};
    use crate::errors::{CountError, SourceError};
    use crate::test_helpers::rows;
    use crate::variables::{QueryVariables, VariableNames};

    use super::{ConnectionSource, PageWalker, Step, Walk};

    /// In-memory connection over a list of `(id, status)` items.
    struct MemorySource {
        items: Vec<(u64, &'static str)>,
        requests: Mutex<Vec<QueryVariables>>,
    }

    impl MemorySource {
        fn new(items: Vec<(u64, &'static str)>) -> Self {
            Self {
                items,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<QueryVariables> {
            self.requests.lock().unwrap().clone()
        }
    }

    // Cursors are deliberately not ordered like the items to catch any interpretation of them
    fn cursor(id: u64) -> String {
        format!("opaque:{}", 1000 - id)
    }

    #[async_trait]
    impl ConnectionSource for MemorySource {
        type Node = u64;

        async fn fetch(
            &self,
            context: &RequestContext,
            variables: &QueryVariables,
        ) -> Result<Connection<u64>, SourceError> {
            self.requests.lock().unwrap().push(variables.clone());

            if context.authorization_header().is_none() {
                return Err(SourceError::Response("Unauthorized".into()));
            }

            let status = variables
                .get("status")
                .and_then(|value| value.get(0))
                .and_then(Value::as_str);
            let matching: Vec<u64> = self
                .items
                .iter()
                .filter(|(_, item_status)| status.map_or(true, |status| status == *item_status))
                .map(|(id, _)| *id)
                .collect();

            let start = match variables.get("after").and_then(Value::as_str) {
                Some(after) => matching
                    .iter()
                    .position(|id| cursor(*id) == after)
                    .map(|index| index + 1)
                    .unwrap_or(matching.len()),
                None => 0,
            };
            let first = variables.get("first").and_then(Value::as_u64).unwrap() as usize;
            let end = (start + first).min(matching.len());

            let edges = matching[start..end]
                .iter()
                .map(|id| Edge::new(*id, cursor(*id)))
                .collect();

            Ok(Connection::new(edges, PageInfo::new(end < matching.len(), start > 0)))
        }
    }

    fn context() -> RequestContext {
        RequestContext::new("http://localhost/graphql").with_token(AuthToken::bearer("secret"))
    }

    fn items() -> Vec<(u64, &'static str)> {
        vec![
            (1, "CREATED"),
            (2, "ACTIVE"),
            (3, "ACTIVE"),
            (4, "INACTIVE"),
            (5, "CREATED"),
        ]
    }

    #[tokio::test]
    async fn count_across_pages() {
        let source = MemorySource::new(items());
        let walker = PageWalker::new(VariableNames::new(), rows(2));

        let count = walker
            .count(&source, &context(), &QueryVariables::new())
            .await
            .unwrap();
        assert_eq!(count, 5);

        // Three pages, each continuing after the last cursor of the previous one
        let afters: Vec<Value> = source
            .requests()
            .iter()
            .map(|variables| variables.get("after").cloned().unwrap_or(Value::Null))
            .collect();
        assert_eq!(afters, vec![Value::Null, json!("opaque:998"), json!("opaque:996")]);
    }

    #[tokio::test]
    async fn collect_in_page_order() {
        let source = MemorySource::new(items());
        let walker = PageWalker::new(VariableNames::new(), rows(3));

        let nodes = walker
            .collect(&source, &context(), &QueryVariables::new())
            .await
            .unwrap();
        assert_eq!(nodes, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn count_by_status() {
        let source = MemorySource::new(items());
        let walker = PageWalker::new(VariableNames::new(), rows(1));

        let tally = walker
            .count_by(
                &source,
                &context(),
                &QueryVariables::new(),
                "status",
                &["CREATED", "ACTIVE", "INACTIVE"],
            )
            .await
            .unwrap();

        assert_eq!(tally.get("CREATED"), Some(2));
        assert_eq!(tally.get("ACTIVE"), Some(2));
        assert_eq!(tally.get("INACTIVE"), Some(1));
        assert_eq!(tally.get("DELETED"), None);
        assert_eq!(tally.total(), 5);
    }

    #[tokio::test]
    async fn empty_connection_counts_zero() {
        let source = MemorySource::new(vec![]);
        let walker = PageWalker::new(VariableNames::new(), rows(500));

        let count = walker
            .count(&source, &context(), &QueryVariables::new())
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn propagate_source_errors() {
        let source = MemorySource::new(items());
        let walker = PageWalker::new(VariableNames::new(), rows(2));

        let result = walker
            .count(
                &source,
                &RequestContext::new("http://localhost/graphql"),
                &QueryVariables::new(),
            )
            .await;

        assert!(matches!(
            result,
            Err(CountError::Source(SourceError::Response(_)))
        ));
    }

    #[tokio::test]
    async fn abort_after_max_pages() {
        let source = MemorySource::new(items());
        let walker = PageWalker::new(VariableNames::new(), rows(1)).max_pages(3);

        let result = walker
            .count(&source, &context(), &QueryVariables::new())
            .await;

        assert!(matches!(result, Err(CountError::TooManyPages(3))));
        assert_eq!(source.requests().len(), 3);
    }

    #[test]
    fn stall_on_next_page_without_items() {
        let connection: Connection<u64> = Connection::new(vec![], PageInfo::new(true, false));
        let step = Walk::start(0u64).step(connection, 10, &|count: u64, nodes: Vec<u64>| {
            count + nodes.len() as u64
        });

        assert!(matches!(step, Err(CountError::Stalled(1))));
    }

    #[test]
    fn step_threads_accumulator() {
        let connection = Connection::new(
            vec![Edge::new(7u64, "x"), Edge::new(8, "y")],
            PageInfo::new(true, false),
        );
        let step = Walk::start(vec![1u64])
            .step(connection, 10, &|mut all: Vec<u64>, nodes| {
                all.extend(nodes);
                all
            })
            .unwrap();

        assert_eq!(
            step,
            Step::Continue(Walk {
                acc: vec![1, 7, 8],
                after: Some(Cursor::new("y")),
                pages: 1,
            })
        );
    }
}
