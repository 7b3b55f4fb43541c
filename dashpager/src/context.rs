// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use serde::{Deserialize, Serialize};

/// Authorization token in the form it gets persisted after login, for example
/// `{ "type": "Bearer", "value": "..." }`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// Authorization scheme.
    #[serde(rename = "type")]
    pub kind: String,

    /// Secret token value.
    pub value: String,
}

impl AuthToken {
    /// Returns a token for the given authorization scheme.
    pub fn new(kind: &str, value: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            value: value.to_owned(),
        }
    }

    /// Returns a bearer token.
    pub fn bearer(value: &str) -> Self {
        Self::new("Bearer", value)
    }
}

// Never print the secret into logs
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("kind", &self.kind)
            .field("value", &"***")
            .finish()
    }
}

/// Everything needed to issue requests against the data source.
///
/// The context is handed explicitly to whatever sends requests, credentials are never looked up
/// from global state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// URL of the GraphQL endpoint.
    pub endpoint: String,

    /// Token sent with every request, if any.
    #[serde(default)]
    pub token: Option<AuthToken>,
}

impl RequestContext {
    /// Returns a context for an endpoint without authorization.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_owned(),
            token: None,
        }
    }

    /// Returns this context with the given token attached.
    pub fn with_token(mut self, token: AuthToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Value of the `Authorization` header, `None` without a token.
    pub fn authorization_header(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("{} {}", token.kind, token.value))
    }
}
