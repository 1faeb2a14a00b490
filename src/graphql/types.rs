//! GraphQL wire types: request body, response envelope, relay connections

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{OpenCtiError, Result};

/// POST body for the GraphQL endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub variables: &'a Value,
}

/// Response envelope. Either part may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,

    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: Option<String>,
}

impl GraphqlResponse {
    /// First error message, if the server reported any
    pub fn first_error(&self) -> Option<String> {
        self.errors.as_ref().and_then(|errors| errors.first()).map(|e| {
            e.message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "unknown GraphQL error".to_string())
        })
    }

    /// Resolve the envelope into its `data` object.
    ///
    /// A non-empty `errors` list wins over any partial data. Missing or null
    /// `data` becomes an empty object.
    pub fn into_data(self) -> Result<Value> {
        if let Some(message) = self.first_error() {
            return Err(OpenCtiError::RemoteApplication(message));
        }

        Ok(match self.data {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(data) => data,
        })
    }
}

/// Relay-style list: `{ edges: [{ node: T }] }`
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Option<Vec<Edge<T>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: None }
    }
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().flatten().map(|edge| &edge.node)
    }

    pub fn into_nodes(self) -> Vec<T> {
        self.edges.unwrap_or_default().into_iter().map(|edge| edge.node).collect()
    }

    pub fn first(&self) -> Option<&T> {
        self.nodes().next()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.as_ref().is_none_or(|edges| edges.is_empty())
    }
}
