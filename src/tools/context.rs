//! Tool execution context - the knowledge-base client shared by all tools

use std::sync::Arc;

use crate::error::OpenCtiError;
use crate::graphql::QueryExecutor;

/// Execution context for tools
#[derive(Clone)]
pub struct ToolContext {
    client: Arc<dyn QueryExecutor>,
}

impl ToolContext {
    pub fn new(client: Arc<dyn QueryExecutor>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &dyn QueryExecutor {
        self.client.as_ref()
    }
}

/// Errors that can occur during tool dispatch and execution
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {name}")]
    UnknownTool { name: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The knowledge-base query itself failed
    #[error(transparent)]
    Query(#[from] OpenCtiError),
}
