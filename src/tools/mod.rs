//! Tool system exposed to the agent runtime
//!
//! Three tools, one per knowledge-base query. Each is a plain async function
//! (usable directly) plus a `Tool` wrapper that takes JSON arguments for the
//! registry and the MCP server.

mod context;
mod entity;
mod observable;
mod registry;
mod search;

pub use context::{ToolContext, ToolError};
pub use entity::{ENTITY_NOT_FOUND, GetThreatEntityTool, format_entity, get_threat_entity};
pub use observable::{GetObservableDetailsTool, OBSERVABLE_NOT_FOUND, format_observable, get_observable_details};
pub use registry::ToolRegistry;
pub use search::{DEFAULT_SEARCH_LIMIT, NO_RESULTS, SearchKnowledgeBaseTool, format_hit, search_knowledge_base};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool that can be called by the agent runtime
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the MCP `tools/call` name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool, producing the text shown to the agent
    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<String, ToolError>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool definition advertised to the runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Decode tool arguments into their typed form
pub(crate) fn parse_input<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    // A missing arguments object means "no arguments"
    let input = if input.is_null() {
        Value::Object(Default::default())
    } else {
        input
    };

    serde_json::from_value(input).map_err(|e| ToolError::InvalidInput { message: e.to_string() })
}
