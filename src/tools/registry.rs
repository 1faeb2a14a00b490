//! Tool registry - dispatches calls by name to the registered tools

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::Value;

use super::{GetObservableDetailsTool, GetThreatEntityTool, SearchKnowledgeBaseTool, Tool, ToolContext, ToolDefinition, ToolError};

/// Maps tool names to tools
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create registry with the three knowledge-base tools
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add_tool(Box::new(SearchKnowledgeBaseTool));
        registry.add_tool(Box::new(GetObservableDetailsTool));
        registry.add_tool(Box::new(GetThreatEntityTool));
        registry
    }

    /// Create an empty registry (for custom tool sets)
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Tool definitions, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, input: Value, ctx: &ToolContext) -> Result<String, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            ToolError::UnknownTool { name: name.to_string() }
        })?;

        debug!("Executing tool {} with input {}", name, input);
        let result = tool.execute(input, ctx).await;
        if let Err(e) = &result {
            debug!("Tool {} failed: {}", name, e);
        }
        result
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
