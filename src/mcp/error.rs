//! MCP protocol errors and their JSON-RPC codes

use super::types::{JsonRpcError, error_codes};
use crate::tools::ToolError;

#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

impl McpError {
    pub fn code(&self) -> i64 {
        match self {
            McpError::Parse(_) => error_codes::PARSE_ERROR,
            McpError::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            McpError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            McpError::InvalidParams(_) | McpError::ToolNotFound(_) => error_codes::INVALID_PARAMS,
            McpError::Transport(_) => error_codes::INTERNAL_ERROR,
        }
    }

    pub fn to_rpc_error(&self) -> JsonRpcError {
        JsonRpcError {
            code: self.code(),
            message: self.to_string(),
            data: None,
        }
    }
}

/// Dispatch failures only. A failed query is reported inside the tool result.
impl TryFrom<ToolError> for McpError {
    type Error = ToolError;

    fn try_from(err: ToolError) -> Result<Self, Self::Error> {
        match err {
            ToolError::UnknownTool { name } => Ok(McpError::ToolNotFound(name)),
            ToolError::InvalidInput { message } => Ok(McpError::InvalidParams(message)),
            query @ ToolError::Query(_) => Err(query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpenCtiError;

    #[test]
    fn test_codes() {
        assert_eq!(McpError::MethodNotFound("x".into()).code(), -32601);
        assert_eq!(McpError::ToolNotFound("x".into()).code(), -32602);
        assert_eq!(McpError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(McpError::InvalidRequest("x".into()).code(), -32600);
    }

    #[test]
    fn test_tool_error_mapping() {
        let unknown = McpError::try_from(ToolError::UnknownTool { name: "nope".into() }).unwrap();
        assert!(matches!(unknown, McpError::ToolNotFound(ref n) if n == "nope"));

        let invalid = McpError::try_from(ToolError::InvalidInput {
            message: "missing field `value`".into(),
        })
        .unwrap();
        assert_eq!(invalid.to_rpc_error().message, "Invalid params: missing field `value`");

        let query = McpError::try_from(ToolError::Query(OpenCtiError::status(500)));
        assert!(matches!(query, Err(ToolError::Query(_))));
    }
}
