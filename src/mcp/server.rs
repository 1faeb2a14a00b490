//! MCP server - exposes the tool registry over JSON-RPC 2.0

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Value, json};

use super::error::McpError;
use super::transport::McpTransport;
use super::types::*;
use crate::tools::{ToolContext, ToolRegistry};

pub const SERVER_NAME: &str = "opencti-mcp";

pub struct McpServer {
    registry: ToolRegistry,
    ctx: ToolContext,
    server_name: String,
    server_version: String,
    initialized: bool,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, ctx: ToolContext) -> Self {
        Self {
            registry,
            ctx,
            server_name: SERVER_NAME.to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            initialized: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serve messages until the transport closes
    pub async fn run<T: McpTransport>(&mut self, transport: &mut T) -> Result<(), McpError> {
        info!("MCP server {} {} listening", self.server_name, self.server_version);

        while let Some(line) = transport.receive().await? {
            debug!("<- {}", line);
            if let Some(response) = self.handle_message(&line).await {
                let json = serde_json::to_string(&response)?;
                debug!("-> {}", json);
                transport.send(&json).await?;
            }
        }

        info!("Transport closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw line. Notifications produce no response.
    pub async fn handle_message(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                return Some(JsonRpcResponse::failure(None, McpError::Parse(e).to_rpc_error()));
            }
        };

        if raw.get("id").is_none() {
            match serde_json::from_value::<JsonRpcNotification>(raw) {
                Ok(notification) => self.handle_notification(&notification),
                Err(e) => warn!("Malformed notification: {}", e),
            }
            return None;
        }

        let id = raw.get("id").cloned().and_then(|v| serde_json::from_value::<RpcId>(v).ok());
        match serde_json::from_value::<JsonRpcRequest>(raw) {
            Ok(request) => Some(self.handle_request(&request).await),
            Err(e) => {
                warn!("Invalid JSON-RPC request: {}", e);
                Some(JsonRpcResponse::failure(id, McpError::InvalidRequest(e.to_string()).to_rpc_error()))
            }
        }
    }

    pub async fn handle_request(&mut self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        let result = match request.method.as_str() {
            "initialize" => self.initialize(&request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(&request.params).await,
            method => {
                warn!("Unknown method: {}", method);
                Err(McpError::MethodNotFound(method.to_string()))
            }
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::failure(Some(id), e.to_rpc_error()),
        }
    }

    fn handle_notification(&mut self, notification: &JsonRpcNotification) {
        match notification.method.as_str() {
            "notifications/initialized" => info!("Client finished initialization"),
            "notifications/cancelled" => debug!("Client cancelled a request"),
            method => debug!("Ignoring notification {}", method),
        }
    }

    fn initialize(&mut self, params: &Option<Value>) -> Result<Value, McpError> {
        let params: InitializeParams = match params {
            Some(p) => serde_json::from_value(p.clone()).map_err(|e| McpError::InvalidParams(e.to_string()))?,
            None => InitializeParams::default(),
        };

        let client = params.client_info.as_ref().map(|c| c.name.as_str()).unwrap_or("unknown");
        info!(
            "Initialize from client {} (protocol {})",
            client,
            params.protocol_version.as_deref().unwrap_or("unspecified")
        );
        self.initialized = true;

        to_result(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: Implementation {
                name: self.server_name.clone(),
                version: Some(self.server_version.clone()),
            },
        })
    }

    fn list_tools(&self) -> Result<Value, McpError> {
        let tools = self.registry.definitions().into_iter().map(ToolInfo::from).collect();
        to_result(ListToolsResult { tools })
    }

    async fn call_tool(&self, params: &Option<Value>) -> Result<Value, McpError> {
        let params = params
            .clone()
            .ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;
        let call: CallToolParams = serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        debug!("tools/call {}", call.name);
        let result = match self.registry.execute(&call.name, call.arguments, &self.ctx).await {
            Ok(text) => CallToolResult::text(text),
            Err(e) => match McpError::try_from(e) {
                Ok(dispatch) => return Err(dispatch),
                Err(query) => {
                    warn!("Tool {} failed: {}", call.name, query);
                    CallToolResult::error(query.to_string())
                }
            },
        };

        to_result(result)
    }
}

fn to_result<T: Serialize>(value: T) -> Result<Value, McpError> {
    Ok(serde_json::to_value(value)?)
}
