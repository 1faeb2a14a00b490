//! Model Context Protocol surface
//!
//! JSON-RPC 2.0 over newline-delimited stdio. The server answers
//! `initialize`, `ping`, `tools/list` and `tools/call`, and accepts the
//! client's notifications without replying.

mod error;
mod server;
mod transport;
mod types;

pub use error::McpError;
pub use server::{McpServer, SERVER_NAME};
pub use transport::{ChannelTransport, McpTransport, StdioTransport};
pub use types::*;
