//! opencti-mcp - OpenCTI threat intelligence tools for AI agents
//!
//! Three read-only tools (keyword search, observable lookup, entity lookup)
//! backed by fixed GraphQL queries against an OpenCTI platform, answering in
//! short Spanish text blocks. Served over the Model Context Protocol on stdio.

pub mod config;
pub mod domain;
pub mod error;
pub mod graphql;
pub mod mcp;
pub mod tools;

pub use error::{OpenCtiError, Result};
