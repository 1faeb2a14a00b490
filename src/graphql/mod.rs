//! GraphQL access to the OpenCTI knowledge base
//!
//! This module provides:
//! - The fixed query documents and the `Query` enum naming them
//! - Wire types for the request body and response envelope
//! - The `QueryExecutor` trait, the HTTP `OpenCtiClient`, and a mock

pub mod client;
pub mod queries;
pub mod types;

pub use client::{fetch, MockQueryExecutor, OpenCtiClient, QueryExecutor, RecordedQuery, REQUEST_TIMEOUT, USER_AGENT};
pub use queries::{Query, GET_ENTITY_QUERY, GET_OBSERVABLE_QUERY, SEARCH_QUERY};
pub use types::{Connection, Edge, GraphqlError, GraphqlRequest, GraphqlResponse};
