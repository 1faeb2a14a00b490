//! OpenCTI GraphQL client
//!
//! One POST per call: bearer token, JSON body, fixed 30 second timeout. The
//! HTTP client keeps no idle connections, so each call owns its connection
//! and drops it on every exit path. No retries.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ServiceConfig;
use crate::error::{OpenCtiError, Result};
use crate::graphql::queries::Query;
use crate::graphql::types::{GraphqlRequest, GraphqlResponse};

/// Total time allowed for one request, connect to last body byte
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const USER_AGENT: &str = "MCP-OpenCTI-Agent/1.0";

/// Runs a known query against the knowledge base and returns its `data`
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: Query, variables: Value) -> Result<Value>;
}

/// Run a query and deserialize its `data` into a typed record
pub async fn fetch<T>(executor: &dyn QueryExecutor, query: Query, variables: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    let data = executor.execute(query, variables).await?;
    serde_json::from_value(data).map_err(|e| {
        log::error!("Unexpected {} response shape: {}", query.operation_name(), e);
        OpenCtiError::Internal(format!("Unexpected {} response shape: {}", query.operation_name(), e))
    })
}

/// HTTP client for the OpenCTI GraphQL endpoint
pub struct OpenCtiClient {
    http: Client,
    graphql_url: String,
    token: String,
    timeout: Duration,
}

impl OpenCtiClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(config: &ServiceConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| OpenCtiError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            graphql_url: config.graphql_url(),
            token: config.token().to_string(),
            timeout,
        })
    }

    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    async fn send_request(&self, query: Query, variables: &Value) -> Result<GraphqlResponse> {
        let body = GraphqlRequest {
            query: query.text(),
            variables,
        };

        let response = self
            .http
            .post(&self.graphql_url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_request_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            log::error!("HTTP error {}: {}", status.as_u16(), error_body);
            return Err(OpenCtiError::status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_request_error(e, self.timeout))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            log::error!("Failed to parse GraphQL response: {}", e);
            OpenCtiError::Internal(format!("Failed to parse GraphQL response: {}", e))
        })
    }
}

#[async_trait]
impl QueryExecutor for OpenCtiClient {
    async fn execute(&self, query: Query, variables: Value) -> Result<Value> {
        log::debug!("Sending {} to OpenCTI: {}", query.operation_name(), variables);

        let response = self.send_request(query, &variables).await?;
        response.into_data().inspect_err(|e| log::error!("{}", e))
    }
}

impl std::fmt::Debug for OpenCtiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenCtiClient")
            .field("graphql_url", &self.graphql_url)
            .finish_non_exhaustive()
    }
}

/// Map a reqwest failure onto the error taxonomy
fn classify_request_error(err: reqwest::Error, timeout: Duration) -> OpenCtiError {
    if err.is_timeout() {
        log::error!("Request to OpenCTI timed out: {}", err);
        OpenCtiError::network(format!("request timed out after {:?}", timeout))
    } else if err.is_connect() || err.is_request() || err.is_body() {
        log::error!("Network error: {}", err);
        OpenCtiError::network(err.to_string())
    } else {
        log::error!("Unexpected error: {}", err);
        OpenCtiError::Internal(err.to_string())
    }
}

/// A recorded call made against [`MockQueryExecutor`]
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub query: Query,
    pub variables: Value,
}

/// In-memory executor for tests; replies are served in order
#[derive(Default)]
pub struct MockQueryExecutor {
    replies: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<RecordedQuery>>,
}

impl MockQueryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful `data` payload
    pub fn with_data(self, data: Value) -> Self {
        self.push(Ok(data));
        self
    }

    /// Queue a failure
    pub fn with_error(self, error: OpenCtiError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, reply: Result<Value>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

#[async_trait]
impl QueryExecutor for MockQueryExecutor {
    async fn execute(&self, query: Query, variables: Value) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedQuery {
                query,
                variables,
            });
        }

        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(OpenCtiError::Internal("no mock reply queued".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde::Deserialize;
    use serde_json::json;

    fn client_for(url: &str) -> OpenCtiClient {
        let config = ServiceConfig::new(url, "test-token").unwrap();
        OpenCtiClient::new(&config).unwrap()
    }

    #[test]
    fn test_client_graphql_url() {
        let client = client_for("https://cti.example.com/");
        assert_eq!(client.graphql_url(), "https://cti.example.com/graphql");
    }

    #[test]
    fn test_debug_impl_hides_token() {
        let client = client_for("https://cti.example.com");
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("OpenCtiClient"));
        assert!(!debug_str.contains("test-token"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OpenCtiClient>();
        assert_send_sync::<MockQueryExecutor>();
    }

    #[tokio::test]
    async fn test_execute_sends_headers_and_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", "application/json")
            .match_header("user-agent", USER_AGENT)
            .match_body(Matcher::PartialJson(json!({
                "variables": {"search": "APT28", "first": 3}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"globalSearch": {"edges": []}}}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let data = client
            .execute(Query::Search, json!({"search": "APT28", "first": 3}))
            .await
            .unwrap();

        assert_eq!(data, json!({"globalSearch": {"edges": []}}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_sends_query_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_body(Matcher::Regex("query GetEntity".to_string()))
            .with_status(200)
            .with_body(r#"{"data": {}}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        client.execute(Query::Entity, json!({"name": "APT28"})).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_http_500() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.execute(Query::Search, json!({"search": "x"})).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_execute_graphql_errors_with_200() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(r#"{"data": null, "errors": [{"message": "Variable \"$value\" of required type \"String!\" was not provided."}]}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.execute(Query::Observable, json!({})).await.unwrap_err();

        match err {
            OpenCtiError::RemoteApplication(message) => {
                assert!(message.contains("was not provided"));
            }
            other => panic!("Expected RemoteApplication, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_invalid_json_is_internal() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.execute(Query::Search, json!({"search": "x"})).await.unwrap_err();
        assert!(matches!(err, OpenCtiError::Internal(_)));
    }

    #[tokio::test]
    async fn test_execute_connection_refused() {
        // Bind then drop a listener to get a port nobody is serving
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = client_for(&format!("http://127.0.0.1:{}", port));
        let err = client.execute(Query::Search, json!({"search": "x"})).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.status_code(), None);
    }

    #[tokio::test]
    async fn test_execute_timeout_is_network_failure() {
        use crate::error::TransportFailure;

        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = ServiceConfig::new(&format!("http://127.0.0.1:{}", port), "test-token").unwrap();
        let client = OpenCtiClient::with_timeout(&config, Duration::from_millis(200)).unwrap();
        let err = client.execute(Query::Search, json!({"search": "x"})).await.unwrap_err();

        match &err {
            OpenCtiError::RemoteTransport(TransportFailure::Network(message)) => {
                assert!(message.contains("timed out"), "unexpected message: {}", message)
            }
            other => panic!("Expected network failure, got {:?}", other),
        }
        assert_eq!(err.status_code(), None);
        server.abort();
    }

    #[derive(Debug, Deserialize)]
    struct Shape {
        count: u32,
    }

    #[tokio::test]
    async fn test_fetch_typed() {
        let mock = MockQueryExecutor::new().with_data(json!({"count": 7}));
        let shape: Shape = fetch(&mock, Query::Search, json!({})).await.unwrap();
        assert_eq!(shape.count, 7);
    }

    #[tokio::test]
    async fn test_fetch_shape_mismatch_is_internal() {
        let mock = MockQueryExecutor::new().with_data(json!({"count": "seven"}));
        let result: Result<Shape> = fetch(&mock, Query::Search, json!({})).await;
        assert!(matches!(result, Err(OpenCtiError::Internal(_))));
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let mock = MockQueryExecutor::new()
            .with_data(json!({}))
            .with_error(OpenCtiError::status(502));

        assert!(mock.execute(Query::Entity, json!({"name": "APT28"})).await.is_ok());
        assert!(mock.execute(Query::Entity, json!({"name": "APT29"})).await.is_err());
        assert!(mock.execute(Query::Entity, json!({})).await.is_err());

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].query, Query::Entity);
        assert_eq!(calls[1].variables["name"], "APT29");
    }
}
