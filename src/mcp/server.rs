//! MCP server implementation.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::mcp::handler::McpHandler;
use crate::mcp::protocol::*;
use crate::mcp::resources::ResourceRegistry;
use crate::mcp::transport::{Message, Transport};
use crate::metrics::{Metrics, Timer};
use crate::VERSION;

/// MCP server.
pub struct McpServer {
    handler: Arc<McpHandler>,
    resources: Arc<ResourceRegistry>,
    metrics: Arc<Metrics>,
    name: String,
    version: String,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(
        handler: Arc<McpHandler>,
        resources: Arc<ResourceRegistry>,
        metrics: Arc<Metrics>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            handler,
            resources,
            metrics,
            name: name.into(),
            version: VERSION.to_string(),
        }
    }

    /// Run the server with the given transport.
    pub async fn run<T: Transport>(&self, mut transport: T) -> Result<()> {
        info!("Starting MCP server: {} v{}", self.name, self.version);

        let (mut incoming, outgoing) = transport.start().await?;

        while let Some(msg) = incoming.recv().await {
            match msg {
                Message::Request(req) => {
                    let response = self.handle_request(req).await;
                    if outgoing.send(Message::Response(response)).await.is_err() {
                        error!("Failed to send response");
                        break;
                    }
                }
                Message::Notification(notif) => {
                    self.handle_notification(notif);
                }
                Message::Response(_) => {
                    warn!("Received unexpected response");
                }
            }
        }

        transport.stop().await?;
        info!("MCP server stopped");
        Ok(())
    }

    /// Handle a JSON-RPC request.
    pub async fn handle_request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling request: {} (id: {:?})", req.method, req.id);
        self.metrics.inc_requests();
        let timer = Timer::start();

        let result = match req.method.as_str() {
            _ if req.jsonrpc != JSONRPC_VERSION => Err(Error::McpProtocol(format!(
                "unsupported jsonrpc version: {}",
                req.jsonrpc
            ))),
            // Core
            "initialize" => self.handle_initialize(),
            "ping" => Ok(serde_json::json!({})),
            // Tools
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_call_tool(req.params).await,
            // Resources
            "resources/list" => self.handle_list_resources(),
            "resources/read" => self.handle_read_resource(req.params).await,
            // Unknown
            _ => Err(Error::MethodNotFound(req.method.clone())),
        };

        debug!("{} finished in {}ms", req.method, timer.elapsed_ms());

        match result {
            Ok(value) => JsonRpcResponse::success(req.id, value),
            Err(e) => {
                self.metrics.inc_failed();
                if e.is_invalid_params() {
                    warn!("Rejected {}: {}", req.method, e);
                } else {
                    error!("{} failed: {}", req.method, e);
                }
                JsonRpcResponse::failure(req.id, e.rpc_code(), e.to_string())
            }
        }
    }

    /// Handle a notification.
    fn handle_notification(&self, notif: JsonRpcNotification) {
        match notif.method.as_str() {
            "notifications/initialized" => info!("Client initialized"),
            "notifications/cancelled" => debug!("Ignoring cancellation; requests are not cancellable"),
            _ => debug!("Unknown notification: {}", notif.method),
        }
    }

    fn handle_initialize(&self) -> Result<Value> {
        let result = InitializeResult::new(ServerInfo {
            name: self.name.clone(),
            version: self.version.clone(),
        });
        Ok(serde_json::to_value(result)?)
    }

    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.handler.list_tools(),
        };
        Ok(serde_json::to_value(result)?)
    }

    async fn handle_call_tool(&self, params: Option<Value>) -> Result<Value> {
        let params: CallToolParams = parse_params(params)?;
        self.metrics.inc_tool_calls();

        let result = self.handler.call(&params.name, params.arguments).await?;
        Ok(serde_json::to_value(result)?)
    }

    fn handle_list_resources(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.resources.list())?)
    }

    async fn handle_read_resource(&self, params: Option<Value>) -> Result<Value> {
        let params: ReadResourceParams = parse_params(params)?;
        let result = self.resources.read(&params.uri).await?;
        Ok(serde_json::to_value(result)?)
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T> {
    params
        .ok_or_else(|| Error::InvalidToolArguments("Missing params".to_string()))
        .and_then(|v| {
            serde_json::from_value(v).map_err(|e| Error::InvalidToolArguments(e.to_string()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SectionCatalog;
    use crate::service::{ContentLoader, SearchService};
    use crate::tools::register_all_tools;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixtureLoader;

    #[async_trait]
    impl ContentLoader for FixtureLoader {
        async fn load(&self, section: Option<&str>) -> Result<String> {
            match section {
                None => Ok("<section><h1>Action View</h1><p>Action View is the V in MVC</p></section>".to_string()),
                Some("activerecord") => Ok("<h1>ActiveRecord Basics</h1><p>Active Record is the M in MVC</p>".to_string()),
                Some("actionmailer") => Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "permission denied",
                ))),
                Some(other) => Err(Error::SectionNotFound(other.to_string())),
            }
        }
    }

    fn create_server() -> (McpServer, Arc<Metrics>) {
        let catalog = Arc::new(SectionCatalog::rails());
        let loader: Arc<dyn ContentLoader> = Arc::new(FixtureLoader);
        let metrics = Metrics::new();

        let mut handler = McpHandler::new();
        register_all_tools(
            &mut handler,
            Arc::new(SearchService::new(catalog.clone()).unwrap()),
            loader.clone(),
            metrics.clone(),
            10,
        );
        let resources = Arc::new(ResourceRegistry::new(catalog, loader));
        let server = McpServer::new(Arc::new(handler), resources, metrics.clone(), "rails-api-search");
        (server, metrics)
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: RequestId::Number(1),
            method: method.to_string(),
            params: Some(params),
        }
    }

    fn error_code(response: &JsonRpcResponse) -> i32 {
        response.error.as_ref().map(|e| e.code).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_initialize() {
        let (server, _) = create_server();
        let response = server.handle_request(request("initialize", json!({}))).await;

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], MCP_VERSION);
        assert_eq!(result["serverInfo"]["name"], "rails-api-search");
    }

    #[tokio::test]
    async fn test_list_tools() {
        let (server, _) = create_server();
        let response = server.handle_request(request("tools/list", json!({}))).await;

        let result = response.result.unwrap();
        assert_eq!(result["tools"].as_array().unwrap().len(), 1);
        assert_eq!(result["tools"][0]["name"], "search");
        assert!(result["tools"][0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_call_search() {
        let (server, metrics) = create_server();
        let response = server
            .handle_request(request(
                "tools/call",
                json!({
                    "name": "search",
                    "arguments": { "query": "test", "section": "activerecord", "limit": 5 }
                }),
            ))
            .await;

        let result = response.result.unwrap();
        assert_eq!(result["content"].as_array().unwrap().len(), 1);
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["total"], 0);
        assert_eq!(metrics.snapshot().tool_calls, 1);
    }

    #[tokio::test]
    async fn test_call_search_all_sections() {
        let (server, _) = create_server();
        let response = server
            .handle_request(request(
                "tools/call",
                json!({ "name": "search", "arguments": { "query": "mvc", "limit": 5 } }),
            ))
            .await;

        let result = response.result.unwrap();
        let payload: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(payload["total"], 1);
        assert_eq!(payload["matches"][0]["section"], "actionview");
        assert_eq!(payload["matches"][0]["title"], "Action View");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let (server, metrics) = create_server();
        let response = server
            .handle_request(request("tools/call", json!({ "name": "lookup", "arguments": {} })))
            .await;

        assert_eq!(error_code(&response), error_codes::INVALID_PARAMS);
        assert!(response.error.unwrap().message.contains("Unknown tool: lookup"));
        assert_eq!(metrics.snapshot().requests_failed, 1);
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_invalid_params() {
        let (server, _) = create_server();
        let response = server
            .handle_request(request(
                "tools/call",
                json!({ "name": "search", "arguments": { "limit": 3 } }),
            ))
            .await;

        assert_eq!(error_code(&response), error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_section_is_not_found() {
        let (server, _) = create_server();
        let response = server
            .handle_request(request(
                "tools/call",
                json!({ "name": "search", "arguments": { "query": "x", "section": "activewidget" } }),
            ))
            .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, error_codes::INVALID_PARAMS);
        assert!(error.message.contains("Documentation not found for section: activewidget"));
    }

    #[tokio::test]
    async fn test_io_failure_is_internal_error() {
        let (server, _) = create_server();
        let response = server
            .handle_request(request(
                "tools/call",
                json!({ "name": "search", "arguments": { "query": "x", "section": "actionmailer" } }),
            ))
            .await;

        assert_eq!(error_code(&response), error_codes::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_resources() {
        let (server, _) = create_server();
        let listed = server.handle_request(request("resources/list", json!({}))).await;
        let resources = listed.result.unwrap()["resources"].as_array().unwrap().len();
        assert_eq!(resources, SectionCatalog::rails().len() + 1);

        let read = server
            .handle_request(request("resources/read", json!({ "uri": "rails-api://activerecord" })))
            .await;
        let result = read.result.unwrap();
        assert!(result["contents"][0]["text"]
            .as_str()
            .unwrap()
            .contains("ActiveRecord Basics"));

        let bad = server
            .handle_request(request("resources/read", json!({ "uri": "http://example.com" })))
            .await;
        assert_eq!(error_code(&bad), error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let (server, _) = create_server();
        let mut req = request("ping", json!({}));
        req.jsonrpc = "1.0".to_string();
        let response = server.handle_request(req).await;
        assert_eq!(error_code(&response), error_codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (server, _) = create_server();
        let response = server.handle_request(request("prompts/list", json!({}))).await;
        assert_eq!(error_code(&response), error_codes::METHOD_NOT_FOUND);
    }
}
