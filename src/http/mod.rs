//! HTTP transport for MCP.
//!
//! Provides an alternative to stdio transport for web-based clients.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::mcp::handler::McpHandler;
use crate::mcp::protocol::*;
use crate::mcp::resources::ResourceRegistry;
use crate::metrics::Metrics;

/// HTTP server state.
#[derive(Clone)]
pub struct HttpState {
    handler: Arc<McpHandler>,
    resources: Arc<ResourceRegistry>,
    metrics: Arc<Metrics>,
    server_info: ServerInfo,
}

impl HttpState {
    pub fn new(
        handler: Arc<McpHandler>,
        resources: Arc<ResourceRegistry>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            handler,
            resources,
            metrics,
            server_info: ServerInfo {
                name: "rails-api-search".to_string(),
                version: crate::VERSION.to_string(),
            },
        }
    }
}

/// Build the HTTP router.
pub fn router(state: HttpState, expose_metrics: bool) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/mcp/initialize", post(initialize))
        .route("/mcp/tools/list", get(list_tools))
        .route("/mcp/tools/call", post(call_tool))
        .route("/mcp/resources/list", get(list_resources))
        .route("/mcp/resources/read", post(read_resource));

    if expose_metrics {
        app = app.route("/metrics", get(metrics));
    }

    app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn start_server(config: &Config, state: HttpState) -> Result<()> {
    let app = router(state, config.metrics);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| Error::HttpServer(e.to_string()))?;

    Ok(())
}

/// HTTP status reported for an error.
fn status_for(e: &Error) -> StatusCode {
    match e {
        Error::SectionNotFound(_) | Error::ToolNotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_invalid_params() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map an error onto an HTTP status and JSON body.
fn error_response(state: &HttpState, e: Error) -> (StatusCode, Json<serde_json::Value>) {
    state.metrics.inc_failed();
    let status = status_for(&e);
    if status.is_server_error() {
        error!("HTTP request failed: {}", e);
    } else {
        warn!("HTTP request rejected: {}", e);
    }
    (
        status,
        Json(serde_json::json!({
            "error": {
                "code": e.rpc_code(),
                "message": e.to_string()
            }
        })),
    )
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Initialize endpoint.
async fn initialize(State(state): State<HttpState>) -> impl IntoResponse {
    state.metrics.inc_requests();
    Json(InitializeResult::new(state.server_info))
}

/// List tools endpoint.
async fn list_tools(State(state): State<HttpState>) -> impl IntoResponse {
    state.metrics.inc_requests();
    Json(ListToolsResult {
        tools: state.handler.list_tools(),
    })
}

/// Call tool endpoint.
async fn call_tool(
    State(state): State<HttpState>,
    Json(req): Json<CallToolParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.metrics.inc_requests();
    state.metrics.inc_tool_calls();

    let result = state
        .handler
        .call(&req.name, req.arguments)
        .await
        .and_then(|r| Ok(serde_json::to_value(r)?));

    match result {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(e) => error_response(&state, e),
    }
}

/// List resources endpoint.
async fn list_resources(State(state): State<HttpState>) -> impl IntoResponse {
    state.metrics.inc_requests();
    Json(state.resources.list())
}

/// Read resource endpoint.
async fn read_resource(
    State(state): State<HttpState>,
    Json(req): Json<ReadResourceParams>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.metrics.inc_requests();

    let result = state
        .resources
        .read(&req.uri)
        .await
        .and_then(|r| Ok(serde_json::to_value(r)?));

    match result {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(e) => error_response(&state, e),
    }
}

/// Prometheus metrics endpoint.
async fn metrics(State(state): State<HttpState>) -> impl IntoResponse {
    (
        [("content-type", "text/plain; version=0.0.4")],
        state.metrics.to_prometheus(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SectionCatalog;
    use crate::service::{ContentLoader, SearchService};
    use async_trait::async_trait;

    struct EmptyLoader;

    #[async_trait]
    impl ContentLoader for EmptyLoader {
        async fn load(&self, section: Option<&str>) -> Result<String> {
            match section {
                None => Ok("<p>Routing lives in Action Dispatch</p>".to_string()),
                Some(other) => Err(Error::SectionNotFound(other.to_string())),
            }
        }
    }

    fn state() -> HttpState {
        let catalog = Arc::new(SectionCatalog::rails());
        let loader: Arc<dyn ContentLoader> = Arc::new(EmptyLoader);
        let metrics = Metrics::new();
        let mut handler = McpHandler::new();
        crate::tools::register_all_tools(
            &mut handler,
            Arc::new(SearchService::new(catalog.clone()).unwrap()),
            loader.clone(),
            metrics.clone(),
            10,
        );
        HttpState::new(
            Arc::new(handler),
            Arc::new(ResourceRegistry::new(catalog, loader)),
            metrics,
        )
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&Error::SectionNotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&Error::InvalidToolArguments("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&Error::InvalidUri("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&Error::Search("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_call_tool_endpoint() {
        let state = state();
        let req = CallToolParams {
            name: "search".to_string(),
            arguments: serde_json::from_value(serde_json::json!({ "query": "routing" })).unwrap(),
        };
        let (status, Json(body)) = call_tool(State(state.clone()), Json(req)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Action Dispatch"));
        assert_eq!(state.metrics.snapshot().tool_calls, 1);
    }

    #[tokio::test]
    async fn test_call_tool_unknown_section() {
        let state = state();
        let req = CallToolParams {
            name: "search".to_string(),
            arguments: serde_json::from_value(
                serde_json::json!({ "query": "routing", "section": "actioncable" }),
            )
            .unwrap(),
        };
        let (status, Json(body)) = call_tool(State(state.clone()), Json(req)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], error_codes::INVALID_PARAMS);
        assert_eq!(state.metrics.snapshot().requests_failed, 1);
    }

    #[tokio::test]
    async fn test_read_resource_invalid_uri() {
        let req = ReadResourceParams {
            uri: "file:///etc/passwd".to_string(),
        };
        let (status, _) = read_resource(State(state()), Json(req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
