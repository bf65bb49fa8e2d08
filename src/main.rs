//! Rails API Search MCP Server
//!
//! Keyword search over Rails API documentation, served over MCP.

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rails_api_search::catalog::SectionCatalog;
use rails_api_search::config::{Args, Config, Transport};
use rails_api_search::error::{Error, Result};
use rails_api_search::http::{self, HttpState};
use rails_api_search::mcp::handler::McpHandler;
use rails_api_search::mcp::resources::ResourceRegistry;
use rails_api_search::mcp::server::McpServer;
use rails_api_search::mcp::transport::StdioTransport;
use rails_api_search::metrics::Metrics;
use rails_api_search::service::{ContentLoader, FsContentLoader, SearchService};
use rails_api_search::tools;
use rails_api_search::VERSION;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the protocol
    let default_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to set tracing subscriber: {}", e)))?;

    // Build configuration from args
    let config: Config = args.into();

    info!("Rails API Search MCP Server v{}", VERSION);
    info!("Docs directory: {:?}", config.docs_dir);
    info!("Transport: {:?}", config.transport);

    if !config.docs_dir.is_dir() {
        tracing::warn!(
            "Docs directory {:?} does not exist; searches will report missing sections",
            config.docs_dir
        );
    }

    // Initialize services
    let catalog = Arc::new(SectionCatalog::rails());
    let loader: Arc<dyn ContentLoader> = Arc::new(FsContentLoader::new(&config, catalog.clone()));
    let search_service = Arc::new(SearchService::new(catalog.clone())?);
    let metrics = Metrics::new();

    // Create MCP handler and register tools
    let mut handler = McpHandler::new();
    tools::register_all_tools(
        &mut handler,
        search_service,
        loader.clone(),
        metrics.clone(),
        config.default_limit,
    );
    info!("Registered {} MCP tools", handler.tool_count());

    let handler = Arc::new(handler);
    let resources = Arc::new(ResourceRegistry::new(catalog, loader));

    // Start the server based on transport mode
    match config.transport {
        Transport::Stdio => {
            info!("Starting stdio transport...");
            let server = McpServer::new(handler, resources, metrics, "rails-api-search");
            server.run(StdioTransport::stdio()).await?;
        }
        Transport::Http => {
            info!("Starting HTTP transport on port {}...", config.port);
            let state = HttpState::new(handler, resources, metrics);
            http::start_server(&config, state).await?;
        }
    }

    Ok(())
}
