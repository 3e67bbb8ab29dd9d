//! mail-graph-mcp-rs: Outlook MCP server over stdio
//!
//! This server exposes four Outlook mailbox tools via the Model Context
//! Protocol (MCP) over stdio and translates each call into Microsoft Graph
//! REST requests on behalf of one signed-in mailbox.
//!
//! # Architecture
//!
//! - [`main`]: Process entry point with env loading and stdio serving
//! - [`config`]: Environment-driven configuration for the Graph connection
//! - [`errors`]: Application error model with protocol error mapping
//! - [`graph`]: Graph REST operations with uniform failure wrapping
//! - [`registry`]: Static tool catalogue, schema export, argument validation
//! - [`server`]: MCP handler with per-tool dispatch and result encoding
//! - [`models`]: Provider wire DTOs and typed tool arguments
//! - [`escape`]: JSON string escaping for hand-built payloads
//! - [`payload`]: Tool result payload rendering

mod config;
mod errors;
mod escape;
mod graph;
mod models;
mod payload;
mod registry;
mod server;

use std::sync::Arc;

use config::ServerConfig;
use graph::GraphClient;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::EnvFilter;

/// Application entry point
///
/// Initializes tracing from environment, loads config, probes the Graph
/// connection, and serves the MCP server over stdio. This process expects
/// to be spawned by an MCP client via `stdio` transport.
///
/// # Environment Variables
///
/// See [`ServerConfig::load_from_env`] for full configuration options.
///
/// # Example
///
/// ```no_run
/// MAIL_GRAPH_ACCESS_TOKEN=eyJ0eXAiOiJKV1Qi... \
/// cargo run
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::load_from_env()?;
    let graph = Arc::new(GraphClient::new(&config)?);

    // Confirm the token works before serving; a failed probe is logged but
    // does not prevent startup.
    match graph.verify_connection().await {
        Ok(mailbox) => tracing::info!(%mailbox, "graph connection initialized"),
        Err(e) => tracing::warn!(error = %e, "initial graph connection failed"),
    }

    let service = server::MailGraphServer::new(graph).serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
