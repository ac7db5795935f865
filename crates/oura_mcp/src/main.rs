use std::sync::Arc;

use oura_client::{Root, config::Config};
use oura_mcp::OuraMcpHandler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_filter = oura_mcp::log_filter(|key| std::env::var(key).ok());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(oura_mcp::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!("oura_mcp: log filter: {}", log_filter);

    let config = Config::from_env()?;
    let root = Arc::new(Root::from_config(&config)?);
    tracing::info!("oura_mcp: {} ({})", root.status().await, config.base_url);

    let mut status_rx = root.subscribe();
    tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let status = *status_rx.borrow_and_update();
            tracing::info!("oura_mcp: status changed: {}", status);
        }
    });

    let handler = OuraMcpHandler::new(root);
    tracing::info!("oura_mcp: registered {} tools", handler.tool_count());

    // Serve over stdio so the server is immediately usable with MCP clients
    tracing::info!("oura_mcp: starting stdio MCP server...");

    use rmcp::serve_server;
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let server = serve_server(handler, transport).await?;

    tracing::info!("oura_mcp: service initialized as server");

    server.waiting().await?;

    Ok(())
}
