//! Crypto Knowledge MCP Server
//!
//! Run with: crypto-knowledge-server [--transport http]

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crypto_knowledge::config::{ServerArgs, TransportKind};
use crypto_knowledge::error::Result;
use crypto_knowledge::http::HttpServer;
use crypto_knowledge::mcp::{KnowledgeHandler, McpServer};
use crypto_knowledge::model::{GeminiClient, ModelInvoker};

fn init_logging(json: bool) {
    // Logs go to stderr; stdout belongs to the stdio transport
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::from_default_env());

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let args = ServerArgs::parse();
    init_logging(args.log_json);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = args
        .into_config()
        .inspect_err(|e| tracing::error!("{}", e))?;
    tracing::debug!("Configuration: {:?}", config);

    let model: Arc<dyn ModelInvoker> = Arc::new(GeminiClient::with_config(
        config.api_key.clone(),
        Some(config.base_url.clone()),
        Some(config.model.clone()),
    ));
    let handler = Arc::new(KnowledgeHandler::new(model));

    match config.transport {
        TransportKind::Stdio => {
            tracing::info!("Crypto knowledge MCP server starting on stdio...");
            McpServer::from_shared(handler).run().await?;
        }
        TransportKind::Http => {
            tracing::info!(
                "Crypto knowledge MCP server starting on {}...",
                config.addr
            );
            HttpServer::new(handler, config.addr, config.path).start().await?;
        }
    }

    Ok(())
}
