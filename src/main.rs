//! llms-docs-server
//!
//! Loads a Markdown/MDX documentation tree at startup and serves
//! llms.txt style text exports per module and per folder.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use llms_docs_server::config::Config;
use llms_docs_server::content::{DocsLoader, MdxTextRenderer, PageSource};
use llms_docs_server::routes;
use llms_docs_server::state::AppState;

const DEFAULT_LOG_FILTER: &str = "llms_docs_server=debug,tower_http=debug";

/// Load `.env` (the given file, or the usual lookup) and build the log
/// filter from the resulting environment. `.env` must be loaded before the
/// filter reads `RUST_LOG`.
fn load_env_and_filter(dotenv_path: Option<&Path>) -> EnvFilter {
    let loaded = match dotenv_path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    if let Err(e) = loaded {
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(load_env_and_filter(None))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting llms-docs-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Content directory: {}", config.content.dir.display());

    // Pages are loaded once and never change while serving
    let source = DocsLoader::new(&config.content.dir)
        .load()
        .context("Failed to load documentation content")?;
    tracing::info!(
        "Docs initialized with {} pages in {} modules",
        source.pages().len(),
        source.modules().len()
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    let app_state = AppState::new(config, Arc::new(source), Arc::new(MdxTextRenderer::new()));
    let app = routes::app(app_state);

    // Start server with graceful shutdown
    tracing::info!("llms-docs-server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
