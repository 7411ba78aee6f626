//! FormKit API server binary

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use formkit_core::InMemoryFormRepository;
use formkit_server::{build_router, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "formkit-server")]
#[command(version)]
#[command(about = "FormKit REST API server", long_about = None)]
struct Args {
    /// Configuration file
    #[arg(long, env = "FORMKIT_CONFIG", default_value = "formkit-server.toml")]
    config: PathBuf,

    /// Listen address
    #[arg(long, env = "FORMKIT_BIND")]
    bind: Option<String>,

    /// Bearer token required on /api routes
    #[arg(long, env = "FORMKIT_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = ServerConfig::load(&args.config)?.merge(args.bind, args.token);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_filter.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut state = AppState::new(Arc::new(InMemoryFormRepository::new()));
    if let Some(token) = &config.token {
        state = state.with_token(token.clone());
    } else {
        tracing::warn!("no token configured, API is open");
    }

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("FormKit API listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
