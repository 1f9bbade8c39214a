//! Minimal blogging web service
//!
//! Provides:
//! - A front page of recent posts with permalinks
//! - A new-post submission form
//! - Signup with validated credentials
//! - A visit-counter demo backed by a tamper-evident cookie

mod blog;
mod config;
mod pages;
mod signup;
mod storage;
mod visits;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};
use clap::Parser;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::storage::Storage;

#[derive(Parser, Debug)]
#[command(name = "blog-service")]
#[command(about = "Minimal blogging web service")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 3000, env = "BLOG_PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "BLOG_BIND")]
    bind: String,

    /// Path to the data directory
    #[arg(long, default_value = "./data", env = "BLOG_DATA_PATH")]
    data_path: String,
}

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub storage: Storage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_service=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.data_path)?;
    let storage = Storage::new(&cli.data_path)?;

    let state = Arc::new(AppState { config, storage });

    let app = router(state);

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;

    tracing::info!("Starting blog-service on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Blog service shut down");
    Ok(())
}

/// Build the application router over shared state
fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Visit-counter demo
        .route("/", get(visits::handler))
        // Blog pages
        .route("/blog", get(blog::front::handler))
        .route("/blog/{id}", get(blog::permalink::handler))
        .route(
            "/blog/newpost",
            get(blog::newpost::get_handler).post(blog::newpost::post_handler),
        )
        // Signup
        .route(
            "/signup",
            get(signup::get_handler).post(signup::post_handler),
        )
        .route("/welcome", get(signup::welcome_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
