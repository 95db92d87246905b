use axum::{routing::get, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod lookup_client;
mod pipeline;
mod render;

use config::WebConfig;
use pipeline::Pipeline;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (TOML). Without it the well-known paths, then the environment, are used.
    #[arg(short, long, env = "IPINFO_WEB_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides listen_port from the config
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ipinfo_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Load config
    let mut config = WebConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.listen_port = port;
    }
    tracing::info!("IP info service starting...");
    tracing::info!("Schema: {}", config.upstream.schema);
    tracing::info!("HTML mode: {}", config.html_mode);

    // Snapshot mode fetches here, before anything is accepted
    let pipeline = Pipeline::from_config(&config).await?;
    let state = AppState::new(config.clone(), pipeline);

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Lookup views
        .route("/", get(handlers::lookup::html_handler))
        .route("/html", get(handlers::lookup::html_handler))
        .route("/json", get(handlers::lookup::json_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WebConfig>,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    fn new(config: WebConfig, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }
}
