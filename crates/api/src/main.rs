use std::net::SocketAddr;
use std::sync::Arc;

use faceglow_ai::{ChatClient, ImageClient};
use faceglow_cloud::CloudClient;
use faceglow_pipeline::runner::PipelineRunner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faceglow_api::config::ServerConfig;
use faceglow_api::router::build_app_router;
use faceglow_api::sessions::Sessions;
use faceglow_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faceglow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Upstream clients ---
    let cloud = Arc::new(CloudClient::new(&config.cloud_function_base_url));
    tracing::info!(base_url = %config.cloud_function_base_url, "Cloud function client ready");

    let chat = Arc::new(ChatClient::new(&config.chat_base_url, &config.chat_api_key));
    let image = Arc::new(ImageClient::new(
        &config.image_base_url,
        &config.image_api_key,
    ));
    tracing::info!("Model endpoint clients ready");

    // --- Pipeline runner ---
    let runner = PipelineRunner::new(chat, image, cloud.clone(), cloud.clone());

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        albums: cloud.clone(),
        categories: cloud.clone(),
        files: cloud.clone(),
        analytics: cloud,
        runner,
        sessions: Arc::new(Sessions::new()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shut down");
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
