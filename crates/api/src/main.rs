use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_api::config::ServerConfig;
use waypoint_api::router::build_app_router;
use waypoint_api::state::AppState;
use waypoint_db::repositories::{RoadmapRepo, UserKeyRepo};
use waypoint_db::{MemoryStore, RoadmapStore, UserKeyStore};
use waypoint_llm::{GeminiClient, RoadmapGenerator};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypoint_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let (roadmaps, keys): (Arc<dyn RoadmapStore>, Arc<dyn UserKeyStore>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = waypoint_db::create_pool(database_url)
                    .await
                    .expect("Failed to connect to database");
                tracing::info!("Database connection pool created");

                waypoint_db::health_check(&pool)
                    .await
                    .expect("Database health check failed");
                tracing::info!("Database health check passed");

                waypoint_db::run_migrations(&pool)
                    .await
                    .expect("Failed to run database migrations");
                tracing::info!("Database migrations applied");

                let roadmaps: Arc<dyn RoadmapStore> = Arc::new(RoadmapRepo::new(pool.clone()));
                let keys: Arc<dyn UserKeyStore> = Arc::new(UserKeyRepo::new(pool));
                (roadmaps, keys)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store; data will not persist");
                let store = Arc::new(MemoryStore::new());
                let roadmaps: Arc<dyn RoadmapStore> = store.clone();
                let keys: Arc<dyn UserKeyStore> = store;
                (roadmaps, keys)
            }
        };

    // --- Generation ---
    let gemini = GeminiClient::new(config.gemini.clone()).expect("Failed to build Gemini client");
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; generation requires a per-user or per-request key");
    }
    let generator = Arc::new(RoadmapGenerator::new(
        Arc::new(gemini),
        config.gemini_api_key.clone(),
    ));
    tracing::info!(model = generator.model_name(), "Roadmap generator ready");

    // --- App state + router ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(config, roadmaps, keys, generator);
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
