mod assignments;
mod auth;
mod config;
mod dashboard;
mod errors;
mod handlers;
mod models;
mod services;
mod store;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::store::DocumentStore;

/// Main entry point for the application.
///
/// Initializes logging, loads configuration, builds the document store
/// client and starts the Axum server. Each request runs to completion
/// independently; the only shared state is the config and the store client.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "student_risk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Document store client (all persistence goes through the external store)
    let store = DocumentStore::new(&config);
    tracing::info!("Document store client initialized: {}", config.store_base_url);

    let app_state = Arc::new(handlers::AppState { store });

    let api_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/students", post(handlers::create_student))
        .route("/assessments", post(handlers::create_assessment))
        .route("/counselor/dashboard", get(dashboard::counselor_dashboard))
        .layer(
            // Request size limit: 1MB max payload (prevents memory exhaustion)
            ServiceBuilder::new().layer(RequestBodyLimitLayer::new(1024 * 1024)),
        );

    // Health check bypasses the body limit layer
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
