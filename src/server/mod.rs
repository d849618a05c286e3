pub mod auth;
mod error;
mod handlers;
mod state;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::storage::Storage;

pub use error::AppError;
pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let user_routes = Router::new()
        .route("/process-csv", post(handlers::process_csv))
        .route("/uploads", get(handlers::list_uploads))
        .route("/dashboard", get(handlers::dashboard))
        .route("/weekly-report", get(handlers::weekly_report))
        .route("/check-subscription", get(handlers::check_subscription))
        .route("/seed-demo", post(handlers::seed_demo))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_user));

    let admin_routes = Router::new()
        .route("/admin/devex-rate", post(handlers::update_devex_rate))
        .route("/admin/subscriptions", post(handlers::update_subscription))
        .route("/admin/products", post(handlers::save_product))
        .route("/admin/purge-demo", post(handlers::purge_demo))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/seat-counter", get(handlers::seat_counter))
        .merge(user_routes)
        .merge(admin_routes)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves the HTTP API until Ctrl+C or SIGTERM.
pub async fn serve(config: Config, storage: Arc<dyn Storage>) -> anyhow::Result<()> {
    let address = config.address();
    let state = Arc::new(AppState::new(config, storage));

    let listener = TcpListener::bind(&address).await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!("Listening on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(error) => {
                error!("Failed to install Ctrl+C handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(error) => {
                error!("Failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {}
    }
}
