//! Core library for the image upload gateway: configuration, upload
//! pipeline, route handlers, and app assembly.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod upload;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use models::ApiResponse;
pub use upload::{UploadRequestBody, UploadStore, UploadedFile};

pub use middleware::cors::{cors_layer_from_config, cors_layer_permissive};

use axum::{extract::DefaultBodyLimit, Router};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub store: UploadStore,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            app_name: "Image Upload Gateway".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: UploadStore::new(config.uploads.clone()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: AppConfig) -> Router {
    let mut router = Router::new().merge(create_routes());

    // The default axum body cap (2 MB) is below one valid image; size it so a
    // full array upload fits and the per-part limit stays the deciding check.
    router = router.layer(DefaultBodyLimit::max(config.uploads.request_body_limit()));

    router = router.layer(middleware::cors::cors_layer_from_config(&config.cors));

    router = router.layer(middleware::logging::logging_layer());

    router.with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server is listening on port: {}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
