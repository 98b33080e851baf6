//! HTTP surface for Serendigo.
//!
//! Exposes detour search, choice history, saved destinations, narrated
//! guides, and the generated media files over axum.

mod error;
mod params;
mod routes;

pub use error::{ApiError, ServerError};
pub use routes::router;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
};
use log::info;
use serendigo_rs_config::ServerConfig;
use serendigo_rs_core::ServiceContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS policy allowing credentialed requests from the configured origins.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ServerError::InvalidOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60)))
}

/// Router with middleware applied.
pub fn app(context: Arc<ServiceContext>, config: &ServerConfig) -> Result<Router, ServerError> {
    Ok(router(context).layer(cors_layer(&config.cors_origins)?))
}

/// Bind `config.bind` and serve until Ctrl+C or SIGTERM.
pub async fn serve(context: ServiceContext, config: &ServerConfig) -> Result<(), ServerError> {
    let app = app(Arc::new(context), config)?;
    let listener = TcpListener::bind(&config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind.clone(),
            source,
        })?;
    info!("server listening (addr={})", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(err) => {
                log::error!("failed to listen for Ctrl+C (error={err})");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                log::error!("failed to install SIGTERM handler (error={err})");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
