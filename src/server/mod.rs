//! # HTTP Server for Certificate Downloads
//!
//! Lets the results portal fetch a rendered certificate as a browser
//! download.
//!
//! ## Usage
//!
//! ```bash
//! ubeat-certificate serve --listen 0.0.0.0:8080 --config certificates.json
//! ```
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | `/api/tiers` | tier names |
//! | GET | `/api/tiers/:tier/fields` | default field table |
//! | POST | `/api/certificates/:tier` | PNG attachment |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::CertificateError;

/// Build the API router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/tiers", get(handlers::certificate::list_tiers))
        .route(
            "/api/tiers/:tier/fields",
            get(handlers::certificate::tier_fields),
        )
        .route(
            "/api/certificates/:tier",
            post(handlers::certificate::render),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use ubeat_certificate::config::RendererConfig;
/// use ubeat_certificate::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), ubeat_certificate::CertificateError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     renderer: RendererConfig::default(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), CertificateError> {
    let app_state = Arc::new(AppState::new(&config)?);
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            CertificateError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    info!(listen = %config.listen_addr, "certificate server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| CertificateError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
