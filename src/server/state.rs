//! Server state and configuration.

use crate::config::RendererConfig;
use crate::error::CertificateError;
use crate::render::CertificateRenderer;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Template and font locations
    pub renderer: RendererConfig,
}

/// Application state shared across handlers.
pub struct AppState {
    pub renderer: CertificateRenderer,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self, CertificateError> {
        let renderer = CertificateRenderer::new(config.renderer.clone())?;
        Ok(Self { renderer })
    }

    /// State around an already-built renderer (custom asset store, tests).
    pub fn with_renderer(renderer: CertificateRenderer) -> Self {
        Self { renderer }
    }
}
