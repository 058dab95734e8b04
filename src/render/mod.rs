//! # Certificate Rendering
//!
//! Composes a student's details onto a tier's template image and encodes
//! the result as PNG.
//!
//! ## Pipeline
//!
//! ```text
//! decorative font ──(best effort)──► FontBook
//! template image  ──(fatal)────────► Surface (native size)
//!                                       │
//! CertificateData + tier + overrides ─► plan() ─► draw each field ─► PNG
//! ```
//!
//! ## Modules
//!
//! - [`font`]: Face resolution and text rasterisation
//! - [`paint`]: Drawing surface, rotation and blending
//!
//! ## Example
//!
//! ```no_run
//! use ubeat_certificate::certificate::{CertificateData, CertificateFieldsConfig, Student, Tier};
//! use ubeat_certificate::config::RendererConfig;
//! use ubeat_certificate::render::CertificateRenderer;
//!
//! # async fn example() -> Result<(), ubeat_certificate::CertificateError> {
//! let renderer = CertificateRenderer::new(RendererConfig::default())?;
//! let data = CertificateData {
//!     student: Student::new("jane doe", "A/123").exam_year(2023),
//!     school_name: "st marys".into(),
//! };
//! let certificate = renderer
//!     .render(&data, Tier::Distinction, &CertificateFieldsConfig::new())
//!     .await?;
//! certificate.save_to(std::path::Path::new("."))?;
//! # Ok(())
//! # }
//! ```

pub mod font;
pub mod paint;

use chrono::{Local, NaiveDate};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::assets::{AssetSource, AssetStore, HttpAssetStore};
use crate::certificate::{
    CertificateData, CertificateFieldsConfig, PlacedText, Tier, check_sizes, download_filename,
    plan,
};
use crate::config::RendererConfig;
use crate::error::CertificateError;

use font::{FontBook, parse_font};
use paint::Surface;

/// A finished certificate, ready to hand to the user as a download.
#[derive(Debug, Clone)]
pub struct RenderedCertificate {
    /// `UBEAT_Certificate_<exam number>.png`
    pub filename: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Fields as drawn, in draw order.
    pub fields: Vec<PlacedText>,
}

impl RenderedCertificate {
    pub const CONTENT_TYPE: &'static str = "image/png";

    /// Write the PNG into `dir` under its download filename.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, CertificateError> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.png)?;
        info!(path = %path.display(), bytes = self.png.len(), "saved certificate");
        Ok(path)
    }
}

/// Renders certificates from configured templates and fonts.
///
/// Holds no per-render state: every call loads its own fonts and template
/// and owns its own surface, so calls can run concurrently.
pub struct CertificateRenderer {
    config: RendererConfig,
    store: Arc<dyn AssetStore>,
}

impl CertificateRenderer {
    /// Renderer reading assets from disk and HTTP.
    pub fn new(config: RendererConfig) -> Result<Self, CertificateError> {
        config.validate()?;
        let store = HttpAssetStore::new(&config.user_agent, config.fetch_timeout())?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Renderer reading assets from a custom store.
    pub fn with_store(config: RendererConfig, store: Arc<dyn AssetStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render a certificate dated today.
    pub async fn render(
        &self,
        data: &CertificateData,
        tier: Tier,
        overrides: &CertificateFieldsConfig,
    ) -> Result<RenderedCertificate, CertificateError> {
        self.render_dated(data, tier, overrides, Local::now().date_naive())
            .await
    }

    /// Render a certificate with an explicit "today" for the date field.
    pub async fn render_dated(
        &self,
        data: &CertificateData,
        tier: Tier,
        overrides: &CertificateFieldsConfig,
        today: NaiveDate,
    ) -> Result<RenderedCertificate, CertificateError> {
        data.validate()?;

        let fonts = self.load_fonts().await;
        let template = self.load_template(tier).await?;
        let surface = Surface::from_template(&template)?;
        let (width, height) = (surface.width(), surface.height());

        let fields = plan(data, tier, overrides, width, height, today);
        check_sizes(&fields, height)?;
        debug!(%tier, width, height, fields = fields.len(), "laid out certificate");

        let filename = download_filename(&data.student.exam_number);
        let png = tokio::task::spawn_blocking({
            let fields = fields.clone();
            move || paint_and_encode(surface, &fields, &fonts)
        })
        .await
        .map_err(|e| CertificateError::Encode(format!("Render task failed: {}", e)))??;

        info!(%tier, filename = %filename, bytes = png.len(), "rendered certificate");

        Ok(RenderedCertificate {
            filename,
            png,
            width,
            height,
            fields,
        })
    }

    /// Load the decorative and fallback faces. Never fails: anything that
    /// cannot be loaded is logged and left out of the book.
    pub async fn load_fonts(&self) -> FontBook {
        let decorative = &self.config.decorative_font;
        let mut book = FontBook::builtin(decorative.family.clone());

        match self.load_font(&decorative.source).await {
            Ok(font) => book = book.with_decorative(font),
            Err(e) => warn!(
                family = %decorative.family,
                source = %decorative.source,
                error = %e,
                "decorative font unavailable, using fallback face"
            ),
        }

        if let Some(source) = &self.config.fallback_font {
            match self.load_font(source).await {
                Ok(font) => book = book.with_fallback(font),
                Err(e) => warn!(
                    source = %source,
                    error = %e,
                    "fallback font unavailable, using built-in bitmap face"
                ),
            }
        }

        book
    }

    async fn load_font(&self, source: &AssetSource) -> Result<ab_glyph::FontArc, CertificateError> {
        let bytes = self.fetch(source).await?;
        parse_font(bytes)
    }

    /// Load and decode a tier's background template.
    pub async fn load_template(&self, tier: Tier) -> Result<DynamicImage, CertificateError> {
        let source = self.config.templates.for_tier(tier);
        let bytes = self.fetch(source).await.map_err(|e| match e {
            CertificateError::Asset(msg) => CertificateError::TemplateLoad(msg),
            other => other,
        })?;

        let template = image::load_from_memory(&bytes).map_err(|e| {
            CertificateError::TemplateLoad(format!("Failed to decode {}: {}", source, e))
        })?;
        debug!(%tier, source = %source, width = template.width(), height = template.height(), "loaded template");
        Ok(template)
    }

    /// Fetch an asset, bounded by the configured timeout.
    async fn fetch(&self, source: &AssetSource) -> Result<Vec<u8>, CertificateError> {
        let timeout = self.config.fetch_timeout();
        tokio::time::timeout(timeout, self.store.fetch(source))
            .await
            .map_err(|_| CertificateError::Timeout {
                what: source.to_string(),
                secs: timeout.as_secs(),
            })?
    }
}

/// Draw every field in order, then encode.
fn paint_and_encode(
    mut surface: Surface,
    fields: &[PlacedText],
    fonts: &FontBook,
) -> Result<Vec<u8>, CertificateError> {
    for field in fields {
        surface.draw(field, fonts)?;
    }
    surface.encode_png()
}
