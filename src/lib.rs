//! # UBEAT Certificate - Certificate Image Renderer
//!
//! Draws a student's name, school, exam number and dates onto the
//! background template for their grade tier and produces a PNG named for
//! download. It provides:
//!
//! - **Layout**: Per-tier field tables with caller overrides
//! - **Rendering**: TTF and built-in bitmap text, rotated and tinted onto the template
//! - **Assets**: Templates and fonts from disk or HTTP, with timeouts
//! - **Server**: HTTP endpoint returning certificates as attachments
//!
//! ## Quick Start
//!
//! ```no_run
//! use ubeat_certificate::{
//!     certificate::{CertificateData, CertificateFieldsConfig, Student, Tier},
//!     config::RendererConfig,
//!     render::CertificateRenderer,
//! };
//!
//! # async fn example() -> Result<(), ubeat_certificate::CertificateError> {
//! let renderer = CertificateRenderer::new(RendererConfig::default())?;
//!
//! let data = CertificateData {
//!     student: Student::new("jane doe", "BECE/2024/001").exam_year(2024),
//!     school_name: "st marys".into(),
//! };
//!
//! let certificate = renderer
//!     .render(&data, Tier::Credit, &CertificateFieldsConfig::new())
//!     .await?;
//! assert_eq!(certificate.filename, "UBEAT_Certificate_BECE_2024_001.png");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`certificate`] | Input records, field configs, tier tables, layout |
//! | [`render`] | Font loading, painting, PNG encoding |
//! | [`assets`] | Asset sources and stores |
//! | [`config`] | Renderer configuration |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod assets;
pub mod certificate;
pub mod config;
pub mod error;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use certificate::{CertificateData, Student, Tier};
pub use error::CertificateError;
pub use render::{CertificateRenderer, RenderedCertificate};
