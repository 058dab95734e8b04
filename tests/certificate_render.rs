//! # Certificate Rendering Tests
//!
//! End-to-end renders against in-memory templates, plus properties of the
//! tier tables that must hold for every tier and field.
//!
//! No font files are shipped with the tests, so every render here also
//! exercises the fallback path: the decorative font is missing (or
//! corrupt) and text comes from the built-in bitmap face.

use async_trait::async_trait;
use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use ubeat_certificate::assets::{AssetSource, AssetStore, MemoryAssetStore};
use ubeat_certificate::certificate::field::resolve_coordinate;
use ubeat_certificate::certificate::layout::effective_config;
use ubeat_certificate::certificate::{
    CertificateData, CertificateFieldsConfig, FieldName, FieldOverride, Student, Tier, tiers,
};
use ubeat_certificate::config::RendererConfig;
use ubeat_certificate::{CertificateError, CertificateRenderer, RenderedCertificate};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 700;
const PAPER: Rgba<u8> = Rgba([250, 245, 230, 255]);

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn template_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, PAPER);
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Store holding a template for every tier and no fonts.
fn store_with_templates(config: &RendererConfig) -> MemoryAssetStore {
    let mut store = MemoryAssetStore::new();
    for tier in Tier::ALL {
        store.insert(
            config.templates.for_tier(tier).clone(),
            template_png(WIDTH, HEIGHT),
        );
    }
    store
}

fn renderer() -> CertificateRenderer {
    let config = RendererConfig::default();
    let store = store_with_templates(&config);
    CertificateRenderer::with_store(config, Arc::new(store))
}

fn jane() -> CertificateData {
    CertificateData {
        student: Student::new("jane doe", "A/123").exam_year(2023),
        school_name: "st marys".into(),
    }
}

fn field_text(certificate: &RenderedCertificate, field: FieldName) -> Option<&str> {
    certificate
        .fields
        .iter()
        .find(|p| p.field == field)
        .map(|p| p.text.as_str())
}

fn inked_pixels(png: &[u8]) -> usize {
    image::load_from_memory(png)
        .unwrap()
        .to_rgba8()
        .pixels()
        .filter(|p| **p != PAPER)
        .count()
}

/// Store whose fetches never complete in time.
struct StalledStore;

#[async_trait]
impl AssetStore for StalledStore {
    async fn fetch(&self, _source: &AssetSource) -> Result<Vec<u8>, CertificateError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }
}

// ============================================================================
// END-TO-END
// ============================================================================

#[tokio::test]
async fn test_distinction_renders_without_decorative_font() {
    let certificate = renderer()
        .render_dated(&jane(), Tier::Distinction, &CertificateFieldsConfig::new(), today())
        .await
        .unwrap();

    assert_eq!(certificate.filename, "UBEAT_Certificate_A_123.png");
    assert_eq!((certificate.width, certificate.height), (WIDTH, HEIGHT));
    assert_eq!(field_text(&certificate, FieldName::StudentName), Some("JANE DOE"));
    assert_eq!(field_text(&certificate, FieldName::SchoolName), Some("ST MARYS"));
    assert_eq!(field_text(&certificate, FieldName::ExamNumber), Some("A/123"));
    assert_eq!(field_text(&certificate, FieldName::Year), Some("23"));
    assert_eq!(field_text(&certificate, FieldName::Date), Some("October 19, 2023"));

    let decoded = image::load_from_memory(&certificate.png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (WIDTH, HEIGHT));
    assert!(inked_pixels(&certificate.png) > 0, "text should be drawn");
}

#[tokio::test]
async fn test_corrupt_decorative_font_is_not_fatal() {
    let config = RendererConfig::default();
    let mut store = store_with_templates(&config);
    store.insert(config.decorative_font.source.clone(), b"<html>404</html>".to_vec());
    let renderer = CertificateRenderer::with_store(config, Arc::new(store));

    let fonts = renderer.load_fonts().await;
    assert!(!fonts.has_decorative());

    let certificate = renderer
        .render(&jane(), Tier::Pass, &CertificateFieldsConfig::new())
        .await
        .unwrap();
    assert_eq!(field_text(&certificate, FieldName::ExamNumber), Some("Exam No: A/123"));
    assert_eq!(field_text(&certificate, FieldName::Year), None);
}

#[tokio::test]
async fn test_missing_template_is_fatal() {
    let config = RendererConfig::default();
    let renderer = CertificateRenderer::with_store(config, Arc::new(MemoryAssetStore::new()));
    let result = renderer
        .render(&jane(), Tier::Credit, &CertificateFieldsConfig::new())
        .await;
    assert!(matches!(result, Err(CertificateError::TemplateLoad(_))));
}

#[tokio::test]
async fn test_undecodable_template_is_fatal() {
    let config = RendererConfig::default();
    let mut store = MemoryAssetStore::new();
    store.insert(config.templates.credit.clone(), b"not a png".to_vec());
    let renderer = CertificateRenderer::with_store(config, Arc::new(store));
    let result = renderer
        .render(&jane(), Tier::Credit, &CertificateFieldsConfig::new())
        .await;
    assert!(matches!(result, Err(CertificateError::TemplateLoad(_))));
}

#[tokio::test]
async fn test_stalled_template_times_out() {
    let config = RendererConfig {
        fetch_timeout_secs: 1,
        ..Default::default()
    };
    let renderer = CertificateRenderer::with_store(config, Arc::new(StalledStore));
    let result = renderer
        .render(&jane(), Tier::Pass, &CertificateFieldsConfig::new())
        .await;
    assert!(matches!(result, Err(CertificateError::Timeout { secs: 1, .. })));
}

#[tokio::test]
async fn test_invalid_input_rejected_before_io() {
    let renderer = CertificateRenderer::with_store(RendererConfig::default(), Arc::new(StalledStore));
    let data = CertificateData {
        student: Student::new("", "A/123"),
        school_name: "st marys".into(),
    };
    let result = renderer
        .render(&data, Tier::Pass, &CertificateFieldsConfig::new())
        .await;
    assert!(matches!(result, Err(CertificateError::InvalidInput(_))));
}

#[tokio::test]
async fn test_suppressed_fields_draw_less_ink() {
    let full = renderer()
        .render_dated(&jane(), Tier::Credit, &CertificateFieldsConfig::new(), today())
        .await
        .unwrap();

    let overrides = CertificateFieldsConfig::new()
        .suppress(FieldName::ExamNumber)
        .suppress(FieldName::Year)
        .suppress(FieldName::SerialNumber);
    let sparse = renderer()
        .render_dated(&jane(), Tier::Credit, &overrides, today())
        .await
        .unwrap();

    assert_eq!(sparse.fields.len(), full.fields.len() - 3);
    assert!(inked_pixels(&sparse.png) < inked_pixels(&full.png));
}

#[tokio::test]
async fn test_rotation_does_not_leak_into_next_field() {
    // Same date field, with and without a heavily rotated year before it.
    let upright = CertificateFieldsConfig::new().suppress(FieldName::Year);
    let rotated = CertificateFieldsConfig::new().with(
        FieldName::Year,
        FieldOverride {
            rotation: Some(45.0),
            x: Some(0.9),
            y: Some(0.1),
            ..Default::default()
        },
    );

    let a = renderer()
        .render_dated(&jane(), Tier::Credit, &upright, today())
        .await
        .unwrap();
    let b = renderer()
        .render_dated(&jane(), Tier::Credit, &rotated, today())
        .await
        .unwrap();

    let date_a = a.fields.iter().find(|p| p.field == FieldName::Date).unwrap();
    let date_b = b.fields.iter().find(|p| p.field == FieldName::Date).unwrap();
    assert_eq!(date_a, date_b);

    // The date band (bottom fifth of the certificate) is pixel-identical.
    let img_a = image::load_from_memory(&a.png).unwrap().to_rgba8();
    let img_b = image::load_from_memory(&b.png).unwrap().to_rgba8();
    for y in (HEIGHT * 4 / 5)..HEIGHT {
        for x in 0..WIDTH {
            assert_eq!(img_a.get_pixel(x, y), img_b.get_pixel(x, y), "pixel {},{}", x, y);
        }
    }
}

#[tokio::test]
async fn test_oversized_font_override_is_rejected() {
    let overrides = CertificateFieldsConfig::new().with(
        FieldName::StudentName,
        FieldOverride {
            font_size: Some(1e7),
            ..Default::default()
        },
    );
    let result = renderer()
        .render_dated(&jane(), Tier::Distinction, &overrides, today())
        .await;
    assert!(matches!(result, Err(CertificateError::InvalidInput(_))));
}

#[tokio::test]
async fn test_overlong_text_is_rejected() {
    let data = CertificateData {
        student: Student::new("w".repeat(20_000), "A/123"),
        school_name: "st marys".into(),
    };
    let result = renderer()
        .render_dated(&data, Tier::Pass, &CertificateFieldsConfig::new(), today())
        .await;
    assert!(matches!(result, Err(CertificateError::InvalidInput(_))));
}

#[test]
fn test_zero_fetch_timeout_is_rejected_by_renderer() {
    let config = RendererConfig {
        fetch_timeout_secs: 0,
        ..Default::default()
    };
    assert!(matches!(
        CertificateRenderer::new(config),
        Err(CertificateError::Config(_))
    ));
}

#[tokio::test]
async fn test_save_to_uses_download_filename() {
    let data = CertificateData {
        student: Student::new("kofi mensah", "BECE/2024/001"),
        school_name: "ridge school".into(),
    };
    let certificate = renderer()
        .render(&data, Tier::Pass, &CertificateFieldsConfig::new())
        .await
        .unwrap();

    let dir = std::env::temp_dir().join(format!("ubeat-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = certificate.save_to(&dir).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "UBEAT_Certificate_BECE_2024_001.png"
    );
    assert_eq!(std::fs::read(&path).unwrap(), certificate.png);
    std::fs::remove_dir_all(&dir).unwrap();
}

// ============================================================================
// TIER TABLE PROPERTIES
// ============================================================================

#[test]
fn test_empty_overrides_reproduce_defaults() {
    let empty = CertificateFieldsConfig::new();
    for tier in Tier::ALL {
        for (field, default) in tiers::defaults(tier) {
            assert_eq!(effective_config(tier, field, &empty), Some(default));
        }
    }
}

fn assert_near(actual: (f32, f32), expected: (f32, f32), what: &str) {
    assert!(
        (actual.0 - expected.0).abs() < 1e-3 && (actual.1 - expected.1).abs() < 1e-3,
        "{}: got {:?}, expected {:?}",
        what,
        actual,
        expected
    );
}

#[test]
fn test_default_anchors_on_a_1000x700_template() {
    // Fractions scale with the template; pixel entries stay put.
    let cases = [
        (Tier::Pass, FieldName::StudentName, (500.0, 329.0)),
        (Tier::Pass, FieldName::ExamNumber, (160.0, 602.0)),
        (Tier::Pass, FieldName::SerialNumber, (840.0, 56.0)),
        (Tier::Credit, FieldName::StudentName, (500.0, 315.0)),
        (Tier::Credit, FieldName::Date, (270.0, 611.1)),
        (Tier::Credit, FieldName::ExamNumber, (1290.0, 1235.0)),
        (Tier::Distinction, FieldName::StudentName, (500.0, 308.0)),
        (Tier::Distinction, FieldName::Year, (897.0, 103.6)),
        (Tier::Distinction, FieldName::ExamNumber, (1300.0, 1240.0)),
    ];
    for (tier, field, expected) in cases {
        let config = tiers::default_field(tier, field).unwrap();
        assert_near(config.anchor(WIDTH, HEIGHT), expected, &format!("{} {}", tier, field));
    }
}

#[test]
fn test_coordinate_threshold_is_inclusive_at_one() {
    assert_eq!(resolve_coordinate(1.0, 700), 700.0);
    assert_eq!(resolve_coordinate(0.0, 700), 0.0);
    assert_eq!(resolve_coordinate(1.5, 700), 1.5);
    assert_eq!(resolve_coordinate(1290.0, 700), 1290.0);
}

#[test]
fn test_default_tables_serialize_camel_case() {
    let json = serde_json::to_value(tiers::defaults(Tier::Credit)).unwrap();
    assert_eq!(json["year"]["rotation"], -8.0);
    assert_eq!(json["studentName"]["fontFamily"], tiers::DECORATIVE_FAMILY);
    assert_eq!(json["examNumber"]["x"], 1290.0);
}
