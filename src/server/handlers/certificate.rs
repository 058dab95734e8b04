//! Certificate handlers: tier metadata and PNG downloads.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

use crate::certificate::{
    CertificateData, CertificateFieldsConfig, FieldConfig, FieldName, Tier, tiers,
};
use crate::error::CertificateError;
use crate::render::RenderedCertificate;

use super::super::state::AppState;

/// Body for POST /api/certificates/:tier.
#[derive(Debug, Deserialize)]
pub struct CertificateRequest {
    #[serde(flatten)]
    pub data: CertificateData,
    #[serde(default)]
    pub overrides: CertificateFieldsConfig,
}

/// JSON error body: `{"success": false, "error": "..."}`.
pub struct ApiError(StatusCode, String);

impl From<CertificateError> for ApiError {
    fn from(e: CertificateError) -> Self {
        let status = match &e {
            CertificateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CertificateError::UnknownTier(_) => StatusCode::NOT_FOUND,
            CertificateError::Asset(_)
            | CertificateError::TemplateLoad(_)
            | CertificateError::Timeout { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.0,
            Json(serde_json::json!({ "success": false, "error": self.1 })),
        )
            .into_response()
    }
}

/// Handle GET /api/tiers.
pub async fn list_tiers() -> Json<Vec<Tier>> {
    Json(Tier::ALL.to_vec())
}

/// Handle GET /api/tiers/:tier/fields - the tier's default field table.
pub async fn tier_fields(
    Path(tier): Path<String>,
) -> Result<Json<BTreeMap<FieldName, FieldConfig>>, ApiError> {
    let tier: Tier = tier.parse()?;
    Ok(Json(tiers::defaults(tier)))
}

/// Handle POST /api/certificates/:tier - render and return as a download.
///
/// The tier is checked before the body, so an unknown tier is a 404 even
/// when the body is also bad.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Path(tier): Path<String>,
    payload: Result<Json<CertificateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let tier: Tier = tier.parse()?;
    let Json(request) =
        payload.map_err(|rejection| ApiError(StatusCode::BAD_REQUEST, rejection.body_text()))?;

    let certificate = state
        .renderer
        .render(&request.data, tier, &request.overrides)
        .await
        .inspect_err(|e| warn!(%tier, error = %e, "certificate render failed"))?;

    Ok(download_response(certificate))
}

fn download_response(certificate: RenderedCertificate) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        certificate.filename.replace('"', "")
    );
    (
        [
            (header::CONTENT_TYPE, RenderedCertificate::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        certificate.png,
    )
        .into_response()
}
