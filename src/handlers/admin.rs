//! Admin-side QRIS payload configuration.
//!
//! The admin pastes the full merchant payload once; it is stored verbatim
//! for display and normalized down to the reusable base the builder works
//! from. Operator authentication sits in front of these routes and is
//! handled by the surrounding platform.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::{QRIS_BASE_PAYLOAD, QRIS_RAW_PAYLOAD};
use crate::qris;

#[derive(Debug, Serialize)]
pub struct QrisSettingsResponse {
    pub raw_payload: String,
    pub base_payload: String,
}

pub async fn get_qris_settings(
    State(state): State<AppState>,
) -> Result<Json<QrisSettingsResponse>> {
    let conn = state.db.get()?;

    let raw = queries::get_setting(&conn, QRIS_RAW_PAYLOAD)?;
    let base = queries::get_setting(&conn, QRIS_BASE_PAYLOAD)?;

    Ok(Json(QrisSettingsResponse {
        raw_payload: raw.map(|s| s.value).unwrap_or_default(),
        base_payload: base.map(|s| s.value).unwrap_or_default(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQrisRequest {
    /// Full merchant payload as exported by the payment provider, amount and
    /// checksum fields included.
    pub payload: String,
}

pub async fn update_qris_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateQrisRequest>,
) -> Result<Json<QrisSettingsResponse>> {
    let raw = request.payload.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest("QRIS payload must not be empty".into()));
    }

    let base = qris::normalize(raw);
    if base.is_empty() {
        return Err(AppError::BadRequest(
            "QRIS payload could not be normalized".into(),
        ));
    }

    // Nothing is persisted unless normalization produced a usable base.
    let conn = state.db.get()?;
    queries::save_qris_payloads(&conn, raw, &base)?;

    tracing::info!("QRIS base payload updated ({} chars)", base.len());

    Ok(Json(QrisSettingsResponse {
        raw_payload: raw.to_string(),
        base_payload: base,
    }))
}
