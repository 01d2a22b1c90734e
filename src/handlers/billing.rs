//! Invoice generation and manual payment confirmation.
//!
//! Generation perturbs the requested amount with a random 3-digit surcharge
//! so concurrent payments against the shared merchant account can be told
//! apart by amount alone, then snapshots the built payload on the invoice.
//!
//! Confirmation is a user-triggered state transition trusted at face value;
//! there is no bank-side verification. See DESIGN.md for the trust boundary.

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::db::{queries, AppState};
use crate::error::{AppError, OptionExt, Result};
use crate::extractors::Json;
use crate::models::{CreateInvoice, Invoice, User};
use crate::qris;

#[derive(Debug, Serialize)]
pub struct BillingSummary {
    pub user: User,
    /// Whether a base payload is configured, i.e. invoices can be generated.
    pub configured: bool,
    pub last_invoice: Option<Invoice>,
}

pub async fn billing_summary(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<BillingSummary>> {
    let conn = state.db.get()?;

    let user = queries::get_user_by_id(&conn, user_id)?.or_not_found("User not found")?;
    let configured = queries::get_base_payload(&conn)?.is_some();
    let last_invoice = queries::latest_invoice_for_user(&conn, user_id)?;

    Ok(Json(BillingSummary {
        user,
        configured,
        last_invoice,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Requested price in whole currency units, before the surcharge.
    pub base_amount: i64,
    /// Plan being purchased; defaults to "pro".
    #[serde(default)]
    pub plan_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub invoice_id: i64,
    /// Final amount the payer must transfer (base + unique code).
    pub amount: i64,
    pub unique_code: i64,
    /// Full QRIS payload; the caller renders this as a QR image.
    pub payload: String,
}

pub async fn generate_invoice(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    if request.base_amount <= 0 {
        return Err(AppError::BadRequest("Invalid amount".into()));
    }

    let conn = state.db.get()?;
    queries::get_user_by_id(&conn, user_id)?.or_not_found("User not found")?;

    let base = queries::get_base_payload(&conn)?
        .ok_or_else(|| AppError::NotConfigured("QRIS base payload not configured".into()))?;

    let (unique_code, final_amount) = qris::generate_unique_amount(request.base_amount);
    let payload = qris::build(&base, final_amount)?;

    let invoice = queries::create_invoice(
        &conn,
        &CreateInvoice {
            user_id,
            plan_name: request.plan_name.clone().unwrap_or_else(|| "pro".into()),
            base_amount: request.base_amount,
            unique_code,
            final_amount,
            payload: payload.clone(),
        },
    )?;

    tracing::info!(
        "Invoice {} created for user {}: {} + {} = {}",
        invoice.id,
        user_id,
        request.base_amount,
        unique_code,
        final_amount
    );

    Ok(Json(GenerateResponse {
        invoice_id: invoice.id,
        amount: final_amount,
        unique_code,
        payload,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub invoice_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub message: String,
    pub user: User,
}

pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>> {
    let conn = state.db.get()?;

    let outcome = queries::confirm_invoice(&conn, user_id, request.invoice_id)?;
    let user = queries::get_user_by_id(&conn, user_id)?.or_not_found("User not found")?;

    let message = match outcome {
        queries::ConfirmOutcome::Confirmed => {
            tracing::info!(
                "Invoice {} confirmed for user {}, plan upgraded to {}",
                request.invoice_id,
                user_id,
                user.plan
            );
            format!("Payment confirmed. Plan upgraded to {}.", user.plan)
        }
        queries::ConfirmOutcome::AlreadyPaid => "Invoice already paid".to_string(),
    };

    Ok(Json(ConfirmResponse { message, user }))
}

pub async fn list_invoices(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Invoice>>> {
    let conn = state.db.get()?;
    queries::get_user_by_id(&conn, user_id)?.or_not_found("User not found")?;
    let invoices = queries::list_invoices_for_user(&conn, user_id)?;
    Ok(Json(invoices))
}
