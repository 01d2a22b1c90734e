use chrono::Utc;
use rusqlite::{params, Connection};

use crate::error::{AppError, Result};
use crate::models::*;

use super::from_row::{query_all, query_one, FromRow, INVOICE_COLS, SETTING_COLS, USER_COLS};

fn now() -> i64 {
    Utc::now().timestamp()
}

// ============ Users ============

/// Create a user on the free plan.
pub fn create_user(conn: &Connection, input: &CreateUser) -> Result<User> {
    validate_email_format(&input.email)?;
    let email = input.email.trim().to_lowercase();
    let now = now();

    conn.query_row(
        &format!(
            "INSERT INTO users (email, created_at, updated_at)
             VALUES (?1, ?2, ?3) RETURNING {}",
            USER_COLS
        ),
        params![&email, now, now],
        User::from_row,
    )
    .map_err(Into::into)
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
        &[&id],
    )
}

/// Set a user's plan and billing status. Returns false when the user does
/// not exist.
pub fn set_user_plan(
    conn: &Connection,
    user_id: i64,
    plan: Plan,
    billing_status: BillingStatus,
) -> Result<bool> {
    let affected = conn.execute(
        "UPDATE users SET plan = ?1, billing_status = ?2, updated_at = ?3 WHERE id = ?4",
        params![plan.as_str(), billing_status.as_str(), now(), user_id],
    )?;
    Ok(affected > 0)
}

// ============ Global settings ============

pub fn get_setting(conn: &Connection, name: &str) -> Result<Option<Setting>> {
    query_one(
        conn,
        &format!("SELECT {} FROM global_settings WHERE name = ?1", SETTING_COLS),
        &[&name],
    )
}

pub fn upsert_setting(conn: &Connection, name: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO global_settings (name, value) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        params![name, value],
    )?;
    Ok(())
}

/// Persist both the raw admin-submitted payload and its normalized base.
/// The raw form is kept only for display on the settings page; the builder
/// reads the base.
pub fn save_qris_payloads(conn: &Connection, raw: &str, base: &str) -> Result<()> {
    upsert_setting(conn, QRIS_RAW_PAYLOAD, raw)?;
    upsert_setting(conn, QRIS_BASE_PAYLOAD, base)
}

/// The normalized base payload, or `None` when the admin has not configured
/// one yet.
pub fn get_base_payload(conn: &Connection) -> Result<Option<String>> {
    Ok(get_setting(conn, QRIS_BASE_PAYLOAD)?
        .map(|s| s.value)
        .filter(|v| !v.is_empty()))
}

// ============ Invoices ============

/// Create an invoice in `pending` status. The payload and amounts are an
/// immutable snapshot; nothing here is recomputed later.
pub fn create_invoice(conn: &Connection, input: &CreateInvoice) -> Result<Invoice> {
    let now = now();
    conn.query_row(
        &format!(
            "INSERT INTO invoices (user_id, plan_name, base_amount, unique_code, final_amount, payload, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING {}",
            INVOICE_COLS
        ),
        params![
            input.user_id,
            &input.plan_name,
            input.base_amount,
            input.unique_code,
            input.final_amount,
            &input.payload,
            now,
            now
        ],
        Invoice::from_row,
    )
    .map_err(Into::into)
}

/// Fetch an invoice scoped to its owning user. Another user's invoice id is
/// indistinguishable from a nonexistent one.
pub fn get_invoice_for_user(
    conn: &Connection,
    invoice_id: i64,
    user_id: i64,
) -> Result<Option<Invoice>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM invoices WHERE id = ?1 AND user_id = ?2",
            INVOICE_COLS
        ),
        &[&invoice_id, &user_id],
    )
}

pub fn list_invoices_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Invoice>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM invoices WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            INVOICE_COLS
        ),
        &[&user_id],
    )
}

pub fn latest_invoice_for_user(conn: &Connection, user_id: i64) -> Result<Option<Invoice>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM invoices WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
            INVOICE_COLS
        ),
        &[&user_id],
    )
}

/// Outcome of a confirm call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// This call transitioned the invoice to paid and upgraded the account.
    Confirmed,
    /// The invoice was already paid; nothing changed.
    AlreadyPaid,
}

/// Confirm payment of an invoice and upgrade the owning account.
///
/// The pending -> paid transition is a single conditional UPDATE, so racing
/// confirms serialize at the storage layer: exactly one caller wins and
/// performs the plan upgrade, every other caller lands on the idempotent
/// already-paid outcome.
///
/// Trust boundary: the transition is taken at the caller's word. There is no
/// verification against a bank ledger or callback; any authenticated owner
/// can confirm their own invoice.
pub fn confirm_invoice(conn: &Connection, user_id: i64, invoice_id: i64) -> Result<ConfirmOutcome> {
    let invoice = get_invoice_for_user(conn, invoice_id, user_id)?
        .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))?;

    if invoice.status == InvoiceStatus::Paid {
        return Ok(ConfirmOutcome::AlreadyPaid);
    }
    if invoice.status == InvoiceStatus::Expired {
        return Err(AppError::BadRequest("Invoice has expired".to_string()));
    }

    let affected = conn.execute(
        "UPDATE invoices SET status = 'paid', updated_at = ?1
         WHERE id = ?2 AND user_id = ?3 AND status = 'pending'",
        params![now(), invoice_id, user_id],
    )?;

    if affected == 0 {
        // Lost the race; the winner already applied the side effects.
        return Ok(ConfirmOutcome::AlreadyPaid);
    }

    if !set_user_plan(conn, user_id, Plan::Pro, BillingStatus::Paid)? {
        return Err(AppError::Internal(format!(
            "invoice {} confirmed but owning user {} is missing",
            invoice_id, user_id
        )));
    }

    Ok(ConfirmOutcome::Confirmed)
}
