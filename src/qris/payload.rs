//! Payload normalization and rebuilding.
//!
//! The admin pastes a full merchant payload once; [`normalize`] strips the
//! amount (tag 54) and everything from the checksum (tag 63) onward, and the
//! result is stored as the reusable base. [`build`] recombines that base
//! with a per-invoice amount and a fresh CRC trailer.

use rand::Rng;
use thiserror::Error;

use super::{crc16, tlv};

/// Transaction amount field.
pub const TAG_AMOUNT: &str = "54";
/// Checksum trailer field.
pub const TAG_CRC: &str = "63";
/// Checksum tag plus its fixed declared length (four hex digits).
const CRC_OPENER: &str = "6304";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// No base payload to build on; the admin has not configured one yet.
    #[error("base payload is empty")]
    EmptyBase,

    #[error("invalid amount: {0}")]
    InvalidAmount(i64),
}

/// Strip a full merchant payload down to its reusable base.
///
/// Whitespace never belongs inside an encoded payload and is dropped
/// wherever it appears (pasted payloads pick up line breaks). The amount
/// field is removed if present; the checksum field and anything after it are
/// always cut, since the trailer is regenerated per invoice.
///
/// Idempotent: normalizing an already-normalized payload is a no-op.
pub fn normalize(full_payload: &str) -> String {
    let collapsed: String = full_payload
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let mut base = tlv::remove(&collapsed, TAG_AMOUNT);
    if let Some(start) = tlv::start_of(&base, TAG_CRC) {
        base.truncate(start);
    }
    base
}

/// Rebuild a scannable payload from a stored base and a concrete amount.
///
/// The amount is encoded as `54<2-digit len><decimal digits>`, the checksum
/// opener `6304` is appended, and the CRC is computed over everything up to
/// and including that opener.
pub fn build(base_payload: &str, amount: i64) -> Result<String, PayloadError> {
    if base_payload.is_empty() {
        return Err(PayloadError::EmptyBase);
    }
    if amount <= 0 {
        return Err(PayloadError::InvalidAmount(amount));
    }
    let amount_str = amount.to_string();
    if amount_str.len() > 99 {
        return Err(PayloadError::InvalidAmount(amount));
    }

    let body = format!(
        "{}{}{:02}{}{}",
        base_payload,
        TAG_AMOUNT,
        amount_str.len(),
        amount_str,
        CRC_OPENER
    );
    let crc = crc16::checksum(&body);
    Ok(format!("{}{}", body, crc))
}

/// Draw a surcharge in `[100, 999]` and return `(surcharge, final_amount)`.
///
/// All invoices share one merchant account, so an incoming payment is
/// matched to its invoice purely by the exact amount received. Two pending
/// invoices on the same base amount can still collide on the same draw;
/// the window is small and accepted.
pub fn generate_unique_amount(base_amount: i64) -> (i64, i64) {
    let unique: i64 = rand::rng().random_range(100..=999);
    (unique, base_amount + unique)
}
