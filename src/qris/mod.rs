//! QRIS dynamic payload engine.
//!
//! A QRIS merchant payload is a flat string of tag-length-value fields
//! (`<2-digit tag><2-digit length><value>`), terminated by a CRC-16 checksum
//! field (tag 63). This module rebuilds such payloads around a per-invoice
//! amount: the admin-supplied payload is normalized down to a *base* (amount
//! and checksum stripped), and at billing time the base is recombined with a
//! concrete amount and a fresh checksum.

pub mod crc16;
pub mod payload;
pub mod tlv;

pub use payload::{build, generate_unique_amount, normalize, PayloadError};
