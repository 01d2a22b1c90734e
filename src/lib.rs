//! qrispay - Manual QRIS billing with dynamic payload generation
//!
//! This library provides the core functionality for the qrispay billing
//! service: the QRIS payload engine (TLV codec, CRC-16 trailer, base payload
//! normalization and rebuilding), the unique-amount invoice lifecycle, and
//! the thin HTTP surface over both.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod qris;
