//! Test utilities and fixtures for qrispay integration tests

#![allow(dead_code)]

use axum::Router;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

pub use qrispay::db::{init_db, queries, AppState};
pub use qrispay::models::*;
pub use qrispay::qris;

/// A realistic static merchant payload base (amount and checksum stripped).
pub const SAMPLE_BASE: &str = "00020101021126600015COM.EXAMPLE.WWW01189360001400000000010208123456780303UMI5204581253033605802ID5910WARUNGMAJU6007JAKARTA610510110";

/// The full admin-submitted form of [`SAMPLE_BASE`]: amount tag 54 (length
/// 06, value 100000) plus a valid CRC trailer.
pub const SAMPLE_FULL: &str = "00020101021126600015COM.EXAMPLE.WWW01189360001400000000010208123456780303UMI52045812530336054061000005802ID5910WARUNGMAJU6007JAKARTA610510110630477B7";

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// App state backed by a single-connection in-memory pool. Size 1 so every
/// checkout sees the same in-memory database.
pub fn create_test_app_state() -> AppState {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }
    AppState { db: pool }
}

/// Build the full application router for oneshot tests.
pub fn app(state: AppState) -> Router {
    qrispay::handlers::router().with_state(state)
}

pub fn create_test_user(conn: &Connection, email: &str) -> User {
    queries::create_user(
        conn,
        &CreateUser {
            email: email.to_string(),
        },
    )
    .expect("Failed to create test user")
}

/// Configure the sample QRIS payload as the global base.
pub fn configure_sample_payload(conn: &Connection) {
    queries::save_qris_payloads(conn, SAMPLE_FULL, SAMPLE_BASE)
        .expect("Failed to configure sample payload");
}

/// Create a pending invoice the way the generate endpoint would, with a
/// fixed surcharge for determinism.
pub fn create_test_invoice(conn: &Connection, user_id: i64, base_amount: i64) -> Invoice {
    let unique_code = 305;
    let final_amount = base_amount + unique_code;
    let payload = qris::build(SAMPLE_BASE, final_amount).expect("Failed to build test payload");

    queries::create_invoice(
        conn,
        &CreateInvoice {
            user_id,
            plan_name: "pro".to_string(),
            base_amount,
            unique_code,
            final_amount,
            payload,
        },
    )
    .expect("Failed to create test invoice")
}
