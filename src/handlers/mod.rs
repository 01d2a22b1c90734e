pub mod admin;
pub mod billing;
pub mod users;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::db::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create_user))
        .route("/users/{user_id}/billing", get(billing::billing_summary))
        .route(
            "/users/{user_id}/billing/generate",
            post(billing::generate_invoice),
        )
        .route(
            "/users/{user_id}/billing/confirm",
            post(billing::confirm_payment),
        )
        .route("/users/{user_id}/invoices", get(billing::list_invoices))
        .route("/admin/settings/qris", get(admin::get_qris_settings))
        .route("/admin/settings/qris", put(admin::update_qris_settings))
}
