//! HTTP-level tests for the billing and admin endpoints.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

#[path = "common/mod.rs"]
mod common;
use common::*;

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn put(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("response should be valid JSON")
}

// ============ Users ============

#[tokio::test]
async fn test_create_user() {
    let state = create_test_app_state();
    let app = app(state);

    let response = app
        .oneshot(post("/users", json!({"email": "alice@example.com"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["plan"], "free");
    assert_eq!(body["billing_status"], "none");
}

// ============ Admin settings ============

#[tokio::test]
async fn test_admin_save_and_read_qris_settings() {
    let state = create_test_app_state();
    let app = app(state);

    let response = app
        .clone()
        .oneshot(put("/admin/settings/qris", json!({"payload": SAMPLE_FULL})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["base_payload"], SAMPLE_BASE);
    assert_eq!(body["raw_payload"], SAMPLE_FULL);

    let response = app.oneshot(get("/admin/settings/qris")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["base_payload"], SAMPLE_BASE);
    assert_eq!(body["raw_payload"], SAMPLE_FULL);
}

#[tokio::test]
async fn test_admin_rejects_empty_payload() {
    let state = create_test_app_state();
    let app = app(state);

    let response = app
        .oneshot(put("/admin/settings/qris", json!({"payload": "   "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_rejects_payload_normalizing_to_empty_and_persists_nothing() {
    let state = create_test_app_state();
    let app = app(state);

    // A bare checksum trailer normalizes to the empty string
    let response = app
        .clone()
        .oneshot(put("/admin/settings/qris", json!({"payload": "6304ABCD"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/admin/settings/qris")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["raw_payload"], "");
    assert_eq!(body["base_payload"], "");
}

// ============ Invoice generation ============

#[tokio::test]
async fn test_generate_without_configured_base_is_service_unavailable() {
    let state = create_test_app_state();
    let user_id;
    {
        let conn = state.db.get().unwrap();
        user_id = create_test_user(&conn, "a@example.com").id;
    }
    let app = app(state);

    let response = app
        .oneshot(post(
            &format!("/users/{}/billing/generate", user_id),
            json!({"base_amount": 15000}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_generate_rejects_non_positive_amount() {
    let state = create_test_app_state();
    let user_id;
    {
        let conn = state.db.get().unwrap();
        configure_sample_payload(&conn);
        user_id = create_test_user(&conn, "a@example.com").id;
    }
    let app = app(state);

    for amount in [0, -500] {
        let response = app
            .clone()
            .oneshot(post(
                &format!("/users/{}/billing/generate", user_id),
                json!({"base_amount": amount}),
            ))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "amount {}",
            amount
        );
    }
}

#[tokio::test]
async fn test_generate_unknown_user_is_not_found() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        configure_sample_payload(&conn);
    }
    let app = app(state);

    let response = app
        .oneshot(post(
            "/users/424242/billing/generate",
            json!({"base_amount": 15000}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_builds_scannable_payload() {
    let state = create_test_app_state();
    let user_id;
    {
        let conn = state.db.get().unwrap();
        configure_sample_payload(&conn);
        user_id = create_test_user(&conn, "a@example.com").id;
    }
    let app = app(state);

    let response = app
        .oneshot(post(
            &format!("/users/{}/billing/generate", user_id),
            json!({"base_amount": 15000, "plan_name": "pro"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let unique = body["unique_code"].as_i64().unwrap();
    let amount = body["amount"].as_i64().unwrap();
    assert!((100..=999).contains(&unique));
    assert_eq!(amount, 15000 + unique);

    let payload = body["payload"].as_str().unwrap();
    assert_eq!(qris::normalize(payload), SAMPLE_BASE);
    assert_eq!(payload, qris::build(SAMPLE_BASE, amount).unwrap());
}

// ============ Confirmation ============

#[tokio::test]
async fn test_confirm_unknown_invoice_is_not_found_and_mutates_nothing() {
    let state = create_test_app_state();
    let user_id;
    {
        let conn = state.db.get().unwrap();
        user_id = create_test_user(&conn, "a@example.com").id;
    }
    let app = app(state.clone());

    let response = app
        .oneshot(post(
            &format!("/users/{}/billing/confirm", user_id),
            json!({"invoice_id": 999999}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let conn = state.db.get().unwrap();
    let user = queries::get_user_by_id(&conn, user_id).unwrap().unwrap();
    assert_eq!(user.plan, Plan::Free);
}

#[tokio::test]
async fn test_confirm_upgrades_plan_then_repeats_idempotently() {
    let state = create_test_app_state();
    let user_id;
    let invoice_id;
    {
        let conn = state.db.get().unwrap();
        configure_sample_payload(&conn);
        let user = create_test_user(&conn, "a@example.com");
        user_id = user.id;
        invoice_id = create_test_invoice(&conn, user_id, 15000).id;
    }
    let app = app(state);

    let response = app
        .clone()
        .oneshot(post(
            &format!("/users/{}/billing/confirm", user_id),
            json!({"invoice_id": invoice_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["plan"], "pro");
    assert_eq!(body["user"]["billing_status"], "paid");

    // Second confirm: same success shape, explicit already-paid message
    let response = app
        .oneshot(post(
            &format!("/users/{}/billing/confirm", user_id),
            json!({"invoice_id": invoice_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invoice already paid");
}

// ============ Billing summary & listing ============

#[tokio::test]
async fn test_billing_summary_reports_configuration_and_last_invoice() {
    let state = create_test_app_state();
    let user_id;
    {
        let conn = state.db.get().unwrap();
        user_id = create_test_user(&conn, "a@example.com").id;
    }
    let app = app(state.clone());

    let response = app
        .clone()
        .oneshot(get(&format!("/users/{}/billing", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["configured"], false);
    assert!(body["last_invoice"].is_null());

    let latest_id;
    {
        let conn = state.db.get().unwrap();
        configure_sample_payload(&conn);
        create_test_invoice(&conn, user_id, 10000);
        latest_id = create_test_invoice(&conn, user_id, 20000).id;
    }

    let response = app
        .oneshot(get(&format!("/users/{}/billing", user_id)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["configured"], true);
    assert_eq!(body["last_invoice"]["id"].as_i64().unwrap(), latest_id);
}

#[tokio::test]
async fn test_list_invoices_newest_first() {
    let state = create_test_app_state();
    let user_id;
    let (first_id, second_id);
    {
        let conn = state.db.get().unwrap();
        configure_sample_payload(&conn);
        user_id = create_test_user(&conn, "a@example.com").id;
        first_id = create_test_invoice(&conn, user_id, 10000).id;
        second_id = create_test_invoice(&conn, user_id, 20000).id;
    }
    let app = app(state);

    let response = app
        .oneshot(get(&format!("/users/{}/invoices", user_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"].as_i64().unwrap(), second_id);
    assert_eq!(list[1]["id"].as_i64().unwrap(), first_id);
}
