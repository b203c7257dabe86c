//! HTTP-level integration tests for logging and managing time
//! entries.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};

#[tokio::test]
async fn log_hours_against_active_contract() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries",
        serde_json::json!({
            "contract_number": "AC-1",
            "hours": 2.25,
            "date": "2024-01-05",
            "description": "code review",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["hours"], 2.25);
    assert_eq!(json["date"], "2024-01-05");
    assert_eq!(json["contract_ref"], "AC-1");
    assert!(json["invoice_id"].is_null());
    assert_eq!(json["id"].as_str().unwrap().len(), 36);
}

#[tokio::test]
async fn date_defaults_to_today_and_accepts_expressions() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries",
        serde_json::json!({"contract_number": "AC-1", "hours": 1.0}),
    )
    .await;
    let json = body_json(response).await;
    let today = chrono::Local::now().date_naive().to_string();
    assert_eq!(json["date"], today);

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries",
        serde_json::json!({"contract_number": "AC-1", "hours": 1.0, "date": "yesterday"}),
    )
    .await;
    let json = body_json(response).await;
    let yesterday = (chrono::Local::now().date_naive() - chrono::Days::new(1)).to_string();
    assert_eq!(json["date"], yesterday);
}

#[tokio::test]
async fn unparseable_date_returns_400_with_input() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries",
        serde_json::json!({"contract_number": "AC-1", "hours": 1.0, "date": "somewhen"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PARSE_ERROR");
    assert!(json["error"].as_str().unwrap().contains("somewhen"));
}

#[tokio::test]
async fn inactive_contract_rejects_new_hours() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;

    sqlx::query("UPDATE contracts SET status = 'on_hold' WHERE contract_number = 'AC-1'")
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries",
        serde_json::json!({"contract_number": "AC-1", "hours": 1.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("on_hold"));
}

#[tokio::test]
async fn unknown_contract_returns_404() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries",
        serde_json::json!({"contract_number": "NOPE-1", "hours": 1.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_add_is_all_or_nothing() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;

    // Second item names an unknown contract: nothing may be inserted.
    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries/bulk",
        serde_json::json!({"entries": [
            {"contract_number": "AC-1", "hours": 1.0, "date": "2024-01-05"},
            {"contract_number": "NOPE-1", "hours": 2.0, "date": "2024-01-06"},
        ]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);

    // A clean batch lands in full.
    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries/bulk",
        serde_json::json!({"entries": [
            {"contract_number": "AC-1", "hours": 1.0, "date": "2024-01-05"},
            {"contract_number": "AC-1", "hours": 2.5, "date": "2024-01-06"},
        ]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["added_count"], 2);
    assert_eq!(json["total_hours"], 3.5);
}

#[tokio::test]
async fn list_filters_by_client_and_range() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;
    common::log_hours(&pool, dir.path(), "2024-02-05", 3.0).await;

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries?client_name=Acme&start_date=2024-01-01&end_date=2024-01-31",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["total_hours"], 2.0);
    assert_eq!(json["entries"][0]["client_name"], "Acme");

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries?client_name=Ghost",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_composes_filters() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;

    let app = common::build_test_app(pool.clone(), dir.path());
    post_json(
        app,
        "/api/v1/time-entries",
        serde_json::json!({
            "contract_number": "AC-1", "hours": 2.0,
            "date": "2024-01-05", "description": "code review",
        }),
    )
    .await;
    let app = common::build_test_app(pool.clone(), dir.path());
    post_json(
        app,
        "/api/v1/time-entries",
        serde_json::json!({
            "contract_number": "AC-1", "hours": 0.5,
            "date": "2024-01-06", "description": "standup",
        }),
    )
    .await;

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries/search?description=review&min_hours=1&invoiced=false",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["entries"][0]["description"], "code review");
}

#[tokio::test]
async fn entry_detail_reports_billing_state() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    let entry_id = common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/time-entries/{entry_id}"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["hourly_rate"], 100.0);
    assert!(json["invoice_number"].is_null());
}

#[tokio::test]
async fn update_is_rejected_once_invoiced() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    let entry_id = common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;

    let response = put_json(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/time-entries/{entry_id}"),
        serde_json::json!({"hours": 3.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["hours"], 3.0);

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = put_json(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/time-entries/{entry_id}"),
        serde_json::json!({"hours": 4.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn deletion_ignores_billed_state() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    let entry_id = common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let invoice = body_json(response).await;

    // Billed entries delete without complaint; the invoice keeps its
    // frozen total.
    let response = delete(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/time-entries/{entry_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/invoices/{}", invoice["invoice_number"].as_str().unwrap()),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["total_amount"], 200.0);
    assert_eq!(json["time_entries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn bulk_delete_skips_unknown_ids() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    let entry_id = common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries/bulk-delete",
        serde_json::json!({"entry_ids": [entry_id, "no-such-entry"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
}
