//! HTTP-level integration tests for the consolidation protocol and
//! billing-status management.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get, post_json, put_json};

#[tokio::test]
async fn consolidation_totals_and_links_entries() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;
    common::log_hours(&pool, dir.path(), "2024-01-10", 3.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["total_amount"], 500.0);
    assert_eq!(json["total_hours"], 5.0);
    assert_eq!(json["entry_count"], 2);
    assert_eq!(json["status"], "pending");

    let number = json["invoice_number"].as_str().unwrap();
    assert!(number.starts_with("INV-"));
    let parts: Vec<&str> = number.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[1].len(), 6);
    assert_eq!(parts[2].len(), 8);

    // The rendered document landed at the advertised path.
    let pdf_path = json["pdf_path"].as_str().unwrap();
    assert!(std::fs::metadata(pdf_path).is_ok(), "document should exist");
    assert!(pdf_path.ends_with(".pdf"));

    // At-most-once billing: no unbilled entries remain in the period.
    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries/search?client_name=Acme&invoiced=false",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn repeat_consolidation_finds_nothing_to_bill() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PRECONDITION_FAILED");
    assert!(json["error"].as_str().unwrap().contains("no unbilled hours"));
}

#[tokio::test]
async fn preconditions_fail_with_distinct_errors() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();

    // No business info yet.
    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("business info"));

    let response = put_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/business-info",
        serde_json::json!({
            "business_name": "Tally Consulting",
            "contact_name": "Jordan Smith",
            "email": "billing@tally.test",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Business info present, client missing.
    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/clients",
        serde_json::json!({"name": "Acme"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Client present, payment details missing.
    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("payment details"));
}

#[tokio::test]
async fn unparseable_period_creates_nothing() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "whenever"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PARSE_ERROR");

    let response = get(common::build_test_app(pool.clone(), dir.path()), "/api/v1/invoices").await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn failed_render_rolls_back_the_whole_consolidation() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;

    let app = common::build_test_app_with_renderer(
        pool.clone(),
        dir.path(),
        Arc::new(common::FailingRenderer),
    );
    let response = post_json(
        app,
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "RENDER_ERROR");

    // No invoice row and no linkage survived.
    let response = get(common::build_test_app(pool.clone(), dir.path()), "/api/v1/invoices").await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries/search?invoiced=false",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn unmark_then_reconsolidate_reincludes_exactly_once() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    let e1 = common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;
    common::log_hours(&pool, dir.path(), "2024-01-10", 3.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries/unmark",
        serde_json::json!({"entry_ids": [e1]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);

    // Only the unmarked entry is billable again, exactly once.
    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["total_amount"], 200.0);
    assert_eq!(json["entry_count"], 1);

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn invoice_detail_and_listing() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;
    common::log_hours(&pool, dir.path(), "2024-01-10", 3.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    let created = body_json(response).await;
    let number = created["invoice_number"].as_str().unwrap();

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/invoices/{number}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["client_name"], "Acme");
    assert_eq!(json["total_amount"], 500.0);
    assert_eq!(json["total_hours"], 5.0);
    assert_eq!(json["time_entries"].as_array().unwrap().len(), 2);
    // Entries come back ordered by date.
    assert_eq!(json["time_entries"][0]["date"], "2024-01-05");

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices?client_name=Acme&status=pending",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["total_amount"], 500.0);
    assert_eq!(json["invoices"][0]["client_name"], "Acme");
}

#[tokio::test]
async fn status_updates_accept_any_order_and_reject_unknowns() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    let created = body_json(response).await;
    let number = created["invoice_number"].as_str().unwrap().to_string();

    for status in ["paid", "draft", "overdue", "cancelled", "sent"] {
        let response = put_json(
            common::build_test_app(pool.clone(), dir.path()),
            &format!("/api/v1/invoices/{number}/status"),
            serde_json::json!({"status": status}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "setting {status}");
        let json = body_json(response).await;
        assert_eq!(json["status"], status);
    }

    let response = put_json(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/invoices/{number}/status"),
        serde_json::json!({"status": "pending"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices/INV-000000-missing0/status",
        serde_json::json!({"status": "paid"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn marking_onto_a_second_invoice_conflicts_and_rolls_back() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    let january_entry = common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;
    let february_entry = common::log_hours(&pool, dir.path(), "2024-02-05", 3.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "February 2024"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let second = body_json(response).await;
    let second_number = second["invoice_number"].as_str().unwrap().to_string();

    // Free the February entry, then try to mark it together with the
    // January entry (which belongs to the first invoice).
    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries/unmark",
        serde_json::json!({"entry_ids": [february_entry]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/invoices/{second_number}/entries"),
        serde_json::json!({"entry_ids": [february_entry, january_entry]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    // The whole batch rolled back: the February entry is still free.
    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/time-entries/search?invoiced=false",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["entries"][0]["id"], february_entry.as_str());
}

#[tokio::test]
async fn marking_skips_unknown_ids_and_tolerates_same_invoice() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    let billed = common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;
    let free = common::log_hours(&pool, dir.path(), "2024-03-05", 1.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    let created = body_json(response).await;
    let number = created["invoice_number"].as_str().unwrap().to_string();

    // Unknown id: skipped. Entry already on this invoice: no-op. Free
    // entry: linked. Only the link counts.
    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/invoices/{number}/entries"),
        serde_json::json!({"entry_ids": ["no-such-entry", billed, free]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/invoices/{number}"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["time_entries"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn frozen_total_ignores_later_rate_changes() {
    let pool = common::test_pool().await;
    let dir = tempfile::tempdir().unwrap();
    common::seed_acme(&pool, dir.path()).await;
    common::log_hours(&pool, dir.path(), "2024-01-05", 2.0).await;

    let response = post_json(
        common::build_test_app(pool.clone(), dir.path()),
        "/api/v1/invoices",
        serde_json::json!({"client_name": "Acme", "period": "January 2024"}),
    )
    .await;
    let created = body_json(response).await;
    assert_eq!(created["total_amount"], 200.0);
    let number = created["invoice_number"].as_str().unwrap().to_string();

    sqlx::query("UPDATE contracts SET hourly_rate = 500.0 WHERE contract_number = 'AC-1'")
        .execute(&pool)
        .await
        .unwrap();

    let response = get(
        common::build_test_app(pool.clone(), dir.path()),
        &format!("/api/v1/invoices/{number}"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["total_amount"], 200.0);
}
