//! Shared harness for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the
//! router without a TCP listener, against an in-memory SQLite store.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use tally_api::config::ServerConfig;
use tally_api::render::{DocumentRenderer, PdfRenderer};
use tally_api::routes;
use tally_api::state::AppState;
use tally_core::error::CoreError;
use tally_db::DbPool;

/// Open an in-memory store and apply all migrations.
pub async fn test_pool() -> DbPool {
    let pool = tally_db::create_pool("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    tally_db::migrations::run(&pool)
        .await
        .expect("failed to run migrations");
    pool
}

/// Build a test `ServerConfig` writing invoices into `output_dir`.
pub fn test_config(output_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        invoice_output_dir: output_dir.to_path_buf(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack (CORS, request ID,
/// timeout, tracing, panic recovery) that production uses.
pub fn build_test_app(pool: DbPool, output_dir: &Path) -> Router {
    build_test_app_with_renderer(pool, output_dir, Arc::new(PdfRenderer))
}

/// Same as [`build_test_app`] but with an injected renderer, for
/// exercising render-failure rollback.
pub fn build_test_app_with_renderer(
    pool: DbPool,
    output_dir: &Path,
    renderer: Arc<dyn DocumentRenderer>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config(output_dir)),
        renderer,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// A renderer that always fails, to prove a failed render rolls the
/// consolidation transaction back.
pub struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    fn render(
        &self,
        _doc: &tally_api::render::InvoiceDocument,
        _output: &Path,
    ) -> Result<(), CoreError> {
        Err(CoreError::Render("simulated renderer outage".to_string()))
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seed the fixtures every billing test needs: business info, a client
/// named `Acme` with payment details, and an active contract `AC-1` at
/// 100 USD/hour. Returns the client id.
pub async fn seed_acme(pool: &DbPool, output_dir: &Path) -> i64 {
    let app = build_test_app(pool.clone(), output_dir);
    let response = put_json(
        app,
        "/api/v1/business-info",
        serde_json::json!({
            "business_name": "Tally Consulting",
            "contact_name": "Jordan Smith",
            "email": "billing@tally.test",
        }),
    )
    .await;
    assert!(response.status().is_success(), "seeding business info failed");

    let app = build_test_app(pool.clone(), output_dir);
    let response = post_json(
        app,
        "/api/v1/clients",
        serde_json::json!({"name": "Acme", "address": "1 Main St", "city": "Springfield"}),
    )
    .await;
    let client = body_json(response).await;
    let client_id = client["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone(), output_dir);
    let response = put_json(
        app,
        &format!("/api/v1/clients/{client_id}/payment-details"),
        serde_json::json!({"bank_name": "First Bank", "account_number": "12345678"}),
    )
    .await;
    assert!(response.status().is_success(), "seeding payment details failed");

    let app = build_test_app(pool.clone(), output_dir);
    let response = post_json(
        app,
        &format!("/api/v1/clients/{client_id}/contracts"),
        serde_json::json!({
            "contract_number": "AC-1",
            "name": "Acme Retainer",
            "hourly_rate": 100.0,
            "start_date": "2024-01-01",
        }),
    )
    .await;
    assert!(response.status().is_success(), "seeding contract failed");

    client_id
}

/// Log hours against `AC-1` on a fixed date, returning the entry id.
pub async fn log_hours(pool: &DbPool, output_dir: &Path, date: &str, hours: f64) -> String {
    let app = build_test_app(pool.clone(), output_dir);
    let response = post_json(
        app,
        "/api/v1/time-entries",
        serde_json::json!({
            "contract_number": "AC-1",
            "hours": hours,
            "date": date,
        }),
    )
    .await;
    let entry = body_json(response).await;
    entry["id"].as_str().unwrap().to_string()
}
