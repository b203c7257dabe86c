//! Route definitions for the `/invoices` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::invoices;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(invoices::list).post(invoices::create))
        .route("/invoices/{invoice_number}", get(invoices::get_by_number))
        .route(
            "/invoices/{invoice_number}/status",
            put(invoices::update_status),
        )
        .route(
            "/invoices/{invoice_number}/entries",
            post(invoices::mark_entries),
        )
}
