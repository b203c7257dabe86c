//! Route definitions for the `/clients` resource.
//!
//! Also nests recipient, contract, and payment-details routes under
//! `/clients/{client_id}/...`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{clients, contracts, payment_details, recipients};
use crate::state::AppState;

/// Routes mounted at `/clients`.
pub fn router() -> Router<AppState> {
    let recipient_routes = Router::new()
        .route(
            "/",
            get(recipients::list_by_client).post(recipients::create),
        )
        .route("/{id}", axum::routing::delete(recipients::delete));

    let contract_routes = Router::new().route(
        "/",
        get(contracts::list_by_client).post(contracts::create),
    );

    let payment_routes = Router::new().route(
        "/",
        put(payment_details::set).get(payment_details::get),
    );

    Router::new()
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/{id}",
            get(clients::get_by_id)
                .put(clients::update)
                .delete(clients::delete),
        )
        .nest("/clients/{client_id}/recipients", recipient_routes)
        .nest("/clients/{client_id}/contracts", contract_routes)
        .nest("/clients/{client_id}/payment-details", payment_routes)
}
