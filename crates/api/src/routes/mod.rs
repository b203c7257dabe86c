pub mod business_info;
pub mod clients;
pub mod contracts;
pub mod health;
pub mod invoices;
pub mod time_entries;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /clients                                    list, create
/// /clients/{id}                               get, update, delete
/// /clients/{client_id}/contracts              list, create
/// /clients/{client_id}/recipients             list, create
/// /clients/{client_id}/recipients/{id}        delete
/// /clients/{client_id}/payment-details        get, set (PUT)
///
/// /contracts                                  list across clients
///
/// /business-info                              get, set (PUT)
///
/// /time-entries                               list, create
/// /time-entries/bulk                          bulk create (POST)
/// /time-entries/bulk-delete                   bulk delete (POST)
/// /time-entries/search                        filtered search
/// /time-entries/unmark                        clear invoice links (POST)
/// /time-entries/{id}                          get, update, delete
///
/// /invoices                                   list, create (consolidation)
/// /invoices/{invoice_number}                  detail
/// /invoices/{invoice_number}/status           update (PUT)
/// /invoices/{invoice_number}/entries          mark invoiced (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(clients::router())
        .merge(contracts::router())
        .merge(business_info::router())
        .merge(time_entries::router())
        .merge(invoices::router())
}
