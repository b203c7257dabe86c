//! Route definitions for the flat `/contracts` listing. Creation is
//! nested under the owning client (see `routes::clients`).

use axum::routing::get;
use axum::Router;

use crate::handlers::contracts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/contracts", get(contracts::list))
}
