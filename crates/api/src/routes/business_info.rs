//! Route definitions for the singleton `/business-info` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::business_info;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/business-info",
        get(business_info::get).put(business_info::set),
    )
}
