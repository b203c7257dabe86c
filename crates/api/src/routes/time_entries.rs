//! Route definitions for the `/time-entries` resource.
//!
//! Fixed segments (`bulk`, `search`, `unmark`, `bulk-delete`) are
//! registered before the `/{id}` capture so they are never shadowed by
//! it.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::time_entries;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/time-entries",
            get(time_entries::list).post(time_entries::create),
        )
        .route("/time-entries/bulk", post(time_entries::create_bulk))
        .route("/time-entries/bulk-delete", post(time_entries::delete_bulk))
        .route("/time-entries/search", get(time_entries::search))
        .route("/time-entries/unmark", post(time_entries::unmark))
        .route(
            "/time-entries/{id}",
            get(time_entries::get_by_id)
                .put(time_entries::update)
                .delete(time_entries::delete),
        )
}
