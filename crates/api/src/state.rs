use std::sync::Arc;

use crate::config::ServerConfig;
use crate::render::DocumentRenderer;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The pool is the single process-wide ledger handle; its
/// lifecycle is owned by `main`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (one connection, see `tally_db`).
    pub pool: tally_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Document renderer used by invoice consolidation.
    pub renderer: Arc<dyn DocumentRenderer>,
}
