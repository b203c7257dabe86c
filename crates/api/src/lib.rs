//! HTTP operation surface and billing engine.
//!
//! Handlers are thin: they translate requests into repository calls
//! and hand multi-step billing protocols to [`billing`]. Everything
//! here shares one [`state::AppState`].

pub mod billing;
pub mod config;
pub mod error;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod state;
