//! Handlers for the singleton business profile.

use axum::extract::State;
use axum::Json;
use tally_core::error::CoreError;
use tally_db::models::business_info::{BusinessInfo, SetBusinessInfo};
use tally_db::repositories::BusinessInfoRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// PUT /api/v1/business-info
///
/// Upserts the single business-info row. Must be configured before
/// any invoice can be created.
pub async fn set(
    State(state): State<AppState>,
    Json(input): Json<SetBusinessInfo>,
) -> AppResult<Json<BusinessInfo>> {
    let info = BusinessInfoRepo::upsert(&state.pool, &input).await?;
    tracing::info!(business = %info.business_name, "business info updated");
    Ok(Json(info))
}

/// GET /api/v1/business-info
pub async fn get(State(state): State<AppState>) -> AppResult<Json<BusinessInfo>> {
    let info = BusinessInfoRepo::get(&state.pool)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "business info",
            key: "1".to_string(),
        })?;
    Ok(Json(info))
}
