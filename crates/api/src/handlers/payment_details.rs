//! Handlers for per-client payment details.

use axum::extract::{Path, State};
use axum::Json;
use tally_core::error::CoreError;
use tally_core::types::DbId;
use tally_db::models::payment_details::{PaymentDetails, SetPaymentDetails};
use tally_db::repositories::{ClientRepo, PaymentDetailsRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// PUT /api/v1/clients/{client_id}/payment-details
///
/// Upserts the client's single payment-details row.
pub async fn set(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
    Json(input): Json<SetPaymentDetails>,
) -> AppResult<Json<PaymentDetails>> {
    ensure_client(&state, client_id).await?;
    let details = PaymentDetailsRepo::upsert(&state.pool, client_id, &input).await?;
    Ok(Json(details))
}

/// GET /api/v1/clients/{client_id}/payment-details
pub async fn get(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<PaymentDetails>> {
    ensure_client(&state, client_id).await?;
    let details = PaymentDetailsRepo::find_by_client(&state.pool, client_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "payment details for client",
            key: client_id.to_string(),
        })?;
    Ok(Json(details))
}

async fn ensure_client(state: &AppState, client_id: DbId) -> AppResult<()> {
    ClientRepo::find_by_id(&state.pool, client_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "client",
            key: client_id.to_string(),
        })?;
    Ok(())
}
