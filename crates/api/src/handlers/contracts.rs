//! Handlers for contracts, nested under `/clients/{client_id}` for
//! creation and listing, with a flat `/contracts` listing across all
//! clients.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tally_core::error::CoreError;
use tally_core::types::DbId;
use tally_db::models::contract::{Contract, CreateContract};
use tally_db::repositories::{ClientRepo, ContractRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/clients/{client_id}/contracts
pub async fn create(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
    Json(input): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<Contract>)> {
    ensure_client(&state, client_id).await?;
    let contract = ContractRepo::create(&state.pool, client_id, &input).await?;
    tracing::info!(
        contract = %contract.contract_number,
        client_id,
        rate = contract.hourly_rate,
        "contract added"
    );
    Ok((StatusCode::CREATED, Json(contract)))
}

/// GET /api/v1/clients/{client_id}/contracts
pub async fn list_by_client(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<Vec<Contract>>> {
    ensure_client(&state, client_id).await?;
    let contracts = ContractRepo::list_by_client(&state.pool, client_id).await?;
    Ok(Json(contracts))
}

/// GET /api/v1/contracts
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Contract>>> {
    let contracts = ContractRepo::list(&state.pool).await?;
    Ok(Json(contracts))
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
