//! Handlers for the `/clients` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tally_core::error::CoreError;
use tally_core::types::DbId;
use tally_db::models::client::{Client, CreateClient, UpdateClient};
use tally_db::repositories::ClientRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A client with its active-contract count, as shown in listings.
#[derive(Debug, Serialize)]
pub struct ClientSummary {
    #[serde(flatten)]
    pub client: Client,
    pub active_contracts: i64,
}

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client = %client.name, id = client.id, "client added");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/v1/clients
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ClientSummary>>> {
    let clients = ClientRepo::list(&state.pool).await?;
    let mut summaries = Vec::with_capacity(clients.len());
    for client in clients {
        let active_contracts = ClientRepo::active_contract_count(&state.pool, client.id).await?;
        summaries.push(ClientSummary {
            client,
            active_contracts,
        });
    }
    Ok(Json(summaries))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(client))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(client))
}

/// DELETE /api/v1/clients/{id}
///
/// Cascades to the client's contracts, recipients, payment details,
/// invoices, and time entries.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ClientRepo::delete(&state.pool, id).await? {
        tracing::info!(client_id = id, "client deleted (with dependents)");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: DbId) -> AppError {
    CoreError::NotFound {
        entity: "client",
        key: id.to_string(),
    }
    .into()
}
