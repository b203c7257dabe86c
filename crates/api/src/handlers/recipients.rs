//! Handlers for invoice recipients, nested under
//! `/clients/{client_id}/recipients`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tally_core::error::CoreError;
use tally_core::types::DbId;
use tally_db::models::recipient::{CreateRecipient, Recipient};
use tally_db::repositories::{ClientRepo, RecipientRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/clients/{client_id}/recipients
pub async fn create(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
    Json(input): Json<CreateRecipient>,
) -> AppResult<(StatusCode, Json<Recipient>)> {
    ensure_client(&state, client_id).await?;
    let recipient = RecipientRepo::create(&state.pool, client_id, &input).await?;
    Ok((StatusCode::CREATED, Json(recipient)))
}

/// GET /api/v1/clients/{client_id}/recipients
///
/// Primary recipients sort first.
pub async fn list_by_client(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<Vec<Recipient>>> {
    ensure_client(&state, client_id).await?;
    let recipients = RecipientRepo::list_by_client(&state.pool, client_id).await?;
    Ok(Json(recipients))
}

/// DELETE /api/v1/clients/{client_id}/recipients/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((client_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if RecipientRepo::delete(&state.pool, client_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound {
            entity: "recipient",
            key: id.to_string(),
        }
        .into())
    }
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
