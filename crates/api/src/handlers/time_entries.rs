//! Handlers for the `/time-entries` resource: logging, querying,
//! editing, deleting, and unmarking billable hours.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tally_core::error::CoreError;
use tally_core::period;
use tally_db::models::contract::ContractStatus;
use tally_db::models::time_entry::{
    NewTimeEntry, TimeEntry, TimeEntryChanges, TimeEntryFilter, TimeEntryWithContract,
};
use tally_db::repositories::{ClientRepo, ContractRepo, InvoiceRepo, TimeEntryRepo};

use crate::billing::status::{self, BatchOutcome, EntryBatch};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request to log hours against a contract.
#[derive(Debug, Clone, Deserialize)]
pub struct LogHours {
    pub contract_number: String,
    /// Conventionally quantized to 0.25 increments (15 minutes), not
    /// enforced.
    pub hours: f64,
    /// Any single-date expression ("2024-01-05", "yesterday").
    /// Defaults to today.
    pub date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkLogHours {
    pub entries: Vec<LogHours>,
}

/// Listing filter: client plus an optional date window, both ends
/// accepting date expressions.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    pub client_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Search filter over every queryable entry attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub client_name: Option<String>,
    pub description: Option<String>,
    pub contract_ref: Option<String>,
    pub min_hours: Option<f64>,
    pub max_hours: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub invoiced: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTimeEntryRequest {
    pub hours: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// Entry listing with the totals callers expect next to it.
#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub count: usize,
    pub total_hours: f64,
    pub entries: Vec<TimeEntryWithContract>,
}

/// A single entry with its billing state spelled out.
#[derive(Debug, Serialize)]
pub struct TimeEntryDetail {
    #[serde(flatten)]
    pub entry: TimeEntryWithContract,
    pub invoice_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkAddResponse {
    pub added_count: usize,
    pub total_hours: f64,
    pub entries: Vec<TimeEntry>,
}

#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    pub count: usize,
    pub deleted: Vec<String>,
}

/// POST /api/v1/time-entries
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<LogHours>,
) -> AppResult<(StatusCode, Json<TimeEntry>)> {
    let new_entry = resolve(&state, &input).await?;
    let entry = TimeEntryRepo::create(&state.pool, &new_entry).await?;
    tracing::info!(
        entry = %entry.id,
        contract = %new_entry.contract_ref,
        hours = entry.hours,
        date = %entry.date,
        "hours logged"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/v1/time-entries/bulk
///
/// All-or-nothing: an unknown contract, an inactive contract, or an
/// unparseable date anywhere in the batch aborts the whole batch.
pub async fn create_bulk(
    State(state): State<AppState>,
    Json(input): Json<BulkLogHours>,
) -> AppResult<(StatusCode, Json<BulkAddResponse>)> {
    if input.entries.is_empty() {
        return Err(AppError::BadRequest("no entries provided".to_string()));
    }

    let mut new_entries = Vec::with_capacity(input.entries.len());
    for item in &input.entries {
        new_entries.push(resolve(&state, item).await?);
    }

    let entries = TimeEntryRepo::create_bulk(&state.pool, &new_entries).await?;
    let total_hours = entries.iter().map(|e| e.hours).sum();
    tracing::info!(count = entries.len(), total_hours, "bulk hours logged");

    Ok((
        StatusCode::CREATED,
        Json(BulkAddResponse {
            added_count: entries.len(),
            total_hours,
            entries,
        }),
    ))
}

/// GET /api/v1/time-entries
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<EntryListResponse>> {
    let filter = TimeEntryFilter {
        client_id: resolve_client(&state, query.client_name.as_deref()).await?,
        start_date: parse_optional_date(query.start_date.as_deref())?,
        end_date: parse_optional_date(query.end_date.as_deref())?,
        ..Default::default()
    };
    let entries = TimeEntryRepo::search(&state.pool, &filter).await?;
    Ok(Json(listing(entries)))
}

/// GET /api/v1/time-entries/search
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<EntryListResponse>> {
    let filter = TimeEntryFilter {
        client_id: resolve_client(&state, query.client_name.as_deref()).await?,
        description: query.description,
        contract_ref: query.contract_ref,
        min_hours: query.min_hours,
        max_hours: query.max_hours,
        start_date: parse_optional_date(query.start_date.as_deref())?,
        end_date: parse_optional_date(query.end_date.as_deref())?,
        invoiced: query.invoiced,
    };
    let entries = TimeEntryRepo::search(&state.pool, &filter).await?;
    Ok(Json(listing(entries)))
}

/// GET /api/v1/time-entries/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TimeEntryDetail>> {
    let entry = TimeEntryRepo::find_with_contract(&state.pool, &id)
        .await?
        .ok_or_else(|| entry_not_found(&id))?;

    let invoice_number = match entry.invoice_id {
        Some(invoice_id) => InvoiceRepo::find_number_by_id(&state.pool, invoice_id).await?,
        None => None,
    };

    Ok(Json(TimeEntryDetail {
        entry,
        invoice_number,
    }))
}

/// PUT /api/v1/time-entries/{id}
///
/// Entries linked to an invoice are immutable until unlinked.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTimeEntryRequest>,
) -> AppResult<Json<TimeEntry>> {
    let current = TimeEntryRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| entry_not_found(&id))?;

    if current.invoice_id.is_some() {
        return Err(CoreError::Conflict(format!(
            "time entry {id} has already been invoiced; unmark it before editing"
        ))
        .into());
    }

    if input.hours.is_none() && input.date.is_none() && input.description.is_none() {
        return Err(AppError::BadRequest("no updates provided".to_string()));
    }

    let changes = TimeEntryChanges {
        hours: input.hours,
        date: parse_optional_date(input.date.as_deref())?,
        description: input.description,
    };

    let entry = TimeEntryRepo::update(&state.pool, &id, &changes)
        .await?
        .ok_or_else(|| entry_not_found(&id))?;
    Ok(Json(entry))
}

/// DELETE /api/v1/time-entries/{id}
///
/// Unconditional: billed entries delete too, leaving their invoice's
/// frozen total stale.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    if TimeEntryRepo::delete(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(entry_not_found(&id))
    }
}

/// POST /api/v1/time-entries/bulk-delete
///
/// Unknown ids are skipped silently; the response counts only rows
/// actually removed.
pub async fn delete_bulk(
    State(state): State<AppState>,
    Json(input): Json<EntryBatch>,
) -> AppResult<Json<DeleteOutcome>> {
    if input.entry_ids.is_empty() {
        return Err(AppError::BadRequest("no entry ids provided".to_string()));
    }
    let deleted = TimeEntryRepo::delete_bulk(&state.pool, &input.entry_ids).await?;
    tracing::info!(count = deleted.len(), "time entries deleted");
    Ok(Json(DeleteOutcome {
        count: deleted.len(),
        deleted,
    }))
}

/// POST /api/v1/time-entries/unmark
pub async fn unmark(
    State(state): State<AppState>,
    Json(input): Json<EntryBatch>,
) -> AppResult<Json<BatchOutcome>> {
    let outcome = status::unmark_invoiced(&state.pool, &input.entry_ids).await?;
    Ok(Json(outcome))
}

/// Look up the contract, require it active, and resolve the date
/// expression.
async fn resolve(state: &AppState, input: &LogHours) -> AppResult<NewTimeEntry> {
    let contract = ContractRepo::find_by_number(&state.pool, &input.contract_number)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "contract",
            key: input.contract_number.clone(),
        })?;

    if contract.status != ContractStatus::Active {
        return Err(CoreError::Precondition(format!(
            "contract {} is not active (status: {})",
            contract.contract_number,
            contract.status.as_str()
        ))
        .into());
    }

    let date = match input.date.as_deref() {
        Some(expr) => period::parse_date(expr)?,
        None => Local::now().date_naive(),
    };

    Ok(NewTimeEntry {
        client_id: contract.client_id,
        contract_id: contract.id,
        contract_ref: contract.contract_number,
        date,
        hours: input.hours,
        description: input.description.clone(),
    })
}

async fn resolve_client(
    state: &AppState,
    client_name: Option<&str>,
) -> AppResult<Option<tally_core::types::DbId>> {
    match client_name {
        Some(name) => {
            let client = ClientRepo::find_by_name(&state.pool, name)
                .await?
                .ok_or_else(|| CoreError::NotFound {
                    entity: "client",
                    key: name.to_string(),
                })?;
            Ok(Some(client.id))
        }
        None => Ok(None),
    }
}

fn parse_optional_date(expr: Option<&str>) -> AppResult<Option<chrono::NaiveDate>> {
    match expr {
        Some(expr) => Ok(Some(period::parse_date(expr)?)),
        None => Ok(None),
    }
}

fn entry_not_found(id: &str) -> AppError {
    CoreError::NotFound {
        entity: "time entry",
        key: id.to_string(),
    }
    .into()
}

fn listing(entries: Vec<TimeEntryWithContract>) -> EntryListResponse {
    EntryListResponse {
        count: entries.len(),
        total_hours: entries.iter().map(|e| e.hours).sum(),
        entries,
    }
}
