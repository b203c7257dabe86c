//! Handlers for the `/invoices` resource: consolidation, listings,
//! detail, status updates, and manual entry linking.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tally_core::error::CoreError;
use tally_core::period;
use tally_db::models::invoice::{Invoice, InvoiceFilter, InvoiceStatus, InvoiceWithClient};
use tally_db::models::time_entry::TimeEntry;
use tally_db::repositories::{ClientRepo, InvoiceRepo};

use crate::billing::consolidator::{self, CreateInvoiceRequest, CreatedInvoice};
use crate::billing::status::{self, BatchOutcome, EntryBatch};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Listing filter: client, status, and an issue-date window.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceListQuery {
    pub client_name: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Invoice listing with the running total next to it.
#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub count: usize,
    pub total_amount: f64,
    pub invoices: Vec<InvoiceWithClient>,
}

/// An invoice with its client and linked entries.
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub client_name: String,
    pub total_hours: f64,
    pub time_entries: Vec<TimeEntry>,
}

/// POST /api/v1/invoices
///
/// The consolidation protocol: resolves the period, selects unbilled
/// entries, and atomically creates the invoice, links the entries,
/// and renders the document.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateInvoiceRequest>,
) -> AppResult<(StatusCode, Json<CreatedInvoice>)> {
    let created = consolidator::create_invoice(&state, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/invoices
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<InvoiceListQuery>,
) -> AppResult<Json<InvoiceListResponse>> {
    let client_id = match query.client_name.as_deref() {
        Some(name) => Some(
            ClientRepo::find_by_name(&state.pool, name)
                .await?
                .ok_or_else(|| CoreError::NotFound {
                    entity: "client",
                    key: name.to_string(),
                })?
                .id,
        ),
        None => None,
    };

    let status = match query.status.as_deref() {
        Some(value) => Some(InvoiceStatus::parse_any(value).ok_or_else(|| {
            AppError::BadRequest(format!(
                "invalid status '{value}'; valid statuses are: \
                 pending, draft, sent, paid, overdue, cancelled"
            ))
        })?),
        None => None,
    };

    let filter = InvoiceFilter {
        client_id,
        status,
        start_date: parse_optional_date(query.start_date.as_deref())?,
        end_date: parse_optional_date(query.end_date.as_deref())?,
    };

    let invoices = InvoiceRepo::list(&state.pool, &filter).await?;
    Ok(Json(InvoiceListResponse {
        count: invoices.len(),
        total_amount: invoices.iter().map(|i| i.total_amount).sum(),
        invoices,
    }))
}

/// GET /api/v1/invoices/{invoice_number}
pub async fn get_by_number(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> AppResult<Json<InvoiceDetail>> {
    let invoice = InvoiceRepo::find_by_number(&state.pool, &invoice_number)
        .await?
        .ok_or_else(|| invoice_not_found(&invoice_number))?;

    let client_name = ClientRepo::find_by_id(&state.pool, invoice.client_id)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();

    let time_entries = InvoiceRepo::entries_for(&state.pool, invoice.id).await?;
    let total_hours = time_entries.iter().map(|e| e.hours).sum();

    Ok(Json(InvoiceDetail {
        invoice,
        client_name,
        total_hours,
        time_entries,
    }))
}

/// PUT /api/v1/invoices/{invoice_number}/status
///
/// Any of draft/sent/paid/overdue/cancelled may follow any other; no
/// transition ordering is enforced.
pub async fn update_status(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<Invoice>> {
    let status = InvoiceStatus::parse_update(&input.status).ok_or_else(|| {
        AppError::BadRequest(format!(
            "invalid status '{}'; valid statuses are: draft, sent, paid, overdue, cancelled",
            input.status
        ))
    })?;

    if !InvoiceRepo::update_status(&state.pool, &invoice_number, status).await? {
        return Err(invoice_not_found(&invoice_number));
    }

    let invoice = InvoiceRepo::find_by_number(&state.pool, &invoice_number)
        .await?
        .ok_or_else(|| invoice_not_found(&invoice_number))?;

    tracing::info!(invoice = %invoice_number, status = status.as_str(), "invoice status updated");
    Ok(Json(invoice))
}

/// POST /api/v1/invoices/{invoice_number}/entries
///
/// Marks entries as billed under this invoice. An entry already on a
/// different invoice fails the whole batch.
pub async fn mark_entries(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
    Json(input): Json<EntryBatch>,
) -> AppResult<Json<BatchOutcome>> {
    let outcome = status::mark_invoiced(&state.pool, &invoice_number, &input.entry_ids).await?;
    Ok(Json(outcome))
}

fn parse_optional_date(expr: Option<&str>) -> AppResult<Option<chrono::NaiveDate>> {
    match expr {
        Some(expr) => Ok(Some(period::parse_date(expr)?)),
        None => Ok(None),
    }
}

fn invoice_not_found(invoice_number: &str) -> AppError {
    CoreError::NotFound {
        entity: "invoice",
        key: invoice_number.to_string(),
    }
    .into()
}
