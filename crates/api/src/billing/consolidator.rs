//! Invoice consolidation: select a client's unbilled work in a
//! period, total it at current contract rates, and bind it to a new
//! invoice atomically.

use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use tally_core::error::CoreError;
use tally_core::{numbering, period};
use tally_db::models::invoice::InvoiceStatus;
use tally_db::repositories::{BusinessInfoRepo, ClientRepo, PaymentDetailsRepo, RecipientRepo, TimeEntryRepo};

use crate::error::AppResult;
use crate::render::{InvoiceDocument, InvoiceLine};
use crate::state::AppState;

/// Request payload for `POST /invoices`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    pub client_name: String,
    /// Any period expression: "this month", "last week",
    /// "January 2024".
    pub period: String,
    /// Days until the invoice is due. Defaults to 30.
    pub due_days: Option<i64>,
}

/// Result summary returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedInvoice {
    pub invoice_number: String,
    pub status: InvoiceStatus,
    pub total_amount: f64,
    pub total_hours: f64,
    pub entry_count: usize,
    pub pdf_path: String,
}

/// Create an invoice for a client over a period.
///
/// Preconditions are checked before any mutation, each failing with a
/// distinct actionable error: the business profile must be configured,
/// the client must exist, and the client must have payment details.
/// An empty unbilled set fails with "nothing to bill" and creates
/// nothing.
///
/// The invoice insert, the entry linking, the document render, and the
/// recording of the output path all happen inside one transaction; a
/// failure at any point (a failed render included) rolls the whole
/// operation back.
pub async fn create_invoice(
    state: &AppState,
    request: CreateInvoiceRequest,
) -> AppResult<CreatedInvoice> {
    let due_days = request.due_days.unwrap_or(30);

    let business = BusinessInfoRepo::get(&state.pool).await?.ok_or_else(|| {
        CoreError::Precondition(
            "business information is not configured; set business info before creating invoices"
                .to_string(),
        )
    })?;

    let client = ClientRepo::find_by_name(&state.pool, &request.client_name)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "client",
            key: request.client_name.clone(),
        })?;

    let payment = PaymentDetailsRepo::find_by_client(&state.pool, client.id)
        .await?
        .ok_or_else(|| {
            CoreError::Precondition(format!(
                "payment details are not configured for client '{}'; \
                 set payment details before creating invoices",
                client.name
            ))
        })?;

    let range = period::parse_period(&request.period)?;

    let entries =
        TimeEntryRepo::unbilled_in_range(&state.pool, client.id, range.start, range.end).await?;
    if entries.is_empty() {
        return Err(CoreError::Precondition(format!(
            "no unbilled hours found for {} in {}",
            client.name, request.period
        ))
        .into());
    }

    let total_hours: f64 = entries.iter().map(|e| e.hours).sum();
    // Totals use each contract's rate as it is now, not as it was when
    // the hours were logged.
    let total_amount: f64 = entries.iter().map(|e| e.hours * e.hourly_rate).sum();

    let issue_date = Local::now().date_naive();
    let due_date = issue_date + Duration::days(due_days);
    let invoice_number = numbering::invoice_number(issue_date);

    let recipients = RecipientRepo::list_by_client(&state.pool, client.id).await?;

    let pdf_path = state
        .config
        .invoice_output_dir
        .join(format!("invoice_{}.pdf", issue_date.format("%Y-%m-%d")));

    let lines: Vec<InvoiceLine> = entries
        .iter()
        .map(|e| InvoiceLine {
            date: e.date,
            description: e.description.clone(),
            contract_number: e.contract_number.clone(),
            hours: e.hours,
            hourly_rate: e.hourly_rate,
            currency: e.currency.clone(),
            amount: e.hours * e.hourly_rate,
        })
        .collect();

    let document = InvoiceDocument {
        invoice_number: invoice_number.clone(),
        issue_date,
        due_date,
        total_hours,
        total_amount,
        business,
        client: client.clone(),
        recipients,
        payment,
        lines,
    };

    let mut tx = state.pool.begin().await?;

    let invoice_id: i64 = sqlx::query_scalar(
        "INSERT INTO invoices
             (client_id, invoice_number, issue_date, due_date, total_amount, status)
         VALUES (?, ?, ?, ?, ?, 'pending')
         RETURNING id",
    )
    .bind(client.id)
    .bind(&invoice_number)
    .bind(issue_date)
    .bind(due_date)
    .bind(total_amount)
    .fetch_one(&mut *tx)
    .await?;

    for entry in &entries {
        sqlx::query("UPDATE time_entries SET invoice_id = ? WHERE id = ?")
            .bind(invoice_id)
            .bind(&entry.id)
            .execute(&mut *tx)
            .await?;
    }

    // A failed render drops the transaction: no invoice row or entry
    // linkage survives.
    state.renderer.render(&document, &pdf_path)?;

    sqlx::query("UPDATE invoices SET pdf_path = ? WHERE id = ?")
        .bind(pdf_path.display().to_string())
        .bind(invoice_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        invoice = %invoice_number,
        client = %client.name,
        total_amount,
        total_hours,
        entries = entries.len(),
        "invoice created"
    );

    Ok(CreatedInvoice {
        invoice_number,
        status: InvoiceStatus::Pending,
        total_amount,
        total_hours,
        entry_count: entries.len(),
        pdf_path: pdf_path.display().to_string(),
    })
}
