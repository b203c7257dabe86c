//! Billing-status management: linking and unlinking entries to
//! invoices outside the consolidation protocol.
//!
//! Batch semantics: hard errors (an entry already on a different
//! invoice) abort the whole batch via transaction rollback; soft
//! misses (unknown ids) are skipped silently and excluded from the
//! returned count.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::error::CoreError;
use tally_core::types::DbId;
use tally_db::repositories::InvoiceRepo;
use tally_db::DbPool;

use crate::error::{AppError, AppResult};

/// Request payload naming a batch of entry ids.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryBatch {
    pub entry_ids: Vec<String>,
}

/// What a batch operation did: how many entries changed, and a short
/// human-readable summary per entry.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub count: usize,
    pub entries: Vec<String>,
}

/// Link entries to an existing invoice.
///
/// Entries already on this invoice are skipped; an entry on a
/// *different* invoice fails the whole batch with a conflict and rolls
/// back every link made so far.
pub async fn mark_invoiced(
    pool: &DbPool,
    invoice_number: &str,
    entry_ids: &[String],
) -> AppResult<BatchOutcome> {
    if entry_ids.is_empty() {
        return Err(AppError::BadRequest("no entry ids provided".to_string()));
    }

    let invoice = InvoiceRepo::find_by_number(pool, invoice_number)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "invoice",
            key: invoice_number.to_string(),
        })?;

    let mut tx = pool.begin().await?;
    let mut marked = Vec::new();

    for entry_id in entry_ids {
        let row: Option<(String, NaiveDate, f64, Option<String>, Option<DbId>)> =
            sqlx::query_as(
                "SELECT c.name, te.date, te.hours, te.description, te.invoice_id
                 FROM time_entries te
                 JOIN clients c ON te.client_id = c.id
                 WHERE te.id = ?",
            )
            .bind(entry_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some((client_name, date, hours, description, current_invoice)) = row else {
            continue;
        };

        if let Some(current) = current_invoice {
            if current == invoice.id {
                continue;
            }
            let other: Option<String> =
                sqlx::query_scalar("SELECT invoice_number FROM invoices WHERE id = ?")
                    .bind(current)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(CoreError::Conflict(format!(
                "time entry {entry_id} is already invoiced ({})",
                other.as_deref().unwrap_or("unknown invoice")
            ))
            .into());
        }

        sqlx::query("UPDATE time_entries SET invoice_id = ? WHERE id = ?")
            .bind(invoice.id)
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;

        marked.push(entry_summary(entry_id, &client_name, hours, date, description.as_deref()));
    }

    tx.commit().await?;

    tracing::info!(invoice = invoice_number, count = marked.len(), "marked entries invoiced");
    Ok(BatchOutcome {
        count: marked.len(),
        entries: marked,
    })
}

/// Clear the invoice link on entries unconditionally. There is no
/// check that the parent invoice is still editable. Unknown ids are
/// skipped.
pub async fn unmark_invoiced(pool: &DbPool, entry_ids: &[String]) -> AppResult<BatchOutcome> {
    if entry_ids.is_empty() {
        return Err(AppError::BadRequest("no entry ids provided".to_string()));
    }

    let mut tx = pool.begin().await?;
    let mut unmarked = Vec::new();

    for entry_id in entry_ids {
        let row: Option<(String, NaiveDate, f64, Option<String>, Option<String>)> =
            sqlx::query_as(
                "SELECT c.name, te.date, te.hours, te.description, i.invoice_number
                 FROM time_entries te
                 JOIN clients c ON te.client_id = c.id
                 LEFT JOIN invoices i ON te.invoice_id = i.id
                 WHERE te.id = ?",
            )
            .bind(entry_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some((client_name, date, hours, description, was_invoice)) = row else {
            continue;
        };

        sqlx::query("UPDATE time_entries SET invoice_id = NULL WHERE id = ?")
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;

        let mut summary =
            entry_summary(entry_id, &client_name, hours, date, description.as_deref());
        match was_invoice {
            Some(number) => summary.push_str(&format!(" [was {number}]")),
            None => summary.push_str(" [no invoice]"),
        }
        unmarked.push(summary);
    }

    tx.commit().await?;

    tracing::info!(count = unmarked.len(), "unmarked entries from invoices");
    Ok(BatchOutcome {
        count: unmarked.len(),
        entries: unmarked,
    })
}

fn entry_summary(
    id: &str,
    client_name: &str,
    hours: f64,
    date: NaiveDate,
    description: Option<&str>,
) -> String {
    format!(
        "{id}: {client_name} - {hours:.2} hours on {date} ({})",
        description.unwrap_or("")
    )
}
