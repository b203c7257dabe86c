//! Repository for the `invoices` table.
//!
//! Invoice creation is not here: it happens inside the consolidation
//! transaction, which also links entries and records the rendered
//! document. Invoices are never deleted, only restatused.

use sqlx::{QueryBuilder, Sqlite};
use tally_core::types::DbId;

use crate::models::invoice::{Invoice, InvoiceFilter, InvoiceStatus, InvoiceWithClient};
use crate::models::time_entry::TimeEntry;
use crate::DbPool;

const COLUMNS: &str = "id, client_id, invoice_number, issue_date, due_date, total_amount, \
                       status, pdf_path, created_at";

/// Provides lookup, listing, and status updates for invoices.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Invoice numbers are globally unique; this is the lookup the
    /// operation surface uses.
    pub async fn find_by_number(
        pool: &DbPool,
        invoice_number: &str,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM invoices WHERE invoice_number = ?");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(invoice_number)
            .fetch_optional(pool)
            .await
    }

    /// List invoices with the given filter, newest issue date first.
    pub async fn list(
        pool: &DbPool,
        filter: &InvoiceFilter,
    ) -> Result<Vec<InvoiceWithClient>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT i.id, i.invoice_number, i.issue_date, i.due_date, i.total_amount, \
             i.status, c.name AS client_name \
             FROM invoices i \
             JOIN clients c ON i.client_id = c.id \
             WHERE 1=1",
        );

        if let Some(client_id) = filter.client_id {
            qb.push(" AND i.client_id = ").push_bind(client_id);
        }
        if let Some(status) = filter.status {
            qb.push(" AND i.status = ").push_bind(status);
        }
        if let Some(start_date) = filter.start_date {
            qb.push(" AND i.issue_date >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            qb.push(" AND i.issue_date <= ").push_bind(end_date);
        }

        qb.push(" ORDER BY i.issue_date DESC");

        qb.build_query_as::<InvoiceWithClient>()
            .fetch_all(pool)
            .await
    }

    /// Set an invoice's status. Any status may follow any other; the
    /// allowed-value check happens at the operation surface. Returns
    /// `true` if a row was updated.
    pub async fn update_status(
        pool: &DbPool,
        invoice_number: &str,
        status: InvoiceStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE invoices SET status = ? WHERE invoice_number = ?")
            .bind(status)
            .bind(invoice_number)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Invoice number for an internal id, used when annotating entry
    /// details with their billing state.
    pub async fn find_number_by_id(
        pool: &DbPool,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT invoice_number FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The entries linked to an invoice, ordered by date.
    pub async fn entries_for(pool: &DbPool, invoice_id: DbId) -> Result<Vec<TimeEntry>, sqlx::Error> {
        sqlx::query_as::<_, TimeEntry>(
            "SELECT id, client_id, contract_id, date, hours, description, contract_ref, \
             invoice_id, created_at \
             FROM time_entries WHERE invoice_id = ? ORDER BY date",
        )
        .bind(invoice_id)
        .fetch_all(pool)
        .await
    }
}
