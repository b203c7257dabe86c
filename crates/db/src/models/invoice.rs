//! Invoice entity model and listing shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// Coarse invoice lifecycle status.
///
/// `pending` is assigned at creation by the consolidation protocol;
/// the status-update operation accepts only the other five, with no
/// ordering constraints between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status reachable via the status-update operation.
    /// `pending` is not re-enterable and parses as `None`.
    pub fn parse_update(value: &str) -> Option<InvoiceStatus> {
        match value {
            "draft" => Some(InvoiceStatus::Draft),
            "sent" => Some(InvoiceStatus::Sent),
            "paid" => Some(InvoiceStatus::Paid),
            "overdue" => Some(InvoiceStatus::Overdue),
            "cancelled" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }

    /// Parse any stored status, for list filtering.
    pub fn parse_any(value: &str) -> Option<InvoiceStatus> {
        if value == "pending" {
            return Some(InvoiceStatus::Pending);
        }
        Self::parse_update(value)
    }
}

/// An invoice row from the `invoices` table.
///
/// `total_amount` is frozen at consolidation time and never
/// recomputed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub client_id: DbId,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: f64,
    pub status: InvoiceStatus,
    pub pdf_path: Option<String>,
    pub created_at: Timestamp,
}

/// An invoice joined with its client name for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvoiceWithClient {
    pub id: DbId,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: f64,
    pub status: InvoiceStatus,
    pub client_name: String,
}

/// Invoice listing filter. Unset fields add no constraint.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub client_id: Option<DbId>,
    pub status: Option<InvoiceStatus>,
    /// Issue-date range, inclusive.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
