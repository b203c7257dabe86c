//! Time entry model, DTOs, and query filter.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// A time entry row from the `time_entries` table.
///
/// `invoice_id = NULL` is the canonical unbilled state. `contract_id`
/// is nullable only for rows that predate contract-based billing; the
/// logging operation always sets it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeEntry {
    pub id: String,
    pub client_id: DbId,
    pub contract_id: Option<DbId>,
    pub date: NaiveDate,
    pub hours: f64,
    pub description: Option<String>,
    pub contract_ref: Option<String>,
    pub invoice_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// A resolved insert: the contract has already been looked up and
/// checked active, so this carries ids rather than references.
#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub client_id: DbId,
    pub contract_id: DbId,
    pub contract_ref: String,
    pub date: NaiveDate,
    pub hours: f64,
    pub description: Option<String>,
}

/// Fields of an unbilled entry that may change. `None` leaves the
/// column untouched.
#[derive(Debug, Clone, Default)]
pub struct TimeEntryChanges {
    pub hours: Option<f64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// A time entry joined with its contract and client for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeEntryWithContract {
    pub id: String,
    pub date: NaiveDate,
    pub hours: f64,
    pub description: Option<String>,
    pub invoice_id: Option<DbId>,
    pub created_at: Timestamp,
    pub client_name: String,
    pub contract_number: String,
    pub contract_name: String,
    pub hourly_rate: f64,
    pub currency: String,
}

/// An unbilled entry joined with its contract's current rate, as
/// selected for consolidation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnbilledEntry {
    pub id: String,
    pub date: NaiveDate,
    pub hours: f64,
    pub description: Option<String>,
    pub contract_number: String,
    pub contract_name: String,
    pub hourly_rate: f64,
    pub currency: String,
}

/// Search/list filter. Every field is optional; unset fields add no
/// constraint.
#[derive(Debug, Clone, Default)]
pub struct TimeEntryFilter {
    pub client_id: Option<DbId>,
    /// Substring match on the description.
    pub description: Option<String>,
    /// Substring match on the contract number.
    pub contract_ref: Option<String>,
    pub min_hours: Option<f64>,
    pub max_hours: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `Some(true)` = invoiced only, `Some(false)` = unbilled only.
    pub invoiced: Option<bool>,
}
