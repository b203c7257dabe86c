//! Contract entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// Lifecycle status of a contract. Only `active` contracts accept new
/// time entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Completed,
    OnHold,
    Cancelled,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "active",
            ContractStatus::Completed => "completed",
            ContractStatus::OnHold => "on_hold",
            ContractStatus::Cancelled => "cancelled",
        }
    }
}

/// A contract row from the `contracts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub client_id: DbId,
    pub contract_number: String,
    pub name: String,
    pub hourly_rate: f64,
    pub currency: String,
    pub contract_type: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: ContractStatus,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new contract under a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    pub contract_number: String,
    pub name: String,
    pub hourly_rate: f64,
    /// Defaults to `USD` if omitted.
    pub currency: Option<String>,
    /// Defaults to `hourly` if omitted.
    pub contract_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}
