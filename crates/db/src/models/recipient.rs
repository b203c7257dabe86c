//! Invoice recipient model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// A recipient row from the `recipients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recipient {
    pub id: DbId,
    pub client_id: DbId,
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub is_primary: bool,
    pub created_at: Timestamp,
}

/// DTO for adding a recipient to a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipient {
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub phone: Option<String>,
    /// Defaults to `false` if omitted.
    pub is_primary: Option<bool>,
}
