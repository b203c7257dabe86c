//! Business profile (the invoicing party) model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// The singleton business-info row (`id = 1`). Must exist before any
/// invoice is created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BusinessInfo {
    pub id: DbId,
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub logo_path: Option<String>,
    pub invoice_prefix: String,
    pub updated_at: Timestamp,
}

/// DTO for setting the business profile. Upserts the singleton row.
#[derive(Debug, Clone, Deserialize)]
pub struct SetBusinessInfo {
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub logo_path: Option<String>,
    /// Defaults to `INV` if omitted.
    pub invoice_prefix: Option<String>,
}
