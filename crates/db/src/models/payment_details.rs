//! Per-client payment details model and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::types::{DbId, Timestamp};

/// The payment-details row for a client (at most one per client).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentDetails {
    pub id: DbId,
    pub client_id: DbId,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    pub updated_at: Timestamp,
}

/// DTO for setting a client's payment details. Upserts the single row.
#[derive(Debug, Clone, Deserialize)]
pub struct SetPaymentDetails {
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}
