//! Repository for the `payment_details` table (one row per client).

use tally_core::types::DbId;

use crate::models::payment_details::{PaymentDetails, SetPaymentDetails};
use crate::DbPool;

const COLUMNS: &str = "id, client_id, bank_name, account_number, routing_number, swift_code, \
                       payment_terms, notes, updated_at";

/// Provides upsert/lookup for per-client payment details.
pub struct PaymentDetailsRepo;

impl PaymentDetailsRepo {
    /// Insert or replace the client's payment details.
    pub async fn upsert(
        pool: &DbPool,
        client_id: DbId,
        input: &SetPaymentDetails,
    ) -> Result<PaymentDetails, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_details
                 (client_id, bank_name, account_number, routing_number, swift_code,
                  payment_terms, notes, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(client_id) DO UPDATE SET
                 bank_name = excluded.bank_name,
                 account_number = excluded.account_number,
                 routing_number = excluded.routing_number,
                 swift_code = excluded.swift_code,
                 payment_terms = excluded.payment_terms,
                 notes = excluded.notes,
                 updated_at = excluded.updated_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentDetails>(&query)
            .bind(client_id)
            .bind(&input.bank_name)
            .bind(&input.account_number)
            .bind(&input.routing_number)
            .bind(&input.swift_code)
            .bind(&input.payment_terms)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_client(
        pool: &DbPool,
        client_id: DbId,
    ) -> Result<Option<PaymentDetails>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_details WHERE client_id = ?");
        sqlx::query_as::<_, PaymentDetails>(&query)
            .bind(client_id)
            .fetch_optional(pool)
            .await
    }
}
