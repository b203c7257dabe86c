//! Repository for the `contracts` table.

use tally_core::types::DbId;

use crate::models::contract::{Contract, CreateContract};
use crate::DbPool;

const COLUMNS: &str = "id, client_id, contract_number, name, hourly_rate, currency, \
                       contract_type, start_date, end_date, status, payment_terms, notes, \
                       created_at, updated_at";

/// Provides CRUD operations for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract for a client, returning the created row.
    ///
    /// Fails on a duplicate contract number (unique constraint).
    /// Currency defaults to `USD` and type to `hourly`; new contracts
    /// start `active`.
    pub async fn create(
        pool: &DbPool,
        client_id: DbId,
        input: &CreateContract,
    ) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts
                 (client_id, contract_number, name, hourly_rate, currency, contract_type,
                  start_date, end_date, status, payment_terms, notes)
             VALUES (?, ?, ?, ?, COALESCE(?, 'USD'), COALESCE(?, 'hourly'), ?, ?, 'active', ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(client_id)
            .bind(&input.contract_number)
            .bind(&input.name)
            .bind(input.hourly_rate)
            .bind(&input.currency)
            .bind(&input.contract_type)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.payment_terms)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List all contracts, newest first.
    pub async fn list(pool: &DbPool) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts ORDER BY created_at DESC");
        sqlx::query_as::<_, Contract>(&query).fetch_all(pool).await
    }

    /// List a client's contracts, newest first.
    pub async fn list_by_client(
        pool: &DbPool,
        client_id: DbId,
    ) -> Result<Vec<Contract>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM contracts WHERE client_id = ? ORDER BY created_at DESC");
        sqlx::query_as::<_, Contract>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Contract numbers are globally unique; this is the lookup the
    /// time-logging operations use.
    pub async fn find_by_number(
        pool: &DbPool,
        contract_number: &str,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE contract_number = ?");
        sqlx::query_as::<_, Contract>(&query)
            .bind(contract_number)
            .fetch_optional(pool)
            .await
    }
}
