//! Repository for the `clients` table.

use tally_core::types::DbId;

use crate::models::client::{Client, CreateClient, UpdateClient};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, address, city, state, zip_code, country, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row. Fails on a
    /// duplicate name (unique constraint).
    pub async fn create(pool: &DbPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, address, city, state, zip_code, country)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.country)
            .fetch_one(pool)
            .await
    }

    /// List all clients ordered by name.
    pub async fn list(pool: &DbPool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY name");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = ?");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Clients are unique by name; this is the lookup the operation
    /// surface uses.
    pub async fn find_by_name(pool: &DbPool, name: &str) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE name = ?");
        sqlx::query_as::<_, Client>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE(?, name),
                address = COALESCE(?, address),
                city = COALESCE(?, city),
                state = COALESCE(?, state),
                zip_code = COALESCE(?, zip_code),
                country = COALESCE(?, country),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.country)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client by ID. Cascades to contracts, recipients,
    /// payment details, invoices, and time entries. Returns `true` if
    /// a row was removed.
    pub async fn delete(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of active contracts for a client, shown in listings.
    pub async fn active_contract_count(pool: &DbPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM contracts WHERE client_id = ? AND status = 'active'",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
