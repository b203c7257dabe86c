//! Repository for the `recipients` table.

use tally_core::types::DbId;

use crate::models::recipient::{CreateRecipient, Recipient};
use crate::DbPool;

const COLUMNS: &str = "id, client_id, name, email, title, phone, is_primary, created_at";

/// Provides CRUD operations for invoice recipients.
pub struct RecipientRepo;

impl RecipientRepo {
    pub async fn create(
        pool: &DbPool,
        client_id: DbId,
        input: &CreateRecipient,
    ) -> Result<Recipient, sqlx::Error> {
        let query = format!(
            "INSERT INTO recipients (client_id, name, email, title, phone, is_primary)
             VALUES (?, ?, ?, ?, ?, COALESCE(?, FALSE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(client_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.title)
            .bind(&input.phone)
            .bind(input.is_primary)
            .fetch_one(pool)
            .await
    }

    /// List a client's recipients, primary first.
    pub async fn list_by_client(
        pool: &DbPool,
        client_id: DbId,
    ) -> Result<Vec<Recipient>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recipients
             WHERE client_id = ?
             ORDER BY is_primary DESC, name"
        );
        sqlx::query_as::<_, Recipient>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Remove a recipient. Scoped to the client so a stale id cannot
    /// remove another client's recipient. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &DbPool, client_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipients WHERE id = ? AND client_id = ?")
            .bind(id)
            .bind(client_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
