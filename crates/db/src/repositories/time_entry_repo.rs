//! Repository for the `time_entries` table.

use sqlx::{QueryBuilder, Sqlite};
use tally_core::types::DbId;
use uuid::Uuid;

use crate::models::time_entry::{
    NewTimeEntry, TimeEntry, TimeEntryChanges, TimeEntryFilter, TimeEntryWithContract,
    UnbilledEntry,
};
use crate::DbPool;

const COLUMNS: &str =
    "id, client_id, contract_id, date, hours, description, contract_ref, invoice_id, created_at";

/// Joined select used by listings and search; filters are appended to
/// it dynamically.
const JOINED_SELECT: &str = "SELECT te.id, te.date, te.hours, te.description, te.invoice_id, \
     te.created_at, cl.name AS client_name, ct.contract_number, \
     ct.name AS contract_name, ct.hourly_rate, ct.currency \
     FROM time_entries te \
     JOIN contracts ct ON te.contract_id = ct.id \
     JOIN clients cl ON ct.client_id = cl.id \
     WHERE 1=1";

/// Provides CRUD and query operations for time entries.
pub struct TimeEntryRepo;

impl TimeEntryRepo {
    /// Insert a single entry, returning the created row. The id is a
    /// fresh UUIDv4 so entries can be created without a central
    /// sequencer.
    pub async fn create(pool: &DbPool, input: &NewTimeEntry) -> Result<TimeEntry, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let query = format!(
            "INSERT INTO time_entries
                 (id, client_id, contract_id, date, hours, description, contract_ref)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(&id)
            .bind(input.client_id)
            .bind(input.contract_id)
            .bind(input.date)
            .bind(input.hours)
            .bind(&input.description)
            .bind(&input.contract_ref)
            .fetch_one(pool)
            .await
    }

    /// Insert a batch of entries in one transaction; either all are
    /// created or none.
    pub async fn create_bulk(
        pool: &DbPool,
        inputs: &[NewTimeEntry],
    ) -> Result<Vec<TimeEntry>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());

        for input in inputs {
            let id = Uuid::new_v4().to_string();
            let query = format!(
                "INSERT INTO time_entries
                     (id, client_id, contract_id, date, hours, description, contract_ref)
                 VALUES (?, ?, ?, ?, ?, ?, ?)
                 RETURNING {COLUMNS}"
            );
            let entry = sqlx::query_as::<_, TimeEntry>(&query)
                .bind(&id)
                .bind(input.client_id)
                .bind(input.contract_id)
                .bind(input.date)
                .bind(input.hours)
                .bind(&input.description)
                .bind(&input.contract_ref)
                .fetch_one(&mut *tx)
                .await?;
            created.push(entry);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<TimeEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM time_entries WHERE id = ?");
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an entry joined with its contract and client.
    pub async fn find_with_contract(
        pool: &DbPool,
        id: &str,
    ) -> Result<Option<TimeEntryWithContract>, sqlx::Error> {
        let query = format!("{JOINED_SELECT} AND te.id = ?");
        sqlx::query_as::<_, TimeEntryWithContract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search entries with the given filter, newest first.
    pub async fn search(
        pool: &DbPool,
        filter: &TimeEntryFilter,
    ) -> Result<Vec<TimeEntryWithContract>, sqlx::Error> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(JOINED_SELECT);

        if let Some(client_id) = filter.client_id {
            qb.push(" AND cl.id = ").push_bind(client_id);
        }
        if let Some(description) = &filter.description {
            qb.push(" AND te.description LIKE ")
                .push_bind(format!("%{description}%"));
        }
        if let Some(contract_ref) = &filter.contract_ref {
            qb.push(" AND ct.contract_number LIKE ")
                .push_bind(format!("%{contract_ref}%"));
        }
        if let Some(min_hours) = filter.min_hours {
            qb.push(" AND te.hours >= ").push_bind(min_hours);
        }
        if let Some(max_hours) = filter.max_hours {
            qb.push(" AND te.hours <= ").push_bind(max_hours);
        }
        if let Some(start_date) = filter.start_date {
            qb.push(" AND te.date >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            qb.push(" AND te.date <= ").push_bind(end_date);
        }
        if let Some(invoiced) = filter.invoiced {
            if invoiced {
                qb.push(" AND te.invoice_id IS NOT NULL");
            } else {
                qb.push(" AND te.invoice_id IS NULL");
            }
        }

        qb.push(" ORDER BY te.date DESC, te.created_at DESC");

        qb.build_query_as::<TimeEntryWithContract>()
            .fetch_all(pool)
            .await
    }

    /// Unbilled entries for a client in an inclusive date range, with
    /// each contract's current rate, ordered by date. This is the
    /// consolidation selection.
    pub async fn unbilled_in_range(
        pool: &DbPool,
        client_id: DbId,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Result<Vec<UnbilledEntry>, sqlx::Error> {
        sqlx::query_as::<_, UnbilledEntry>(
            "SELECT te.id, te.date, te.hours, te.description,
                    ct.contract_number, ct.name AS contract_name, ct.hourly_rate, ct.currency
             FROM time_entries te
             JOIN contracts ct ON te.contract_id = ct.id
             WHERE ct.client_id = ? AND te.date >= ? AND te.date <= ?
               AND te.invoice_id IS NULL
             ORDER BY te.date",
        )
        .bind(client_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Apply changes to an entry. Only non-`None` fields are written.
    /// The caller is responsible for the unbilled-only guard.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: &str,
        changes: &TimeEntryChanges,
    ) -> Result<Option<TimeEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE time_entries SET
                hours = COALESCE(?, hours),
                date = COALESCE(?, date),
                description = COALESCE(?, description)
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeEntry>(&query)
            .bind(changes.hours)
            .bind(changes.date)
            .bind(&changes.description)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an entry unconditionally, billed or not. Returns `true`
    /// if a row was removed.
    pub async fn delete(pool: &DbPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM time_entries WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a batch of entries in one transaction. Unknown ids are
    /// skipped; the deleted ids are returned in input order.
    pub async fn delete_bulk(pool: &DbPool, ids: &[String]) -> Result<Vec<String>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut deleted = Vec::new();

        for id in ids {
            let result = sqlx::query("DELETE FROM time_entries WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() > 0 {
                deleted.push(id.clone());
            }
        }

        tx.commit().await?;
        Ok(deleted)
    }
}
