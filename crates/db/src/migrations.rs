//! Schema creation and the ordered migration registry.
//!
//! The base schema is applied with `CREATE TABLE IF NOT EXISTS` on
//! every startup. Named migrations then run in registration order,
//! each at most once, tracked by name in `schema_migrations`. Column
//! additions are guarded by a `PRAGMA table_info` existence check, so
//! re-running the whole list is a no-op.
//!
//! Two migrations upgrade pre-contract databases, where the hourly
//! rate lived on the client row: `restructure_for_contracts` folds
//! those rates into synthetic `LEGACY-<client_id>` contracts and links
//! the client's unassigned entries to them, and
//! `remove_rate_constraints_from_clients` rebuilds the clients table
//! without the rate columns via copy-and-rename. Both are recorded
//! no-ops on databases that never had the legacy columns.

use sqlx::{Connection, Row};

use crate::DbPool;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    address TEXT,
    city TEXT,
    state TEXT,
    zip_code TEXT,
    country TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS recipients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    title TEXT,
    phone TEXT,
    is_primary BOOLEAN DEFAULT FALSE,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (client_id) REFERENCES clients(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS payment_details (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL UNIQUE,
    bank_name TEXT,
    account_number TEXT,
    routing_number TEXT,
    swift_code TEXT,
    payment_terms TEXT,
    notes TEXT,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (client_id) REFERENCES clients(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS contracts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL,
    contract_number TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    hourly_rate REAL NOT NULL,
    currency TEXT DEFAULT 'USD',
    contract_type TEXT DEFAULT 'hourly',
    start_date DATE NOT NULL,
    end_date DATE,
    status TEXT DEFAULT 'active',
    payment_terms TEXT,
    notes TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (client_id) REFERENCES clients(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS invoices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL,
    invoice_number TEXT NOT NULL UNIQUE,
    issue_date DATE NOT NULL,
    due_date DATE NOT NULL,
    total_amount REAL NOT NULL,
    status TEXT DEFAULT 'pending',
    pdf_path TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (client_id) REFERENCES clients(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS time_entries (
    id TEXT PRIMARY KEY,
    client_id INTEGER NOT NULL,
    date DATE NOT NULL,
    hours REAL NOT NULL,
    description TEXT,
    contract_ref TEXT,
    invoice_id INTEGER,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (client_id) REFERENCES clients(id) ON DELETE CASCADE,
    FOREIGN KEY (invoice_id) REFERENCES invoices(id)
);

CREATE TABLE IF NOT EXISTS business_info (
    id INTEGER PRIMARY KEY,
    business_name TEXT NOT NULL,
    contact_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    address TEXT,
    city TEXT,
    state TEXT,
    zip_code TEXT,
    country TEXT,
    tax_id TEXT,
    website TEXT,
    logo_path TEXT,
    invoice_prefix TEXT DEFAULT 'INV',
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_time_entries_date ON time_entries(date);
CREATE INDEX IF NOT EXISTS idx_time_entries_client ON time_entries(client_id);
CREATE INDEX IF NOT EXISTS idx_invoices_client ON invoices(client_id);
CREATE INDEX IF NOT EXISTS idx_invoices_status ON invoices(status);
CREATE INDEX IF NOT EXISTS idx_contracts_client ON contracts(client_id);
CREATE INDEX IF NOT EXISTS idx_contracts_status ON contracts(status);
CREATE INDEX IF NOT EXISTS idx_contracts_dates ON contracts(start_date, end_date);
";

/// Apply the base schema and any migrations not yet recorded.
pub async fn run(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;

    sqlx::raw_sql(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            id INTEGER PRIMARY KEY,
            name TEXT UNIQUE NOT NULL,
            applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    apply(pool, "add_contract_ref_to_time_entries", |p| async move {
        add_column_if_missing(&p, "time_entries", "contract_ref", "TEXT").await
    })
    .await?;

    apply(pool, "add_title_to_recipients", |p| async move {
        add_column_if_missing(&p, "recipients", "title", "TEXT").await
    })
    .await?;

    apply(pool, "add_phone_to_recipients", |p| async move {
        add_column_if_missing(&p, "recipients", "phone", "TEXT").await
    })
    .await?;

    apply(pool, "add_address_to_clients", |p| async move {
        for column in ["address", "city", "state", "zip_code", "country"] {
            add_column_if_missing(&p, "clients", column, "TEXT").await?;
        }
        Ok(())
    })
    .await?;

    apply(pool, "restructure_for_contracts", restructure_for_contracts).await?;

    apply(
        pool,
        "remove_rate_constraints_from_clients",
        remove_rate_constraints_from_clients,
    )
    .await?;

    Ok(())
}

/// Run `migration` once, guarded by the `schema_migrations` log.
async fn apply<F, Fut>(pool: &DbPool, name: &str, migration: F) -> Result<(), sqlx::Error>
where
    F: FnOnce(DbPool) -> Fut,
    Fut: std::future::Future<Output = Result<(), sqlx::Error>>,
{
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations WHERE name = ?")
            .bind(name)
            .fetch_one(pool)
            .await?;
    if applied > 0 {
        return Ok(());
    }

    migration(pool.clone()).await?;

    sqlx::query("INSERT INTO schema_migrations (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;

    tracing::info!(migration = name, "applied migration");
    Ok(())
}

async fn column_exists(pool: &DbPool, table: &str, column: &str) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().any(|row| row.get::<String, _>("name") == column))
}

async fn add_column_if_missing(
    pool: &DbPool,
    table: &str,
    column: &str,
    decl: &str,
) -> Result<(), sqlx::Error> {
    if column_exists(pool, table, column).await? {
        return Ok(());
    }
    sqlx::query(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"))
        .execute(pool)
        .await?;
    tracing::debug!(table, column, "added column");
    Ok(())
}

/// Move client-level rates onto synthetic legacy contracts.
///
/// Adds `time_entries.contract_id` (no foreign key: the column is
/// retrofitted onto an existing table, so the reference is enforced in
/// business logic). When the legacy `clients.hourly_rate` column
/// exists, every client with a positive rate gets an active
/// `LEGACY-<client_id>` contract carrying that rate, and all of the
/// client's entries without a contract are linked to it.
async fn restructure_for_contracts(pool: DbPool) -> Result<(), sqlx::Error> {
    add_column_if_missing(&pool, "time_entries", "contract_id", "INTEGER").await?;

    if !column_exists(&pool, "clients", "hourly_rate").await? {
        return Ok(());
    }

    let clients = sqlx::query(
        "SELECT id, name, hourly_rate, COALESCE(currency, 'USD') AS currency, created_at
         FROM clients
         WHERE hourly_rate IS NOT NULL AND hourly_rate > 0",
    )
    .fetch_all(&pool)
    .await?;

    for row in clients {
        let client_id: i64 = row.get("id");
        let name: String = row.get("name");
        let hourly_rate: f64 = row.get("hourly_rate");
        let currency: String = row.get("currency");
        let created_at: String = row.get("created_at");
        // The contract starts the day the client was created.
        let start_date = created_at.get(..10).unwrap_or("1970-01-01").to_string();

        let contract_number = format!("LEGACY-{client_id}");
        let contract_name = format!("Legacy Contract - {name}");

        let contract_id: i64 = sqlx::query_scalar(
            "INSERT INTO contracts
                 (client_id, contract_number, name, hourly_rate, currency, start_date, status)
             VALUES (?, ?, ?, ?, ?, ?, 'active')
             RETURNING id",
        )
        .bind(client_id)
        .bind(&contract_number)
        .bind(&contract_name)
        .bind(hourly_rate)
        .bind(&currency)
        .bind(&start_date)
        .fetch_one(&pool)
        .await?;

        sqlx::query(
            "UPDATE time_entries SET contract_id = ?
             WHERE client_id = ? AND contract_id IS NULL",
        )
        .bind(contract_id)
        .bind(client_id)
        .execute(&pool)
        .await?;

        tracing::info!(client = %name, contract = %contract_number, "created legacy contract");
    }

    Ok(())
}

/// Rebuild the clients table without the legacy rate columns.
///
/// SQLite cannot drop columns that carry constraints, so the table is
/// recreated and the surviving columns copied over. Foreign key
/// enforcement is suspended around the rebuild: with it on, dropping
/// the old table would cascade-delete every dependent row.
async fn remove_rate_constraints_from_clients(pool: DbPool) -> Result<(), sqlx::Error> {
    if !column_exists(&pool, "clients", "hourly_rate").await? {
        return Ok(());
    }

    let mut conn = pool.acquire().await?;

    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(&mut *conn)
        .await?;

    let mut tx = conn.begin().await?;

    sqlx::query(
        "CREATE TABLE clients_new (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            address TEXT,
            city TEXT,
            state TEXT,
            zip_code TEXT,
            country TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO clients_new
             (id, name, address, city, state, zip_code, country, created_at, updated_at)
         SELECT id, name, address, city, state, zip_code, country, created_at, updated_at
         FROM clients",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query("DROP TABLE clients").execute(&mut *tx).await?;

    sqlx::query("ALTER TABLE clients_new RENAME TO clients")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    tracing::info!("rebuilt clients table without legacy rate columns");
    Ok(())
}
