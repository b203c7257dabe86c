//! Repository for the singleton `business_info` row.

use crate::models::business_info::{BusinessInfo, SetBusinessInfo};
use crate::DbPool;

const COLUMNS: &str = "id, business_name, contact_name, email, phone, address, city, state, \
                       zip_code, country, tax_id, website, logo_path, invoice_prefix, updated_at";

/// Fixed id of the single business-info row.
const SINGLETON_ID: i64 = 1;

/// Provides upsert/lookup for the process-wide business profile.
pub struct BusinessInfoRepo;

impl BusinessInfoRepo {
    /// Insert or replace the business profile.
    pub async fn upsert(pool: &DbPool, input: &SetBusinessInfo) -> Result<BusinessInfo, sqlx::Error> {
        let query = format!(
            "INSERT INTO business_info
                 (id, business_name, contact_name, email, phone, address, city, state,
                  zip_code, country, tax_id, website, logo_path, invoice_prefix, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, COALESCE(?, 'INV'), CURRENT_TIMESTAMP)
             ON CONFLICT(id) DO UPDATE SET
                 business_name = excluded.business_name,
                 contact_name = excluded.contact_name,
                 email = excluded.email,
                 phone = excluded.phone,
                 address = excluded.address,
                 city = excluded.city,
                 state = excluded.state,
                 zip_code = excluded.zip_code,
                 country = excluded.country,
                 tax_id = excluded.tax_id,
                 website = excluded.website,
                 logo_path = excluded.logo_path,
                 invoice_prefix = excluded.invoice_prefix,
                 updated_at = excluded.updated_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BusinessInfo>(&query)
            .bind(SINGLETON_ID)
            .bind(&input.business_name)
            .bind(&input.contact_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.country)
            .bind(&input.tax_id)
            .bind(&input.website)
            .bind(&input.logo_path)
            .bind(&input.invoice_prefix)
            .fetch_one(pool)
            .await
    }

    pub async fn get(pool: &DbPool) -> Result<Option<BusinessInfo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM business_info WHERE id = ?");
        sqlx::query_as::<_, BusinessInfo>(&query)
            .bind(SINGLETON_ID)
            .fetch_optional(pool)
            .await
    }
}
