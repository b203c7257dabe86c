//! Invoice number generation.

use chrono::NaiveDate;
use uuid::Uuid;

/// Fixed prefix for generated invoice numbers.
pub const INVOICE_PREFIX: &str = "INV";

/// Generate a unique invoice number: `INV-<YYYYMM>-<8-char suffix>`.
///
/// The suffix is the first eight hex characters of a fresh UUIDv4,
/// which keeps numbers unique without a central sequence.
pub fn invoice_number(issue_date: NaiveDate) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!(
        "{INVOICE_PREFIX}-{}-{}",
        issue_date.format("%Y%m"),
        &id[..8]
    )
}
