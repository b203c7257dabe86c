//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&DbPool` as the first argument. Multi-statement
//! methods open their own transaction; dropping the guard on an error
//! path rolls everything back.

pub mod business_info_repo;
pub mod client_repo;
pub mod contract_repo;
pub mod invoice_repo;
pub mod payment_details_repo;
pub mod recipient_repo;
pub mod time_entry_repo;

pub use business_info_repo::BusinessInfoRepo;
pub use client_repo::ClientRepo;
pub use contract_repo::ContractRepo;
pub use invoice_repo::InvoiceRepo;
pub use payment_details_repo::PaymentDetailsRepo;
pub use recipient_repo::RecipientRepo;
pub use time_entry_repo::TimeEntryRepo;
