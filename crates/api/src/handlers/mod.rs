//! HTTP handlers, grouped by resource. Handlers stay thin: request
//! translation, lookups, and delegation to repositories or the
//! billing engine.

pub mod business_info;
pub mod clients;
pub mod contracts;
pub mod invoices;
pub mod payment_details;
pub mod recipients;
pub mod time_entries;
