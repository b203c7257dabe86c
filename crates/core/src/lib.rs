//! Pure domain logic for the tally billing engine.
//!
//! No I/O lives in this crate: date and period expression resolution,
//! invoice number generation, and the domain error taxonomy shared by
//! the storage and API crates.

pub mod error;
pub mod numbering;
pub mod period;
pub mod types;
