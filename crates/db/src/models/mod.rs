//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!   where the entity is editable

pub mod business_info;
pub mod client;
pub mod contract;
pub mod invoice;
pub mod payment_details;
pub mod recipient;
pub mod time_entry;
