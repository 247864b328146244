//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` document struct as returned to clients
//! - A create DTO consumed by the store
//! - Any query/filter types specific to that document

pub mod roadmap;
pub mod user_key;
