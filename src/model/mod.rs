//! Database models module
//!
//! Row structs for every table are consolidated in models.rs.

mod models;
mod table;

pub use models::*;

pub use table::Table;
