//! Data models
//!
//! Shared between mesa-server and the front-end (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (BIGSERIAL).

pub mod dining_table;
pub mod order;

// Re-exports
pub use dining_table::*;
pub use order::*;
