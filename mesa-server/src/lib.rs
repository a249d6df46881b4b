//! mesa-server - restaurant table ordering API
//!
//! # Architecture
//!
//! ```text
//! api (axum handlers)
//!   └─ orders::OrdersManager (validation, transactions, totals, views)
//!        └─ db::OrderStore (PostgreSQL | in-memory)
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod orders;
pub mod state;
pub mod utils;

pub use config::Config;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
