//! Table order lifecycle
//!
//! - [`OrdersManager`]: open/append, close, delete line, listings
//! - [`money`]: totals and item validation
//! - [`aggregate`]: joined rows → nested table views

pub mod aggregate;
mod error;
mod manager;
pub mod money;

pub use error::{OrderError, OrderResult};
pub use manager::OrdersManager;
