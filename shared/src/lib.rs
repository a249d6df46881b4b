//! Shared types for the table-ordering service
//!
//! Domain models, request/response bodies and the unified error system used
//! by mesa-server and its clients.

pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
