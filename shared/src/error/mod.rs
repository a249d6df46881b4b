//! Unified error system
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Error type with code, message and pass-through details
//! - [`ErrorBody`]: JSON body written for every failed request
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::NoOpenOrder);
//! assert_eq!(err.http_status().as_u16(), 404);
//!
//! let err = AppError::database("Error al crear el pedido").with_details("connection refused");
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.error, "Error al crear el pedido");
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
