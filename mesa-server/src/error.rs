//! Service-layer error bridge
//!
//! Handlers use `?` on [`OrderResult`](crate::orders::OrderResult); the
//! conversion below picks the HTTP-facing [`AppError`]. Store failures become
//! `DatabaseError` (System category), which `AppError` logs when rendered.

use shared::error::{AppError, ErrorCode};

use crate::orders::OrderError;

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NoOpenOrder(_) => AppError::new(ErrorCode::NoOpenOrder),
            OrderError::Validation(msg) => AppError::validation(msg),
            OrderError::Store { context, source } => {
                AppError::database(context).with_details(source.to_string())
            }
        }
    }
}
