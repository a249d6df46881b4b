use thiserror::Error;

use crate::db::{StoreError, StoreResult};

/// Order lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    /// The table has no order in the open state
    #[error("No open order for table {0}")]
    NoOpenOrder(i64),

    /// Rejected input, nothing was written
    #[error("{0}")]
    Validation(String),

    /// Store call failed; `context` names the step that failed
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Attach the failing step to a store error
pub(crate) trait StoreContext<T> {
    fn context(self, context: &'static str) -> OrderResult<T>;
}

impl<T> StoreContext<T> for StoreResult<T> {
    fn context(self, context: &'static str) -> OrderResult<T> {
        self.map_err(|source| OrderError::Store { context, source })
    }
}
