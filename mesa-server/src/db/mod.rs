//! Relational store layer
//!
//! The order lifecycle talks to the database only through [`OrderStore`] and
//! the transactions it hands out ([`StoreTx`]). Two backends:
//!
//! - [`PgStore`]: PostgreSQL via sqlx (production)
//! - [`MemoryStore`]: in-process tables (development and tests)

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::models::{NewItem, OpenOrderLine, Order, OrderLine, OrderStatus};
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Insert referenced a table that does not exist (foreign key)
    #[error("table {0} does not exist")]
    UnknownTable(i64),

    /// Order row referenced by a line or an update does not exist
    #[error("order {0} does not exist")]
    UnknownOrder(i64),

    #[error("transaction already finished")]
    TransactionClosed,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One row of the tables ⟕ orders ⟕ lines join
///
/// Order columns are null when the table has no matching order; line columns
/// are null when the order has no lines yet.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TableOrderRow {
    pub table_id: i64,
    pub table_name: String,
    pub order_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub line_id: Option<i64>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
}

/// Shared handle to the relational store
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Open a unit of work. Dropping it without [`StoreTx::commit`] rolls back.
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>>;

    /// Every table, left-joined to its open order and that order's lines
    async fn tables_with_open_orders(&self) -> StoreResult<Vec<TableOrderRow>>;

    /// Closed orders created on `day` (UTC) joined to their tables and lines
    async fn closed_orders_on(&self, day: NaiveDate) -> StoreResult<Vec<TableOrderRow>>;

    /// Lines of the table's open order as flat rows
    async fn open_order_lines(&self, table_id: i64) -> StoreResult<Vec<OpenOrderLine>>;

    /// Delete a line; returns the number of rows removed
    async fn delete_line(&self, line_id: i64) -> StoreResult<u64>;
}

/// A store transaction
#[async_trait]
pub trait StoreTx: Send {
    /// Lock the table row so concurrent lifecycle operations on the same
    /// table run one after the other. A missing table is not an error here.
    async fn lock_table(&mut self, table_id: i64) -> StoreResult<()>;

    async fn find_open_order(&mut self, table_id: i64) -> StoreResult<Option<Order>>;

    /// Insert an open order for the table, returning its id
    async fn insert_order(&mut self, table_id: i64) -> StoreResult<i64>;

    /// Insert a line, returning its id
    async fn insert_line(&mut self, order_id: i64, item: &NewItem, quantity: i32)
    -> StoreResult<i64>;

    async fn order_lines(&mut self, order_id: i64) -> StoreResult<Vec<OrderLine>>;

    /// Flip the order to closed and store the total snapshot
    async fn close_order(&mut self, order_id: i64, total: Decimal) -> StoreResult<()>;

    async fn commit(&mut self) -> StoreResult<()>;
}
