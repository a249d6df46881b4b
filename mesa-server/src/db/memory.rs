//! In-memory store
//!
//! Keeps the three relations in ordered maps behind one async mutex. A
//! transaction owns the mutex for its whole lifetime and mutates a staged copy
//! that replaces the live data on commit; dropping it discards the copy.
//! Identity columns behave like BIGSERIAL (monotonic, never reused).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::models::{DiningTable, NewItem, OpenOrderLine, Order, OrderLine, OrderStatus};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{OrderStore, StoreError, StoreResult, StoreTx, TableOrderRow};

#[derive(Debug, Clone, Default)]
struct Relations {
    tables: BTreeMap<i64, DiningTable>,
    orders: BTreeMap<i64, Order>,
    lines: BTreeMap<i64, OrderLine>,
    last_table_id: i64,
    last_order_id: i64,
    last_line_id: i64,
}

impl Relations {
    fn insert_table(&mut self, name: String) -> i64 {
        self.last_table_id += 1;
        let id = self.last_table_id;
        self.tables.insert(id, DiningTable { id, name });
        id
    }

    fn open_order_of(&self, table_id: i64) -> Option<&Order> {
        self.orders
            .values()
            .find(|o| o.table_id == table_id && o.status == OrderStatus::Open)
    }

    fn lines_of(&self, order_id: i64) -> impl Iterator<Item = &OrderLine> {
        self.lines.values().filter(move |l| l.order_id == order_id)
    }
}

fn joined_row(
    table: &DiningTable,
    order: Option<&Order>,
    line: Option<&OrderLine>,
) -> TableOrderRow {
    TableOrderRow {
        table_id: table.id,
        table_name: table.name.clone(),
        order_id: order.map(|o| o.id),
        status: order.map(|o| o.status),
        created_at: order.map(|o| o.created_at),
        line_id: line.map(|l| l.id),
        name: line.map(|l| l.name.clone()),
        category: line.map(|l| l.category.clone()),
        price: line.map(|l| l.price),
        quantity: line.map(|l| l.quantity),
    }
}

/// In-process store
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<Relations>>,
}

impl MemoryStore {
    /// Store pre-populated with the given tables (ids 1..=n)
    pub fn with_tables<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut relations = Relations::default();
        for name in names {
            relations.insert_table(name.into());
        }
        Self {
            state: Arc::new(Mutex::new(relations)),
        }
    }

    /// Number of open orders currently recorded for a table
    pub async fn open_order_count(&self, table_id: i64) -> usize {
        let state = self.state.lock().await;
        state
            .orders
            .values()
            .filter(|o| o.table_id == table_id && o.status == OrderStatus::Open)
            .count()
    }

    /// Stored order row, whatever its state
    pub async fn order(&self, order_id: i64) -> Option<Order> {
        self.state.lock().await.orders.get(&order_id).cloned()
    }

    #[cfg(test)]
    pub(crate) async fn set_created_at(&self, order_id: i64, at: chrono::DateTime<Utc>) {
        if let Some(order) = self.state.lock().await.orders.get_mut(&order_id) {
            order.created_at = at;
        }
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx {
            guard: Some(guard),
            staged,
        }))
    }

    async fn tables_with_open_orders(&self) -> StoreResult<Vec<TableOrderRow>> {
        let state = self.state.lock().await;
        let mut rows = Vec::new();
        for table in state.tables.values() {
            let Some(order) = state.open_order_of(table.id) else {
                rows.push(joined_row(table, None, None));
                continue;
            };
            let before = rows.len();
            for line in state.lines_of(order.id) {
                rows.push(joined_row(table, Some(order), Some(line)));
            }
            if rows.len() == before {
                rows.push(joined_row(table, Some(order), None));
            }
        }
        Ok(rows)
    }

    async fn closed_orders_on(&self, day: NaiveDate) -> StoreResult<Vec<TableOrderRow>> {
        let state = self.state.lock().await;
        let mut rows = Vec::new();
        for table in state.tables.values() {
            let closed = state.orders.values().filter(|o| {
                o.table_id == table.id
                    && o.status == OrderStatus::Closed
                    && o.created_at.date_naive() == day
            });
            for order in closed {
                for line in state.lines_of(order.id) {
                    rows.push(joined_row(table, Some(order), Some(line)));
                }
            }
        }
        Ok(rows)
    }

    async fn open_order_lines(&self, table_id: i64) -> StoreResult<Vec<OpenOrderLine>> {
        let state = self.state.lock().await;
        let Some(order) = state.open_order_of(table_id) else {
            return Ok(Vec::new());
        };
        Ok(state
            .lines_of(order.id)
            .map(|l| OpenOrderLine {
                order_id: order.id,
                category: l.category.clone(),
                name: l.name.clone(),
                price: l.price,
            })
            .collect())
    }

    async fn delete_line(&self, line_id: i64) -> StoreResult<u64> {
        let mut state = self.state.lock().await;
        Ok(state.lines.remove(&line_id).map_or(0, |_| 1))
    }
}

struct MemoryTx {
    guard: Option<OwnedMutexGuard<Relations>>,
    staged: Relations,
}

impl MemoryTx {
    fn staged(&mut self) -> StoreResult<&mut Relations> {
        if self.guard.is_none() {
            return Err(StoreError::TransactionClosed);
        }
        Ok(&mut self.staged)
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_table(&mut self, _table_id: i64) -> StoreResult<()> {
        // The whole store is already held by this transaction.
        self.staged().map(|_| ())
    }

    async fn find_open_order(&mut self, table_id: i64) -> StoreResult<Option<Order>> {
        Ok(self.staged()?.open_order_of(table_id).cloned())
    }

    async fn insert_order(&mut self, table_id: i64) -> StoreResult<i64> {
        let state = self.staged()?;
        if !state.tables.contains_key(&table_id) {
            return Err(StoreError::UnknownTable(table_id));
        }
        state.last_order_id += 1;
        let id = state.last_order_id;
        state.orders.insert(
            id,
            Order {
                id,
                table_id,
                status: OrderStatus::Open,
                total: None,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn insert_line(
        &mut self,
        order_id: i64,
        item: &NewItem,
        quantity: i32,
    ) -> StoreResult<i64> {
        let state = self.staged()?;
        if !state.orders.contains_key(&order_id) {
            return Err(StoreError::UnknownOrder(order_id));
        }
        state.last_line_id += 1;
        let id = state.last_line_id;
        state.lines.insert(
            id,
            OrderLine {
                id,
                order_id,
                name: item.name.clone(),
                category: item.category.clone(),
                price: item.price,
                quantity,
            },
        );
        Ok(id)
    }

    async fn order_lines(&mut self, order_id: i64) -> StoreResult<Vec<OrderLine>> {
        Ok(self.staged()?.lines_of(order_id).cloned().collect())
    }

    async fn close_order(&mut self, order_id: i64, total: Decimal) -> StoreResult<()> {
        let order = self
            .staged()?
            .orders
            .get_mut(&order_id)
            .ok_or(StoreError::UnknownOrder(order_id))?;
        order.status = OrderStatus::Closed;
        order.total = Some(total);
        Ok(())
    }

    async fn commit(&mut self) -> StoreResult<()> {
        let mut guard = self.guard.take().ok_or(StoreError::TransactionClosed)?;
        *guard = std::mem::take(&mut self.staged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: Decimal) -> NewItem {
        NewItem {
            name: name.to_string(),
            category: "Tapas".to_string(),
            price,
        }
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_rolls_back() {
        let store = MemoryStore::with_tables(["Mesa 1"]);
        {
            let mut tx = store.begin().await.unwrap();
            let order_id = tx.insert_order(1).await.unwrap();
            tx.insert_line(order_id, &item("Bravas", Decimal::new(450, 2)), 1)
                .await
                .unwrap();
        }
        assert_eq!(store.open_order_count(1).await, 0);
        assert!(store.tables_with_open_orders().await.unwrap()[0].order_id.is_none());
    }

    #[tokio::test]
    async fn test_committed_transaction_is_visible() {
        let store = MemoryStore::with_tables(["Mesa 1"]);
        let mut tx = store.begin().await.unwrap();
        let order_id = tx.insert_order(1).await.unwrap();
        tx.commit().await.unwrap();
        drop(tx);

        assert_eq!(store.open_order_count(1).await, 1);
        assert_eq!(store.order(order_id).await.unwrap().status, OrderStatus::Open);
    }

    #[tokio::test]
    async fn test_operations_after_commit_fail() {
        let store = MemoryStore::with_tables(["Mesa 1"]);
        let mut tx = store.begin().await.unwrap();
        tx.commit().await.unwrap();
        assert!(matches!(
            tx.find_open_order(1).await,
            Err(StoreError::TransactionClosed)
        ));
        assert!(matches!(tx.commit().await, Err(StoreError::TransactionClosed)));
    }

    #[tokio::test]
    async fn test_insert_order_for_unknown_table_fails() {
        let store = MemoryStore::with_tables(["Mesa 1"]);
        let mut tx = store.begin().await.unwrap();
        assert!(matches!(
            tx.insert_order(99).await,
            Err(StoreError::UnknownTable(99))
        ));
    }

    #[tokio::test]
    async fn test_left_join_shape() {
        let store = MemoryStore::with_tables(["Mesa 1", "Mesa 2", "Mesa 3"]);
        let mut tx = store.begin().await.unwrap();
        let with_lines = tx.insert_order(1).await.unwrap();
        tx.insert_line(with_lines, &item("Bravas", Decimal::new(450, 2)), 1)
            .await
            .unwrap();
        tx.insert_line(with_lines, &item("Croquetas", Decimal::new(600, 2)), 1)
            .await
            .unwrap();
        tx.insert_order(2).await.unwrap();
        tx.commit().await.unwrap();
        drop(tx);

        let rows = store.tables_with_open_orders().await.unwrap();
        // two line rows for mesa 1, one order-only row for mesa 2, one bare row for mesa 3
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].table_id, 1);
        assert_eq!(rows[1].name.as_deref(), Some("Croquetas"));
        assert_eq!(rows[2].table_id, 2);
        assert!(rows[2].order_id.is_some());
        assert!(rows[2].line_id.is_none());
        assert_eq!(rows[3].table_id, 3);
        assert!(rows[3].order_id.is_none());
    }

    #[tokio::test]
    async fn test_delete_line_reports_rows_affected() {
        let store = MemoryStore::with_tables(["Mesa 1"]);
        let mut tx = store.begin().await.unwrap();
        let order_id = tx.insert_order(1).await.unwrap();
        let line_id = tx
            .insert_line(order_id, &item("Bravas", Decimal::new(450, 2)), 1)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        drop(tx);

        assert_eq!(store.delete_line(line_id).await.unwrap(), 1);
        assert_eq!(store.delete_line(line_id).await.unwrap(), 0);
    }
}
