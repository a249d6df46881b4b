//! OrdersManager - table order lifecycle
//!
//! # Mutation Flow
//!
//! ```text
//! open_or_append(table, items) / close(table)
//!     ├─ 1. Validate input (no store access on failure)
//!     ├─ 2. Begin store transaction
//!     ├─ 3. Lock the table row
//!     ├─ 4. Resolve the open order (create / NoOpenOrder)
//!     ├─ 5. Insert lines / compute total and flip to closed
//!     └─ 6. Commit (drop = rollback on any earlier error)
//! ```
//!
//! Reads go straight to the store and are folded by [`super::aggregate`].

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{NewItem, OpenOrderLine, Order, OrderLine, TableView};
use tracing::{debug, info, instrument};

use super::aggregate;
use super::error::{OrderError, OrderResult, StoreContext};
use super::money::{self, DEFAULT_QUANTITY};
use crate::db::{OrderStore, StoreTx};

const CHECK_EXISTING: &str = "Error al verificar el pedido existente";
const CREATE_ORDER: &str = "Error al crear el pedido";
const ADD_LINES: &str = "Error al agregar detalles del pedido";
const FETCH_ORDER: &str = "Error al obtener el pedido";
const FETCH_LINES: &str = "Error al obtener los detalles del pedido";
const FIND_ORDER: &str = "Error al buscar el pedido";
const CLOSE_ORDER: &str = "Error al cerrar el pedido";
const FETCH_TABLES: &str = "Error al obtener las mesas";
const FETCH_CLOSED: &str = "Error al obtener los pedidos cerrados";
const DELETE_LINE: &str = "Error al eliminar el detalle del pedido";
const FETCH_OPEN_LINES: &str = "Error al obtener los pedidos";

/// Order lifecycle over a shared store handle
#[derive(Clone)]
pub struct OrdersManager {
    store: Arc<dyn OrderStore>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("store", &"<dyn OrderStore>")
            .finish()
    }
}

impl OrdersManager {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Append items to the table's open order, opening one if needed
    ///
    /// Returns the order id. Every item becomes a line with quantity 1.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn open_or_append(&self, table_id: i64, items: Vec<NewItem>) -> OrderResult<i64> {
        let items = money::validate_items(items)?;

        let mut tx = self.store.begin().await.context(CHECK_EXISTING)?;
        tx.lock_table(table_id).await.context(CHECK_EXISTING)?;

        let order_id = match tx.find_open_order(table_id).await.context(CHECK_EXISTING)? {
            Some(order) => order.id,
            None => {
                let order_id = tx.insert_order(table_id).await.context(CREATE_ORDER)?;
                info!(table_id, order_id, "Order opened");
                order_id
            }
        };

        for item in &items {
            tx.insert_line(order_id, item, DEFAULT_QUANTITY)
                .await
                .context(ADD_LINES)?;
        }
        tx.commit().await.context(ADD_LINES)?;

        debug!(table_id, order_id, lines = items.len(), "Items appended");
        Ok(order_id)
    }

    /// Header and lines of the table's open order
    pub async fn current_order(&self, table_id: i64) -> OrderResult<(Order, Vec<OrderLine>)> {
        let mut tx = self.store.begin().await.context(FETCH_ORDER)?;
        let Some(order) = tx.find_open_order(table_id).await.context(FETCH_ORDER)? else {
            debug!(table_id, "No open order");
            return Err(OrderError::NoOpenOrder(table_id));
        };
        let lines = tx.order_lines(order.id).await.context(FETCH_LINES)?;
        tx.commit().await.context(FETCH_ORDER)?;
        Ok((order, lines))
    }

    /// Close the table's open order, returning its total
    ///
    /// The total is computed from the lines read under the same lock, so no
    /// append can land between the sum and the state change.
    #[instrument(skip(self))]
    pub async fn close(&self, table_id: i64) -> OrderResult<Decimal> {
        let mut tx = self.store.begin().await.context(FIND_ORDER)?;
        tx.lock_table(table_id).await.context(FIND_ORDER)?;

        let Some(order) = tx.find_open_order(table_id).await.context(FIND_ORDER)? else {
            debug!(table_id, "No open order to close");
            return Err(OrderError::NoOpenOrder(table_id));
        };

        let lines = tx.order_lines(order.id).await.context(FETCH_LINES)?;
        let total = money::order_total(lines.iter().map(|l| (l.price, l.quantity)));

        tx.close_order(order.id, total).await.context(CLOSE_ORDER)?;
        tx.commit().await.context(CLOSE_ORDER)?;

        info!(table_id, order_id = order.id, %total, "Order closed");
        Ok(total)
    }

    /// Delete one line; a missing id is not an error
    pub async fn delete_line(&self, line_id: i64) -> OrderResult<()> {
        let removed = self.store.delete_line(line_id).await.context(DELETE_LINE)?;
        debug!(line_id, removed, "Order line deleted");
        Ok(())
    }

    /// Every table with its open order and live total
    pub async fn tables_with_open_orders(&self) -> OrderResult<Vec<TableView>> {
        let rows = self
            .store
            .tables_with_open_orders()
            .await
            .context(FETCH_TABLES)?;
        Ok(aggregate::open_table_views(rows))
    }

    /// Orders closed today (UTC)
    pub async fn closed_orders_today(&self) -> OrderResult<Vec<TableView>> {
        self.closed_orders_on(shared::util::today()).await
    }

    /// Orders created on `day` that are now closed
    pub async fn closed_orders_on(&self, day: NaiveDate) -> OrderResult<Vec<TableView>> {
        let rows = self
            .store
            .closed_orders_on(day)
            .await
            .context(FETCH_CLOSED)?;
        Ok(aggregate::closed_table_views(rows))
    }

    /// Flat lines of the table's open order; empty when there is none
    pub async fn open_order_lines(&self, table_id: i64) -> OrderResult<Vec<OpenOrderLine>> {
        self.store
            .open_order_lines(table_id)
            .await
            .context(FETCH_OPEN_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, StoreError};
    use chrono::{Duration, Utc};
    use shared::models::OrderStatus;

    fn item(name: &str, category: &str, price: Decimal) -> NewItem {
        NewItem {
            name: name.to_string(),
            category: category.to_string(),
            price,
        }
    }

    fn setup() -> (MemoryStore, OrdersManager) {
        let store = MemoryStore::with_tables(["Mesa 1", "Mesa 2", "Mesa 3"]);
        let manager = OrdersManager::new(Arc::new(store.clone()));
        (store, manager)
    }

    #[tokio::test]
    async fn test_first_append_opens_order_and_second_reuses_it() {
        let (store, manager) = setup();

        let first = manager
            .open_or_append(1, vec![item("Agua", "Bebidas", Decimal::new(150, 2))])
            .await
            .unwrap();
        let second = manager
            .open_or_append(1, vec![item("Pan", "Extras", Decimal::ONE)])
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.open_order_count(1).await, 1);
        let (_, lines) = manager.current_order(1).await.unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[tokio::test]
    async fn test_current_order_round_trips_items() {
        let (_, manager) = setup();
        let sent = vec![
            item("Tortilla", "Tapas", Decimal::new(550, 2)),
            item("Vino tinto", "Bebidas", Decimal::new(3, 0)),
            item(" Caña ", "Bebidas ", Decimal::new(220, 2)),
        ];
        let order_id = manager.open_or_append(2, sent.clone()).await.unwrap();

        let (order, lines) = manager.current_order(2).await.unwrap();
        assert_eq!(order.id, order_id);
        assert_eq!(order.status, OrderStatus::Open);
        assert!(order.total.is_none());
        assert_eq!(lines.len(), sent.len());
        for (line, sent) in lines.iter().zip(&sent) {
            assert_eq!(line.name, sent.name);
            assert_eq!(line.category, sent.category);
            assert_eq!(line.price, sent.price);
            assert_eq!(line.quantity, 1);
        }
    }

    #[tokio::test]
    async fn test_close_multiplies_quantity_and_ends_order() {
        let (store, manager) = setup();
        let order_id = manager
            .open_or_append(1, vec![item("Menú", "Comida", Decimal::new(10, 0))])
            .await
            .unwrap();

        // quantity > 1 only reaches the store through a direct insert
        let mut tx = store.begin().await.unwrap();
        tx.insert_line(order_id, &item("Café", "Bebidas", Decimal::new(5, 0)), 2)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        drop(tx);

        let total = manager.close(1).await.unwrap();
        assert_eq!(total, Decimal::new(20, 0));

        let stored = store.order(order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Closed);
        assert_eq!(stored.total, Some(Decimal::new(20, 0)));

        assert!(matches!(
            manager.current_order(1).await,
            Err(OrderError::NoOpenOrder(1))
        ));
        assert!(matches!(
            manager.close(1).await,
            Err(OrderError::NoOpenOrder(1))
        ));
    }

    #[tokio::test]
    async fn test_close_empty_order_totals_zero() {
        let (_, manager) = setup();
        manager.open_or_append(3, Vec::new()).await.unwrap();
        assert_eq!(manager.close(3).await.unwrap(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_invalid_items_write_nothing() {
        let (store, manager) = setup();
        let result = manager
            .open_or_append(
                1,
                vec![
                    item("Agua", "Bebidas", Decimal::ONE),
                    item("  ", "Bebidas", Decimal::ONE),
                ],
            )
            .await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
        assert_eq!(store.open_order_count(1).await, 0);
    }

    #[tokio::test]
    async fn test_append_to_unknown_table_is_store_error() {
        let (_, manager) = setup();
        let result = manager
            .open_or_append(42, vec![item("Agua", "Bebidas", Decimal::ONE)])
            .await;
        match result {
            Err(OrderError::Store { context, source }) => {
                assert_eq!(context, CREATE_ORDER);
                assert!(matches!(source, StoreError::UnknownTable(42)));
            }
            other => panic!("expected store error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_line_is_idempotent() {
        let (_, manager) = setup();
        manager
            .open_or_append(1, vec![item("Agua", "Bebidas", Decimal::ONE)])
            .await
            .unwrap();
        let (_, lines) = manager.current_order(1).await.unwrap();

        manager.delete_line(lines[0].id).await.unwrap();
        manager.delete_line(lines[0].id).await.unwrap();
        manager.delete_line(9_999).await.unwrap();

        let (_, lines) = manager.current_order(1).await.unwrap();
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn test_open_view_lists_every_table() {
        let (_, manager) = setup();
        manager.open_or_append(2, Vec::new()).await.unwrap();
        manager
            .open_or_append(3, vec![item("Caña", "Bebidas", Decimal::new(250, 2))])
            .await
            .unwrap();

        let views = manager.tables_with_open_orders().await.unwrap();
        assert_eq!(views.len(), 3);
        assert!(views[0].order.is_none());

        let empty = views[1].order.as_ref().unwrap();
        assert!(empty.lines.is_empty());
        assert_eq!(empty.total, Decimal::ZERO);

        assert_eq!(
            views[2].order.as_ref().unwrap().total,
            Decimal::new(250, 2)
        );
    }

    #[tokio::test]
    async fn test_closed_today_excludes_other_days_and_open_orders() {
        let (store, manager) = setup();
        let yesterday = manager
            .open_or_append(1, vec![item("Menú", "Comida", Decimal::new(12, 0))])
            .await
            .unwrap();
        manager.close(1).await.unwrap();
        store
            .set_created_at(yesterday, Utc::now() - Duration::days(1))
            .await;

        manager
            .open_or_append(2, vec![item("Café", "Bebidas", Decimal::new(150, 2))])
            .await
            .unwrap();
        manager.close(2).await.unwrap();

        manager
            .open_or_append(3, vec![item("Agua", "Bebidas", Decimal::ONE)])
            .await
            .unwrap();

        let views = manager.closed_orders_today().await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, 2);
        let order = views[0].order.as_ref().unwrap();
        assert_eq!(order.status, OrderStatus::Closed);
        assert!(order.created_at.is_some());
        assert_eq!(order.total, Decimal::new(150, 2));
    }

    #[tokio::test]
    async fn test_open_order_lines_only_for_open_order() {
        let (_, manager) = setup();
        assert!(manager.open_order_lines(1).await.unwrap().is_empty());

        let order_id = manager
            .open_or_append(1, vec![item("Agua", "Bebidas", Decimal::ONE)])
            .await
            .unwrap();
        let lines = manager.open_order_lines(1).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].order_id, order_id);

        manager.close(1).await.unwrap();
        assert!(manager.open_order_lines(1).await.unwrap().is_empty());
    }
}
