//! PostgreSQL backend
//!
//! Every lifecycle mutation runs inside a transaction that starts with
//! `SELECT ... FOR UPDATE` on the table row, so appends and closes on the same
//! table are serialized by the database.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{NewItem, OpenOrderLine, Order, OrderLine};
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};

use super::{OrderStore, StoreError, StoreResult, StoreTx, TableOrderRow};

/// sqlx-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect, then apply the embedded migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(max_connections, "PostgreSQL store ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx: Some(tx) }))
    }

    async fn tables_with_open_orders(&self) -> StoreResult<Vec<TableOrderRow>> {
        let rows: Vec<TableOrderRow> = sqlx::query_as(
            r#"
            SELECT
                m.id AS table_id, m.nombre AS table_name,
                p.id AS order_id, p.estado AS status, p.fecha AS created_at,
                d.id AS line_id, d.nombre AS name, d.categoria AS category,
                d.precio AS price, d.cantidad AS quantity
            FROM mesas m
            LEFT JOIN pedido p ON m.id = p.mesa_id AND p.estado = 'abierto'
            LEFT JOIN pedido_detalle d ON p.id = d.pedido_id
            ORDER BY m.id, d.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn closed_orders_on(&self, day: NaiveDate) -> StoreResult<Vec<TableOrderRow>> {
        let rows: Vec<TableOrderRow> = sqlx::query_as(
            r#"
            SELECT
                m.id AS table_id, m.nombre AS table_name,
                p.id AS order_id, p.estado AS status, p.fecha AS created_at,
                d.id AS line_id, d.nombre AS name, d.categoria AS category,
                d.precio AS price, d.cantidad AS quantity
            FROM mesas m
            INNER JOIN pedido p ON m.id = p.mesa_id
                AND p.estado = 'cerrado'
                AND (p.fecha AT TIME ZONE 'UTC')::date = $1
            INNER JOIN pedido_detalle d ON p.id = d.pedido_id
            ORDER BY m.id, p.id, d.id
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn open_order_lines(&self, table_id: i64) -> StoreResult<Vec<OpenOrderLine>> {
        let rows: Vec<OpenOrderLine> = sqlx::query_as(
            r#"
            SELECT p.id AS order_id, d.categoria AS category, d.nombre AS name, d.precio AS price
            FROM pedido p
            JOIN pedido_detalle d ON p.id = d.pedido_id
            WHERE p.mesa_id = $1 AND p.estado = 'abierto'
            ORDER BY d.id
            "#,
        )
        .bind(table_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_line(&self, line_id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM pedido_detalle WHERE id = $1")
            .bind(line_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Transaction handed out by [`PgStore::begin`]
///
/// `tx` is taken on commit; sqlx rolls back on drop.
struct PgTx {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgTx {
    fn conn(&mut self) -> StoreResult<&mut PgConnection> {
        match self.tx.as_mut() {
            Some(tx) => Ok(&mut **tx),
            None => Err(StoreError::TransactionClosed),
        }
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn lock_table(&mut self, table_id: i64) -> StoreResult<()> {
        let _locked: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM mesas WHERE id = $1 FOR UPDATE")
                .bind(table_id)
                .fetch_optional(self.conn()?)
                .await?;
        Ok(())
    }

    async fn find_open_order(&mut self, table_id: i64) -> StoreResult<Option<Order>> {
        let order: Option<Order> = sqlx::query_as(
            r#"
            SELECT id, mesa_id AS table_id, estado AS status, total, fecha AS created_at
            FROM pedido
            WHERE mesa_id = $1 AND estado = 'abierto'
            "#,
        )
        .bind(table_id)
        .fetch_optional(self.conn()?)
        .await?;
        Ok(order)
    }

    async fn insert_order(&mut self, table_id: i64) -> StoreResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO pedido (mesa_id, estado) VALUES ($1, 'abierto') RETURNING id",
        )
        .bind(table_id)
        .fetch_one(self.conn()?)
        .await?;
        Ok(id)
    }

    async fn insert_line(
        &mut self,
        order_id: i64,
        item: &NewItem,
        quantity: i32,
    ) -> StoreResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO pedido_detalle (pedido_id, nombre, categoria, precio, cantidad)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(order_id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price)
        .bind(quantity)
        .fetch_one(self.conn()?)
        .await?;
        Ok(id)
    }

    async fn order_lines(&mut self, order_id: i64) -> StoreResult<Vec<OrderLine>> {
        let lines: Vec<OrderLine> = sqlx::query_as(
            r#"
            SELECT id, pedido_id AS order_id, nombre AS name, categoria AS category,
                   precio AS price, cantidad AS quantity
            FROM pedido_detalle
            WHERE pedido_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(self.conn()?)
        .await?;
        Ok(lines)
    }

    async fn close_order(&mut self, order_id: i64, total: Decimal) -> StoreResult<()> {
        let result = sqlx::query("UPDATE pedido SET estado = 'cerrado', total = $1 WHERE id = $2")
            .bind(total)
            .bind(order_id)
            .execute(self.conn()?)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownOrder(order_id));
        }
        Ok(())
    }

    async fn commit(&mut self) -> StoreResult<()> {
        let tx = self.tx.take().ok_or(StoreError::TransactionClosed)?;
        tx.commit().await?;
        Ok(())
    }
}
