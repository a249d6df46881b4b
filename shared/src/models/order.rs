//! Order Model
//!
//! Wire names follow the front-end contract (`pedido`, `detalles`, `estado`, ...);
//! Rust field names stay in English.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status
///
/// `Open --close--> Closed`. There is no way back from `Closed`, and a table
/// without an `Open` row simply has no current order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "estado_pedido"))]
pub enum OrderStatus {
    #[serde(rename = "abierto")]
    #[cfg_attr(feature = "db", sqlx(rename = "abierto"))]
    Open,
    #[serde(rename = "cerrado")]
    #[cfg_attr(feature = "db", sqlx(rename = "cerrado"))]
    Closed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "abierto",
            Self::Closed => "cerrado",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order header (pedido)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    #[serde(rename = "mesa_id")]
    pub table_id: i64,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    /// Snapshot taken at close time; `None` while the order is open
    pub total: Option<Decimal>,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}

/// Order line (pedidoDetalle)
///
/// Lines are inserted and deleted, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    #[serde(rename = "pedido_id")]
    pub order_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "precio")]
    pub price: Decimal,
    #[serde(rename = "cantidad")]
    pub quantity: i32,
}

/// Item as sent by the front-end when adding to a table's order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "precio")]
    pub price: Decimal,
}

/// Line as shown inside the nested table views (no ids)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSummary {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "precio")]
    pub price: Decimal,
    #[serde(rename = "cantidad")]
    pub quantity: i32,
}

/// Order as shown inside the nested table views
///
/// `total` is always recomputed from `lines`, never read from the stored
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i64,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "detalles")]
    pub lines: Vec<LineSummary>,
    pub total: Decimal,
}

/// A table with its (open or closed-today) order, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "pedido")]
    pub order: Option<OrderSummary>,
}

/// Flat row of a table's open order, one per line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OpenOrderLine {
    #[serde(rename = "pedidoId")]
    pub order_id: i64,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: Decimal,
}
