//! Response bodies returned by the ordering API
//!
//! Key names are part of the front-end contract and stay in Spanish.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{OpenOrderLine, Order, OrderLine, TableView};

/// `POST /mesas/{id}/pedido` → 201
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdatedResponse {
    pub mensaje: String,
    #[serde(rename = "pedidoId")]
    pub order_id: i64,
}

/// `GET /mesas/{id}/pedido` → 200
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentOrderResponse {
    #[serde(rename = "pedido")]
    pub order: Order,
    #[serde(rename = "detalles")]
    pub lines: Vec<OrderLine>,
}

/// `PUT /mesas/{id}/cerrar` and `POST /mesas/{id}/cerrarPedido` → 200
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderClosedResponse {
    pub mensaje: String,
    pub total: Decimal,
}

/// `GET /mesas` and `GET /pedidoscerrados` → 200
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesResponse {
    #[serde(rename = "mesas")]
    pub tables: Vec<TableView>,
}

/// `GET /pedidos/{mesaId}` → 200
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrderLinesResponse {
    #[serde(rename = "pedidos")]
    pub lines: Vec<OpenOrderLine>,
}

/// Plain confirmation body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub mensaje: String,
}

impl MessageResponse {
    pub fn new(mensaje: impl Into<String>) -> Self {
        Self {
            mensaje: mensaje.into(),
        }
    }
}
