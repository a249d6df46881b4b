//! Table order handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::AppResult;
use shared::request::AddItemsRequest;
use shared::response::{
    CurrentOrderResponse, OrderClosedResponse, OrderUpdatedResponse, TablesResponse,
};

use crate::state::AppState;

/// GET /mesas - every table, with its open order and live total
pub async fn list(State(state): State<AppState>) -> AppResult<Json<TablesResponse>> {
    let tables = state.orders.tables_with_open_orders().await?;
    Ok(Json(TablesResponse { tables }))
}

/// POST /mesas/:id/pedido - append items to the open order
pub async fn add_items(
    State(state): State<AppState>,
    Path(table_id): Path<i64>,
    Json(payload): Json<AddItemsRequest>,
) -> AppResult<(StatusCode, Json<OrderUpdatedResponse>)> {
    let order_id = state.orders.open_or_append(table_id, payload.items).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderUpdatedResponse {
            mensaje: "Pedido actualizado con éxito".to_string(),
            order_id,
        }),
    ))
}

/// GET /mesas/:id/pedido - open order header and lines
pub async fn current_order(
    State(state): State<AppState>,
    Path(table_id): Path<i64>,
) -> AppResult<Json<CurrentOrderResponse>> {
    let (order, lines) = state.orders.current_order(table_id).await?;
    Ok(Json(CurrentOrderResponse { order, lines }))
}

/// PUT /mesas/:id/cerrar - close the open order
pub async fn close(
    State(state): State<AppState>,
    Path(table_id): Path<i64>,
) -> AppResult<Json<OrderClosedResponse>> {
    let total = state.orders.close(table_id).await?;
    Ok(Json(OrderClosedResponse {
        mensaje: "Pedido cerrado".to_string(),
        total,
    }))
}

/// POST /mesas/:id/cerrarPedido - close the open order (front-end checkout)
pub async fn close_order(
    State(state): State<AppState>,
    Path(table_id): Path<i64>,
) -> AppResult<Json<OrderClosedResponse>> {
    let total = state.orders.close(table_id).await?;
    Ok(Json(OrderClosedResponse {
        mensaje: "Pedido cerrado correctamente".to_string(),
        total,
    }))
}
