//! Order listing and line handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::AppResult;
use shared::response::{MessageResponse, OpenOrderLinesResponse, TablesResponse};

use crate::state::AppState;

/// GET /pedidoscerrados - orders closed today, one entry per order
pub async fn closed_today(State(state): State<AppState>) -> AppResult<Json<TablesResponse>> {
    let tables = state.orders.closed_orders_today().await?;
    Ok(Json(TablesResponse { tables }))
}

/// GET /pedidos/:mesaId - lines of the table's open order
pub async fn open_lines(
    State(state): State<AppState>,
    Path(table_id): Path<i64>,
) -> AppResult<Json<OpenOrderLinesResponse>> {
    let lines = state.orders.open_order_lines(table_id).await?;
    Ok(Json(OpenOrderLinesResponse { lines }))
}

/// DELETE /pedidoDetalle/:id - delete a line (missing ids succeed too)
pub async fn delete_line(
    State(state): State<AppState>,
    Path(line_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.orders.delete_line(line_id).await?;
    Ok(Json(MessageResponse::new(
        "Detalle del pedido eliminado con éxito",
    )))
}
