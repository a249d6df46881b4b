//! Table order routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /mesas | GET | every table with its open order |
//! | /mesas/{id}/pedido | POST | append items, opening an order if needed |
//! | /mesas/{id}/pedido | GET | current open order with its lines |
//! | /mesas/{id}/cerrar | PUT | close the open order |
//! | /mesas/{id}/cerrarPedido | POST | close the open order |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mesas", get(handler::list))
        .route(
            "/mesas/{id}/pedido",
            post(handler::add_items).get(handler::current_order),
        )
        .route("/mesas/{id}/cerrar", put(handler::close))
        .route("/mesas/{id}/cerrarPedido", post(handler::close_order))
}
