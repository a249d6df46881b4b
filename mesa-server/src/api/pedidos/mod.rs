//! Order listing and line routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /pedidoscerrados | GET | orders closed today |
//! | /pedidos/{mesa_id} | GET | flat lines of a table's open order |
//! | /pedidoDetalle/{id} | DELETE | delete one line |

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pedidoscerrados", get(handler::closed_today))
        .route("/pedidos/{mesa_id}", get(handler::open_lines))
        .route("/pedidoDetalle/{id}", delete(handler::delete_line))
}
