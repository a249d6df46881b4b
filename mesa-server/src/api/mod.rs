//! HTTP API
//!
//! Route modules register their own paths; [`create_router`] merges them,
//! serves the front-end directory as the fallback and adds the middleware
//! stack.

pub mod health;
pub mod mesas;
pub mod middleware;
pub mod pedidos;

use axum::Router;
use axum::middleware as axum_middleware;
use http::HeaderName;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use middleware::{REQUEST_ID_HEADER, XRequestId};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(mesas::router())
        .merge(pedidos::router())
}

/// Build the fully configured application
pub fn create_router(state: AppState) -> Router {
    // "/" answers index.html from the static directory
    let static_files = ServeDir::new(&state.static_dir);
    let cors_enabled = state.cors_enabled;

    let app = build_router()
        .fallback_service(static_files)
        .with_state(state)
        // Request logging - sees the request id set below
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )));

    if cors_enabled {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
