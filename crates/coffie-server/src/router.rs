//! Axum router construction for the session API.
//!
//! Assembles all routes into a single [`Router`] with request tracing.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the session server.
///
/// The router includes:
/// - `GET /` -- roster page
/// - `POST /add/` -- add or reactivate an actor
/// - `POST /remove/` -- deactivate an actor
/// - `GET /choose/` -- run the lottery
/// - `GET /api/actors` -- list actors
/// - `GET /api/events` -- query selection events
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Roster page
        .route("/", get(handlers::index))
        // Session operations
        .route("/add/", post(handlers::add))
        .route("/remove/", post(handlers::remove))
        .route("/choose/", get(handlers::choose))
        // JSON API
        .route("/api/actors", get(handlers::list_actors))
        .route("/api/events", get(handlers::list_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
