//! Axum router wiring.
//!
//! Exposes a single `GET /metrics` route serving the latest snapshot.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
