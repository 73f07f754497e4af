//! `/metrics` handler.
//!
//! Serves whatever snapshot is on disk, never waiting on the collector.
//! No snapshot yet is not an error: a placeholder comment is returned with 200.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
pub const NO_DATA: &str = "# No metrics available";

pub async fn metrics(State(state): State<AppState>) -> Response {
    let timeout = state.cfg().server.read_timeout();

    let (status, body) = match tokio::time::timeout(timeout, state.store().load()).await {
        Ok(Ok(Some(text))) => (StatusCode::OK, text),
        Ok(Ok(None)) => (StatusCode::OK, NO_DATA.to_string()),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "snapshot read failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "snapshot read failed".to_string())
        }
        Err(_) => {
            tracing::error!(timeout_ms = timeout.as_millis() as u64, "snapshot read timed out");
            (StatusCode::INTERNAL_SERVER_ERROR, "snapshot read timed out".to_string())
        }
    };

    (status, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}
