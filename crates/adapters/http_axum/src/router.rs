//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use bedsync_app::ports::{DeviceStore, RemoteSession};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API routes under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level.
pub fn build<R, S>(state: AppState<R, S>) -> Router
where
    R: RemoteSession + 'static,
    S: DeviceStore + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
