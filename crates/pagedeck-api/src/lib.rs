pub mod dashboard;
pub mod debug;
pub mod error;
pub mod state;
pub mod sync;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

pub use state::{AppState, AppStateInner};

/// Application routes. Debug routes echo raw API responses and are only
/// mounted when `debug_routes` is set.
pub fn router(state: AppState, debug_routes: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/sync-data", get(sync::sync_data).post(sync::sync_data))
        .route("/health", get(health));

    if debug_routes {
        app = app
            .route("/debug/api", get(debug::debug_api))
            .route("/debug/pages/{page_id}", get(debug::debug_page));
    }

    app.with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
