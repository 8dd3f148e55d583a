//! Router assembly.
//!
//! One route per engine operation, CORS open for the browser editor, and a
//! request trace layer. Handlers live in [`editor`] and only translate
//! between HTTP and the service layer.

pub mod editor;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/vector/new_canvas", post(editor::new_canvas))
        .route("/vector/add_shape", post(editor::add_shape))
        .route("/vector/update_shape", post(editor::update_shape))
        .route("/vector/undo", post(editor::undo))
        .route("/vector/redo", post(editor::redo))
        .route("/vector/export", post(editor::export))
        .route("/vector/import", post(editor::import))
        .route("/vector/trace", post(editor::trace))
        .route("/vector/animate", post(editor::animate))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
