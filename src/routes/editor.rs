//! Editor routes — HTTP translation for the vector engine operations.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::services::canvas::{self, Unit};
use crate::services::shape::{self, UpdateMap};
use crate::services::transfer;
use crate::services::EngineError;
use crate::shapes::PropertyBag;
use crate::state::AppState;
use crate::svg;
use crate::trace as tracer;

/// Header carrying the client's session id.
const SESSION_HEADER: &str = "x-session-id";

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// Session id from the `x-session-id` header; a fresh id is minted when the
/// header is absent or malformed. Success payloads echo it back as
/// `session` so clients can persist it.
#[derive(Debug, Clone, Copy)]
pub struct SessionId(pub Uuid);

impl<S> axum::extract::FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .unwrap_or_else(Uuid::new_v4);
        Ok(Self(id))
    }
}

// =============================================================================
// ERROR TRANSLATION
// =============================================================================

/// Engine failure as an HTTP response:
/// `{"success": false, "error": …, "code": E_*}` with a matching status.
#[derive(Debug)]
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.0.to_string(),
            "code": self.0.error_code(),
        });
        (self.0.status(), Json(body)).into_response()
    }
}

// =============================================================================
// CANVAS
// =============================================================================

#[derive(Deserialize)]
pub struct NewCanvasBody {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub units: Option<String>,
}

/// `POST /vector/new_canvas` — create a fresh canvas for the session.
pub async fn new_canvas(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(body): Json<NewCanvasBody>,
) -> Result<Json<Value>, ApiError> {
    let unit = Unit::from_str(body.units.as_deref().unwrap_or("px"));
    let view = canvas::create_canvas(
        &state,
        session_id,
        body.width.unwrap_or(800.0),
        body.height.unwrap_or(600.0),
        unit,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "svg": view.svg,
        "size": { "width": view.width, "height": view.height },
        "session": session_id,
    })))
}

/// `POST /vector/undo` — step the session back one snapshot.
pub async fn undo(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Result<Json<Value>, ApiError> {
    let view = canvas::undo(&state, session_id).await?;
    Ok(history_payload(&view, session_id))
}

/// `POST /vector/redo` — step the session forward one snapshot.
pub async fn redo(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
) -> Result<Json<Value>, ApiError> {
    let view = canvas::redo(&state, session_id).await?;
    Ok(history_payload(&view, session_id))
}

fn history_payload(view: &crate::history::HistoryView, session_id: Uuid) -> Json<Value> {
    Json(json!({
        "success": true,
        "svg": view.snapshot,
        "canUndo": view.can_undo,
        "canRedo": view.can_redo,
        "session": session_id,
    }))
}

// =============================================================================
// SHAPES
// =============================================================================

#[derive(Deserialize)]
pub struct AddShapeBody {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: PropertyBag,
}

/// `POST /vector/add_shape` — add a shape from a property bag.
pub async fn add_shape(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(body): Json<AddShapeBody>,
) -> Result<Json<Value>, ApiError> {
    let svg = shape::add_shape(&state, session_id, &body.kind, &body.data).await?;
    Ok(Json(json!({ "success": true, "svg": svg, "session": session_id })))
}

#[derive(Deserialize)]
pub struct UpdateShapeBody {
    pub id: String,
    #[serde(default)]
    pub updates: UpdateMap,
}

/// `POST /vector/update_shape` — apply attribute updates to a shape.
pub async fn update_shape(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(body): Json<UpdateShapeBody>,
) -> Result<Json<Value>, ApiError> {
    let svg = shape::update_shape(&state, session_id, &body.id, &body.updates).await?;
    Ok(Json(json!({ "success": true, "svg": svg, "session": session_id })))
}

#[derive(Deserialize)]
pub struct AnimateBody {
    pub element_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: Option<f64>,
}

/// `POST /vector/animate` — attach a transform animation to a shape.
pub async fn animate(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Json(body): Json<AnimateBody>,
) -> Result<Json<Value>, ApiError> {
    let svg = shape::animate(
        &state,
        session_id,
        &body.element_id,
        &body.kind,
        body.duration.unwrap_or(2.0),
    )
    .await?;
    Ok(Json(json!({ "success": true, "svg": svg, "session": session_id })))
}

// =============================================================================
// TRANSFER
// =============================================================================

#[derive(Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// `POST /vector/export?format=svg|png|vdraw` — download the document.
pub async fn export(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = query.format.as_deref().unwrap_or("svg");
    let file = transfer::export(&state, session_id, format).await?;

    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, file.media_type.to_owned()),
            (CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct ImportQuery {
    pub filename: String,
}

/// `POST /vector/import?filename=…` — import raw SVG bytes.
pub async fn import(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let content = std::str::from_utf8(&body)
        .map_err(|e| EngineError::MalformedDocument(format!("not valid UTF-8: {e}")))?;
    let outcome = transfer::import_svg(&state, session_id, &query.filename, content).await?;

    Ok(Json(json!({
        "success": true,
        "svg": outcome.svg,
        "size": { "width": outcome.width, "height": outcome.height },
        "warnings": if outcome.warnings.is_empty() { Value::Null } else { json!(outcome.warnings) },
        "session": session_id,
    })))
}

#[derive(Deserialize)]
pub struct TraceQuery {
    pub threshold: Option<f64>,
}

/// `POST /vector/trace?threshold=…` — trace raster bytes into a vector
/// document. Standalone: session state is neither read nor written.
pub async fn trace(
    SessionId(session_id): SessionId,
    Query(query): Query<TraceQuery>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let threshold = query.threshold.unwrap_or(0.5);
    let doc = tracer::trace_bytes(&body, threshold).map_err(EngineError::from)?;
    let svg = svg::write_document(&doc);
    Ok(Json(json!({ "success": true, "svg": svg, "session": session_id })))
}
