use axum::body::to_bytes;
use axum::extract::FromRequestParts;
use axum::http::Request;
use serde_json::json;

use super::*;
use crate::state::test_helpers;

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn fresh_canvas(state: &AppState) -> Uuid {
    let session_id = Uuid::new_v4();
    new_canvas(
        State(state.clone()),
        SessionId(session_id),
        Json(NewCanvasBody { width: Some(400.0), height: Some(300.0), units: None }),
    )
    .await
    .unwrap();
    session_id
}

// ── session extractor ───────────────────────────────────────────

#[tokio::test]
async fn session_header_is_honored() {
    let want = Uuid::new_v4();
    let (mut parts, ()) = Request::builder()
        .header("x-session-id", want.to_string())
        .body(())
        .unwrap()
        .into_parts();
    let SessionId(got) = SessionId::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(got, want);
}

#[tokio::test]
async fn missing_or_malformed_header_mints_a_session() {
    let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();
    let SessionId(minted) = SessionId::from_request_parts(&mut parts, &()).await.unwrap();

    let (mut parts, ()) = Request::builder()
        .header("x-session-id", "not-a-uuid")
        .body(())
        .unwrap()
        .into_parts();
    let SessionId(other) = SessionId::from_request_parts(&mut parts, &()).await.unwrap();
    assert_ne!(minted, other);
}

// ── handlers ────────────────────────────────────────────────────

#[tokio::test]
async fn new_canvas_defaults_and_echoes_session() {
    let state = test_helpers::test_app_state();
    let session_id = Uuid::new_v4();
    let Json(payload) = new_canvas(
        State(state),
        SessionId(session_id),
        Json(NewCanvasBody { width: None, height: None, units: None }),
    )
    .await
    .unwrap();

    assert_eq!(payload["success"], true);
    assert_eq!(payload["size"]["width"], 800.0);
    assert_eq!(payload["size"]["height"], 600.0);
    assert_eq!(payload["session"], session_id.to_string());
    assert!(payload["svg"].as_str().unwrap().starts_with("<svg"));
}

#[tokio::test]
async fn add_then_undo_round_trip() {
    let state = test_helpers::test_app_state();
    let session_id = fresh_canvas(&state).await;

    let Json(added) = add_shape(
        State(state.clone()),
        SessionId(session_id),
        Json(AddShapeBody { kind: "circle".to_owned(), data: PropertyBag::new() }),
    )
    .await
    .unwrap();
    assert!(added["svg"].as_str().unwrap().contains("<circle"));

    let Json(undone) = undo(State(state.clone()), SessionId(session_id)).await.unwrap();
    assert_eq!(undone["canUndo"], false);
    assert_eq!(undone["canRedo"], true);
    assert!(!undone["svg"].as_str().unwrap().contains("<circle"));

    let Json(redone) = redo(State(state), SessionId(session_id)).await.unwrap();
    assert_eq!(redone["svg"], added["svg"]);
}

#[tokio::test]
async fn update_shape_applies_the_patch() {
    let state = test_helpers::test_app_state();
    let session_id = fresh_canvas(&state).await;
    add_shape(
        State(state.clone()),
        SessionId(session_id),
        Json(AddShapeBody { kind: "circle".to_owned(), data: PropertyBag::new() }),
    )
    .await
    .unwrap();
    let id = test_helpers::session_doc(&state, session_id).await.shapes[0].id.clone();

    let updates = match json!({ "fill": "#123456" }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    let Json(payload) = update_shape(
        State(state),
        SessionId(session_id),
        Json(UpdateShapeBody { id, updates }),
    )
    .await
    .unwrap();
    assert!(payload["svg"].as_str().unwrap().contains("fill=\"#123456\""));
}

#[tokio::test]
async fn animate_defaults_to_two_seconds() {
    let state = test_helpers::test_app_state();
    let session_id = fresh_canvas(&state).await;
    add_shape(
        State(state.clone()),
        SessionId(session_id),
        Json(AddShapeBody { kind: "circle".to_owned(), data: PropertyBag::new() }),
    )
    .await
    .unwrap();
    let id = test_helpers::session_doc(&state, session_id).await.shapes[0].id.clone();

    let Json(payload) = animate(
        State(state),
        SessionId(session_id),
        Json(AnimateBody { element_id: id, kind: "rotate".to_owned(), duration: None }),
    )
    .await
    .unwrap();
    assert!(payload["svg"].as_str().unwrap().contains("dur=\"2s\""));
}

#[tokio::test]
async fn export_sets_download_headers() {
    let state = test_helpers::test_app_state();
    let session_id = fresh_canvas(&state).await;

    let response = export(
        State(state),
        SessionId(session_id),
        Query(ExportQuery { format: None }),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/svg+xml");
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"vector_image.svg\""
    );
}

#[tokio::test]
async fn import_reports_warnings_or_null() {
    let state = test_helpers::test_app_state();
    let session_id = Uuid::new_v4();

    let clean = r#"<svg width="100" height="100"><rect id="r" x="1" y="1" width="5" height="5"/></svg>"#;
    let Json(payload) = import(
        State(state.clone()),
        SessionId(session_id),
        Query(ImportQuery { filename: "a.svg".to_owned() }),
        Bytes::from_static(clean.as_bytes()),
    )
    .await
    .unwrap();
    assert_eq!(payload["warnings"], Value::Null);

    let mixed = r#"<svg width="100" height="100"><image id="p" href="x.png"/></svg>"#;
    let Json(payload) = import(
        State(state),
        SessionId(session_id),
        Query(ImportQuery { filename: "b.svg".to_owned() }),
        Bytes::from_static(mixed.as_bytes()),
    )
    .await
    .unwrap();
    assert_eq!(payload["warnings"][0]["element"], "image");
}

#[tokio::test]
async fn import_rejects_non_utf8_body() {
    let state = test_helpers::test_app_state();
    let result = import(
        State(state),
        SessionId(Uuid::new_v4()),
        Query(ImportQuery { filename: "a.svg".to_owned() }),
        Bytes::from_static(&[0xff, 0xfe, 0x00]),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn trace_is_stateless() {
    let state = test_helpers::test_app_state();
    let session_id = Uuid::new_v4();

    let mut png = Vec::new();
    let image = image::GrayImage::from_pixel(10, 10, image::Luma([0]));
    image::DynamicImage::ImageLuma8(image)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let Json(payload) = trace(
        SessionId(session_id),
        Query(TraceQuery { threshold: None }),
        Bytes::from(png),
    )
    .await
    .unwrap();
    assert!(payload["svg"].as_str().unwrap().contains("<rect"));
    // No session was created as a side effect.
    assert!(state.sessions.read().await.is_empty());
}

// ── error translation ───────────────────────────────────────────

#[tokio::test]
async fn api_error_maps_status_and_code() {
    let response = ApiError(EngineError::NotFound("elem_x".to_owned())).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = body_json(response).await;
    assert_eq!(payload["success"], false);
    assert_eq!(payload["code"], "E_NOT_FOUND");

    let response = ApiError(EngineError::UnsupportedShapeKind("hexagon".to_owned())).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn undo_on_fresh_session_is_a_client_error() {
    let state = test_helpers::test_app_state();
    let err = undo(State(state), SessionId(Uuid::new_v4())).await.unwrap_err();
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["code"], "E_NOTHING_TO_UNDO");
}

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(super::super::healthz().await, StatusCode::OK);
}
