//! Canvas service — new-canvas creation and undo/redo cursor movement.

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

use uuid::Uuid;

use crate::consts::{PX_PER_CM, PX_PER_MM};
use crate::history::HistoryView;
use crate::scene::Document;
use crate::services::EngineError;
use crate::state::{AppState, SessionState};
use crate::svg;

/// Canvas measurement unit accepted by `create_canvas`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Px,
    Mm,
    Cm,
}

impl Unit {
    /// Parse the wire name, defaulting unknown values to pixels the way
    /// the browser form does.
    #[must_use]
    pub fn from_str(name: &str) -> Self {
        match name {
            "mm" => Self::Mm,
            "cm" => Self::Cm,
            _ => Self::Px,
        }
    }

    /// Convert a length in this unit to device pixels.
    #[must_use]
    pub fn to_px(self, value: f64) -> f64 {
        match self {
            Self::Px => value,
            Self::Mm => value * PX_PER_MM,
            Self::Cm => value * PX_PER_CM,
        }
    }
}

/// Payload returned by `create_canvas`.
#[derive(Debug, Clone)]
pub struct CanvasView {
    pub svg: String,
    pub width: f64,
    pub height: f64,
}

/// Create a fresh canvas, replacing any existing document for the session
/// and resetting history to a single-entry log seeded with the new snapshot.
///
/// # Errors
///
/// `InvalidDimensions` when either dimension is non-positive.
pub async fn create_canvas(
    state: &AppState,
    session_id: Uuid,
    width: f64,
    height: f64,
    unit: Unit,
) -> Result<CanvasView, EngineError> {
    if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
        return Err(EngineError::InvalidDimensions { width, height });
    }
    let (px_width, px_height) = (unit.to_px(width), unit.to_px(height));

    let doc = Document::new(px_width, px_height);
    let serialized = svg::write_document(&doc);

    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(session_id).or_insert_with(SessionState::new);
    session.doc = Some(doc);
    session.history.reset_with(serialized.clone());

    tracing::info!(%session_id, width = px_width, height = px_height, "canvas created");
    Ok(CanvasView { svg: serialized, width: px_width, height: px_height })
}

/// Step the history cursor back and restore that snapshot as the live document.
///
/// # Errors
///
/// `NothingToUndo` when the cursor is already at the oldest entry.
pub async fn undo(state: &AppState, session_id: Uuid) -> Result<HistoryView, EngineError> {
    move_cursor(state, session_id, true).await
}

/// Step the history cursor forward and restore that snapshot.
///
/// # Errors
///
/// `NothingToRedo` when the cursor is already at the newest entry.
pub async fn redo(state: &AppState, session_id: Uuid) -> Result<HistoryView, EngineError> {
    move_cursor(state, session_id, false).await
}

async fn move_cursor(
    state: &AppState,
    session_id: Uuid,
    backward: bool,
) -> Result<HistoryView, EngineError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(session_id).or_insert_with(SessionState::new);

    let view = if backward {
        session.history.undo()?
    } else {
        session.history.redo()?
    };

    // Re-hydrate the scene model so subsequent mutations operate on the
    // restored state, not the pre-undo one.
    let parsed = svg::parse_document(&view.snapshot)?;
    session.doc = Some(parsed.document);

    Ok(view)
}
