//! Engine operations over session state.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the mutation contract — every successful structural
//! mutation serializes the whole document and advances the session's
//! history — so route handlers stay focused on protocol translation.
//! All failures are recoverable at the request boundary: operations either
//! fully apply or fully fail with no session-state mutation.

pub mod canvas;
pub mod shape;
pub mod transfer;

use axum::http::StatusCode;

use crate::history::HistoryError;
use crate::render::RenderError;
use crate::svg::ParseError;
use crate::trace::TraceError;

/// Engine-wide failure taxonomy. Every operation returns a success payload
/// or one of these; none of them terminates the process.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("unsupported shape kind: {0}")]
    UnsupportedShapeKind(String),
    #[error("unsupported animation kind: {0}")]
    UnsupportedAnimationKind(String),
    #[error("element not found: {0}")]
    NotFound(String),
    #[error("attribute '{key}' is not valid for a {kind}")]
    UnknownAttribute { kind: &'static str, key: String },
    #[error("invalid value for attribute '{key}'")]
    InvalidAttributeValue { key: String },
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("no active document")]
    NoActiveDocument,
    #[error("rendering failed: {0}")]
    RenderFailed(#[from] RenderError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("unsupported export format: {0}")]
    UnsupportedExportFormat(String),
}

impl From<ParseError> for EngineError {
    fn from(err: ParseError) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

impl From<TraceError> for EngineError {
    fn from(err: TraceError) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

impl EngineError {
    /// Grepable error code carried in failure responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => "E_INVALID_DIMENSIONS",
            Self::UnsupportedShapeKind(_) => "E_UNSUPPORTED_SHAPE_KIND",
            Self::UnsupportedAnimationKind(_) => "E_UNSUPPORTED_ANIMATION_KIND",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::UnknownAttribute { .. } => "E_UNKNOWN_ATTRIBUTE",
            Self::InvalidAttributeValue { .. } => "E_INVALID_ATTRIBUTE_VALUE",
            Self::MalformedDocument(_) => "E_MALFORMED_DOCUMENT",
            Self::NoActiveDocument => "E_NO_ACTIVE_DOCUMENT",
            Self::RenderFailed(_) => "E_RENDER_FAILED",
            Self::History(HistoryError::NothingToUndo) => "E_NOTHING_TO_UNDO",
            Self::History(HistoryError::NothingToRedo) => "E_NOTHING_TO_REDO",
            Self::UnsupportedExportFormat(_) => "E_UNSUPPORTED_EXPORT_FORMAT",
        }
    }

    /// HTTP status for the failure response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RenderFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
