//! Transfer service — export to SVG/PNG/project archive and SVG import.

#[cfg(test)]
#[path = "transfer_test.rs"]
mod transfer_test;

use serde_json::json;
use uuid::Uuid;

use crate::render;
use crate::services::EngineError;
use crate::state::{AppState, SessionState};
use crate::svg::{self, ImportWarning};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
    Vdraw,
}

impl ExportFormat {
    /// Parse the wire name; `None` for unsupported formats.
    #[must_use]
    pub fn from_str(name: &str) -> Option<Self> {
        match name {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "vdraw" => Some(Self::Vdraw),
            _ => None,
        }
    }
}

/// A downloadable export artifact.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub filename: &'static str,
}

/// Export the session's document in the requested format.
///
/// The project archive (`vdraw`) is self-describing JSON: format version
/// tag, the SVG content, canvas size, the full history log, and a
/// generation timestamp.
///
/// # Errors
///
/// `NoActiveDocument` when the session has nothing to export,
/// `UnsupportedExportFormat` for unknown format names, and `RenderFailed`
/// when PNG rasterization fails.
pub async fn export(
    state: &AppState,
    session_id: Uuid,
    format_name: &str,
) -> Result<ExportFile, EngineError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&session_id).ok_or(EngineError::NoActiveDocument)?;
    let doc = session.doc.as_ref().ok_or(EngineError::NoActiveDocument)?;
    let serialized = svg::write_document(doc);

    let format = ExportFormat::from_str(format_name)
        .ok_or_else(|| EngineError::UnsupportedExportFormat(format_name.to_owned()))?;

    match format {
        ExportFormat::Svg => Ok(ExportFile {
            bytes: serialized.into_bytes(),
            media_type: "image/svg+xml",
            filename: "vector_image.svg",
        }),
        ExportFormat::Png => {
            let bytes = render::render_png(&serialized)?;
            Ok(ExportFile { bytes, media_type: "image/png", filename: "vector_image.png" })
        }
        ExportFormat::Vdraw => {
            let project = json!({
                "version": "1.0",
                "type": "vector",
                "svg": serialized,
                "size": { "width": doc.width, "height": doc.height },
                "history": session.history.snapshots(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            });
            Ok(ExportFile {
                bytes: project.to_string().into_bytes(),
                media_type: "application/json",
                filename: "project.vdraw",
            })
        }
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Canonical re-serialization of the imported document.
    pub svg: String,
    pub width: f64,
    pub height: f64,
    /// Non-fatal notes about recognized-but-unsupported elements.
    pub warnings: Vec<ImportWarning>,
}

/// Import SVG text, replacing the session's document and resetting history
/// to a single-entry log seeded with the imported content.
///
/// # Errors
///
/// `MalformedDocument` when `filename` does not end in `.svg` or the
/// content does not parse.
pub async fn import_svg(
    state: &AppState,
    session_id: Uuid,
    filename: &str,
    content: &str,
) -> Result<ImportOutcome, EngineError> {
    if !filename.to_ascii_lowercase().ends_with(".svg") {
        return Err(EngineError::MalformedDocument("only .svg files are supported".to_owned()));
    }

    let parsed = svg::parse_document(content)?;
    let serialized = svg::write_document(&parsed.document);
    let (width, height) = (parsed.document.width, parsed.document.height);

    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(session_id).or_insert_with(SessionState::new);
    session.doc = Some(parsed.document);
    session.history.reset_with(serialized.clone());

    tracing::info!(%session_id, width, height, warnings = parsed.warnings.len(), "svg imported");
    Ok(ImportOutcome { svg: serialized, width, height, warnings: parsed.warnings })
}
