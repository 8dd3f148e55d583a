//! Raster → vector tracing by thresholding and block quantization.
//!
//! DESIGN
//! ======
//! This is a silhouette trace, not a contour trace: the source image is
//! reduced to luminance, thresholded into a binary mask, and sampled on a
//! 5×5 grid — each dark sample becomes one opaque 5×5 cell in the output
//! document. Lossy by construction, cheap (one pass over the samples), and
//! entirely independent of any session state.

#[cfg(test)]
#[path = "trace_test.rs"]
mod trace_test;

use image::GrayImage;

use crate::consts::TRACE_CELL;
use crate::scene::{Document, Geometry, ShapeNode, Style};

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("image decoding failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decode raster bytes and trace them into a vector document.
///
/// `threshold` is clamped to `[0, 1]`; luminance strictly above
/// `threshold * 255` is treated as background.
///
/// # Errors
///
/// Returns [`TraceError::Decode`] when the bytes are not a decodable image.
pub fn trace_bytes(bytes: &[u8], threshold: f64) -> Result<Document, TraceError> {
    let luma = image::load_from_memory(bytes)?.to_luma8();
    Ok(trace_luma(&luma, threshold))
}

/// Trace a luminance image into one black cell per dark 5×5 block sample.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn trace_luma(image: &GrayImage, threshold: f64) -> Document {
    let (width, height) = image.dimensions();
    let cutoff = (threshold.clamp(0.0, 1.0) * 255.0) as u8;

    let mut doc = Document::new(f64::from(width), f64::from(height));
    for y in (0..height).step_by(TRACE_CELL as usize) {
        for x in (0..width).step_by(TRACE_CELL as usize) {
            // Block-quantized: only the top-left sample of each cell counts.
            if image.get_pixel(x, y).0[0] <= cutoff {
                doc.append(cell(f64::from(x), f64::from(y)));
            }
        }
    }
    doc
}

fn cell(x: f64, y: f64) -> ShapeNode {
    ShapeNode {
        id: ShapeNode::fresh_id(),
        geometry: Geometry::Rect {
            x,
            y,
            width: f64::from(TRACE_CELL),
            height: f64::from(TRACE_CELL),
            rx: 0.0,
            ry: 0.0,
        },
        style: Style {
            fill: Some("black".to_owned()),
            stroke: Some("none".to_owned()),
            stroke_width: None,
            dash_array: None,
        },
        text: None,
        animations: Vec::new(),
    }
}
