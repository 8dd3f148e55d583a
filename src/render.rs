//! SVG → PNG rasterization via resvg.
//!
//! The engine's only job here is to hand well-formed SVG to the renderer
//! and surface its failures; rasterization itself is resvg's concern.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use resvg::{tiny_skia, usvg};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("svg rendering failed: {0}")]
    Svg(#[from] usvg::Error),
    #[error("pixmap allocation failed for {width}x{height}")]
    Allocation { width: u32, height: u32 },
    #[error("png encoding failed: {0}")]
    Encode(String),
}

/// Rasterize SVG text into PNG bytes at the document's native size.
///
/// # Errors
///
/// Returns [`RenderError`] when the SVG does not parse, the target pixmap
/// cannot be allocated (zero or absurd dimensions), or PNG encoding fails.
pub fn render_png(svg: &str) -> Result<Vec<u8>, RenderError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options)?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(RenderError::Allocation { width, height })?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))
}
