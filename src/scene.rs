//! Scene model: the in-memory vector document and its shape nodes.
//!
//! DESIGN
//! ======
//! A `Document` is the canonical representation of one editing session's
//! canvas: pixel dimensions plus an ordered shape list (paint order, first
//! element at the bottom). Every mutation operates on this model and then
//! serializes the whole document through [`crate::svg::write`]; the SVG
//! string is what travels over the wire and into history. The white
//! full-canvas background is a property of the writer, not a shape node,
//! so lookup and iteration never see it.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use uuid::Uuid;

/// `class` attribute marking elements owned by the editor.
pub const EDITOR_CLASS: &str = "vector-object";

/// A vector document: canvas size in device pixels plus ordered shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Canvas width in device pixels.
    pub width: f64,
    /// Canvas height in device pixels.
    pub height: f64,
    /// Shapes in paint order; index 0 is drawn first (bottom).
    pub shapes: Vec<ShapeNode>,
}

impl Document {
    /// Create an empty document with the given pixel dimensions.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, shapes: Vec::new() }
    }

    /// Look up a shape by id. Linear scan — scenes are tens of nodes.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&ShapeNode> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Mutable variant of [`Self::find_by_id`].
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut ShapeNode> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Append a shape at the top of the paint order.
    pub fn append(&mut self, node: ShapeNode) {
        self.shapes.push(node);
    }
}

/// One shape in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    /// Unique within the document for the node's lifetime; never reused.
    pub id: String,
    /// Variant-specific geometry.
    pub geometry: Geometry,
    /// Paint attributes.
    pub style: Style,
    /// Glyph content for text nodes.
    pub text: Option<String>,
    /// Attached declarative animations, in attachment order.
    pub animations: Vec<Animation>,
}

impl ShapeNode {
    /// Mint a fresh `elem_`-prefixed id from a v4 uuid.
    #[must_use]
    pub fn fresh_id() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("elem_{}", &hex[..8])
    }
}

/// Variant-specific geometry of a shape node.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned rectangle with optional rounded corners.
    Rect { x: f64, y: f64, width: f64, height: f64, rx: f64, ry: f64 },
    /// Circle around a center point.
    Circle { cx: f64, cy: f64, r: f64 },
    /// Axis-aligned ellipse.
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    /// Straight segment between two endpoints.
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Closed polygon over an ordered point list (may be empty).
    Polygon { points: Vec<(f64, f64)> },
    /// Text anchored at a baseline point.
    Text { x: f64, y: f64, font_family: String, font_size: f64 },
}

/// Paint attributes shared by all shape kinds. `fill` is absent for lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub dash_array: Option<String>,
}

/// A declarative transform animation attached to a shape node.
///
/// From/to values are fixed per kind (see [`crate::svg::write`]); only the
/// kind and duration vary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub kind: AnimationKind,
    pub duration_secs: f64,
}

/// Transform animation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Translate (0,0) → (100,50).
    Translate,
    /// Rotate 0° → 360°.
    Rotate,
    /// Scale 1 → 1.5 → 1 with an eased midpoint keyframe.
    Scale,
}

impl AnimationKind {
    /// Parse the wire name (`translate` | `rotate` | `scale`).
    #[must_use]
    pub fn from_str(name: &str) -> Option<Self> {
        match name {
            "translate" => Some(Self::Translate),
            "rotate" => Some(Self::Rotate),
            "scale" => Some(Self::Scale),
            _ => None,
        }
    }
}
