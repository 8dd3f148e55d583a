//! Shape factory: builds well-formed shape nodes from loose property bags.
//!
//! Creation requests arrive as `(kind, JSON object)` pairs. The factory
//! fills every absent property with the kind's default so the resulting
//! node is always fully populated; callers never see a partially specified
//! shape. Numeric properties accept both JSON numbers and numeric strings,
//! matching what browser form data tends to produce.

#[cfg(test)]
#[path = "shapes_test.rs"]
mod shapes_test;

use serde_json::{Map, Value};

use crate::scene::{Geometry, ShapeNode, Style};

/// JSON property bag for shape creation.
pub type PropertyBag = Map<String, Value>;

/// Supported shape kinds, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Ellipse,
    Line,
    Polygon,
    Text,
}

impl ShapeKind {
    /// Parse the wire name; `None` for unsupported kinds.
    #[must_use]
    pub fn from_str(name: &str) -> Option<Self> {
        match name {
            "rectangle" => Some(Self::Rectangle),
            "circle" => Some(Self::Circle),
            "ellipse" => Some(Self::Ellipse),
            "line" => Some(Self::Line),
            "polygon" => Some(Self::Polygon),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Polygon => "polygon",
            Self::Text => "text",
        }
    }
}

/// Numeric property: JSON number or numeric string, else the default.
fn num(props: &PropertyBag, key: &str, default: f64) -> f64 {
    match props.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// String property, else the default.
fn text(props: &PropertyBag, key: &str, default: &str) -> String {
    props
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_owned()
}

/// Point list property: `[[x, y], …]`. Malformed entries are skipped.
fn points(props: &PropertyBag, key: &str) -> Vec<(f64, f64)> {
    let Some(Value::Array(items)) = props.get(key) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let pair = item.as_array()?;
            Some((pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
        })
        .collect()
}

/// Build a fully populated shape node for `kind`, applying per-kind
/// defaults for every absent property and minting a fresh id.
#[must_use]
pub fn build(kind: ShapeKind, props: &PropertyBag) -> ShapeNode {
    let (geometry, style, content) = match kind {
        ShapeKind::Rectangle => (
            Geometry::Rect {
                x: num(props, "x", 100.0),
                y: num(props, "y", 100.0),
                width: num(props, "width", 200.0),
                height: num(props, "height", 150.0),
                rx: num(props, "rx", 0.0),
                ry: num(props, "ry", 0.0),
            },
            Style {
                fill: Some(text(props, "fill", "#3498db")),
                stroke: Some(text(props, "stroke", "#2c3e50")),
                stroke_width: Some(num(props, "strokeWidth", 2.0)),
                dash_array: None,
            },
            None,
        ),
        ShapeKind::Circle => (
            Geometry::Circle {
                cx: num(props, "cx", 200.0),
                cy: num(props, "cy", 200.0),
                r: num(props, "r", 50.0),
            },
            Style {
                fill: Some(text(props, "fill", "#e74c3c")),
                stroke: Some(text(props, "stroke", "#c0392b")),
                stroke_width: Some(num(props, "strokeWidth", 2.0)),
                dash_array: None,
            },
            None,
        ),
        ShapeKind::Ellipse => (
            Geometry::Ellipse {
                cx: num(props, "cx", 200.0),
                cy: num(props, "cy", 200.0),
                rx: num(props, "rx", 80.0),
                ry: num(props, "ry", 50.0),
            },
            Style {
                fill: Some(text(props, "fill", "#2ecc71")),
                stroke: Some(text(props, "stroke", "#27ae60")),
                stroke_width: Some(num(props, "strokeWidth", 2.0)),
                dash_array: None,
            },
            None,
        ),
        ShapeKind::Line => (
            Geometry::Line {
                x1: num(props, "x1", 100.0),
                y1: num(props, "y1", 100.0),
                x2: num(props, "x2", 300.0),
                y2: num(props, "y2", 300.0),
            },
            Style {
                fill: None,
                stroke: Some(text(props, "stroke", "#34495e")),
                stroke_width: Some(num(props, "strokeWidth", 3.0)),
                dash_array: props
                    .get("dashArray")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            },
            None,
        ),
        ShapeKind::Polygon => (
            Geometry::Polygon { points: points(props, "points") },
            Style {
                fill: Some(text(props, "fill", "#9b59b6")),
                stroke: Some(text(props, "stroke", "#8e44ad")),
                stroke_width: Some(num(props, "strokeWidth", 2.0)),
                dash_array: None,
            },
            None,
        ),
        ShapeKind::Text => (
            Geometry::Text {
                x: num(props, "x", 100.0),
                y: num(props, "y", 150.0),
                font_family: text(props, "fontFamily", "Arial"),
                font_size: num(props, "fontSize", 24.0),
            },
            Style {
                fill: Some(text(props, "fill", "#2c3e50")),
                stroke: None,
                stroke_width: None,
                dash_array: None,
            },
            Some(text(props, "text", "Text")),
        ),
    };

    ShapeNode {
        id: ShapeNode::fresh_id(),
        geometry,
        style,
        text: content,
        animations: Vec::new(),
    }
}
