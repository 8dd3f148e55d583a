//! Document → SVG serialization.

use std::fmt::Write as _;

use crate::scene::{Animation, AnimationKind, Document, EDITOR_CLASS, Geometry, ShapeNode};

/// Escape a value for use inside a double-quoted attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape element text content.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_attr(buf: &mut String, name: &str, value: &str) {
    let _ = write!(buf, " {name}=\"{}\"", escape_attr(value));
}

fn push_num(buf: &mut String, name: &str, value: f64) {
    let _ = write!(buf, " {name}=\"{value}\"");
}

fn push_style(buf: &mut String, node: &ShapeNode) {
    if let Some(fill) = &node.style.fill {
        push_attr(buf, "fill", fill);
    }
    if let Some(stroke) = &node.style.stroke {
        push_attr(buf, "stroke", stroke);
    }
    if let Some(width) = node.style.stroke_width {
        push_num(buf, "stroke-width", width);
    }
    if let Some(dash) = &node.style.dash_array {
        if !dash.is_empty() {
            push_attr(buf, "stroke-dasharray", dash);
        }
    }
}

fn push_animation(buf: &mut String, anim: &Animation) {
    buf.push_str("<animateTransform attributeName=\"transform\"");
    match anim.kind {
        AnimationKind::Translate => {
            push_attr(buf, "type", "translate");
            push_attr(buf, "from", "0,0");
            push_attr(buf, "to", "100,50");
        }
        AnimationKind::Rotate => {
            push_attr(buf, "type", "rotate");
            push_attr(buf, "from", "0");
            push_attr(buf, "to", "360");
        }
        AnimationKind::Scale => {
            push_attr(buf, "type", "scale");
            push_attr(buf, "from", "1");
            push_attr(buf, "to", "1.5");
            push_attr(buf, "values", "1;1.5;1");
            push_attr(buf, "keyTimes", "0;0.5;1");
            push_attr(buf, "calcMode", "spline");
            push_attr(buf, "keySplines", "0.5 0 0.5 1; 0.5 0 0.5 1");
        }
    }
    let _ = write!(buf, " dur=\"{}s\"", anim.duration_secs);
    push_attr(buf, "repeatCount", "indefinite");
    buf.push_str("/>");
}

/// Serialize one shape node, including its attached animations.
fn push_shape(buf: &mut String, node: &ShapeNode) {
    let tag = match &node.geometry {
        Geometry::Rect { .. } => "rect",
        Geometry::Circle { .. } => "circle",
        Geometry::Ellipse { .. } => "ellipse",
        Geometry::Line { .. } => "line",
        Geometry::Polygon { .. } => "polygon",
        Geometry::Text { .. } => "text",
    };
    let _ = write!(buf, "<{tag}");
    push_attr(buf, "id", &node.id);
    push_attr(buf, "class", EDITOR_CLASS);

    match &node.geometry {
        Geometry::Rect { x, y, width, height, rx, ry } => {
            push_num(buf, "x", *x);
            push_num(buf, "y", *y);
            push_num(buf, "width", *width);
            push_num(buf, "height", *height);
            push_num(buf, "rx", *rx);
            push_num(buf, "ry", *ry);
        }
        Geometry::Circle { cx, cy, r } => {
            push_num(buf, "cx", *cx);
            push_num(buf, "cy", *cy);
            push_num(buf, "r", *r);
        }
        Geometry::Ellipse { cx, cy, rx, ry } => {
            push_num(buf, "cx", *cx);
            push_num(buf, "cy", *cy);
            push_num(buf, "rx", *rx);
            push_num(buf, "ry", *ry);
        }
        Geometry::Line { x1, y1, x2, y2 } => {
            push_num(buf, "x1", *x1);
            push_num(buf, "y1", *y1);
            push_num(buf, "x2", *x2);
            push_num(buf, "y2", *y2);
        }
        Geometry::Polygon { points } => {
            let joined = points
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect::<Vec<_>>()
                .join(" ");
            push_attr(buf, "points", &joined);
        }
        Geometry::Text { x, y, font_family, font_size } => {
            push_num(buf, "x", *x);
            push_num(buf, "y", *y);
            push_attr(buf, "font-family", font_family);
            push_num(buf, "font-size", *font_size);
        }
    }
    push_style(buf, node);

    let body = node.text.as_deref().unwrap_or("");
    if node.animations.is_empty() && body.is_empty() {
        buf.push_str("/>");
        return;
    }
    buf.push('>');
    buf.push_str(&escape_text(body));
    for anim in &node.animations {
        push_animation(buf, anim);
    }
    let _ = write!(buf, "</{tag}>");
}

/// Serialize the document to the canonical SVG wire format.
///
/// The root carries pixel dimensions, a matching viewBox, and
/// `preserveAspectRatio`; the first child is the white full-canvas
/// background rectangle.
#[must_use]
pub fn write_document(doc: &Document) -> String {
    let (w, h) = (doc.width, doc.height);
    let mut buf = String::with_capacity(256 + doc.shapes.len() * 128);
    let _ = write!(
        buf,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}px\" height=\"{h}px\" \
         viewBox=\"0 0 {w} {h}\" preserveAspectRatio=\"xMidYMid meet\">"
    );
    let _ = write!(
        buf,
        "<rect x=\"0\" y=\"0\" width=\"{w}px\" height=\"{h}px\" fill=\"white\" stroke=\"none\"/>"
    );
    for shape in &doc.shapes {
        push_shape(&mut buf, shape);
    }
    buf.push_str("</svg>");
    buf
}
