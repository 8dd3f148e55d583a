//! Shape service — create, update, and animate scene nodes.
//!
//! DESIGN
//! ======
//! Mutations are atomic: inputs are validated against the target node's
//! variant before any session state changes, so a failed call leaves both
//! the document and the history untouched. Add/update push a history
//! snapshot; animate deliberately does not (animations are not undoable).

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::scene::{Animation, AnimationKind, Document, Geometry, ShapeNode};
use crate::services::EngineError;
use crate::shapes::{self, PropertyBag, ShapeKind};
use crate::state::{AppState, SessionState};
use crate::svg;

/// Update map: SVG attribute name → new value.
pub type UpdateMap = Map<String, Value>;

/// Add a shape of `kind_name` built from `props`, returning the new
/// serialized document.
///
/// A default 800×600 canvas is synthesized when the session has no
/// document yet.
///
/// # Errors
///
/// `UnsupportedShapeKind` for unknown kind names.
pub async fn add_shape(
    state: &AppState,
    session_id: Uuid,
    kind_name: &str,
    props: &PropertyBag,
) -> Result<String, EngineError> {
    let kind = ShapeKind::from_str(kind_name)
        .ok_or_else(|| EngineError::UnsupportedShapeKind(kind_name.to_owned()))?;
    let node = shapes::build(kind, props);

    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(session_id).or_insert_with(SessionState::new);
    let doc = session
        .doc
        .get_or_insert_with(|| Document::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT));

    tracing::debug!(%session_id, kind = kind.as_str(), id = %node.id, "shape added");
    doc.append(node);
    let serialized = svg::write_document(doc);
    session.history.push(serialized.clone());
    Ok(serialized)
}

/// Apply an attribute update map to the shape with `id`, returning the new
/// serialized document.
///
/// # Errors
///
/// `NotFound` when the id is absent; `UnknownAttribute` /
/// `InvalidAttributeValue` when a key is not valid for the node's variant
/// or its value cannot be coerced. No partial writes: the whole map is
/// applied to a scratch copy first.
pub async fn update_shape(
    state: &AppState,
    session_id: Uuid,
    id: &str,
    updates: &UpdateMap,
) -> Result<String, EngineError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(session_id).or_insert_with(SessionState::new);
    let doc = session.doc.as_mut().ok_or(EngineError::NoActiveDocument)?;

    let node = doc
        .find_by_id_mut(id)
        .ok_or_else(|| EngineError::NotFound(id.to_owned()))?;

    let mut updated = node.clone();
    for (key, value) in updates {
        apply_attr(&mut updated, key, value)?;
    }
    *node = updated;

    let serialized = svg::write_document(doc);
    session.history.push(serialized.clone());
    tracing::debug!(%session_id, id, keys = updates.len(), "shape updated");
    Ok(serialized)
}

/// Attach a transform animation to the shape with `id`, returning the new
/// serialized document. Does not push a history entry.
///
/// # Errors
///
/// `NotFound` when the id is absent; `UnsupportedAnimationKind` when the
/// animation kind name is unknown.
pub async fn animate(
    state: &AppState,
    session_id: Uuid,
    id: &str,
    kind_name: &str,
    duration_secs: f64,
) -> Result<String, EngineError> {
    let kind = AnimationKind::from_str(kind_name)
        .ok_or_else(|| EngineError::UnsupportedAnimationKind(kind_name.to_owned()))?;

    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(session_id).or_insert_with(SessionState::new);
    let doc = session.doc.as_mut().ok_or(EngineError::NoActiveDocument)?;

    let node = doc
        .find_by_id_mut(id)
        .ok_or_else(|| EngineError::NotFound(id.to_owned()))?;
    node.animations.push(Animation { kind, duration_secs });

    tracing::debug!(%session_id, id, kind = kind_name, "animation attached");
    Ok(svg::write_document(doc))
}

// =============================================================================
// TYPED ATTRIBUTE UPDATES
// =============================================================================

fn as_num(key: &str, value: &Value) -> Result<f64, EngineError> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| EngineError::InvalidAttributeValue { key: key.to_owned() })
}

fn as_text(key: &str, value: &Value) -> Result<String, EngineError> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
    .ok_or_else(|| EngineError::InvalidAttributeValue { key: key.to_owned() })
}

/// Apply one attribute write, checked against the node's variant.
fn apply_attr(node: &mut ShapeNode, key: &str, value: &Value) -> Result<(), EngineError> {
    // Style attributes are common to every variant.
    match key {
        "fill" => {
            node.style.fill = Some(as_text(key, value)?);
            return Ok(());
        }
        "stroke" => {
            node.style.stroke = Some(as_text(key, value)?);
            return Ok(());
        }
        "stroke-width" => {
            node.style.stroke_width = Some(as_num(key, value)?);
            return Ok(());
        }
        "stroke-dasharray" => {
            node.style.dash_array = Some(as_text(key, value)?);
            return Ok(());
        }
        _ => {}
    }

    let kind = kind_name(node);
    let unknown = || EngineError::UnknownAttribute { kind, key: key.to_owned() };

    match &mut node.geometry {
        Geometry::Rect { x, y, width, height, rx, ry } => match key {
            "x" => *x = as_num(key, value)?,
            "y" => *y = as_num(key, value)?,
            "width" => *width = as_num(key, value)?,
            "height" => *height = as_num(key, value)?,
            "rx" => *rx = as_num(key, value)?,
            "ry" => *ry = as_num(key, value)?,
            _ => return Err(unknown()),
        },
        Geometry::Circle { cx, cy, r } => match key {
            "cx" => *cx = as_num(key, value)?,
            "cy" => *cy = as_num(key, value)?,
            "r" => *r = as_num(key, value)?,
            _ => return Err(unknown()),
        },
        Geometry::Ellipse { cx, cy, rx, ry } => match key {
            "cx" => *cx = as_num(key, value)?,
            "cy" => *cy = as_num(key, value)?,
            "rx" => *rx = as_num(key, value)?,
            "ry" => *ry = as_num(key, value)?,
            _ => return Err(unknown()),
        },
        Geometry::Line { x1, y1, x2, y2 } => match key {
            "x1" => *x1 = as_num(key, value)?,
            "y1" => *y1 = as_num(key, value)?,
            "x2" => *x2 = as_num(key, value)?,
            "y2" => *y2 = as_num(key, value)?,
            _ => return Err(unknown()),
        },
        Geometry::Polygon { points } => match key {
            "points" => *points = parse_points_value(key, value)?,
            _ => return Err(unknown()),
        },
        Geometry::Text { x, y, font_family, font_size } => match key {
            "x" => *x = as_num(key, value)?,
            "y" => *y = as_num(key, value)?,
            "font-family" => *font_family = as_text(key, value)?,
            "font-size" => *font_size = as_num(key, value)?,
            "text" => node.text = Some(as_text(key, value)?),
            _ => return Err(unknown()),
        },
    }
    Ok(())
}

/// Points accept either the SVG string form (`"x,y x,y"`) or `[[x, y], …]`.
fn parse_points_value(key: &str, value: &Value) -> Result<Vec<(f64, f64)>, EngineError> {
    let invalid = || EngineError::InvalidAttributeValue { key: key.to_owned() };
    match value {
        Value::String(raw) => raw
            .split_whitespace()
            .map(|pair| {
                let (x, y) = pair.split_once(',').ok_or_else(invalid)?;
                Ok((
                    x.trim().parse().map_err(|_| invalid())?,
                    y.trim().parse().map_err(|_| invalid())?,
                ))
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let pair = item.as_array().ok_or_else(invalid)?;
                let x = pair.first().and_then(Value::as_f64).ok_or_else(invalid)?;
                let y = pair.get(1).and_then(Value::as_f64).ok_or_else(invalid)?;
                Ok((x, y))
            })
            .collect(),
        _ => Err(invalid()),
    }
}

fn kind_name(node: &ShapeNode) -> &'static str {
    match node.geometry {
        Geometry::Rect { .. } => "rectangle",
        Geometry::Circle { .. } => "circle",
        Geometry::Ellipse { .. } => "ellipse",
        Geometry::Line { .. } => "line",
        Geometry::Polygon { .. } => "polygon",
        Geometry::Text { .. } => "text",
    }
}
