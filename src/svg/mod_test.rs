use super::*;
use crate::scene::{Animation, AnimationKind, Document, Geometry, ShapeNode, Style};

fn node(id: &str, geometry: Geometry) -> ShapeNode {
    ShapeNode {
        id: id.to_owned(),
        geometry,
        style: Style {
            fill: Some("#3498db".to_owned()),
            stroke: Some("#2c3e50".to_owned()),
            stroke_width: Some(2.0),
            dash_array: None,
        },
        text: None,
        animations: Vec::new(),
    }
}

fn sample_doc() -> Document {
    let mut doc = Document::new(800.0, 600.0);
    doc.append(node("elem_aaaa0001", Geometry::Rect {
        x: 10.0,
        y: 20.0,
        width: 30.0,
        height: 40.0,
        rx: 0.0,
        ry: 0.0,
    }));
    doc.append(node("elem_aaaa0002", Geometry::Circle { cx: 200.0, cy: 200.0, r: 50.0 }));
    doc.append(node("elem_aaaa0003", Geometry::Line { x1: 1.0, y1: 2.0, x2: 3.0, y2: 4.0 }));
    doc.append(node(
        "elem_aaaa0004",
        Geometry::Polygon { points: vec![(0.0, 0.0), (10.0, 0.0), (5.0, 8.5)] },
    ));
    doc
}

// ── Writer ──────────────────────────────────────────────────────

#[test]
fn writer_emits_root_and_background() {
    let svg = write_document(&Document::new(800.0, 600.0));
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800px\" height=\"600px\""));
    assert!(svg.contains("viewBox=\"0 0 800 600\""));
    assert!(svg.contains("preserveAspectRatio=\"xMidYMid meet\""));
    assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"800px\" height=\"600px\" fill=\"white\" stroke=\"none\"/>"));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn writer_emits_shape_attributes() {
    let svg = write_document(&sample_doc());
    assert!(svg.contains("id=\"elem_aaaa0001\""));
    assert!(svg.contains("class=\"vector-object\""));
    assert!(svg.contains("cx=\"200\" cy=\"200\" r=\"50\""));
    assert!(svg.contains("points=\"0,0 10,0 5,8.5\""));
}

#[test]
fn writer_escapes_text_content() {
    let mut doc = Document::new(100.0, 100.0);
    let mut text = node("elem_t", Geometry::Text {
        x: 5.0,
        y: 10.0,
        font_family: "Arial".to_owned(),
        font_size: 24.0,
    });
    text.text = Some("a < b & c".to_owned());
    doc.append(text);
    let svg = write_document(&doc);
    assert!(svg.contains(">a &lt; b &amp; c<"));
}

#[test]
fn writer_emits_animations() {
    let mut doc = Document::new(100.0, 100.0);
    let mut shape = node("elem_a", Geometry::Circle { cx: 10.0, cy: 10.0, r: 5.0 });
    shape.animations.push(Animation { kind: AnimationKind::Rotate, duration_secs: 2.0 });
    shape.animations.push(Animation { kind: AnimationKind::Scale, duration_secs: 1.5 });
    doc.append(shape);

    let svg = write_document(&doc);
    assert!(svg.contains("<animateTransform attributeName=\"transform\" type=\"rotate\" from=\"0\" to=\"360\" dur=\"2s\" repeatCount=\"indefinite\"/>"));
    assert!(svg.contains("type=\"scale\""));
    assert!(svg.contains("values=\"1;1.5;1\""));
    assert!(svg.contains("keySplines=\"0.5 0 0.5 1; 0.5 0 0.5 1\""));
    assert!(svg.contains("dur=\"1.5s\""));
}

// ── Round trip ──────────────────────────────────────────────────

#[test]
fn write_then_parse_round_trips_shapes() {
    let doc = sample_doc();
    let parsed = parse_document(&write_document(&doc)).unwrap();
    assert!(parsed.warnings.is_empty());
    assert!((parsed.document.width - 800.0).abs() < f64::EPSILON);
    assert!((parsed.document.height - 600.0).abs() < f64::EPSILON);
    assert_eq!(parsed.document.shapes.len(), doc.shapes.len());
    for (orig, round) in doc.shapes.iter().zip(&parsed.document.shapes) {
        assert_eq!(orig.id, round.id);
        assert_eq!(orig.geometry, round.geometry);
        assert_eq!(orig.style, round.style);
    }
}

#[test]
fn round_trip_preserves_text_and_animations() {
    let mut doc = Document::new(400.0, 300.0);
    let mut text = node("elem_t", Geometry::Text {
        x: 5.0,
        y: 10.0,
        font_family: "Courier".to_owned(),
        font_size: 18.0,
    });
    text.text = Some("hello & <world>".to_owned());
    text.animations.push(Animation { kind: AnimationKind::Translate, duration_secs: 3.0 });
    doc.append(text);

    let parsed = parse_document(&write_document(&doc)).unwrap();
    let round = &parsed.document.shapes[0];
    assert_eq!(round.text.as_deref(), Some("hello & <world>"));
    assert_eq!(round.animations, vec![Animation {
        kind: AnimationKind::Translate,
        duration_secs: 3.0
    }]);
}

// ── Parser ──────────────────────────────────────────────────────

#[test]
fn parse_reads_dimensions_with_unit_suffix() {
    let parsed = parse_document(r#"<svg width="640px" height="480px"></svg>"#).unwrap();
    assert!((parsed.document.width - 640.0).abs() < f64::EPSILON);
    assert!((parsed.document.height - 480.0).abs() < f64::EPSILON);
}

#[test]
fn parse_defaults_missing_or_unparsable_dimensions() {
    let parsed = parse_document("<svg></svg>").unwrap();
    assert!((parsed.document.width - 800.0).abs() < f64::EPSILON);
    assert!((parsed.document.height - 600.0).abs() < f64::EPSILON);

    let parsed = parse_document(r#"<svg width="auto" height="auto"></svg>"#).unwrap();
    assert!((parsed.document.width - 800.0).abs() < f64::EPSILON);
}

#[test]
fn parse_tolerates_prolog_comments_and_doctype() {
    let input = "<?xml version=\"1.0\"?>\n<!DOCTYPE svg>\n<!-- drawing -->\n<svg width=\"10\" height=\"10\"></svg>";
    assert!(parse_document(input).is_ok());
}

#[test]
fn parse_rejects_non_svg_root() {
    let err = parse_document("<html></html>").unwrap_err();
    assert!(err.message.contains("expected <svg>"));
}

#[test]
fn parse_rejects_mismatched_close_tag() {
    let err = parse_document("<svg><rect id=\"a\"></circle></svg>").unwrap_err();
    assert!(err.message.contains("does not match"));
}

#[test]
fn parse_reports_position_of_failure() {
    let err = parse_document("<svg>\n<rect id=").unwrap_err();
    assert!(err.line >= 2, "line {} column {}", err.line, err.column);
}

#[test]
fn image_elements_become_warnings_not_errors() {
    let input = r#"<svg width="100" height="100"><image id="photo" href="x.png"/><circle id="c" cx="5" cy="5" r="2"/></svg>"#;
    let parsed = parse_document(input).unwrap();
    assert_eq!(parsed.warnings, vec![ImportWarning {
        element: "image".to_owned(),
        id: "photo".to_owned()
    }]);
    assert_eq!(parsed.document.shapes.len(), 1);
}

#[test]
fn image_without_id_reports_unknown() {
    let parsed = parse_document(r#"<svg><image href="x.png"/></svg>"#).unwrap();
    assert_eq!(parsed.warnings[0].id, "unknown");
}

#[test]
fn background_rect_is_not_a_shape() {
    let svg = write_document(&Document::new(200.0, 100.0));
    let parsed = parse_document(&svg).unwrap();
    assert!(parsed.document.shapes.is_empty());
}

#[test]
fn foreign_shapes_without_ids_get_minted_ids() {
    let input = r#"<svg width="50" height="50"><circle cx="5" cy="5" r="2"/></svg>"#;
    let parsed = parse_document(input).unwrap();
    assert_eq!(parsed.document.shapes.len(), 1);
    assert!(parsed.document.shapes[0].id.starts_with("elem_"));
}

#[test]
fn shapes_inside_groups_are_flattened() {
    let input = r#"<svg width="50" height="50"><g><rect id="r" x="1" y="1" width="2" height="2"/></g></svg>"#;
    let parsed = parse_document(input).unwrap();
    assert_eq!(parsed.document.shapes.len(), 1);
    assert_eq!(parsed.document.shapes[0].id, "r");
}

#[test]
fn unrecognized_vector_elements_are_skipped() {
    let input = r#"<svg width="50" height="50"><path d="M0 0 L10 10"/><circle id="c" cx="1" cy="1" r="1"/></svg>"#;
    let parsed = parse_document(input).unwrap();
    assert_eq!(parsed.document.shapes.len(), 1);
    assert!(parsed.warnings.is_empty());
}

#[test]
fn entity_references_unescape() {
    let input = r#"<svg width="50" height="50"><text id="t" x="0" y="0">a &amp; b &lt;c&gt; &#65;</text></svg>"#;
    let parsed = parse_document(input).unwrap();
    assert_eq!(parsed.document.shapes[0].text.as_deref(), Some("a & b <c> A"));
}

#[test]
fn namespaced_tags_resolve_to_local_names() {
    let input = r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" width="50" height="50"><svg:circle id="c" cx="1" cy="1" r="1"/></svg:svg>"#;
    let parsed = parse_document(input).unwrap();
    assert_eq!(parsed.document.shapes.len(), 1);
}
