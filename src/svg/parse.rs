//! SVG → Document parsing.
//!
//! Recursive descent over the XML subset the editor reads: prolog, comments,
//! doctype, elements with attributes, entity references, CDATA, and text
//! content. Namespace prefixes are stripped; recognized shape elements are
//! lowered into scene nodes and everything else is skipped, except embedded
//! raster `<image>` elements which are reported as non-fatal warnings.

use serde::Serialize;

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::scene::{Animation, AnimationKind, Document, Geometry, ShapeNode, Style};

/// Parse failure with a positioned diagnostic.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Recognized-but-unsupported element encountered during import.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportWarning {
    /// Element kind, e.g. `"image"`.
    pub element: String,
    /// Element id, or `"unknown"` when absent.
    pub id: String,
}

/// Result of a successful import parse.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub document: Document,
    pub warnings: Vec<ImportWarning>,
}

/// Parse SVG text into a scene document plus import warnings.
///
/// Width/height come from the root element's size attributes with unit
/// suffixes stripped, defaulting to 800×600 when absent or unparsable.
///
/// # Errors
///
/// Returns a positioned [`ParseError`] when the input is not well-formed
/// or the root element is not `<svg>`.
pub fn parse_document(input: &str) -> Result<Parsed, ParseError> {
    let mut reader = Reader::new(input);
    reader.skip_misc();
    let root = reader.parse_element()?;
    if local_name(&root.name) != "svg" {
        return Err(reader.error_at(0, format!("root element is <{}>, expected <svg>", root.name)));
    }

    let width = root
        .attr("width")
        .and_then(parse_dimension)
        .unwrap_or(DEFAULT_CANVAS_WIDTH);
    let height = root
        .attr("height")
        .and_then(parse_dimension)
        .unwrap_or(DEFAULT_CANVAS_HEIGHT);

    let mut document = Document::new(width, height);
    let mut warnings = Vec::new();
    for child in &root.children {
        lower_element(child, &mut document, &mut warnings);
    }
    Ok(Parsed { document, warnings })
}

/// Numeric dimension with any trailing unit suffix (`px`, `mm`, `%`, …) stripped.
fn parse_dimension(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

// =============================================================================
// LOWERING
// =============================================================================

fn lower_element(elem: &Element, document: &mut Document, warnings: &mut Vec<ImportWarning>) {
    match local_name(&elem.name) {
        "image" => warnings.push(ImportWarning {
            element: "image".to_owned(),
            id: elem.attr("id").unwrap_or("unknown").to_owned(),
        }),
        "rect" if is_background(elem, document) => {}
        "rect" | "circle" | "ellipse" | "line" | "polygon" | "text" => {
            if let Some(shape) = lower_shape(elem) {
                document.append(shape);
            }
        }
        // Containers are flattened; other vector elements are skipped.
        "g" | "defs" | "svg" => {
            for child in &elem.children {
                lower_element(child, document, warnings);
            }
        }
        _ => {}
    }
}

/// The writer's background: a full-canvas rect with no id.
fn is_background(elem: &Element, document: &Document) -> bool {
    if elem.attr("id").is_some() {
        return false;
    }
    let dim = |name: &str| elem.attr(name).and_then(parse_dimension).unwrap_or(0.0);
    dim("x") == 0.0
        && dim("y") == 0.0
        && (dim("width") - document.width).abs() < 0.5
        && (dim("height") - document.height).abs() < 0.5
}

fn lower_shape(elem: &Element) -> Option<ShapeNode> {
    let num = |name: &str| elem.attr(name).and_then(parse_dimension).unwrap_or(0.0);
    let geometry = match local_name(&elem.name) {
        "rect" => Geometry::Rect {
            x: num("x"),
            y: num("y"),
            width: num("width"),
            height: num("height"),
            rx: num("rx"),
            ry: num("ry"),
        },
        "circle" => Geometry::Circle { cx: num("cx"), cy: num("cy"), r: num("r") },
        "ellipse" => Geometry::Ellipse {
            cx: num("cx"),
            cy: num("cy"),
            rx: num("rx"),
            ry: num("ry"),
        },
        "line" => Geometry::Line {
            x1: num("x1"),
            y1: num("y1"),
            x2: num("x2"),
            y2: num("y2"),
        },
        "polygon" => Geometry::Polygon { points: parse_points(elem.attr("points").unwrap_or("")) },
        "text" => Geometry::Text {
            x: num("x"),
            y: num("y"),
            font_family: elem.attr("font-family").unwrap_or("Arial").to_owned(),
            font_size: elem.attr("font-size").and_then(parse_dimension).unwrap_or(24.0),
        },
        _ => return None,
    };

    let style = Style {
        fill: elem.attr("fill").map(str::to_owned),
        stroke: elem.attr("stroke").map(str::to_owned),
        stroke_width: elem.attr("stroke-width").and_then(parse_dimension),
        dash_array: elem.attr("stroke-dasharray").map(str::to_owned),
    };

    let text = if local_name(&elem.name) == "text" {
        Some(elem.text.clone())
    } else {
        None
    };

    // Foreign elements may arrive without an id; mint one so the node is
    // addressable for update/animate.
    let id = elem
        .attr("id")
        .map_or_else(ShapeNode::fresh_id, str::to_owned);

    let animations = elem
        .children
        .iter()
        .filter(|c| local_name(&c.name) == "animateTransform")
        .filter_map(lower_animation)
        .collect();

    Some(ShapeNode { id, geometry, style, text, animations })
}

fn lower_animation(elem: &Element) -> Option<Animation> {
    let kind = AnimationKind::from_str(elem.attr("type")?)?;
    let dur = elem.attr("dur").unwrap_or("0");
    let duration_secs = dur.trim_end_matches('s').parse().unwrap_or(0.0);
    Some(Animation { kind, duration_secs })
}

/// Parse a `points` attribute: whitespace-separated `x,y` pairs.
fn parse_points(raw: &str) -> Vec<(f64, f64)> {
    raw.split_whitespace()
        .filter_map(|pair| {
            let (x, y) = pair.split_once(',')?;
            Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
        })
        .collect()
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

// =============================================================================
// XML READER
// =============================================================================

/// Generic element tree the lowering pass consumes.
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

struct Reader<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, bytes: src.as_bytes(), pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.pos, message.into())
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ParseError {
        let mut line = 1;
        let mut column = 1;
        for &b in &self.bytes[..pos.min(self.bytes.len())] {
            if b == b'\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        ParseError { line, column, message: message.into() }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.src[self.pos..].starts_with(prefix)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Skip whitespace, XML prolog, comments, and doctype before the root.
    fn skip_misc(&mut self) {
        loop {
            self.skip_ws();
            if self.starts_with("<?") {
                self.skip_until("?>");
            } else if self.starts_with("<!--") {
                self.skip_until("-->");
            } else if self.starts_with("<!") {
                self.skip_until(">");
            } else {
                return;
            }
        }
    }

    fn skip_until(&mut self, marker: &str) {
        match self.src[self.pos..].find(marker) {
            Some(offset) => self.pos += offset + marker.len(),
            None => self.pos = self.bytes.len(),
        }
    }

    fn read_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b':' | b'_' | b'-' | b'.') {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected a name"));
        }
        Ok(self.src[start..self.pos].to_owned())
    }

    fn parse_element(&mut self) -> Result<Element, ParseError> {
        if self.peek() != Some(b'<') {
            return Err(self.error("expected '<'"));
        }
        self.pos += 1;
        let name = self.read_name()?;
        let mut attrs = Vec::new();

        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'/') => {
                    self.pos += 1;
                    if self.peek() != Some(b'>') {
                        return Err(self.error("expected '>' after '/'"));
                    }
                    self.pos += 1;
                    return Ok(Element { name, attrs, children: Vec::new(), text: String::new() });
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => attrs.push(self.parse_attr()?),
                None => return Err(self.error(format!("unterminated <{name}> tag"))),
            }
        }

        let (children, text) = self.parse_content(&name)?;
        Ok(Element { name, attrs, children, text })
    }

    fn parse_attr(&mut self) -> Result<(String, String), ParseError> {
        let name = self.read_name()?;
        self.skip_ws();
        if self.peek() != Some(b'=') {
            return Err(self.error(format!("expected '=' after attribute '{name}'")));
        }
        self.pos += 1;
        self.skip_ws();
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error(format!("expected quoted value for attribute '{name}'"))),
        };
        self.pos += 1;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == quote {
                let value = unescape(&self.src[start..self.pos]);
                self.pos += 1;
                return Ok((name, value));
            }
            self.pos += 1;
        }
        Err(self.error_at(start, format!("unterminated value for attribute '{name}'")))
    }

    fn parse_content(&mut self, name: &str) -> Result<(Vec<Element>, String), ParseError> {
        let mut children = Vec::new();
        let mut text = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error(format!("missing closing tag for <{name}>"))),
                Some(b'<') => {
                    if self.starts_with("</") {
                        self.pos += 2;
                        let close = self.read_name()?;
                        if close != name {
                            return Err(
                                self.error(format!("closing tag </{close}> does not match <{name}>"))
                            );
                        }
                        self.skip_ws();
                        if self.peek() != Some(b'>') {
                            return Err(self.error(format!("malformed closing tag </{close}>")));
                        }
                        self.pos += 1;
                        return Ok((children, text));
                    }
                    if self.starts_with("<!--") {
                        self.skip_until("-->");
                    } else if self.starts_with("<![CDATA[") {
                        self.pos += "<![CDATA[".len();
                        let start = self.pos;
                        self.skip_until("]]>");
                        let end = self.pos.saturating_sub("]]>".len()).max(start);
                        text.push_str(&self.src[start..end]);
                    } else if self.starts_with("<?") {
                        self.skip_until("?>");
                    } else {
                        children.push(self.parse_element()?);
                    }
                }
                Some(_) => {
                    let start = self.pos;
                    while self.peek().is_some_and(|b| b != b'<') {
                        self.pos += 1;
                    }
                    text.push_str(&unescape(self.src[start..self.pos].trim()));
                }
            }
        }
    }
}

/// Resolve the standard entity references plus numeric character refs.
fn unescape(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_owned();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';') else {
            out.push_str(rest);
            return out;
        };
        let entity = &rest[1..semi];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ => {
                let resolved = entity
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32);
                match resolved {
                    Some(c) => out.push(c),
                    None => out.push_str(&rest[..=semi]),
                }
            }
        }
        rest = &rest[semi + 1..];
    }
    out.push_str(rest);
    out
}
