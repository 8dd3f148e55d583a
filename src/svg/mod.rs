//! SVG wire codec: the canonical textual format for documents.
//!
//! ARCHITECTURE
//! ============
//! The scene model is the source of truth; SVG is how it travels — to the
//! browser, into history snapshots, and through import/export. [`write`]
//! serializes a [`crate::scene::Document`] to SVG text and [`parse`] reads
//! SVG text back, so export-then-import round-trips every element the
//! engine itself produces. The parser is a hand-written recursive-descent
//! reader over the XML subset the editor emits and tolerates in foreign
//! files; it is not a general-purpose XML library.

pub mod parse;
pub mod write;

pub use parse::{ImportWarning, ParseError, parse_document};
pub use write::write_document;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
