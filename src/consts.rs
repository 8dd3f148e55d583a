//! Shared numeric constants for the vector engine.

// ── Units ───────────────────────────────────────────────────────

/// Device pixels per millimetre (CSS 96 dpi).
pub const PX_PER_MM: f64 = 3.779_527_559_1;

/// Device pixels per centimetre.
pub const PX_PER_CM: f64 = 37.795_275_591;

// ── Canvas defaults ─────────────────────────────────────────────

/// Canvas width used when a mutation arrives with no active document.
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;

/// Canvas height used when a mutation arrives with no active document.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots retained per session; the oldest is
/// evicted when a push would exceed this.
pub const MAX_HISTORY: usize = 10;

// ── Tracer ──────────────────────────────────────────────────────

/// Square cell size (device units) for the block-quantized trace.
pub const TRACE_CELL: u32 = 5;
