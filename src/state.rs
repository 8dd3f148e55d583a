//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds one `SessionState` per client session: the live scene document
//! and its bounded undo history. All engine mutations go through the write
//! lock, which serializes concurrent requests for a session — the engine
//! assumes at most one in-flight mutation per session. There is no shared
//! global document; every operation is scoped to an explicit session id.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::history::History;
use crate::scene::Document;

/// Per-session editor state.
#[derive(Debug, Default)]
pub struct SessionState {
    /// The active scene document, if a canvas exists.
    pub doc: Option<Document>,
    /// Bounded undo/redo log of serialized snapshots.
    pub history: History,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — the session map is Arc-wrapped.
#[derive(Clone, Default)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionState>>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
