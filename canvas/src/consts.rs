//! Shared constants for the canvas crate.

use crate::geom::Rect;

// ── Notes ───────────────────────────────────────────────────────

/// Minimum width and height of a note, in pixels.
pub const MIN_NOTE_SIZE: f64 = 100.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Half-size of the square grab area around each note corner, in pixels.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Trash target ────────────────────────────────────────────────

/// Trash target bounds used until the host reports its real layout.
pub const DEFAULT_TRASH: Rect = Rect::new(0.0, 0.0, 80.0, 80.0);

// ── Persistence ─────────────────────────────────────────────────

/// Blob-store key under which the full note mapping is persisted.
pub const NOTES_KEY: &str = "notes";
