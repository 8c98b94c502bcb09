//! Note model: the color palette, the persisted note shape, and the store.
//!
//! `Note` is what gets serialized to the blob store and what the host draws.
//! `NoteStore` is the single owner of the live note mapping; every mutation
//! through it rewrites the whole mapping into the backing [`BlobStore`]
//! under [`NOTES_KEY`].
//!
//! Persistence is best-effort. A corrupt or unreadable blob at startup loads
//! as an empty board, and a failed write is logged and otherwise ignored.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::consts::{MIN_NOTE_SIZE, NOTES_KEY};
use crate::geom::{Point, Rect};
use crate::ids::parse_numeric_id;
use crate::storage::BlobStore;

/// Unique, immutable identifier for a note. Never reused once assigned.
pub type NoteId = String;

/// Note background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Cyan,
    Green,
    Orange,
    Pink,
    Purple,
    Red,
    Yellow,
}

impl Color {
    /// The full palette.
    pub const ALL: [Color; 7] =
        [Color::Cyan, Color::Green, Color::Orange, Color::Pink, Color::Purple, Color::Red, Color::Yellow];

    /// Pick any palette color uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Color {
        Self::ALL.choose(rng).copied().unwrap_or(Color::Yellow)
    }

    /// Pick uniformly among the palette colors other than `except`.
    pub fn random_except<R: Rng + ?Sized>(except: Color, rng: &mut R) -> Color {
        let candidates: Vec<Color> = Self::ALL.iter().copied().filter(|c| *c != except).collect();
        candidates.choose(rng).copied().unwrap_or(except)
    }

    /// Lowercase palette name, as persisted.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cyan => "cyan",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Yellow => "yellow",
        }
    }
}

/// A note as stored in the blob store and drawn by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Top-left corner in board-local pixels.
    pub position: Point,
    /// Width (`x`) and height (`y`) in pixels; both stay at or above `MIN_NOTE_SIZE`.
    pub dimension: Point,
    pub color: Color,
}

impl Note {
    /// The note's bounding box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect { position: self.position, dimension: self.dimension }
    }

    /// Whether the geometry is finite and both sides are at least `MIN_NOTE_SIZE`.
    #[must_use]
    pub fn has_valid_geometry(&self) -> bool {
        let finite = [self.position.x, self.position.y, self.dimension.x, self.dimension.y]
            .iter()
            .all(|v| v.is_finite());
        finite && self.dimension.x >= MIN_NOTE_SIZE && self.dimension.y >= MIN_NOTE_SIZE
    }
}

/// Re-key persisted entries by note id and drop notes that break the
/// geometry invariant.
fn sanitize(raw: HashMap<NoteId, Note>) -> HashMap<NoteId, Note> {
    // Entries already under their own id win over re-keyed duplicates.
    let mut entries: Vec<(NoteId, Note)> = raw.into_iter().collect();
    entries.sort_by(|a, b| (a.0 != a.1.id, &a.0).cmp(&(b.0 != b.1.id, &b.0)));

    let mut notes = HashMap::with_capacity(entries.len());
    for (key, note) in entries {
        if !note.has_valid_geometry() {
            warn!(
                %key,
                id = %note.id,
                position = ?note.position,
                dimension = ?note.dimension,
                "dropping persisted note with invalid geometry"
            );
            continue;
        }
        if key != note.id {
            warn!(%key, id = %note.id, "persisted note stored under a foreign key; re-keying by id");
        }
        if notes.contains_key(&note.id) {
            warn!(id = %note.id, "dropping duplicate persisted note");
            continue;
        }
        notes.insert(note.id.clone(), note);
    }
    notes
}

/// In-memory note mapping, persisted wholesale on every mutation.
pub struct NoteStore {
    notes: HashMap<NoteId, Note>,
    blob: Box<dyn BlobStore>,
}

impl NoteStore {
    /// Create an empty store backed by `blob`. Nothing is read from `blob`.
    #[must_use]
    pub fn new(blob: Box<dyn BlobStore>) -> Self {
        Self { notes: HashMap::new(), blob }
    }

    /// Hydrate the store from `blob`.
    ///
    /// A missing key yields an empty board. An unreadable or corrupt blob is
    /// logged and also yields an empty board. Entries are re-keyed by their
    /// own `id`; notes with non-finite geometry or a side below
    /// `MIN_NOTE_SIZE` are dropped.
    #[must_use]
    pub fn load(blob: Box<dyn BlobStore>) -> Self {
        let notes = match blob.get(NOTES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<HashMap<NoteId, Note>>(&raw) {
                Ok(notes) => sanitize(notes),
                Err(e) => {
                    warn!(error = %e, "persisted notes are corrupt; starting with an empty board");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!(error = %e, "failed to read persisted notes; starting with an empty board");
                HashMap::new()
            }
        };
        info!(count = notes.len(), "loaded notes");
        Self { notes, blob }
    }

    /// Return a note by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Whether a note with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.notes.contains_key(id)
    }

    /// Insert or replace a note, keyed by its `id`, then persist.
    pub fn upsert(&mut self, note: Note) {
        self.notes.insert(note.id.clone(), note);
        self.persist();
    }

    /// Remove a note by id, returning it if it was present. Persists only if
    /// something was removed.
    pub fn delete(&mut self, id: &str) -> Option<Note> {
        let removed = self.notes.remove(id);
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    /// All `(id, note)` pairs in unspecified order.
    pub fn all(&self) -> impl Iterator<Item = (&NoteId, &Note)> {
        self.notes.iter()
    }

    /// Notes in creation order: numeric ids ascending, then any other ids
    /// lexicographically. Later entries are drawn on top.
    #[must_use]
    pub fn sorted_notes(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.values().collect();
        notes.sort_by(|a, b| {
            match (parse_numeric_id(&a.id), parse_numeric_id(&b.id)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                (Err(_), Err(_)) => a.id.cmp(&b.id),
            }
        });
        notes
    }

    /// The backing blob store.
    #[must_use]
    pub fn blob(&self) -> &dyn BlobStore {
        self.blob.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.notes) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to serialize notes");
                return;
            }
        };
        if let Err(e) = self.blob.set(NOTES_KEY, &raw) {
            warn!(error = %e, "failed to persist notes");
            return;
        }
        debug!(count = self.notes.len(), bytes = raw.len(), "persisted notes");
    }
}
