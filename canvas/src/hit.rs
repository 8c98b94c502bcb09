//! Press-target resolution: which note or handle (if any) is under a point.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::{Note, NoteId, NoteStore};
use crate::geom::{Point, Rect};

/// Corner handle a resize gesture drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandleDirection {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl HandleDirection {
    pub const ALL: [HandleDirection; 4] =
        [HandleDirection::TopLeft, HandleDirection::TopRight, HandleDirection::BottomLeft, HandleDirection::BottomRight];

    /// The board-local corner of `rect` this handle sits on.
    #[must_use]
    pub fn corner(self, rect: &Rect) -> Point {
        match self {
            Self::TopLeft => rect.position,
            Self::TopRight => Point::new(rect.right(), rect.position.y),
            Self::BottomLeft => Point::new(rect.position.x, rect.bottom()),
            Self::BottomRight => Point::new(rect.right(), rect.bottom()),
        }
    }
}

/// What a pointer press landed on. A press is consumed by the innermost
/// target: a handle beats its note body, a note body beats the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressTarget {
    /// Empty board surface.
    Board,
    /// A note body.
    Note(NoteId),
    /// One of a note's corner handles.
    Handle { id: NoteId, direction: HandleDirection },
}

/// Resolve the press target under `pt`.
///
/// Notes are checked topmost first (reverse creation order). For each note
/// the handles are checked before the body, so a corner press starts a
/// resize rather than a move.
#[must_use]
pub fn hit_test(pt: Point, store: &NoteStore) -> PressTarget {
    for note in store.sorted_notes().into_iter().rev() {
        if let Some(direction) = handle_at(pt, note) {
            return PressTarget::Handle { id: note.id.clone(), direction };
        }
        if note.rect().contains(pt) {
            return PressTarget::Note(note.id.clone());
        }
    }
    PressTarget::Board
}

fn handle_at(pt: Point, note: &Note) -> Option<HandleDirection> {
    let rect = note.rect();
    HandleDirection::ALL.into_iter().find(|direction| {
        let corner = direction.corner(&rect);
        (pt.x - corner.x).abs() <= HANDLE_RADIUS_PX && (pt.y - corner.y).abs() <= HANDLE_RADIUS_PX
    })
}
