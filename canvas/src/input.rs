//! Input model: pointer events and the gesture state machine.
//!
//! `InteractionState` is the active gesture tracked between pointer-down and
//! pointer-up. [`step`] is the whole state machine: it consumes the current
//! state by value together with one `PointerEvent`, reads (never writes) the
//! note store, and returns the replacement state plus the note mutations the
//! caller must apply. Release and pointer-leave finalize identically, so a
//! gesture can never outlive the pointer leaving the board.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use rand::Rng;
use serde::Serialize;
use tracing::warn;

use crate::consts::MIN_NOTE_SIZE;
use crate::doc::{Color, Note, NoteId, NoteStore};
use crate::geom::{Point, Rect, bounding_box};
use crate::hit::{HandleDirection, PressTarget};
use crate::ids::IdGenerator;

/// A pointer event in board-local coordinates (origin at the board's top-left).
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Button pressed on `target`.
    Down { pointer: Point, target: PressTarget },
    /// Pointer moved.
    Move { pointer: Point },
    /// Button released.
    Up { pointer: Point },
    /// Pointer left the board surface.
    Leave { pointer: Point },
}

/// The gesture currently in progress. Exactly one is live at a time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    /// No gesture in progress; waiting for the next press.
    #[default]
    Idle,
    /// A new note is being drawn from `start` (fixed) to `end` (tracks the pointer).
    Creating { start: Point, end: Point },
    /// An existing note is being dragged.
    Moving {
        id: NoteId,
        /// Pointer position at the previous event, used to compute the move delta.
        last_pointer: Point,
        /// Set by the first move event; a release without it is a click (recolor).
        has_moved: bool,
    },
    /// An existing note is being resized by one of its corner handles.
    Resizing { id: NoteId, direction: HandleDirection, last_pointer: Point },
}

/// Preview outline of a note being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wireframe {
    pub rect: Rect,
    /// Whether releasing now would create a note.
    pub big_enough: bool,
}

impl InteractionState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The creation preview, while drawing.
    #[must_use]
    pub fn wireframe(&self) -> Option<Wireframe> {
        let Self::Creating { start, end } = self else {
            return None;
        };
        let rect = bounding_box(*start, *end);
        Some(Wireframe { rect, big_enough: is_big_enough(rect.dimension) })
    }

    /// Whether the trash target should be highlighted (a note is grabbed).
    #[must_use]
    pub fn shows_trash(&self) -> bool {
        matches!(self, Self::Moving { .. })
    }

    /// The note being dragged, once it has actually moved.
    #[must_use]
    pub fn moving_note(&self) -> Option<&NoteId> {
        match self {
            Self::Moving { id, has_moved: true, .. } => Some(id),
            _ => None,
        }
    }
}

/// A change the caller must apply to the note store.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Upsert(Note),
    Delete(NoteId),
}

/// Result of feeding one event to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: InteractionState,
    pub mutations: Vec<Mutation>,
}

impl Transition {
    fn to(state: InteractionState) -> Self {
        Self { state, mutations: Vec::new() }
    }

    fn with(state: InteractionState, mutation: Mutation) -> Self {
        Self { state, mutations: vec![mutation] }
    }
}

/// Collaborators a transition may draw on: fresh ids and colors for newly
/// created notes, and the trash target's bounds for drop-to-delete.
pub struct StepContext<'a, R: ?Sized> {
    pub ids: &'a mut IdGenerator,
    pub rng: &'a mut R,
    pub trash: Rect,
}

/// Whether a drawn box is large enough to become a note.
#[must_use]
pub fn is_big_enough(dimension: Point) -> bool {
    dimension.x > MIN_NOTE_SIZE && dimension.y > MIN_NOTE_SIZE
}

/// Candidate geometry after dragging `direction`'s handle by `delta`.
///
/// The corner opposite the handle stays fixed. No size check is applied here.
#[must_use]
pub fn resize_candidate(direction: HandleDirection, position: Point, dimension: Point, delta: Point) -> Rect {
    let (position, dimension) = match direction {
        HandleDirection::TopLeft => (position + delta, dimension - delta),
        HandleDirection::TopRight => (
            Point::new(position.x, position.y + delta.y),
            Point::new(dimension.x + delta.x, dimension.y - delta.y),
        ),
        HandleDirection::BottomLeft => (
            Point::new(position.x + delta.x, position.y),
            Point::new(dimension.x - delta.x, dimension.y + delta.y),
        ),
        HandleDirection::BottomRight => (position, dimension + delta),
    };
    Rect { position, dimension }
}

/// Advance the state machine by one event.
pub fn step<R: Rng + ?Sized>(
    state: InteractionState,
    event: PointerEvent,
    notes: &NoteStore,
    ctx: &mut StepContext<'_, R>,
) -> Transition {
    match event {
        PointerEvent::Down { pointer, target } => press(state, pointer, target, notes),
        PointerEvent::Move { pointer } => drag(state, pointer, notes),
        PointerEvent::Up { .. } | PointerEvent::Leave { .. } => release(state, notes, ctx),
    }
}

fn press(state: InteractionState, pointer: Point, target: PressTarget, notes: &NoteStore) -> Transition {
    if !state.is_idle() {
        return Transition::to(state);
    }
    match target {
        PressTarget::Board => Transition::to(InteractionState::Creating { start: pointer, end: pointer }),
        PressTarget::Note(id) => {
            if !notes.contains(&id) {
                return abandon(&id);
            }
            Transition::to(InteractionState::Moving { id, last_pointer: pointer, has_moved: false })
        }
        PressTarget::Handle { id, direction } => {
            if !notes.contains(&id) {
                return abandon(&id);
            }
            Transition::to(InteractionState::Resizing { id, direction, last_pointer: pointer })
        }
    }
}

fn drag(state: InteractionState, pointer: Point, notes: &NoteStore) -> Transition {
    match state {
        InteractionState::Idle => Transition::to(InteractionState::Idle),
        InteractionState::Creating { start, .. } => Transition::to(InteractionState::Creating { start, end: pointer }),
        InteractionState::Moving { id, last_pointer, .. } => {
            let Some(note) = notes.get(&id) else {
                return abandon(&id);
            };
            let moved = Note { position: note.position + (pointer - last_pointer), ..note.clone() };
            Transition::with(
                InteractionState::Moving { id, last_pointer: pointer, has_moved: true },
                Mutation::Upsert(moved),
            )
        }
        InteractionState::Resizing { id, direction, last_pointer } => {
            let Some(note) = notes.get(&id) else {
                return abandon(&id);
            };
            let candidate = resize_candidate(direction, note.position, note.dimension, pointer - last_pointer);
            let next = InteractionState::Resizing { id, direction, last_pointer: pointer };

            // Rejecting the whole candidate keeps the fixed corner from drifting
            // when one axis bottoms out.
            if candidate.dimension.x < MIN_NOTE_SIZE || candidate.dimension.y < MIN_NOTE_SIZE {
                return Transition::to(next);
            }
            let resized = Note {
                position: candidate.position,
                dimension: Point::new(
                    candidate.dimension.x.max(MIN_NOTE_SIZE),
                    candidate.dimension.y.max(MIN_NOTE_SIZE),
                ),
                ..note.clone()
            };
            Transition::with(next, Mutation::Upsert(resized))
        }
    }
}

fn release<R: Rng + ?Sized>(state: InteractionState, notes: &NoteStore, ctx: &mut StepContext<'_, R>) -> Transition {
    match state {
        InteractionState::Idle | InteractionState::Resizing { .. } => Transition::to(InteractionState::Idle),
        InteractionState::Creating { start, end } => {
            let rect = bounding_box(start, end);
            if !is_big_enough(rect.dimension) {
                return Transition::to(InteractionState::Idle);
            }
            let note = Note {
                id: fresh_id(ctx.ids, notes),
                position: rect.position,
                dimension: rect.dimension,
                color: Color::random(&mut *ctx.rng),
            };
            Transition::with(InteractionState::Idle, Mutation::Upsert(note))
        }
        InteractionState::Moving { id, has_moved, .. } => {
            let Some(note) = notes.get(&id) else {
                return abandon(&id);
            };
            if note.rect().intersects(&ctx.trash) {
                return Transition::with(InteractionState::Idle, Mutation::Delete(id));
            }
            if has_moved {
                return Transition::to(InteractionState::Idle);
            }
            let recolored = Note { color: Color::random_except(note.color, &mut *ctx.rng), ..note.clone() };
            Transition::with(InteractionState::Idle, Mutation::Upsert(recolored))
        }
    }
}

/// Next generated id not already present on the board.
fn fresh_id(ids: &mut IdGenerator, notes: &NoteStore) -> NoteId {
    loop {
        let id = ids.next();
        if !notes.contains(&id) {
            return id;
        }
        warn!(%id, "generated id already in use; skipping");
    }
}

fn abandon(id: &str) -> Transition {
    warn!(%id, "gesture references a missing note; returning to idle");
    Transition::to(InteractionState::Idle)
}
