use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::doc::{Note, NoteId, NoteStore};
use crate::geom::{Point, Rect};
use crate::hit::{PressTarget, hit_test};
use crate::ids::IdGenerator;
use crate::input::{InteractionState, Mutation, PointerEvent, StepContext, Transition, Wireframe, step};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    NoteCreated { note: Note },
    NoteUpdated { note: Note },
    NoteDeleted { id: NoteId },
    /// Interaction state or notes changed; the host should redraw.
    RenderNeeded,
}

/// Everything a presentation layer needs to redraw, besides the notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot<'a> {
    pub state: &'a InteractionState,
    /// Creation preview, while drawing.
    pub wireframe: Option<Wireframe>,
    /// Highlight the trash target.
    pub shows_trash: bool,
    /// Note to draw with the lifted look.
    pub moving_id: Option<&'a NoteId>,
    /// Show the "draw a rectangle" hint.
    pub shows_empty_hint: bool,
    pub note_count: usize,
}

/// Board-level controller.
///
/// Owns the note store, the id generator, and the single live
/// `InteractionState`. Every pointer event is run through the state
/// machine, its mutations are applied to the store (which persists them),
/// and the host is told what changed.
pub struct EngineCore {
    notes: NoteStore,
    ids: IdGenerator,
    input: InteractionState,
    rng: StdRng,
    trash: Rect,
}

impl EngineCore {
    /// Build a controller over `notes`. The id generator is seeded from the
    /// ids already on the board. `seed` makes color picks reproducible;
    /// without one the OS entropy source is used.
    #[must_use]
    pub fn new(notes: NoteStore, trash: Rect, seed: Option<u64>) -> Self {
        let ids = IdGenerator::seeded_from(notes.all().map(|(id, _)| id));
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!(notes = notes.len(), next_id = %ids.peek(), "board ready");
        Self { notes, ids, input: InteractionState::Idle, rng, trash }
    }

    // --- Input events ---

    /// Press on an explicit target.
    pub fn on_pointer_down(&mut self, pointer: Point, target: PressTarget) -> Vec<Action> {
        self.handle(PointerEvent::Down { pointer, target })
    }

    /// Press at a point, resolving the target by hit-testing the notes.
    pub fn on_pointer_down_at(&mut self, pointer: Point) -> Vec<Action> {
        let target = hit_test(pointer, &self.notes);
        self.on_pointer_down(pointer, target)
    }

    pub fn on_pointer_move(&mut self, pointer: Point) -> Vec<Action> {
        self.handle(PointerEvent::Move { pointer })
    }

    pub fn on_pointer_up(&mut self, pointer: Point) -> Vec<Action> {
        self.handle(PointerEvent::Up { pointer })
    }

    pub fn on_pointer_leave(&mut self, pointer: Point) -> Vec<Action> {
        self.handle(PointerEvent::Leave { pointer })
    }

    /// Run one event through the state machine and apply the outcome.
    pub fn handle(&mut self, event: PointerEvent) -> Vec<Action> {
        let previous = std::mem::take(&mut self.input);
        let before = previous.clone();
        let mut ctx = StepContext { ids: &mut self.ids, rng: &mut self.rng, trash: self.trash };
        let Transition { state, mutations } = step(previous, event, &self.notes, &mut ctx);

        let mut actions: Vec<Action> = mutations.into_iter().filter_map(|m| self.apply(m)).collect();
        if state != before {
            debug!(?state, "interaction state changed");
        }
        if !actions.is_empty() || state != before {
            actions.push(Action::RenderNeeded);
        }
        self.input = state;
        actions
    }

    fn apply(&mut self, mutation: Mutation) -> Option<Action> {
        match mutation {
            Mutation::Upsert(note) => {
                let created = !self.notes.contains(&note.id);
                self.notes.upsert(note.clone());
                if created {
                    info!(id = %note.id, color = note.color.name(), "note created");
                    Some(Action::NoteCreated { note })
                } else {
                    Some(Action::NoteUpdated { note })
                }
            }
            Mutation::Delete(id) => {
                self.notes.delete(&id)?;
                info!(%id, "note dropped on trash");
                Some(Action::NoteDeleted { id })
            }
        }
    }

    // --- Trash target ---

    /// Move the trash target, e.g. after the host lays out or resizes the board.
    pub fn set_trash(&mut self, trash: Rect) -> Vec<Action> {
        self.trash = trash;
        vec![Action::RenderNeeded]
    }

    #[must_use]
    pub fn trash(&self) -> Rect {
        self.trash
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.input
    }

    #[must_use]
    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    /// Look up a note by id.
    #[must_use]
    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Creation preview outline, while drawing.
    #[must_use]
    pub fn wireframe(&self) -> Option<Wireframe> {
        self.input.wireframe()
    }

    #[must_use]
    pub fn shows_trash(&self) -> bool {
        self.input.shows_trash()
    }

    /// Whether `id` is being dragged (drawn with the lifted look).
    #[must_use]
    pub fn is_moving(&self, id: &str) -> bool {
        self.input.moving_note().is_some_and(|moving| moving == id)
    }

    /// Whether to show the empty-board hint: no notes and no gesture.
    #[must_use]
    pub fn shows_empty_hint(&self) -> bool {
        self.notes.is_empty() && self.input.is_idle()
    }

    /// Current render feedback in one value.
    #[must_use]
    pub fn render_snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            state: &self.input,
            wireframe: self.wireframe(),
            shows_trash: self.shows_trash(),
            moving_id: self.input.moving_note(),
            shows_empty_hint: self.shows_empty_hint(),
            note_count: self.notes.len(),
        }
    }
}
