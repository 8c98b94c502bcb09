#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::storage::MemoryBlobStore;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn far_trash() -> Rect {
    Rect::new(5000.0, 5000.0, 80.0, 80.0)
}

fn make_note(id: &str, x: f64, y: f64, w: f64, h: f64) -> Note {
    Note { id: id.to_string(), position: pt(x, y), dimension: pt(w, h), color: Color::Orange }
}

fn store_with(notes: Vec<Note>) -> NoteStore {
    let mut store = NoteStore::new(Box::new(MemoryBlobStore::new()));
    for note in notes {
        store.upsert(note);
    }
    store
}

/// Feed `event` to the machine and apply the resulting mutations to `store`.
struct Harness {
    store: NoteStore,
    ids: IdGenerator,
    rng: StdRng,
    trash: Rect,
    state: InteractionState,
}

impl Harness {
    fn new(notes: Vec<Note>) -> Self {
        let store = store_with(notes);
        let ids = IdGenerator::seeded_from(store.all().map(|(id, _)| id));
        Self { store, ids, rng: StdRng::seed_from_u64(42), trash: far_trash(), state: InteractionState::Idle }
    }

    fn send(&mut self, event: PointerEvent) -> Vec<Mutation> {
        let mut ctx = StepContext { ids: &mut self.ids, rng: &mut self.rng, trash: self.trash };
        let state = std::mem::take(&mut self.state);
        let transition = step(state, event, &self.store, &mut ctx);
        self.state = transition.state;
        for mutation in &transition.mutations {
            match mutation {
                Mutation::Upsert(note) => self.store.upsert(note.clone()),
                Mutation::Delete(id) => {
                    self.store.delete(id);
                }
            }
        }
        transition.mutations
    }

    fn down(&mut self, x: f64, y: f64, target: PressTarget) -> Vec<Mutation> {
        self.send(PointerEvent::Down { pointer: pt(x, y), target })
    }

    fn move_to(&mut self, x: f64, y: f64) -> Vec<Mutation> {
        self.send(PointerEvent::Move { pointer: pt(x, y) })
    }

    fn up(&mut self, x: f64, y: f64) -> Vec<Mutation> {
        self.send(PointerEvent::Up { pointer: pt(x, y) })
    }

    fn leave(&mut self, x: f64, y: f64) -> Vec<Mutation> {
        self.send(PointerEvent::Leave { pointer: pt(x, y) })
    }

    fn note(&self, id: &str) -> &Note {
        self.store.get(id).unwrap()
    }
}

fn handle(id: &str, direction: HandleDirection) -> PressTarget {
    PressTarget::Handle { id: id.to_string(), direction }
}

fn on_note(id: &str) -> PressTarget {
    PressTarget::Note(id.to_string())
}

// =============================================================
// InteractionState
// =============================================================

#[test]
fn state_default_is_idle() {
    assert!(InteractionState::default().is_idle());
}

#[test]
fn state_serializes_with_tag() {
    let json = serde_json::to_value(InteractionState::Moving {
        id: "3".into(),
        last_pointer: pt(1.0, 2.0),
        has_moved: true,
    })
    .unwrap();
    assert_eq!(json["state"], "moving");
    assert_eq!(json["id"], "3");
    assert_eq!(json["has_moved"], true);
}

#[test]
fn wireframe_only_while_creating() {
    assert!(InteractionState::Idle.wireframe().is_none());
    let creating = InteractionState::Creating { start: pt(200.0, 150.0), end: pt(10.0, 10.0) };
    let wf = creating.wireframe().unwrap();
    assert_eq!(wf.rect, Rect::new(10.0, 10.0, 190.0, 140.0));
    assert!(wf.big_enough);
}

#[test]
fn wireframe_small_box_is_not_big_enough() {
    let creating = InteractionState::Creating { start: pt(0.0, 0.0), end: pt(100.0, 300.0) };
    assert!(!creating.wireframe().unwrap().big_enough);
}

#[test]
fn trash_shown_only_while_moving() {
    assert!(!InteractionState::Idle.shows_trash());
    assert!(InteractionState::Moving { id: "0".into(), last_pointer: pt(0.0, 0.0), has_moved: false }.shows_trash());
    assert!(
        !InteractionState::Resizing { id: "0".into(), direction: HandleDirection::TopLeft, last_pointer: pt(0.0, 0.0) }
            .shows_trash()
    );
}

#[test]
fn moving_note_requires_has_moved() {
    let held = InteractionState::Moving { id: "0".into(), last_pointer: pt(0.0, 0.0), has_moved: false };
    assert!(held.moving_note().is_none());
    let dragged = InteractionState::Moving { id: "0".into(), last_pointer: pt(0.0, 0.0), has_moved: true };
    assert_eq!(dragged.moving_note().map(String::as_str), Some("0"));
}

// =============================================================
// resize_candidate
// =============================================================

#[test]
fn resize_candidate_top_left() {
    let r = resize_candidate(HandleDirection::TopLeft, pt(100.0, 100.0), pt(200.0, 200.0), pt(10.0, -20.0));
    assert_eq!(r, Rect::new(110.0, 80.0, 190.0, 220.0));
}

#[test]
fn resize_candidate_top_right() {
    let r = resize_candidate(HandleDirection::TopRight, pt(100.0, 100.0), pt(200.0, 200.0), pt(10.0, -20.0));
    assert_eq!(r, Rect::new(100.0, 80.0, 210.0, 220.0));
}

#[test]
fn resize_candidate_bottom_left() {
    let r = resize_candidate(HandleDirection::BottomLeft, pt(100.0, 100.0), pt(200.0, 200.0), pt(10.0, -20.0));
    assert_eq!(r, Rect::new(110.0, 100.0, 190.0, 180.0));
}

#[test]
fn resize_candidate_bottom_right() {
    let r = resize_candidate(HandleDirection::BottomRight, pt(100.0, 100.0), pt(200.0, 200.0), pt(10.0, -20.0));
    assert_eq!(r, Rect::new(100.0, 100.0, 210.0, 180.0));
}

#[test]
fn resize_candidate_keeps_opposite_corner_fixed() {
    let position = pt(100.0, 100.0);
    let dimension = pt(200.0, 200.0);
    let delta = pt(17.0, -9.0);
    let before = Rect { position, dimension };
    for direction in HandleDirection::ALL {
        let after = resize_candidate(direction, position, dimension, delta);
        let opposite = match direction {
            HandleDirection::TopLeft => HandleDirection::BottomRight,
            HandleDirection::TopRight => HandleDirection::BottomLeft,
            HandleDirection::BottomLeft => HandleDirection::TopRight,
            HandleDirection::BottomRight => HandleDirection::TopLeft,
        };
        assert_eq!(opposite.corner(&after), opposite.corner(&before), "{direction:?}");
    }
}

// =============================================================
// Creating
// =============================================================

#[test]
fn press_on_board_starts_creating() {
    let mut h = Harness::new(vec![]);
    let mutations = h.down(10.0, 10.0, PressTarget::Board);
    assert!(mutations.is_empty());
    assert_eq!(h.state, InteractionState::Creating { start: pt(10.0, 10.0), end: pt(10.0, 10.0) });
}

#[test]
fn move_while_creating_tracks_end_without_mutation() {
    let mut h = Harness::new(vec![]);
    h.down(10.0, 10.0, PressTarget::Board);
    let mutations = h.move_to(200.0, 150.0);
    assert!(mutations.is_empty());
    assert!(h.store.is_empty());
    assert_eq!(h.state, InteractionState::Creating { start: pt(10.0, 10.0), end: pt(200.0, 150.0) });
}

#[test]
fn release_large_box_creates_note() {
    let mut h = Harness::new(vec![]);
    h.down(10.0, 10.0, PressTarget::Board);
    h.move_to(200.0, 150.0);
    let mutations = h.up(200.0, 150.0);
    assert_eq!(mutations.len(), 1);
    assert!(h.state.is_idle());
    assert_eq!(h.store.len(), 1);
    let note = h.note("0");
    assert_eq!(note.position, pt(10.0, 10.0));
    assert_eq!(note.dimension, pt(190.0, 140.0));
}

#[test]
fn release_reverse_drag_creates_normalized_note() {
    let mut h = Harness::new(vec![]);
    h.down(300.0, 300.0, PressTarget::Board);
    h.move_to(100.0, 50.0);
    h.up(100.0, 50.0);
    let note = h.note("0");
    assert_eq!(note.position, pt(100.0, 50.0));
    assert_eq!(note.dimension, pt(200.0, 250.0));
}

#[test]
fn release_small_box_creates_nothing() {
    let mut h = Harness::new(vec![]);
    h.down(10.0, 10.0, PressTarget::Board);
    h.move_to(50.0, 50.0);
    let mutations = h.up(50.0, 50.0);
    assert!(mutations.is_empty());
    assert!(h.store.is_empty());
    assert!(h.state.is_idle());
}

#[test]
fn release_exactly_min_size_creates_nothing() {
    let mut h = Harness::new(vec![]);
    h.down(0.0, 0.0, PressTarget::Board);
    h.move_to(100.0, 250.0);
    h.up(100.0, 250.0);
    assert!(h.store.is_empty());
}

#[test]
fn created_ids_continue_from_existing() {
    let mut h = Harness::new(vec![make_note("0", 0.0, 0.0, 100.0, 100.0), make_note("7", 0.0, 0.0, 100.0, 100.0)]);
    h.down(500.0, 500.0, PressTarget::Board);
    h.move_to(700.0, 700.0);
    h.up(700.0, 700.0);
    assert!(h.store.contains("8"));
}

#[test]
fn created_id_skips_ids_already_on_board() {
    let mut h = Harness::new(vec![make_note("x", 0.0, 0.0, 100.0, 100.0)]);
    h.ids = IdGenerator::starting_at(0);
    h.store.upsert(make_note("0", 0.0, 0.0, 100.0, 100.0));
    h.down(500.0, 500.0, PressTarget::Board);
    h.move_to(700.0, 700.0);
    h.up(700.0, 700.0);
    assert_eq!(h.store.len(), 3);
    assert_eq!(h.note("0").position, pt(0.0, 0.0));
    assert_eq!(h.note("1").position, pt(500.0, 500.0));
}

#[test]
fn leave_while_creating_finalizes() {
    let mut h = Harness::new(vec![]);
    h.down(10.0, 10.0, PressTarget::Board);
    h.move_to(200.0, 150.0);
    h.leave(900.0, 900.0);
    assert!(h.state.is_idle());
    assert_eq!(h.note("0").dimension, pt(190.0, 140.0));
}

// =============================================================
// Moving
// =============================================================

#[test]
fn press_on_note_starts_moving() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(120.0, 130.0, on_note("0"));
    assert_eq!(h.state, InteractionState::Moving { id: "0".into(), last_pointer: pt(120.0, 130.0), has_moved: false });
}

#[test]
fn move_applies_incremental_delta() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(120.0, 130.0, on_note("0"));
    h.move_to(130.0, 150.0);
    assert_eq!(h.note("0").position, pt(110.0, 120.0));
    h.move_to(125.0, 140.0);
    assert_eq!(h.note("0").position, pt(105.0, 110.0));
    assert_eq!(h.note("0").dimension, pt(150.0, 150.0));
    assert_eq!(h.state, InteractionState::Moving { id: "0".into(), last_pointer: pt(125.0, 140.0), has_moved: true });
}

#[test]
fn drag_release_keeps_color() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(120.0, 130.0, on_note("0"));
    h.move_to(300.0, 300.0);
    let mutations = h.up(300.0, 300.0);
    assert!(mutations.is_empty());
    assert_eq!(h.note("0").color, Color::Orange);
    assert!(h.state.is_idle());
}

#[test]
fn click_recolors_without_moving() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    for _ in 0..20 {
        let before = h.note("0").clone();
        h.down(120.0, 130.0, on_note("0"));
        let mutations = h.up(120.0, 130.0);
        assert_eq!(mutations.len(), 1);
        let after = h.note("0");
        assert_ne!(after.color, before.color);
        assert_eq!(after.position, before.position);
        assert_eq!(after.dimension, before.dimension);
    }
}

#[test]
fn drop_on_trash_deletes_without_recolor() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.trash = Rect::new(0.0, 600.0, 400.0, 400.0);
    h.down(120.0, 120.0, on_note("0"));
    h.move_to(120.0, 720.0);
    let mutations = h.up(120.0, 720.0);
    assert_eq!(mutations, vec![Mutation::Delete("0".into())]);
    assert!(h.store.is_empty());
    assert!(h.state.is_idle());
}

#[test]
fn partial_overlap_with_trash_deletes() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.trash = Rect::new(240.0, 240.0, 80.0, 80.0);
    h.down(120.0, 120.0, on_note("0"));
    h.move_to(121.0, 121.0);
    h.up(121.0, 121.0);
    assert!(h.store.is_empty());
}

#[test]
fn touching_trash_edge_does_not_delete() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.trash = Rect::new(250.0, 100.0, 80.0, 80.0);
    h.down(120.0, 120.0, on_note("0"));
    h.move_to(120.0, 120.0);
    h.up(120.0, 120.0);
    assert!(h.store.contains("0"));
}

#[test]
fn leave_while_moving_finalizes_drop() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.trash = Rect::new(0.0, 0.0, 80.0, 80.0);
    h.down(120.0, 120.0, on_note("0"));
    h.move_to(50.0, 50.0);
    h.leave(50.0, 50.0);
    assert!(h.store.is_empty());
    assert!(h.state.is_idle());
}

#[test]
fn press_on_missing_note_stays_idle() {
    let mut h = Harness::new(vec![]);
    let mutations = h.down(0.0, 0.0, on_note("ghost"));
    assert!(mutations.is_empty());
    assert!(h.state.is_idle());
}

#[test]
fn gesture_on_vanished_note_is_abandoned() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(120.0, 120.0, on_note("0"));
    h.store.delete("0");
    let mutations = h.move_to(130.0, 130.0);
    assert!(mutations.is_empty());
    assert!(h.state.is_idle());
}

// =============================================================
// Resizing
// =============================================================

#[test]
fn press_on_handle_starts_resizing() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(250.0, 250.0, handle("0", HandleDirection::BottomRight));
    assert_eq!(
        h.state,
        InteractionState::Resizing {
            id: "0".into(),
            direction: HandleDirection::BottomRight,
            last_pointer: pt(250.0, 250.0)
        }
    );
}

#[test]
fn resize_bottom_right_grows_and_shrinks() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(250.0, 250.0, handle("0", HandleDirection::BottomRight));
    h.move_to(270.0, 245.0);
    assert_eq!(h.note("0").dimension, pt(170.0, 145.0));
    assert_eq!(h.note("0").position, pt(100.0, 100.0));
}

#[test]
fn resize_below_minimum_discards_whole_candidate() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(250.0, 250.0, handle("0", HandleDirection::BottomRight));
    let mutations = h.move_to(150.0, 245.0);
    assert!(mutations.is_empty());
    assert_eq!(h.note("0").dimension, pt(150.0, 150.0));
    assert_eq!(h.note("0").position, pt(100.0, 100.0));
    assert_eq!(
        h.state,
        InteractionState::Resizing {
            id: "0".into(),
            direction: HandleDirection::BottomRight,
            last_pointer: pt(150.0, 245.0)
        }
    );
}

#[test]
fn resize_top_left_moves_position() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(100.0, 100.0, handle("0", HandleDirection::TopLeft));
    h.move_to(80.0, 120.0);
    assert_eq!(h.note("0").position, pt(80.0, 120.0));
    assert_eq!(h.note("0").dimension, pt(170.0, 130.0));
}

#[test]
fn resize_top_left_rejected_does_not_drift() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(100.0, 100.0, handle("0", HandleDirection::TopLeft));
    h.move_to(180.0, 110.0);
    assert_eq!(h.note("0").position, pt(100.0, 100.0));
    assert_eq!(h.note("0").dimension, pt(150.0, 150.0));
}

#[test]
fn resize_to_exact_minimum_is_allowed() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(250.0, 100.0, handle("0", HandleDirection::TopRight));
    h.move_to(200.0, 150.0);
    assert_eq!(h.note("0").position, pt(100.0, 150.0));
    assert_eq!(h.note("0").dimension, pt(100.0, 100.0));
}

#[test]
fn resize_top_right_then_rejected_candidate() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(250.0, 100.0, handle("0", HandleDirection::TopRight));
    h.move_to(280.0, 80.0);
    assert_eq!(h.note("0").position, pt(100.0, 80.0));
    assert_eq!(h.note("0").dimension, pt(180.0, 170.0));

    let mutations = h.move_to(180.0, 70.0);
    assert!(mutations.is_empty());
    assert_eq!(h.note("0").position, pt(100.0, 80.0));
    assert_eq!(h.note("0").dimension, pt(180.0, 170.0));

    h.move_to(190.0, 60.0);
    assert_eq!(h.note("0").position, pt(100.0, 70.0));
    assert_eq!(h.note("0").dimension, pt(190.0, 180.0));
}

#[test]
fn resize_bottom_left() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(100.0, 250.0, handle("0", HandleDirection::BottomLeft));
    h.move_to(90.0, 300.0);
    assert_eq!(h.note("0").position, pt(90.0, 100.0));
    assert_eq!(h.note("0").dimension, pt(160.0, 200.0));
}

#[test]
fn resize_sequence_never_violates_minimum() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    let path = [(10.0, -60.0), (-200.0, 40.0), (-3.0, -3.0), (400.0, 400.0), (-390.0, -10.0), (-50.0, -500.0)];
    for direction in HandleDirection::ALL {
        let mut pointer = pt(300.0, 300.0);
        h.down(pointer.x, pointer.y, handle("0", direction));
        for (dx, dy) in path {
            pointer = pt(pointer.x + dx, pointer.y + dy);
            h.move_to(pointer.x, pointer.y);
            let note = h.note("0");
            assert!(note.dimension.x >= MIN_NOTE_SIZE, "{direction:?} {note:?}");
            assert!(note.dimension.y >= MIN_NOTE_SIZE, "{direction:?} {note:?}");
        }
        h.up(pointer.x, pointer.y);
    }
}

#[test]
fn release_while_resizing_returns_idle() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(250.0, 250.0, handle("0", HandleDirection::BottomRight));
    h.move_to(260.0, 260.0);
    let mutations = h.up(260.0, 260.0);
    assert!(mutations.is_empty());
    assert!(h.state.is_idle());
    assert_eq!(h.note("0").dimension, pt(160.0, 160.0));
}

// =============================================================
// Idle and re-entrancy
// =============================================================

#[test]
fn move_and_release_while_idle_are_noops() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    assert!(h.move_to(10.0, 10.0).is_empty());
    assert!(h.up(10.0, 10.0).is_empty());
    assert!(h.leave(10.0, 10.0).is_empty());
    assert!(h.state.is_idle());
}

#[test]
fn press_during_gesture_is_ignored() {
    let mut h = Harness::new(vec![make_note("0", 100.0, 100.0, 150.0, 150.0)]);
    h.down(10.0, 10.0, PressTarget::Board);
    h.down(120.0, 120.0, on_note("0"));
    assert_eq!(h.state, InteractionState::Creating { start: pt(10.0, 10.0), end: pt(10.0, 10.0) });
}
