//! Interaction and state engine for the sticky-notes board.
//!
//! This crate owns everything with real logic behind the board: translating a
//! stream of board-local pointer events into note mutations, keeping note
//! geometry inside its size invariant, and persisting the note collection to
//! an external blob store. The host surface is responsible only for capturing
//! pointer positions, forwarding them to the engine, and drawing what the
//! engine reports through [`engine::Action`]s and its render queries.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Board-level controller [`engine::EngineCore`] |
//! | [`input`] | Pointer events and the gesture state machine |
//! | [`doc`] | Note model, color palette, and the persisted [`doc::NoteStore`] |
//! | [`storage`] | Key-value blob stores backing persistence |
//! | [`ids`] | Monotonic note id generator |
//! | [`hit`] | Press-target resolution against notes and handles |
//! | [`geom`] | Vector arithmetic and bounding boxes |
//! | [`consts`] | Shared numeric constants (minimum note size, handle slop, etc.) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod ids;
pub mod input;
pub mod storage;
