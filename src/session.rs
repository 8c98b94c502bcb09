//! Headless board surface: JSON-lines pointer events in, engine actions out.
//!
//! Each input line is one event in board-local coordinates. Presses without
//! an explicit target are resolved by hit-testing. Every action the engine
//! emits is written back as one JSON line. Whenever the engine asks for a
//! redraw, a `{"render": ...}` line follows with the interaction state,
//! creation wireframe, trash highlight, moving note and empty-board hint.
//!
//! Malformed lines are logged and skipped. If the stream ends mid-gesture
//! the gesture is finalized as if the pointer had left the board.

use std::io::{BufRead, Write};

use canvas::engine::{Action, EngineCore, RenderSnapshot};
use canvas::geom::{Point, Rect};
use canvas::hit::PressTarget;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode action: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One input line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventLine {
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        target: Option<PressTarget>,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
    },
    Leave {
        x: f64,
        y: f64,
    },
    /// The host laid out the trash target somewhere new.
    Trash {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Output line carrying render feedback.
#[derive(Debug, Serialize)]
struct RenderLine<'a> {
    render: RenderSnapshot<'a>,
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub events: usize,
    pub skipped: usize,
}

/// Drive `core` with every event line from `input`, writing actions to `out`.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails. Undecodable
/// lines are not errors.
pub fn run_session<R: BufRead, W: Write>(core: &mut EngineCore, input: R, mut out: W) -> Result<SessionStats, HostError> {
    let mut stats = SessionStats::default();
    let mut last_pointer = Point::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = match serde_json::from_str::<EventLine>(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = index + 1, error = %e, "skipping malformed event");
                stats.skipped += 1;
                continue;
            }
        };
        debug!(line = index + 1, ?event, "event");
        let actions = dispatch(core, event, &mut last_pointer);
        emit(&mut out, core, &actions)?;
        stats.events += 1;
    }

    if !core.state().is_idle() {
        warn!("input ended mid-gesture; finalizing as pointer leave");
        let actions = core.on_pointer_leave(last_pointer);
        emit(&mut out, core, &actions)?;
    }
    out.flush()?;
    Ok(stats)
}

fn dispatch(core: &mut EngineCore, event: EventLine, last_pointer: &mut Point) -> Vec<Action> {
    match event {
        EventLine::Down { x, y, target } => {
            *last_pointer = Point::new(x, y);
            match target {
                Some(target) => core.on_pointer_down(*last_pointer, target),
                None => core.on_pointer_down_at(*last_pointer),
            }
        }
        EventLine::Move { x, y } => {
            *last_pointer = Point::new(x, y);
            core.on_pointer_move(*last_pointer)
        }
        EventLine::Up { x, y } => {
            *last_pointer = Point::new(x, y);
            core.on_pointer_up(*last_pointer)
        }
        EventLine::Leave { x, y } => {
            *last_pointer = Point::new(x, y);
            core.on_pointer_leave(*last_pointer)
        }
        EventLine::Trash { x, y, width, height } => core.set_trash(Rect::new(x, y, width, height)),
    }
}

fn emit<W: Write>(out: &mut W, core: &EngineCore, actions: &[Action]) -> Result<(), HostError> {
    for action in actions {
        serde_json::to_writer(&mut *out, action)?;
        writeln!(out)?;
    }
    if actions.iter().any(|a| matches!(a, Action::RenderNeeded)) {
        serde_json::to_writer(&mut *out, &RenderLine { render: core.render_snapshot() })?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
