//! Note id generation.
//!
//! Ids are decimal strings of a counter. The counter itself is never
//! persisted; it is rederived at startup as one past the largest numeric id
//! already on the board, so ids freed by deletion are not handed out again
//! within a board's lifetime.

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;

use std::num::ParseIntError;

use crate::doc::NoteId;

/// Parse an id as a non-negative decimal integer.
///
/// # Errors
///
/// Returns the parse error for ids that are not plain decimal integers.
pub fn parse_numeric_id(id: &str) -> Result<u64, ParseIntError> {
    id.parse::<u64>()
}

/// Monotonic counter handing out fresh note ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Start counting at `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Seed from existing ids: one past the largest numeric id, or `0` when
    /// none of the ids is numeric.
    pub fn seeded_from<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a NoteId>,
    {
        let next = ids
            .into_iter()
            .flat_map(|id| parse_numeric_id(id))
            .max()
            .map_or(0, |max| max.saturating_add(1));
        Self { next }
    }

    /// The id the next call to [`IdGenerator::next`] will return.
    #[must_use]
    pub fn peek(&self) -> NoteId {
        self.next.to_string()
    }

    /// Hand out the next id and advance.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> NoteId {
        let id = self.next.to_string();
        self.next = self.next.saturating_add(1);
        id
    }
}
