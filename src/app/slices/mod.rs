//! State slices.
//!
//! Each slice owns one group of entities plus the UI-only fields around them
//! (loading flags, error strings, form drafts). Reducers are plain synchronous
//! methods; the event handler decides which ones run for a given event and
//! which cross-slice reactions follow.
//!
//! Fetches that replace a snapshot go through a [`Generations`] counter: the
//! pending reducer issues a new generation, and a reply tagged with an older
//! one is dropped so a slow response cannot overwrite a newer one.

pub mod auth;
pub mod comments;
pub mod posts;
pub mod profile;

pub use auth::AuthSlice;
pub use comments::CommentsSlice;
pub use posts::{CommentChange, PostsSlice};
pub use profile::ProfileSlice;

use crate::worker::Generation;

/// Latest-wins counter for snapshot fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generations {
    latest: Generation,
}

impl Generations {
    /// Issues a generation newer than every earlier one.
    pub fn issue(&mut self) -> Generation {
        self.latest += 1;
        self.latest
    }

    /// Whether a reply tagged `generation` is from the latest fetch.
    #[must_use]
    pub const fn is_current(&self, generation: Generation) -> bool {
        generation == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_generation_is_current() {
        let mut generations = Generations::default();
        let first = generations.issue();
        let second = generations.issue();
        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
    }
}
