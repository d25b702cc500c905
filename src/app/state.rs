//! Central application state.
//!
//! [`AppState`] is the single source of truth the hooks and view models read
//! from. It is mutated only by [`handle_event`](crate::app::handle_event) and
//! by the store when it executes navigation actions.

use crate::app::routes::Route;
use crate::app::slices::{AuthSlice, CommentsSlice, PostsSlice, ProfileSlice};
use crate::worker::RequestId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub auth: AuthSlice,
    pub posts: PostsSlice,
    pub comments: CommentsSlice,
    pub profile: ProfileSlice,
    /// Page the user is on.
    pub route: Route,
    last_request_id: RequestId,
}

impl AppState {
    /// Fresh state, signed in if a token survived from a previous run.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            auth: AuthSlice::new(token),
            ..Self::default()
        }
    }

    /// Allocates the id of the next request.
    pub fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated
    }

    /// Id of the signed-in user, when known.
    #[must_use]
    pub fn current_user_id(&self) -> Option<crate::domain::Id> {
        self.auth
            .user
            .as_ref()
            .or(self.profile.my_profile.as_ref())
            .map(|u| u.id)
    }

    /// Resets everything tied to the signed-in user.
    pub fn sign_out(&mut self) {
        self.auth.logout();
        self.profile.signed_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique_and_increasing() {
        let mut state = AppState::default();
        let a = state.next_request_id();
        let b = state.next_request_id();
        assert!(b > a);
    }

    #[test]
    fn sign_out_forgets_user() {
        let mut state = AppState::new(Some("token".into()));
        assert!(state.is_authenticated());
        state.sign_out();
        assert!(!state.is_authenticated());
        assert_eq!(state.current_user_id(), None);
    }
}
