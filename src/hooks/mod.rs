//! Per-slice facades over the [`Store`].
//!
//! A hook borrows the store mutably for as long as it is used. Its read
//! accessors look at one slice; its async operations dispatch an event, settle
//! every request that follows from it, and report the outcome of the first one
//! as a `Result`. The slice keeps the error message for display either way.
//!
//! ```no_run
//! use blogline::api::HttpBlogApi;
//! use blogline::app::{SessionContext, Store};
//! use blogline::domain::Credentials;
//! use blogline::storage::MemoryTokenStore;
//!
//! # async fn demo(api: HttpBlogApi) -> blogline::domain::Result<()> {
//! let session = SessionContext::new(Box::new(MemoryTokenStore::default()), Credentials::default())?;
//! let mut store = Store::new(api, session);
//! store.auth().login_with("ada@example.com", "correct-horse").await?;
//! let post = store.post().fetch(7).await?;
//! println!("{}", post.title);
//! # Ok(())
//! # }
//! ```

mod auth;
mod comments;
mod post;
mod posts;
mod profile;

pub use auth::AuthHook;
pub use comments::CommentsHook;
pub use post::PostHook;
pub use posts::PostsHook;
pub use profile::ProfileHook;

use crate::api::BlogApi;
use crate::app::{Event, Store};
use crate::domain::error::{BloglineError, Result};
use crate::worker::RequestId;

impl<A: BlogApi> Store<A> {
    pub fn auth(&mut self) -> AuthHook<'_, A> {
        AuthHook::new(self)
    }

    pub fn posts(&mut self) -> PostsHook<'_, A> {
        PostsHook::new(self)
    }

    pub fn post(&mut self) -> PostHook<'_, A> {
        PostHook::new(self)
    }

    pub fn comments(&mut self) -> CommentsHook<'_, A> {
        CommentsHook::new(self)
    }

    pub fn profile(&mut self) -> ProfileHook<'_, A> {
        ProfileHook::new(self)
    }
}

/// Runs `event` to completion and reports how its first request went.
///
/// Returns `Ok(None)` when the event sent nothing, which happens when it only
/// redirected to the login page.
async fn settle_request<A: BlogApi>(
    store: &mut Store<A>,
    event: Event,
) -> Result<Option<RequestId>> {
    let ids = store.run(event).await?;
    let outcome = match ids.first() {
        Some(&id) => store.take_outcome(id).map(|()| Some(id)),
        None => Ok(None),
    };
    store.forget_outcomes();
    outcome
}

/// Like [`settle_request`] for intents that need a session.
async fn settle_signed_in<A: BlogApi>(store: &mut Store<A>, event: Event) -> Result<()> {
    match settle_request(store, event).await? {
        Some(_) => Ok(()),
        None => Err(BloglineError::NotAuthenticated),
    }
}

/// The value a successful request left in the state, or a decode error naming what was missing.
fn loaded<T>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| BloglineError::Decode(format!("{what} missing after a successful reply")))
}
