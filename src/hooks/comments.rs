use super::{loaded, settle_request, settle_signed_in};
use crate::api::BlogApi;
use crate::app::{Event, Store};
use crate::domain::error::Result;
use crate::domain::{Comment, Id};

/// Comments of the post being read.
pub struct CommentsHook<'a, A> {
    store: &'a mut Store<A>,
}

impl<'a, A: BlogApi> CommentsHook<'a, A> {
    pub(super) fn new(store: &'a mut Store<A>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.store.state().comments.comments
    }

    #[must_use]
    pub fn post_id(&self) -> Option<Id> {
        self.store.state().comments.post_id
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.store.state().comments.is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.store.state().comments.error.as_deref()
    }

    /// Whether the signed-in user may delete `comment`.
    #[must_use]
    pub fn can_delete(&self, comment: &Comment) -> bool {
        self.store
            .state()
            .current_user_id()
            .is_some_and(|id| id == comment.author.id)
    }

    /// # Errors
    ///
    /// Returns the server's rejection.
    pub async fn fetch(&mut self, post_id: Id) -> Result<&[Comment]> {
        settle_request(self.store, Event::FetchComments(post_id)).await?;
        Ok(self.comments())
    }

    /// Adds a comment and bumps the post's counter.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when signed out, `EmptyComment` for blank
    /// text, or the server's rejection.
    pub async fn create(&mut self, post_id: Id, content: &str) -> Result<Comment> {
        let event = Event::CreateComment {
            post_id,
            content: content.to_string(),
        };
        settle_signed_in(self.store, event).await?;
        let created = self.store.state().comments.last_created.clone();
        loaded(created, "created comment")
    }

    /// Removes a comment and lowers the post's counter.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection.
    pub async fn delete(&mut self, comment_id: Id, post_id: Id) -> Result<()> {
        settle_request(self.store, Event::DeleteComment { comment_id, post_id })
            .await
            .map(|_| ())
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn clear(&mut self) -> Result<()> {
        self.store.dispatch(Event::ClearComments).map(|_| ())
    }
}
