use super::{loaded, settle_request, settle_signed_in};
use crate::api::BlogApi;
use crate::app::forms::PostComposer;
use crate::app::{Event, Store};
use crate::domain::error::Result;
use crate::domain::{Id, LikeUser, Post};

/// One post: reading it, writing it, and liking it.
pub struct PostHook<'a, A> {
    store: &'a mut Store<A>,
}

impl<'a, A: BlogApi> PostHook<'a, A> {
    pub(super) fn new(store: &'a mut Store<A>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Post> {
        self.store.state().posts.current_post.as_ref()
    }

    #[must_use]
    pub fn likes(&self) -> &[LikeUser] {
        &self.store.state().posts.likes
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.store.state().posts.is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.store.state().posts.error.as_deref()
    }

    /// Whether the signed-in user wrote the current post.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        let state = self.store.state();
        match (state.current_user_id(), &state.posts.current_post) {
            (Some(user_id), Some(post)) => post.is_authored_by(user_id),
            _ => false,
        }
    }

    /// # Errors
    ///
    /// Returns the server's rejection, or a decode error if a newer fetch
    /// replaced the post before this one was read.
    pub async fn fetch(&mut self, id: Id) -> Result<Post> {
        settle_request(self.store, Event::FetchPost(id)).await?;
        loaded(self.current().filter(|p| p.id == id).cloned(), "post")
    }

    pub fn composer(&self) -> &PostComposer {
        &self.store.state().posts.composer
    }

    /// The draft; image and tag rules are checked as it is edited.
    pub fn composer_mut(&mut self) -> &mut PostComposer {
        &mut self.store.state_mut().posts.composer
    }

    /// Starts editing `post` in the composer.
    pub fn edit(&mut self, post: &Post) {
        *self.composer_mut() = PostComposer::editing(post);
    }

    /// Publishes the composer as a new post and moves to its page.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when signed out (after redirecting to the
    /// login page), the draft's validation error, or the server's rejection.
    pub async fn create(&mut self) -> Result<Post> {
        self.composer_mut().editing = None;
        settle_signed_in(self.store, Event::SubmitPost).await?;
        loaded(self.store.state().posts.posts.first().cloned(), "created post")
    }

    /// Saves the composer over the post it is editing and moves to its page.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create). A composer that is not editing a post
    /// is published as a new one.
    pub async fn update(&mut self) -> Result<Post> {
        let Some(id) = self.composer().editing else {
            return self.create().await;
        };
        settle_signed_in(self.store, Event::SubmitPost).await?;
        let posts = &self.store.state().posts;
        let updated = posts
            .current_post
            .iter()
            .chain(posts.posts.iter())
            .find(|p| p.id == id)
            .cloned();
        loaded(updated, "updated post")
    }

    /// # Errors
    ///
    /// Returns the server's rejection.
    pub async fn delete(&mut self, id: Id) -> Result<()> {
        settle_request(self.store, Event::DeletePost(id)).await.map(|_| ())
    }

    /// Likes or unlikes `id` and returns the like count the server reports.
    ///
    /// The post does not need to be loaded first.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when signed out, with no request sent and the
    /// store on the login page. Otherwise returns the server's rejection.
    pub async fn toggle_like(&mut self, id: Id) -> Result<u64> {
        settle_signed_in(self.store, Event::ToggleLike(id)).await?;
        let liked = self
            .store
            .state()
            .posts
            .last_liked
            .as_ref()
            .filter(|p| p.id == id)
            .map(|p| p.likes);
        loaded(liked, "liked post")
    }

    /// Loads who liked `id`, open or not.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection.
    pub async fn fetch_likes(&mut self, id: Id) -> Result<&[LikeUser]> {
        settle_request(self.store, Event::FetchLikes(id)).await?;
        loaded(self.store.state().posts.likes_of(id), "likes")
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn clear_current(&mut self) -> Result<()> {
        self.store.dispatch(Event::ClearCurrentPost).map(|_| ())
    }
}
