use super::settle_request;
use crate::api::BlogApi;
use crate::app::slices::PostsSlice;
use crate::app::{Event, Store};
use crate::domain::error::Result;
use crate::domain::{Id, PageParams, Post};
use crate::worker::Feed;

/// Post lists: the feeds, search, and an author's posts.
pub struct PostsHook<'a, A> {
    store: &'a mut Store<A>,
}

impl<'a, A: BlogApi> PostsHook<'a, A> {
    pub(super) fn new(store: &'a mut Store<A>) -> Self {
        Self { store }
    }

    fn slice(&self) -> &PostsSlice {
        &self.store.state().posts
    }

    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.slice().posts
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.slice().total
    }

    /// Current page and last page, after normalization.
    #[must_use]
    pub fn page(&self) -> (u32, u32) {
        (self.slice().page, self.slice().last_page)
    }

    #[must_use]
    pub fn feed(&self) -> Option<&Feed> {
        self.slice().feed.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.slice().is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.slice().error.as_deref()
    }

    /// Loads one page of `feed` into the list.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection. A reply overtaken by a newer fetch
    /// leaves the list alone but still reports its own outcome.
    pub async fn fetch(&mut self, feed: Feed, page: PageParams) -> Result<&[Post]> {
        settle_request(self.store, Event::FetchFeed { feed, page }).await?;
        Ok(self.posts())
    }

    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn recommended(&mut self, page: PageParams) -> Result<&[Post]> {
        self.fetch(Feed::Recommended, page).await
    }

    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn most_liked(&mut self, page: PageParams) -> Result<&[Post]> {
        self.fetch(Feed::MostLiked, page).await
    }

    /// The signed-in user's posts.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn mine(&mut self, page: PageParams) -> Result<&[Post]> {
        self.fetch(Feed::Mine, page).await
    }

    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn search(&mut self, query: &str, page: PageParams) -> Result<&[Post]> {
        self.fetch(Feed::Search(query.to_string()), page).await
    }

    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn by_author(&mut self, username: &str, page: PageParams) -> Result<&[Post]> {
        self.fetch(Feed::Author(username.to_string()), page).await
    }

    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn by_author_id(&mut self, user_id: Id, page: PageParams) -> Result<&[Post]> {
        self.fetch(Feed::AuthorId(user_id), page).await
    }

    /// Next page of the current feed, if there is one.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn next_page(&mut self) -> Result<bool> {
        let slice = self.slice();
        let Some(feed) = slice.feed.clone() else {
            return Ok(false);
        };
        if slice.page >= slice.last_page {
            return Ok(false);
        }
        let params = slice.params.next();
        self.fetch(feed, params).await?;
        Ok(true)
    }

    #[must_use]
    pub fn quick_filter(&self) -> &str {
        &self.slice().quick_filter
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn set_quick_filter(&mut self, filter: impl Into<String>) -> Result<()> {
        self.store
            .dispatch(Event::SetQuickFilter(filter.into()))
            .map(|_| ())
    }

    /// # Errors
    ///
    /// Never fails.
    pub fn clear(&mut self) -> Result<()> {
        self.store.dispatch(Event::ClearPosts).map(|_| ())
    }

    pub fn clear_error(&mut self) {
        self.store.state_mut().posts.clear_error();
    }
}
