//! Posts slice: the current post list, the open post and the composer.

use super::Generations;
use crate::app::forms::PostComposer;
use crate::domain::{Id, LikeUser, PageParams, Paginated, Post};
use crate::worker::{Feed, Generation};

/// Direction of a comment-count adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentChange {
    Added,
    Removed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsSlice {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u32,
    pub last_page: u32,
    /// Which list `posts` holds.
    pub feed: Option<Feed>,
    /// Paging of the latest list fetch.
    pub params: PageParams,
    pub current_post: Option<Post>,
    /// Users who liked `likes_post_id`, once loaded.
    pub likes: Vec<LikeUser>,
    pub likes_post_id: Option<Id>,
    /// Server copy returned by the latest like toggle, loaded or not.
    pub last_liked: Option<Post>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub composer: PostComposer,
    /// Local fuzzy filter over the loaded page.
    pub quick_filter: String,
    list_generations: Generations,
    post_generations: Generations,
}

impl PostsSlice {
    pub fn list_requested(&mut self, feed: Feed, params: PageParams) -> Generation {
        self.is_loading = true;
        self.error = None;
        self.feed = Some(feed);
        self.params = params;
        self.list_generations.issue()
    }

    /// Replaces the list. Returns `false` if the reply was stale and dropped.
    pub fn list_loaded(&mut self, generation: Generation, page: Paginated<Post>) -> bool {
        if !self.list_generations.is_current(generation) {
            return false;
        }
        let page = page.normalized(self.params.limit);
        self.posts = page.data;
        self.total = page.total;
        self.page = page.page;
        self.last_page = page.last_page;
        self.is_loading = false;
        true
    }

    pub fn list_failed(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if !self.list_generations.is_current(generation) {
            return false;
        }
        self.is_loading = false;
        self.error = Some(message.into());
        true
    }

    pub fn post_requested(&mut self) -> Generation {
        self.is_loading = true;
        self.error = None;
        self.post_generations.issue()
    }

    pub fn post_loaded(&mut self, generation: Generation, post: Post) -> bool {
        if !self.post_generations.is_current(generation) {
            return false;
        }
        if self.likes_post_id.is_some_and(|id| id != post.id) {
            self.likes.clear();
            self.likes_post_id = None;
        }
        self.current_post = Some(post);
        self.is_loading = false;
        true
    }

    pub fn post_failed(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if !self.post_generations.is_current(generation) {
            return false;
        }
        self.is_loading = false;
        self.error = Some(message.into());
        true
    }

    /// Pending reducer shared by create, update and delete.
    pub fn mutation_started(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn mutation_failed(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }

    pub fn created(&mut self, post: Post) {
        self.is_loading = false;
        self.posts.insert(0, post);
        self.composer = PostComposer::default();
    }

    pub fn updated(&mut self, post: Post) {
        self.is_loading = false;
        self.composer = PostComposer::default();
        self.replace(post);
    }

    pub fn deleted(&mut self, id: Id) {
        self.is_loading = false;
        self.posts.retain(|p| p.id != id);
        if self.current_post.as_ref().is_some_and(|p| p.id == id) {
            self.current_post = None;
        }
        if self.likes_post_id == Some(id) {
            self.likes.clear();
            self.likes_post_id = None;
        }
    }

    /// Adopts the server's copy of a liked or unliked post.
    ///
    /// The copy is kept even when the post is neither listed nor open.
    pub fn like_toggled(&mut self, post: Post) {
        self.replace(post.clone());
        self.last_liked = Some(post);
    }

    /// Likers of `post_id`, whether or not that post is open.
    pub fn likes_loaded(&mut self, post_id: Id, likes: Vec<LikeUser>) {
        self.likes = likes;
        self.likes_post_id = Some(post_id);
    }

    /// Loaded likers of `post_id`, if the latest likes reply was for it.
    #[must_use]
    pub fn likes_of(&self, post_id: Id) -> Option<&[LikeUser]> {
        (self.likes_post_id == Some(post_id)).then_some(self.likes.as_slice())
    }

    /// Keeps the cached comment counter in step with comment mutations.
    pub fn adjust_comment_count(&mut self, post_id: Id, change: CommentChange) {
        let apply = |post: &mut Post| match change {
            CommentChange::Added => post.record_comment_added(),
            CommentChange::Removed => post.record_comment_removed(),
        };
        self.posts.iter_mut().filter(|p| p.id == post_id).for_each(apply);
        self.current_post
            .iter_mut()
            .filter(|p| p.id == post_id)
            .for_each(apply);
    }

    pub fn set_quick_filter(&mut self, filter: impl Into<String>) {
        self.quick_filter = filter.into();
    }

    pub fn clear(&mut self) {
        *self = Self {
            list_generations: self.list_generations,
            post_generations: self.post_generations,
            ..Self::default()
        };
    }

    pub fn clear_current(&mut self) {
        self.current_post = None;
        self.likes.clear();
        self.likes_post_id = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn replace(&mut self, post: Post) {
        for slot in self.posts.iter_mut().filter(|p| p.id == post.id) {
            *slot = post.clone();
        }
        if let Some(current) = self.current_post.as_mut().filter(|p| p.id == post.id) {
            *current = post;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use chrono::Utc;

    fn post(id: Id, comments: u64) -> Post {
        Post {
            id,
            title: format!("Post {id}"),
            content: "content".into(),
            tags: vec![],
            image_url: None,
            author: User {
                id: 1,
                name: "Ada".into(),
                email: None,
                username: Some("ada".into()),
                headline: None,
                avatar_url: None,
                bio: None,
            },
            created_at: Utc::now(),
            updated_at: None,
            likes: 0,
            comments,
        }
    }

    fn page(posts: Vec<Post>) -> Paginated<Post> {
        Paginated {
            total: posts.len() as u64,
            data: posts,
            page: 1,
            last_page: 1,
        }
    }

    #[test]
    fn stale_list_reply_is_dropped() {
        let mut slice = PostsSlice::default();
        let first = slice.list_requested(Feed::Recommended, PageParams::default());
        let second = slice.list_requested(Feed::MostLiked, PageParams::default());

        assert!(slice.list_loaded(second, page(vec![post(2, 0)])));
        assert!(!slice.list_loaded(first, page(vec![post(1, 0)])));
        assert_eq!(slice.posts.len(), 1);
        assert_eq!(slice.posts[0].id, 2);
    }

    #[test]
    fn comment_count_never_goes_negative() {
        let mut slice = PostsSlice {
            posts: vec![post(1, 0)],
            current_post: Some(post(1, 0)),
            ..Default::default()
        };
        slice.adjust_comment_count(1, CommentChange::Added);
        assert_eq!(slice.posts[0].comments, 1);
        assert_eq!(slice.current_post.as_ref().map(|p| p.comments), Some(1));

        slice.adjust_comment_count(1, CommentChange::Removed);
        slice.adjust_comment_count(1, CommentChange::Removed);
        assert_eq!(slice.posts[0].comments, 0);
        assert_eq!(slice.current_post.as_ref().map(|p| p.comments), Some(0));
    }

    #[test]
    fn create_puts_post_first_and_resets_composer() {
        let mut slice = PostsSlice {
            posts: vec![post(1, 0)],
            ..Default::default()
        };
        slice.composer.title.set("Draft");
        slice.mutation_started();
        slice.created(post(2, 0));
        assert_eq!(slice.posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
        assert!(slice.composer.title.value.is_empty());
        assert!(!slice.is_loading);
    }

    #[test]
    fn delete_clears_matching_current_post() {
        let mut slice = PostsSlice {
            posts: vec![post(1, 0), post(2, 0)],
            current_post: Some(post(1, 0)),
            ..Default::default()
        };
        slice.deleted(1);
        assert_eq!(slice.posts.len(), 1);
        assert!(slice.current_post.is_none());
    }

    #[test]
    fn like_adopts_server_copy() {
        let mut slice = PostsSlice {
            posts: vec![post(1, 0)],
            current_post: Some(post(1, 0)),
            ..Default::default()
        };
        let mut liked = post(1, 0);
        liked.likes = 7;
        slice.like_toggled(liked);
        assert_eq!(slice.posts[0].likes, 7);
        assert_eq!(slice.current_post.as_ref().map(|p| p.likes), Some(7));
        assert_eq!(slice.last_liked.as_ref().map(|p| p.likes), Some(7));
    }

    #[test]
    fn like_of_unloaded_post_keeps_server_copy() {
        let mut slice = PostsSlice::default();
        let mut liked = post(4, 0);
        liked.likes = 3;
        slice.like_toggled(liked);
        assert!(slice.posts.is_empty());
        assert_eq!(slice.last_liked.as_ref().map(|p| (p.id, p.likes)), Some((4, 3)));
    }

    #[test]
    fn likers_are_kept_for_posts_that_are_not_open() {
        let mut slice = PostsSlice {
            current_post: Some(post(1, 0)),
            ..Default::default()
        };
        slice.likes_loaded(2, vec![]);
        assert_eq!(slice.likes_of(2), Some(&[][..]));
        assert_eq!(slice.likes_of(1), None);
    }

    #[test]
    fn clear_keeps_generations_monotonic() {
        let mut slice = PostsSlice::default();
        let before = slice.list_requested(Feed::Mine, PageParams::default());
        slice.clear();
        let after = slice.list_requested(Feed::Mine, PageParams::default());
        assert!(after > before);
        assert!(!slice.list_loaded(before, page(vec![])));
    }
}
