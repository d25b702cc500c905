//! Comments slice: the comment list of one post and the comment draft.

use super::Generations;
use crate::app::forms::Field;
use crate::domain::{Comment, Id};
use crate::worker::Generation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentsSlice {
    pub comments: Vec<Comment>,
    /// Post the list belongs to.
    pub post_id: Option<Id>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub draft: Field,
    /// Comment returned by the latest successful create.
    pub last_created: Option<Comment>,
    generations: Generations,
}

impl CommentsSlice {
    pub fn fetch_requested(&mut self) -> Generation {
        self.is_loading = true;
        self.error = None;
        self.generations.issue()
    }

    /// Replaces the list wholesale. Returns `false` for a stale reply.
    pub fn loaded(&mut self, generation: Generation, post_id: Id, comments: Vec<Comment>) -> bool {
        if !self.generations.is_current(generation) {
            return false;
        }
        self.comments = comments;
        self.post_id = Some(post_id);
        self.is_loading = false;
        true
    }

    pub fn fetch_failed(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if !self.generations.is_current(generation) {
            return false;
        }
        self.is_loading = false;
        self.error = Some(message.into());
        true
    }

    pub fn mutation_started(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn mutation_failed(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }

    /// Appends `comment` if the list belongs to `post_id`.
    pub fn created(&mut self, post_id: Id, comment: Comment) {
        self.is_loading = false;
        self.draft = Field::default();
        if self.post_id == Some(post_id) {
            self.comments.push(comment.clone());
        }
        self.last_created = Some(comment);
    }

    /// Removes the comment if the list belongs to `post_id`.
    pub fn deleted(&mut self, post_id: Id, comment_id: Id) {
        self.is_loading = false;
        if self.post_id == Some(post_id) {
            self.comments.retain(|c| c.id != comment_id);
        }
    }

    pub fn clear(&mut self) {
        self.comments.clear();
        self.post_id = None;
        self.is_loading = false;
        self.error = None;
        self.draft = Field::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use chrono::Utc;

    fn comment(id: Id) -> Comment {
        Comment {
            id,
            content: format!("comment {id}"),
            author: User {
                id: 9,
                name: "Grace".into(),
                email: None,
                username: None,
                headline: None,
                avatar_url: None,
                bio: None,
            },
            post: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn failure_leaves_list_untouched() {
        let mut slice = CommentsSlice::default();
        let generation = slice.fetch_requested();
        slice.loaded(generation, 3, vec![comment(1), comment(2)]);

        slice.mutation_started();
        slice.mutation_failed("Comment not found");
        assert_eq!(slice.comments.len(), 2);
        assert_eq!(slice.error.as_deref(), Some("Comment not found"));
    }

    #[test]
    fn create_appends_and_delete_removes() {
        let mut slice = CommentsSlice::default();
        let generation = slice.fetch_requested();
        slice.loaded(generation, 3, vec![]);
        slice.draft.set("hello");
        slice.created(3, comment(1));
        slice.created(3, comment(2));
        assert!(slice.draft.value.is_empty());
        slice.deleted(3, 1);
        assert_eq!(slice.comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn replies_for_another_post_leave_the_list_alone() {
        let mut slice = CommentsSlice::default();
        let generation = slice.fetch_requested();
        slice.loaded(generation, 11, vec![comment(1)]);

        slice.created(10, comment(99));
        slice.deleted(10, 1);

        assert_eq!(slice.post_id, Some(11));
        assert_eq!(slice.comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(slice.last_created.as_ref().map(|c| c.id), Some(99));
    }

    #[test]
    fn opening_another_post_replaces_the_list() {
        let mut slice = CommentsSlice::default();
        let first = slice.fetch_requested();
        slice.loaded(first, 1, vec![comment(1)]);
        let second = slice.fetch_requested();
        slice.loaded(second, 2, vec![comment(5), comment(6)]);
        assert_eq!(slice.post_id, Some(2));
        assert_eq!(slice.comments.len(), 2);
    }
}
