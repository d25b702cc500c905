//! Post and comment domain models.
//!
//! `Post::comments` is a denormalized counter stored by the server alongside
//! the post. The client never recounts loaded comments; it adjusts the counter
//! by one on each successful comment create or delete.

use super::user::{Id, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub author: User,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Like count as reported by the server.
    #[serde(default)]
    pub likes: u64,
    /// Cached comment count.
    #[serde(default)]
    pub comments: u64,
}

impl Post {
    /// Adds one to the cached comment counter.
    pub fn record_comment_added(&mut self) {
        self.comments = self.comments.saturating_add(1);
    }

    /// Removes one from the cached comment counter, never going below zero.
    pub fn record_comment_removed(&mut self) {
        self.comments = self.comments.saturating_sub(1);
    }

    /// Whether `user_id` wrote this post.
    #[must_use]
    pub const fn is_authored_by(&self, user_id: Id) -> bool {
        self.author.id == user_id
    }
}

/// Reference to the post a comment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    pub id: Id,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Id,
    pub content: String,
    pub author: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostRef>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Post id carried by the comment, if the server included it.
    #[must_use]
    pub fn post_id(&self) -> Option<Id> {
        self.post.map(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_comments(count: u64) -> Post {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Hello",
            "content": "First post on the platform",
            "author": { "id": 3, "name": "Ada" },
            "createdAt": "2024-05-01T10:00:00Z",
            "comments": count
        }))
        .unwrap()
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let post = post_with_comments(0);
        assert_eq!(post.likes, 0);
        assert!(post.tags.is_empty());
    }

    #[test]
    fn comment_counter_floors_at_zero() {
        let mut post = post_with_comments(0);
        post.record_comment_removed();
        assert_eq!(post.comments, 0);
        post.record_comment_added();
        post.record_comment_added();
        post.record_comment_removed();
        assert_eq!(post.comments, 1);
    }

    #[test]
    fn comment_exposes_post_id() {
        let comment: Comment = serde_json::from_value(serde_json::json!({
            "id": 10,
            "content": "Nice",
            "author": { "id": 2, "name": "Grace" },
            "post": { "id": 1 },
            "createdAt": "2024-05-01T11:00:00Z"
        }))
        .unwrap();
        assert_eq!(comment.post_id(), Some(1));
    }
}
