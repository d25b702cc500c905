//! REST endpoint paths.
//!
//! Paths are kept as segment lists rather than strings so that user-supplied
//! parts such as usernames are percent-encoded when joined onto the base URL.

use crate::domain::Id;
use std::fmt;

/// A path relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath(Vec<String>);

impl ApiPath {
    fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Raw, unencoded segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

// Auth

#[must_use]
pub fn login() -> ApiPath {
    ApiPath::new(["auth", "login"])
}

#[must_use]
pub fn register() -> ApiPath {
    ApiPath::new(["auth", "register"])
}

// Users

#[must_use]
pub fn me() -> ApiPath {
    ApiPath::new(["users", "me"])
}

#[must_use]
pub fn user_by_username(username: &str) -> ApiPath {
    ApiPath::new(["users", "by-username", username])
}

#[must_use]
pub fn user_by_id(id: Id) -> ApiPath {
    ApiPath::new(["users".to_string(), id.to_string()])
}

#[must_use]
pub fn update_profile() -> ApiPath {
    ApiPath::new(["users", "profile"])
}

#[must_use]
pub fn change_password() -> ApiPath {
    ApiPath::new(["users", "password"])
}

// Posts

#[must_use]
pub fn recommended() -> ApiPath {
    ApiPath::new(["posts", "recommended"])
}

#[must_use]
pub fn most_liked() -> ApiPath {
    ApiPath::new(["posts", "most-liked"])
}

#[must_use]
pub fn my_posts() -> ApiPath {
    ApiPath::new(["posts", "my-posts"])
}

#[must_use]
pub fn search() -> ApiPath {
    ApiPath::new(["posts", "search"])
}

#[must_use]
pub fn posts_by_username(username: &str) -> ApiPath {
    ApiPath::new(["posts", "by-username", username])
}

#[must_use]
pub fn posts_by_user(user_id: Id) -> ApiPath {
    ApiPath::new(["posts".to_string(), "by-user".to_string(), user_id.to_string()])
}

#[must_use]
pub fn posts() -> ApiPath {
    ApiPath::new(["posts"])
}

/// Single post: `GET`, `PATCH` and `DELETE` share this path.
#[must_use]
pub fn post(id: Id) -> ApiPath {
    ApiPath::new(["posts".to_string(), id.to_string()])
}

#[must_use]
pub fn like(id: Id) -> ApiPath {
    ApiPath::new(["posts".to_string(), id.to_string(), "like".to_string()])
}

#[must_use]
pub fn likes(id: Id) -> ApiPath {
    ApiPath::new(["posts".to_string(), id.to_string(), "likes".to_string()])
}

// Comments

/// Comments of a post: `GET` lists them, `POST` adds one.
#[must_use]
pub fn comments(post_id: Id) -> ApiPath {
    ApiPath::new(["comments".to_string(), post_id.to_string()])
}

#[must_use]
pub fn comment(comment_id: Id) -> ApiPath {
    ApiPath::new(["comments".to_string(), comment_id.to_string()])
}

#[must_use]
pub fn health() -> ApiPath {
    ApiPath::new(["health"])
}
