//! User and profile domain models.
//!
//! A [`User`] is owned by the profile slice as "my profile"; read-only copies
//! are embedded as authors inside posts and comments. A [`PublicProfile`] is
//! what another user's profile page shows, bundled with a page of their posts.

use super::pagination::Paginated;
use super::post::Post;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the server to users, posts, and comments.
pub type Id = u64;

/// A registered user.
///
/// `email` is only present on the caller's own profile; author copies embedded
/// in posts and comments omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl User {
    /// Name to show next to content: the username when set, else the display name.
    #[must_use]
    pub fn handle(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.name)
    }
}

/// Another user's profile as returned by the by-username endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Id,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// The profile owner's posts, paginated by the request's page parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<Paginated<Post>>,
}

/// A user listed as having liked a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeUser {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Owner summary attached to a by-user post listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Id,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A page of one user's posts together with who they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPosts {
    #[serde(flatten)]
    pub page: Paginated<Post>,
    pub user: AuthorSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_copy_without_email_deserializes() {
        let json = r#"{"id":7,"name":"Ada","username":"ada","avatarUrl":"https://cdn/a.png"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.email.is_none());
        assert_eq!(user.avatar_url.as_deref(), Some("https://cdn/a.png"));
        assert_eq!(user.handle(), "ada");
    }

    #[test]
    fn user_posts_flatten_the_page() {
        let json = r#"{"data":[],"total":0,"page":1,"lastPage":1,"user":{"id":4,"name":"Lin","username":"lin"}}"#;
        let listing: UserPosts = serde_json::from_str(json).unwrap();
        assert_eq!(listing.user.username, "lin");
        assert_eq!(listing.page.last_page, 1);
    }

    #[test]
    fn handle_falls_back_to_name() {
        let user = User {
            id: 1,
            name: "Grace".into(),
            email: None,
            username: None,
            headline: None,
            avatar_url: None,
            bio: None,
        };
        assert_eq!(user.handle(), "Grace");
    }
}
