//! Domain services over the REST API.
//!
//! [`BlogApi`] is the seam between the store and the network: one method per
//! API call, each returning the decoded domain type. The production
//! implementation is [`HttpBlogApi`]; tests substitute an in-memory fake.
//!
//! # Modules
//!
//! - [`client`]: reqwest wrapper (auth header, deadline, error mapping, 401)
//! - [`endpoints`]: endpoint paths
//! - [`http`]: [`BlogApi`] over [`client::HttpClient`]

pub mod client;
pub mod endpoints;
pub mod http;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use http::HttpBlogApi;

use crate::domain::{
    AuthResponse, ChangePasswordDto, Comment, CreateCommentDto, CreatePostDto, Id, LikeUser,
    LoginDto, PageParams, Paginated, PasswordChangeResponse, Post, PublicProfile, RegisterDto,
    RegisterResponse, Result, SearchParams, UpdatePostDto, UpdateProfileDto, User, UserPosts,
};
use async_trait::async_trait;

/// The blog platform's REST API, one method per call.
///
/// Implementations must be shareable across tasks. Failures are reported as
/// [`BloglineError`](crate::domain::BloglineError); a 401 is reported as
/// `Unauthorized` after the implementation has dropped its in-memory token.
#[async_trait]
pub trait BlogApi: Send + Sync {
    // Auth

    async fn login(&self, credentials: &LoginDto) -> Result<AuthResponse>;

    async fn register(&self, data: &RegisterDto) -> Result<RegisterResponse>;

    // Profile

    async fn my_profile(&self) -> Result<User>;

    /// Another user's profile bundled with a page of their posts.
    async fn public_profile(&self, username: &str, page: PageParams) -> Result<PublicProfile>;

    async fn user_by_id(&self, id: Id) -> Result<User>;

    /// Sends only the fields present in `data`, as multipart.
    async fn update_profile(&self, data: &UpdateProfileDto) -> Result<User>;

    async fn change_password(&self, data: &ChangePasswordDto) -> Result<PasswordChangeResponse>;

    // Posts

    async fn recommended_posts(&self, page: PageParams) -> Result<Paginated<Post>>;

    async fn most_liked_posts(&self, page: PageParams) -> Result<Paginated<Post>>;

    async fn my_posts(&self, page: PageParams) -> Result<Paginated<Post>>;

    async fn search_posts(&self, params: &SearchParams) -> Result<Paginated<Post>>;

    async fn posts_by_username(&self, username: &str, page: PageParams) -> Result<UserPosts>;

    async fn posts_by_user(&self, user_id: Id, page: PageParams) -> Result<UserPosts>;

    async fn post(&self, id: Id) -> Result<Post>;

    async fn create_post(&self, data: &CreatePostDto) -> Result<Post>;

    async fn update_post(&self, id: Id, data: &UpdatePostDto) -> Result<Post>;

    async fn delete_post(&self, id: Id) -> Result<()>;

    /// Likes or unlikes the post for the current user; returns the post as the server now sees it.
    async fn toggle_like(&self, id: Id) -> Result<Post>;

    async fn post_likes(&self, id: Id) -> Result<Vec<LikeUser>>;

    // Comments

    async fn comments(&self, post_id: Id) -> Result<Vec<Comment>>;

    async fn create_comment(&self, post_id: Id, data: &CreateCommentDto) -> Result<Comment>;

    async fn delete_comment(&self, comment_id: Id) -> Result<()>;

    /// Liveness probe.
    async fn health(&self) -> Result<()>;
}
