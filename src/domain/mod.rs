//! Domain layer for the blogline client.
//!
//! Plain data types and rules that know nothing about HTTP, storage, or the
//! store runtime: the entities the server returns, the payloads sent to it,
//! pagination, sessions, validation, and the crate-wide error type.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`user`], [`post`]: Entities returned by the API
//! - [`pagination`]: Paginated envelope and page parameters
//! - [`dto`]: Request and response payloads
//! - [`session`]: Session and shared bearer credentials
//! - [`validation`]: Client-side form rules
//!
//! # Examples
//!
//! ```
//! use blogline::domain::{validation, PageParams, Result};
//!
//! fn first_page(title: &str) -> Result<PageParams> {
//!     if let Some(err) = validation::post_title_error(title) {
//!         return Err(err.into());
//!     }
//!     Ok(PageParams::default())
//! }
//!
//! assert!(first_page("ab").is_err());
//! assert!(first_page("abc").is_ok());
//! ```

pub mod dto;
pub mod error;
pub mod pagination;
pub mod post;
pub mod session;
pub mod user;
pub mod validation;

pub use dto::{
    AuthResponse, ChangePasswordDto, CreateCommentDto, CreatePostDto, ImageUpload, LoginDto,
    PasswordChangeResponse, RegisterDto, RegisterResponse, UpdatePostDto, UpdateProfileDto,
};
pub use error::{BloglineError, Result, ValidationError};
pub use pagination::{PageParams, Paginated, SearchParams};
pub use post::{Comment, Post, PostRef};
pub use session::{Credentials, Session};
pub use user::{AuthorSummary, Id, LikeUser, PublicProfile, User, UserPosts};
