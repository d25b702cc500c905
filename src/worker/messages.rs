//! Request and response messages between the store and the API worker.
//!
//! The store never calls the network directly. Event handling produces
//! [`ApiRequest`] messages; the worker executes each against a
//! [`BlogApi`](crate::api::BlogApi) and answers with an [`ApiResponse`] carrying
//! the same request id. Fetches that replace a snapshot also carry the
//! generation of the slice that issued them, so a late answer can be told
//! apart from the latest one.

use crate::domain::error::BloglineError;
use crate::domain::{
    AuthResponse, ChangePasswordDto, Comment, CreateCommentDto, CreatePostDto, Id, LikeUser,
    LoginDto, PageParams, Paginated, PasswordChangeResponse, Post, PublicProfile, RegisterDto,
    RegisterResponse, UpdatePostDto, UpdateProfileDto, User,
};
use crate::observability::TraceContext;

/// Identifies one request and its response.
pub type RequestId = u64;

/// Monotonic per-slice counter; a response older than the slice's latest is stale.
pub type Generation = u64;

/// Which post list a fetch fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    Recommended,
    MostLiked,
    Mine,
    Search(String),
    /// Posts written by one user, by username.
    Author(String),
    /// Posts written by one user, by id.
    AuthorId(Id),
}

impl Feed {
    /// Short label used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::MostLiked => "most_liked",
            Self::Mine => "mine",
            Self::Search(_) => "search",
            Self::Author(_) | Self::AuthorId(_) => "author",
        }
    }
}

/// One API call and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Login { credentials: LoginDto },
    Register { data: RegisterDto },
    FetchMyProfile,
    FetchPublicProfile { username: String, page: PageParams, generation: Generation },
    FetchUserById { id: Id },
    UpdateProfile { data: UpdateProfileDto },
    ChangePassword { data: ChangePasswordDto },
    FetchPosts { feed: Feed, page: PageParams, generation: Generation },
    FetchPost { id: Id, generation: Generation },
    CreatePost { data: CreatePostDto },
    UpdatePost { id: Id, data: UpdatePostDto },
    DeletePost { id: Id },
    ToggleLike { id: Id },
    FetchLikes { id: Id },
    FetchComments { post_id: Id, generation: Generation },
    CreateComment { post_id: Id, data: CreateCommentDto },
    DeleteComment { comment_id: Id, post_id: Id },
    Health,
}

impl ApiCall {
    /// Operation name used in spans and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Register { .. } => "register",
            Self::FetchMyProfile => "fetch_my_profile",
            Self::FetchPublicProfile { .. } => "fetch_public_profile",
            Self::FetchUserById { .. } => "fetch_user_by_id",
            Self::UpdateProfile { .. } => "update_profile",
            Self::ChangePassword { .. } => "change_password",
            Self::FetchPosts { .. } => "fetch_posts",
            Self::FetchPost { .. } => "fetch_post",
            Self::CreatePost { .. } => "create_post",
            Self::UpdatePost { .. } => "update_post",
            Self::DeletePost { .. } => "delete_post",
            Self::ToggleLike { .. } => "toggle_like",
            Self::FetchLikes { .. } => "fetch_likes",
            Self::FetchComments { .. } => "fetch_comments",
            Self::CreateComment { .. } => "create_comment",
            Self::DeleteComment { .. } => "delete_comment",
            Self::Health => "health",
        }
    }
}

/// A queued API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub id: RequestId,
    pub call: ApiCall,
    /// Span that issued the request, restored by the worker.
    pub trace_context: Option<TraceContext>,
}

/// Generates `ApiRequest` constructors that capture the current trace context.
macro_rules! api_request_builders {
    (
        $(
            $builder_name:ident($variant:ident $({ $($field:ident: $ty:ty),* $(,)? })?)
        ),* $(,)?
    ) => {
        impl ApiRequest {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request with current trace context")]
                #[must_use]
                pub fn $builder_name(id: RequestId $($(, $field: $ty)*)?) -> Self {
                    Self {
                        id,
                        call: ApiCall::$variant $({ $($field),* })?,
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

api_request_builders! {
    login(Login { credentials: LoginDto }),
    register(Register { data: RegisterDto }),
    fetch_my_profile(FetchMyProfile),
    fetch_public_profile(FetchPublicProfile { username: String, page: PageParams, generation: Generation }),
    fetch_user_by_id(FetchUserById { id: Id }),
    update_profile(UpdateProfile { data: UpdateProfileDto }),
    change_password(ChangePassword { data: ChangePasswordDto }),
    fetch_posts(FetchPosts { feed: Feed, page: PageParams, generation: Generation }),
    fetch_post(FetchPost { id: Id, generation: Generation }),
    create_post(CreatePost { data: CreatePostDto }),
    update_post(UpdatePost { id: Id, data: UpdatePostDto }),
    delete_post(DeletePost { id: Id }),
    toggle_like(ToggleLike { id: Id }),
    fetch_likes(FetchLikes { id: Id }),
    fetch_comments(FetchComments { post_id: Id, generation: Generation }),
    create_comment(CreateComment { post_id: Id, data: CreateCommentDto }),
    delete_comment(DeleteComment { comment_id: Id, post_id: Id }),
    health(Health),
}

/// Category of a failed call, enough to rebuild the original error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// 401: the session is gone.
    Unauthorized,
    /// Any other non-success status.
    Rejected { status: u16 },
    Timeout,
    Transport(String),
    Decode(String),
    Config(String),
}

/// A failed call as recorded in state.
///
/// Unlike [`BloglineError`] this is `Clone`, so it can live in responses and
/// be handed back to more than one reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    /// The single string a slice stores and a page shows.
    pub message: String,
}

impl ApiFailure {
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.kind, FailureKind::Unauthorized)
    }

    /// Rebuilds the error for callers that branch on it.
    #[must_use]
    pub fn into_error(self) -> BloglineError {
        match self.kind {
            FailureKind::Unauthorized => BloglineError::Unauthorized {
                message: self.message,
            },
            FailureKind::Rejected { status } => BloglineError::Api {
                status,
                message: self.message,
            },
            FailureKind::Timeout => BloglineError::Timeout,
            FailureKind::Transport(detail) => BloglineError::Transport(detail),
            FailureKind::Decode(detail) => BloglineError::Decode(detail),
            FailureKind::Config(detail) => BloglineError::Config(detail),
        }
    }
}

impl From<BloglineError> for ApiFailure {
    fn from(err: BloglineError) -> Self {
        let message = err.user_message();
        let kind = match err {
            BloglineError::Unauthorized { .. } => FailureKind::Unauthorized,
            BloglineError::Api { status, .. } => FailureKind::Rejected { status },
            BloglineError::Timeout => FailureKind::Timeout,
            BloglineError::Decode(detail) => FailureKind::Decode(detail),
            BloglineError::Config(detail) => FailureKind::Config(detail),
            BloglineError::Transport(detail) | BloglineError::Storage(detail) => {
                FailureKind::Transport(detail)
            }
            other @ (BloglineError::Validation(_)
            | BloglineError::NotAuthenticated
            | BloglineError::Io(_)) => FailureKind::Transport(other.to_string()),
        };
        Self { kind, message }
    }
}

/// Result of one call as carried back to the store.
pub type Outcome<T> = std::result::Result<T, ApiFailure>;

/// Typed result of each [`ApiCall`], echoing the arguments reducers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply {
    LoggedIn(Outcome<AuthResponse>),
    Registered(Outcome<RegisterResponse>),
    MyProfile(Outcome<User>),
    PublicProfile { generation: Generation, outcome: Outcome<PublicProfile> },
    UserById(Outcome<User>),
    ProfileUpdated(Outcome<User>),
    PasswordChanged(Outcome<PasswordChangeResponse>),
    Posts { feed: Feed, generation: Generation, outcome: Outcome<Paginated<Post>> },
    Post { generation: Generation, outcome: Outcome<Post> },
    PostCreated(Outcome<Post>),
    PostUpdated(Outcome<Post>),
    PostDeleted { id: Id, outcome: Outcome<()> },
    LikeToggled { id: Id, outcome: Outcome<Post> },
    Likes { id: Id, outcome: Outcome<Vec<LikeUser>> },
    Comments { post_id: Id, generation: Generation, outcome: Outcome<Vec<Comment>> },
    CommentCreated { post_id: Id, outcome: Outcome<Comment> },
    CommentDeleted { comment_id: Id, post_id: Id, outcome: Outcome<()> },
    Health(Outcome<()>),
}

impl ApiReply {
    /// The failure, if the call failed.
    #[must_use]
    pub fn failure(&self) -> Option<&ApiFailure> {
        match self {
            Self::LoggedIn(outcome) => outcome.as_ref().err(),
            Self::Registered(outcome) => outcome.as_ref().err(),
            Self::MyProfile(outcome)
            | Self::UserById(outcome)
            | Self::ProfileUpdated(outcome) => outcome.as_ref().err(),
            Self::PasswordChanged(outcome) => outcome.as_ref().err(),
            Self::PublicProfile { outcome, .. } => outcome.as_ref().err(),
            Self::Posts { outcome, .. } => outcome.as_ref().err(),
            Self::Post { outcome, .. } | Self::LikeToggled { outcome, .. } => outcome.as_ref().err(),
            Self::PostCreated(outcome) | Self::PostUpdated(outcome) => outcome.as_ref().err(),
            Self::PostDeleted { outcome, .. } | Self::CommentDeleted { outcome, .. } => {
                outcome.as_ref().err()
            }
            Self::Health(outcome) => outcome.as_ref().err(),
            Self::Likes { outcome, .. } => outcome.as_ref().err(),
            Self::Comments { outcome, .. } => outcome.as_ref().err(),
            Self::CommentCreated { outcome, .. } => outcome.as_ref().err(),
        }
    }
}

/// The worker's answer to one [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub id: RequestId,
    pub reply: ApiReply,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_fill_id_and_call() {
        let request = ApiRequest::toggle_like(7, 42);
        assert_eq!(request.id, 7);
        assert_eq!(request.call, ApiCall::ToggleLike { id: 42 });
        assert_eq!(request.call.name(), "toggle_like");

        let request = ApiRequest::fetch_my_profile(8);
        assert_eq!(request.call, ApiCall::FetchMyProfile);
    }

    #[test]
    fn failure_round_trips_to_the_same_error_kind() {
        let failure = ApiFailure::from(BloglineError::Api {
            status: 409,
            message: "Title already taken".into(),
        });
        assert_eq!(failure.message, "Title already taken");
        assert!(matches!(
            failure.into_error(),
            BloglineError::Api { status: 409, .. }
        ));

        let failure = ApiFailure::from(BloglineError::Unauthorized {
            message: "Invalid credentials".into(),
        });
        assert!(failure.is_unauthorized());
        assert_eq!(failure.message, "Invalid credentials");
    }

    #[test]
    fn transport_detail_is_not_double_wrapped() {
        let failure = ApiFailure::from(BloglineError::Transport("connection refused".into()));
        assert_eq!(failure.message, "Network error: connection refused");
        assert_eq!(
            failure.into_error().to_string(),
            "Network error: connection refused"
        );
    }

    #[test]
    fn reply_exposes_failure() {
        let reply = ApiReply::PostDeleted {
            id: 1,
            outcome: Err(ApiFailure::from(BloglineError::Timeout)),
        };
        assert_eq!(reply.failure().map(|f| f.message.as_str()), Some("Request timed out"));
        assert!(ApiReply::Health(Ok(())).failure().is_none());
    }
}
