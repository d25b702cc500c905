//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place state changes. It runs the pending
//! reducer for an intent and emits the request that will complete it; when
//! the worker answers, the response comes back as [`Event::Response`] and runs
//! the fulfilled or rejected reducer plus any cross-slice reaction (comment
//! counters, copying the profile into the auth slice, navigation).
//!
//! # Event Types
//!
//! - **Auth**: `SubmitLogin`, `SubmitRegister`, `Logout`, `LoadUser`, form edits
//! - **Posts**: `FetchFeed`, `FetchPost`, `SubmitPost`, `DeletePost`, `ToggleLike`, `FetchLikes`
//! - **Comments**: `FetchComments`, `CreateComment`, `DeleteComment`
//! - **Profile**: `FetchMyProfile`, `FetchPublicProfile`, `FetchUserById`, `UpdateProfile`, `SubmitPasswordChange`
//! - **Worker**: `Response` with the typed reply
//!
//! # Example
//!
//! ```rust
//! use blogline::app::{handle_event, Action, AppState, Event, Route};
//!
//! let mut state = AppState::default();
//! let actions = handle_event(&mut state, Event::ToggleLike(3))?;
//! assert!(matches!(actions.as_slice(), [Action::Navigate(Route::Login { .. })]));
//! # Ok::<(), blogline::domain::BloglineError>(())
//! ```

use crate::app::forms::{validate_comment, validate_profile_update, LoginField, RegisterField};
use crate::app::routes::Route;
use crate::app::slices::CommentChange;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{CreateCommentDto, Id, PageParams, UpdateProfileDto};
use crate::worker::{ApiFailure, ApiReply, ApiRequest, ApiResponse, Feed, RequestId};

const PASSWORD_CHANGED: &str = "Password changed successfully";

/// Intents from the UI and replies from the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Validates the login form and signs in.
    SubmitLogin,
    /// Validates the register form and creates the account.
    SubmitRegister,
    /// Ends the session locally; no request is sent.
    Logout,
    /// Fetches the signed-in user if only a stored token is known.
    LoadUser,
    SetLoginField { field: LoginField, value: String },
    SetRegisterField { field: RegisterField, value: String },
    ToggleLoginPassword,
    ToggleRegisterPassword,
    ToggleRegisterConfirm,
    ClearAuthError,

    /// Moves to a page, redirecting to login if it needs a session.
    Navigate(Route),

    FetchFeed { feed: Feed, page: PageParams },
    FetchPost(Id),
    /// Creates a post from the composer, or updates the one being edited.
    SubmitPost,
    DeletePost(Id),
    ToggleLike(Id),
    FetchLikes(Id),
    SetQuickFilter(String),
    ClearPosts,
    ClearCurrentPost,
    ClearPostsError,

    FetchComments(Id),
    CreateComment { post_id: Id, content: String },
    DeleteComment { comment_id: Id, post_id: Id },
    ClearComments,

    FetchMyProfile,
    FetchPublicProfile { username: String, page: PageParams },
    FetchUserById(Id),
    UpdateProfile(UpdateProfileDto),
    SubmitPasswordChange,
    ClearViewedProfile,
    ClearProfileError,

    CheckHealth,

    /// A reply from the worker.
    Response(ApiResponse),
}

impl Event {
    /// Name used in spans. Form values never reach the logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SubmitLogin => "submit_login",
            Self::SubmitRegister => "submit_register",
            Self::Logout => "logout",
            Self::LoadUser => "load_user",
            Self::SetLoginField { .. } => "set_login_field",
            Self::SetRegisterField { .. } => "set_register_field",
            Self::ToggleLoginPassword => "toggle_login_password",
            Self::ToggleRegisterPassword => "toggle_register_password",
            Self::ToggleRegisterConfirm => "toggle_register_confirm",
            Self::ClearAuthError => "clear_auth_error",
            Self::Navigate(_) => "navigate",
            Self::FetchFeed { .. } => "fetch_feed",
            Self::FetchPost(_) => "fetch_post",
            Self::SubmitPost => "submit_post",
            Self::DeletePost(_) => "delete_post",
            Self::ToggleLike(_) => "toggle_like",
            Self::FetchLikes(_) => "fetch_likes",
            Self::SetQuickFilter(_) => "set_quick_filter",
            Self::ClearPosts => "clear_posts",
            Self::ClearCurrentPost => "clear_current_post",
            Self::ClearPostsError => "clear_posts_error",
            Self::FetchComments(_) => "fetch_comments",
            Self::CreateComment { .. } => "create_comment",
            Self::DeleteComment { .. } => "delete_comment",
            Self::ClearComments => "clear_comments",
            Self::FetchMyProfile => "fetch_my_profile",
            Self::FetchPublicProfile { .. } => "fetch_public_profile",
            Self::FetchUserById(_) => "fetch_user_by_id",
            Self::UpdateProfile(_) => "update_profile",
            Self::SubmitPasswordChange => "submit_password_change",
            Self::ClearViewedProfile => "clear_viewed_profile",
            Self::ClearProfileError => "clear_profile_error",
            Self::CheckHealth => "check_health",
            Self::Response(_) => "response",
        }
    }
}

fn request(state: &mut AppState, build: impl FnOnce(RequestId) -> ApiRequest) -> Action {
    Action::Request(build(state.next_request_id()))
}

/// Redirect for intents that need a session, or `None` if signed in.
fn require_session(state: &AppState) -> Option<Vec<Action>> {
    if state.is_authenticated() {
        return None;
    }
    tracing::debug!(route = %state.route, "not signed in, redirecting to login");
    Some(vec![Action::Navigate(Route::login_redirect(&state.route))])
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Errors
///
/// Returns a validation error when a submitted form or comment is invalid. The
/// offending fields carry their messages and no request is emitted.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: Event) -> Result<Vec<Action>> {
    let _span = tracing::debug_span!("handle_event", event = event.name()).entered();

    match event {
        Event::SubmitLogin => {
            let credentials = state.auth.login_form.validate()?;
            state.auth.request_started();
            Ok(vec![request(state, |id| ApiRequest::login(id, credentials))])
        }
        Event::SubmitRegister => {
            let data = state.auth.register_form.validate()?;
            state.auth.request_started();
            Ok(vec![request(state, |id| ApiRequest::register(id, data))])
        }
        Event::Logout => {
            tracing::debug!("signing out");
            state.sign_out();
            Ok(vec![Action::ClearToken, Action::Navigate(Route::login())])
        }
        Event::LoadUser => {
            if !state.auth.needs_user() {
                return Ok(vec![]);
            }
            state.auth.request_started();
            state.profile.request_started();
            Ok(vec![request(state, ApiRequest::fetch_my_profile)])
        }
        Event::SetLoginField { field, value } => {
            let input = state.auth.login_form.field_mut(field);
            input.set(value);
            input.touch();
            Ok(vec![])
        }
        Event::SetRegisterField { field, value } => {
            let input = state.auth.register_form.field_mut(field);
            input.set(value);
            input.touch();
            Ok(vec![])
        }
        Event::ToggleLoginPassword => {
            state.auth.login_form.toggle_password_visibility();
            Ok(vec![])
        }
        Event::ToggleRegisterPassword => {
            state.auth.register_form.toggle_password_visibility();
            Ok(vec![])
        }
        Event::ToggleRegisterConfirm => {
            state.auth.register_form.toggle_confirm_visibility();
            Ok(vec![])
        }
        Event::ClearAuthError => {
            state.auth.clear_error();
            Ok(vec![])
        }
        Event::Navigate(route) => {
            if !route.is_public() && !state.is_authenticated() {
                tracing::debug!(route = %route, "protected page, redirecting to login");
                return Ok(vec![Action::Navigate(Route::login_redirect(&route))]);
            }
            Ok(vec![Action::Navigate(route)])
        }
        Event::FetchFeed { feed, page } => {
            let generation = state.posts.list_requested(feed.clone(), page);
            Ok(vec![request(state, |id| {
                ApiRequest::fetch_posts(id, feed, page, generation)
            })])
        }
        Event::FetchPost(post_id) => {
            let generation = state.posts.post_requested();
            Ok(vec![request(state, |id| ApiRequest::fetch_post(id, post_id, generation))])
        }
        Event::SubmitPost => {
            if let Some(redirect) = require_session(state) {
                return Ok(redirect);
            }
            let composer = &mut state.posts.composer;
            let action = match composer.editing {
                Some(post_id) => {
                    let data = composer.to_update_dto()?;
                    state.posts.mutation_started();
                    request(state, |id| ApiRequest::update_post(id, post_id, data))
                }
                None => {
                    let data = composer.to_create_dto()?;
                    state.posts.mutation_started();
                    request(state, |id| ApiRequest::create_post(id, data))
                }
            };
            Ok(vec![action])
        }
        Event::DeletePost(post_id) => {
            state.posts.mutation_started();
            Ok(vec![request(state, |id| ApiRequest::delete_post(id, post_id))])
        }
        Event::ToggleLike(post_id) => {
            if let Some(redirect) = require_session(state) {
                return Ok(redirect);
            }
            Ok(vec![request(state, |id| ApiRequest::toggle_like(id, post_id))])
        }
        Event::FetchLikes(post_id) => {
            Ok(vec![request(state, |id| ApiRequest::fetch_likes(id, post_id))])
        }
        Event::SetQuickFilter(filter) => {
            state.posts.set_quick_filter(filter);
            Ok(vec![])
        }
        Event::ClearPosts => {
            state.posts.clear();
            Ok(vec![])
        }
        Event::ClearCurrentPost => {
            state.posts.clear_current();
            Ok(vec![])
        }
        Event::ClearPostsError => {
            state.posts.clear_error();
            Ok(vec![])
        }
        Event::FetchComments(post_id) => {
            if state.comments.post_id != Some(post_id) {
                state.comments.clear();
            }
            let generation = state.comments.fetch_requested();
            Ok(vec![request(state, |id| {
                ApiRequest::fetch_comments(id, post_id, generation)
            })])
        }
        Event::CreateComment { post_id, content } => {
            if let Some(redirect) = require_session(state) {
                return Ok(redirect);
            }
            let content = validate_comment(&content).inspect_err(|err| {
                state.comments.draft.error = Some(err.to_string());
            })?;
            state.comments.mutation_started();
            let data = CreateCommentDto { content };
            Ok(vec![request(state, |id| ApiRequest::create_comment(id, post_id, data))])
        }
        Event::DeleteComment { comment_id, post_id } => {
            state.comments.mutation_started();
            Ok(vec![request(state, |id| {
                ApiRequest::delete_comment(id, comment_id, post_id)
            })])
        }
        Event::ClearComments => {
            state.comments.clear();
            Ok(vec![])
        }
        Event::FetchMyProfile => {
            state.profile.request_started();
            Ok(vec![request(state, ApiRequest::fetch_my_profile)])
        }
        Event::FetchPublicProfile { username, page } => {
            let generation = state.profile.public_profile_requested();
            Ok(vec![request(state, |id| {
                ApiRequest::fetch_public_profile(id, username, page, generation)
            })])
        }
        Event::FetchUserById(user_id) => {
            state.profile.request_started();
            Ok(vec![request(state, |id| ApiRequest::fetch_user_by_id(id, user_id))])
        }
        Event::UpdateProfile(data) => {
            validate_profile_update(&data).inspect_err(|err| {
                state.profile.error = Some(err.user_message());
            })?;
            state.profile.request_started();
            Ok(vec![request(state, |id| ApiRequest::update_profile(id, data))])
        }
        Event::SubmitPasswordChange => {
            let data = state.profile.password_form.validate()?;
            state.profile.request_started();
            state.profile.password_notice = None;
            Ok(vec![request(state, |id| ApiRequest::change_password(id, data))])
        }
        Event::ClearViewedProfile => {
            state.profile.clear_viewed();
            Ok(vec![])
        }
        Event::ClearProfileError => {
            state.profile.clear_error();
            Ok(vec![])
        }
        Event::CheckHealth => Ok(vec![request(state, ApiRequest::health)]),
        Event::Response(response) => Ok(handle_response(state, response)),
    }
}

fn stale(kind: &str, generation: u64) {
    tracing::debug!(kind = kind, generation = generation, "discarding stale reply");
}

#[allow(clippy::too_many_lines)]
fn handle_response(state: &mut AppState, response: ApiResponse) -> Vec<Action> {
    let _span = tracing::debug_span!("handle_response", request_id = response.id).entered();

    let session_expired = response.reply.failure().is_some_and(ApiFailure::is_unauthorized)
        && !matches!(response.reply, ApiReply::LoggedIn(_));
    let mut actions = Vec::new();

    match response.reply {
        ApiReply::LoggedIn(Ok(auth)) => {
            tracing::debug!("signed in");
            state.auth.logged_in(auth.token.clone());
            state.profile.request_started();
            actions.push(Action::PersistToken(auth.token));
            actions.push(request(state, ApiRequest::fetch_my_profile));
            let return_url = match &state.route {
                Route::Login { return_url } => return_url.clone(),
                _ => None,
            };
            actions.push(Action::Navigate(Route::redirect_after_login(return_url.as_deref())));
        }
        ApiReply::LoggedIn(Err(failure)) | ApiReply::Registered(Err(failure)) => {
            state.auth.request_failed(failure.message);
        }
        ApiReply::Registered(Ok(account)) => {
            tracing::debug!(user_id = account.id, "account created");
            state.auth.registered();
            actions.push(Action::Navigate(Route::login()));
        }
        ApiReply::MyProfile(Ok(user)) => {
            if state.is_authenticated() {
                state.auth.user_loaded(user.clone());
            }
            state.profile.my_profile_loaded(user);
        }
        ApiReply::MyProfile(Err(failure)) => {
            if state.auth.is_loading {
                state.auth.request_failed(failure.message.clone());
            }
            state.profile.request_failed(failure.message);
        }
        ApiReply::PublicProfile { generation, outcome } => {
            let applied = match outcome {
                Ok(profile) => state.profile.public_profile_loaded(generation, profile),
                Err(failure) => state.profile.public_profile_failed(generation, failure.message),
            };
            if !applied {
                stale("public_profile", generation);
            }
        }
        ApiReply::UserById(Ok(user)) => state.profile.user_fetched(user),
        ApiReply::ProfileUpdated(Ok(user)) => {
            if state.auth.user.is_some() {
                state.auth.user = Some(user.clone());
            }
            state.profile.my_profile_loaded(user);
        }
        ApiReply::UserById(Err(failure))
        | ApiReply::ProfileUpdated(Err(failure))
        | ApiReply::PasswordChanged(Err(failure)) => {
            state.profile.request_failed(failure.message);
        }
        ApiReply::PasswordChanged(Ok(ack)) => {
            let notice = if ack.message.trim().is_empty() {
                PASSWORD_CHANGED.to_string()
            } else {
                ack.message
            };
            state.profile.password_changed(notice);
        }
        ApiReply::Posts { feed, generation, outcome } => {
            let applied = match outcome {
                Ok(page) => state.posts.list_loaded(generation, page),
                Err(failure) => state.posts.list_failed(generation, failure.message),
            };
            if !applied {
                stale(feed.label(), generation);
            }
        }
        ApiReply::Post { generation, outcome } => {
            let applied = match outcome {
                Ok(post) => state.posts.post_loaded(generation, post),
                Err(failure) => state.posts.post_failed(generation, failure.message),
            };
            if !applied {
                stale("post", generation);
            }
        }
        ApiReply::PostCreated(Ok(post)) => {
            let post_id = post.id;
            state.posts.created(post);
            actions.push(Action::Navigate(Route::PostDetail(post_id)));
        }
        ApiReply::PostUpdated(Ok(post)) => {
            let post_id = post.id;
            state.posts.updated(post);
            actions.push(Action::Navigate(Route::PostDetail(post_id)));
        }
        ApiReply::PostDeleted { id, outcome: Ok(()) } => {
            state.posts.deleted(id);
            if state.route == Route::PostDetail(id) {
                actions.push(Action::Navigate(Route::Home));
            }
        }
        ApiReply::PostCreated(Err(failure))
        | ApiReply::PostUpdated(Err(failure))
        | ApiReply::PostDeleted { outcome: Err(failure), .. }
        | ApiReply::LikeToggled { outcome: Err(failure), .. }
        | ApiReply::Likes { outcome: Err(failure), .. } => {
            state.posts.mutation_failed(failure.message);
        }
        ApiReply::LikeToggled { id, outcome: Ok(post) } => {
            tracing::debug!(post_id = id, likes = post.likes, "like toggled");
            state.posts.like_toggled(post);
        }
        ApiReply::Likes { id, outcome: Ok(likes) } => state.posts.likes_loaded(id, likes),
        ApiReply::Comments { post_id, generation, outcome } => {
            let applied = match outcome {
                Ok(comments) => state.comments.loaded(generation, post_id, comments),
                Err(failure) => state.comments.fetch_failed(generation, failure.message),
            };
            if !applied {
                stale("comments", generation);
            }
        }
        ApiReply::CommentCreated { post_id, outcome: Ok(comment) } => {
            let target = comment.post_id().unwrap_or(post_id);
            state.comments.created(target, comment);
            state.posts.adjust_comment_count(target, CommentChange::Added);
        }
        ApiReply::CommentDeleted { comment_id, post_id, outcome: Ok(()) } => {
            state.comments.deleted(post_id, comment_id);
            state.posts.adjust_comment_count(post_id, CommentChange::Removed);
        }
        ApiReply::CommentCreated { outcome: Err(failure), .. }
        | ApiReply::CommentDeleted { outcome: Err(failure), .. } => {
            state.comments.mutation_failed(failure.message);
        }
        ApiReply::Health(Ok(())) => tracing::debug!("api healthy"),
        ApiReply::Health(Err(failure)) => {
            tracing::warn!(error = %failure.message, "api health check failed");
        }
    }

    if session_expired {
        actions.extend(expire_session(state));
    }
    actions
}

/// Drops the session after a 401 and sends the user to the login page.
fn expire_session(state: &mut AppState) -> Vec<Action> {
    tracing::info!(route = %state.route, "session rejected by server, signing out");
    state.sign_out();
    let mut actions = vec![Action::ClearToken];
    if !state.route.is_login() {
        actions.push(Action::Navigate(Route::login_redirect(&state.route)));
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthResponse, BloglineError, Comment, Post, User, ValidationError};
    use crate::worker::{ApiCall, FailureKind};
    use chrono::Utc;

    fn failure(kind: FailureKind, message: &str) -> ApiFailure {
        ApiFailure {
            kind,
            message: message.to_string(),
        }
    }

    fn only_request(actions: &[Action]) -> &ApiRequest {
        match actions {
            [Action::Request(request)] => request,
            other => panic!("expected a single request, got {other:?}"),
        }
    }

    #[test]
    fn invalid_login_form_sends_nothing() {
        let mut state = AppState::default();
        let err = handle_event(&mut state, Event::SubmitLogin).unwrap_err();
        assert!(matches!(err, BloglineError::Validation(ValidationError::Required { .. })));
        assert!(!state.auth.is_loading);
    }

    #[test]
    fn login_success_persists_token_and_loads_profile() {
        let mut state = AppState::default();
        state.route = Route::Login {
            return_url: Some("/write".into()),
        };
        let actions = handle_event(
            &mut state,
            Event::Response(ApiResponse {
                id: 1,
                reply: ApiReply::LoggedIn(Ok(AuthResponse { token: "jwt".into() })),
            }),
        )
        .unwrap();

        assert!(state.is_authenticated());
        assert_eq!(actions[0], Action::PersistToken("jwt".into()));
        assert!(matches!(
            &actions[1],
            Action::Request(ApiRequest { call: ApiCall::FetchMyProfile, .. })
        ));
        assert_eq!(actions[2], Action::Navigate(Route::Write));
    }

    #[test]
    fn login_rejection_keeps_session_and_shows_message() {
        let mut state = AppState::default();
        state.route = Route::login();
        let actions = handle_event(
            &mut state,
            Event::Response(ApiResponse {
                id: 1,
                reply: ApiReply::LoggedIn(Err(failure(FailureKind::Unauthorized, "Invalid credentials"))),
            }),
        )
        .unwrap();

        assert!(actions.is_empty());
        assert!(!state.is_authenticated());
        assert_eq!(state.auth.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn unauthenticated_like_redirects_without_request() {
        let mut state = AppState::default();
        state.route = Route::PostDetail(4);
        let actions = handle_event(&mut state, Event::ToggleLike(4)).unwrap();
        assert_eq!(
            actions,
            vec![Action::Navigate(Route::Login {
                return_url: Some("/posts/4".into())
            })]
        );
    }

    #[test]
    fn authenticated_like_sends_request() {
        let mut state = AppState::new(Some("jwt".into()));
        let actions = handle_event(&mut state, Event::ToggleLike(4)).unwrap();
        assert_eq!(only_request(&actions).call, ApiCall::ToggleLike { id: 4 });
    }

    #[test]
    fn expired_session_clears_token_and_redirects() {
        let mut state = AppState::new(Some("jwt".into()));
        state.route = Route::MyProfile;
        let actions = handle_event(
            &mut state,
            Event::Response(ApiResponse {
                id: 3,
                reply: ApiReply::MyProfile(Err(failure(FailureKind::Unauthorized, "Unauthorized"))),
            }),
        )
        .unwrap();

        assert!(!state.is_authenticated());
        assert_eq!(
            actions,
            vec![
                Action::ClearToken,
                Action::Navigate(Route::Login {
                    return_url: Some("/profile".into())
                }),
            ]
        );
    }

    #[test]
    fn protected_route_redirects_when_signed_out() {
        let mut state = AppState::default();
        let actions = handle_event(&mut state, Event::Navigate(Route::Write)).unwrap();
        assert_eq!(
            actions,
            vec![Action::Navigate(Route::Login {
                return_url: Some("/write".into())
            })]
        );
    }

    #[test]
    fn empty_comment_is_rejected_locally() {
        let mut state = AppState::new(Some("jwt".into()));
        let result = handle_event(
            &mut state,
            Event::CreateComment {
                post_id: 1,
                content: "   ".into(),
            },
        );
        assert!(result.is_err());
        assert_eq!(state.comments.draft.error.as_deref(), Some("Comment cannot be empty"));
    }

    #[test]
    fn logout_clears_token_without_request() {
        let mut state = AppState::new(Some("jwt".into()));
        let actions = handle_event(&mut state, Event::Logout).unwrap();
        assert_eq!(actions, vec![Action::ClearToken, Action::Navigate(Route::login())]);
        assert!(!state.is_authenticated());
    }

    fn grace() -> User {
        User {
            id: 2,
            name: "Grace".into(),
            email: None,
            username: Some("grace".into()),
            headline: None,
            avatar_url: None,
            bio: None,
        }
    }

    #[test]
    fn late_comment_reply_only_bumps_its_own_post() {
        let mut state = AppState::new(Some("jwt".into()));
        state.posts.posts = vec![Post {
            id: 10,
            title: "Ownership".into(),
            content: "Borrowing rules".into(),
            tags: vec![],
            image_url: None,
            author: grace(),
            created_at: Utc::now(),
            updated_at: None,
            likes: 0,
            comments: 0,
        }];
        let generation = state.comments.fetch_requested();
        handle_event(
            &mut state,
            Event::Response(ApiResponse {
                id: 1,
                reply: ApiReply::Comments {
                    post_id: 11,
                    generation,
                    outcome: Ok(vec![]),
                },
            }),
        )
        .unwrap();

        handle_event(
            &mut state,
            Event::Response(ApiResponse {
                id: 2,
                reply: ApiReply::CommentCreated {
                    post_id: 10,
                    outcome: Ok(Comment {
                        id: 99,
                        content: "late".into(),
                        author: grace(),
                        post: None,
                        created_at: Utc::now(),
                    }),
                },
            }),
        )
        .unwrap();

        assert_eq!(state.comments.post_id, Some(11));
        assert!(state.comments.comments.is_empty());
        assert_eq!(state.posts.posts[0].comments, 1);
    }
}
