//! API worker: executes queued requests against a [`BlogApi`].
//!
//! The worker is the only place that awaits the network. It restores the trace
//! context of the span that issued each request, runs the call, and converts
//! the result into an [`ApiResponse`] with uniform logging.

use crate::api::BlogApi;
use crate::domain::error::Result;
use crate::domain::SearchParams;
use crate::worker::messages::{ApiCall, ApiFailure, ApiReply, ApiRequest, ApiResponse, Feed, Outcome};
use tracing::Instrument;

/// Executes [`ApiRequest`]s.
pub struct ApiWorker<A> {
    api: A,
}

impl<A: BlogApi> ApiWorker<A> {
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// The underlying API.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Helper for converting call results with consistent logging.
    fn handle_result<T>(operation: &str, result: Result<T>) -> Outcome<T> {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "api call successful");
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(operation = operation, error = %e, "api call failed");
                Err(ApiFailure::from(e))
            }
        }
    }

    /// Runs one request and answers with the matching response.
    ///
    /// Never fails: call errors are carried inside the reply.
    pub async fn execute(&self, request: ApiRequest) -> ApiResponse {
        let span = {
            let _context_guard = request.trace_context.as_ref().and_then(|ctx| ctx.attach());
            tracing::debug_span!("api_request", request_id = request.id, call = request.call.name())
        };

        let id = request.id;
        let reply = self.dispatch(request.call).instrument(span).await;
        ApiResponse { id, reply }
    }

    async fn dispatch(&self, call: ApiCall) -> ApiReply {
        let operation = call.name();
        let api = &self.api;

        match call {
            ApiCall::Login { credentials } => {
                ApiReply::LoggedIn(Self::handle_result(operation, api.login(&credentials).await))
            }
            ApiCall::Register { data } => {
                ApiReply::Registered(Self::handle_result(operation, api.register(&data).await))
            }
            ApiCall::FetchMyProfile => {
                ApiReply::MyProfile(Self::handle_result(operation, api.my_profile().await))
            }
            ApiCall::FetchPublicProfile { username, page, generation } => ApiReply::PublicProfile {
                generation,
                outcome: Self::handle_result(operation, api.public_profile(&username, page).await),
            },
            ApiCall::FetchUserById { id } => {
                ApiReply::UserById(Self::handle_result(operation, api.user_by_id(id).await))
            }
            ApiCall::UpdateProfile { data } => ApiReply::ProfileUpdated(Self::handle_result(
                operation,
                api.update_profile(&data).await,
            )),
            ApiCall::ChangePassword { data } => ApiReply::PasswordChanged(Self::handle_result(
                operation,
                api.change_password(&data).await,
            )),
            ApiCall::FetchPosts { feed, page, generation } => {
                let result = match &feed {
                    Feed::Recommended => api.recommended_posts(page).await,
                    Feed::MostLiked => api.most_liked_posts(page).await,
                    Feed::Mine => api.my_posts(page).await,
                    Feed::Search(query) => {
                        api.search_posts(&SearchParams::new(query.clone(), page)).await
                    }
                    Feed::Author(username) => api
                        .posts_by_username(username, page)
                        .await
                        .map(|listing| listing.page),
                    Feed::AuthorId(user_id) => api
                        .posts_by_user(*user_id, page)
                        .await
                        .map(|listing| listing.page),
                };
                tracing::debug!(feed = feed.label(), page = page.page, "post list fetched");
                ApiReply::Posts {
                    feed,
                    generation,
                    outcome: Self::handle_result(operation, result),
                }
            }
            ApiCall::FetchPost { id, generation } => ApiReply::Post {
                generation,
                outcome: Self::handle_result(operation, api.post(id).await),
            },
            ApiCall::CreatePost { data } => {
                ApiReply::PostCreated(Self::handle_result(operation, api.create_post(&data).await))
            }
            ApiCall::UpdatePost { id, data } => ApiReply::PostUpdated(Self::handle_result(
                operation,
                api.update_post(id, &data).await,
            )),
            ApiCall::DeletePost { id } => ApiReply::PostDeleted {
                id,
                outcome: Self::handle_result(operation, api.delete_post(id).await),
            },
            ApiCall::ToggleLike { id } => ApiReply::LikeToggled {
                id,
                outcome: Self::handle_result(operation, api.toggle_like(id).await),
            },
            ApiCall::FetchLikes { id } => ApiReply::Likes {
                id,
                outcome: Self::handle_result(operation, api.post_likes(id).await),
            },
            ApiCall::FetchComments { post_id, generation } => ApiReply::Comments {
                post_id,
                generation,
                outcome: Self::handle_result(operation, api.comments(post_id).await),
            },
            ApiCall::CreateComment { post_id, data } => ApiReply::CommentCreated {
                post_id,
                outcome: Self::handle_result(operation, api.create_comment(post_id, &data).await),
            },
            ApiCall::DeleteComment { comment_id, post_id } => ApiReply::CommentDeleted {
                comment_id,
                post_id,
                outcome: Self::handle_result(operation, api.delete_comment(comment_id).await),
            },
            ApiCall::Health => ApiReply::Health(Self::handle_result(operation, api.health().await)),
        }
    }
}
