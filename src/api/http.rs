//! [`BlogApi`] over HTTP.
//!
//! Each method is a single request through [`HttpClient`]. Request bodies that
//! carry images are multipart; tag lists travel inside multipart bodies as a
//! JSON array string, which is what the server parses.

use crate::api::client::{HttpClient, MultipartBody};
use crate::api::{endpoints, BlogApi};
use crate::domain::{
    AuthResponse, ChangePasswordDto, Comment, CreateCommentDto, CreatePostDto, Id, LikeUser,
    LoginDto, PageParams, Paginated, PasswordChangeResponse, Post, PublicProfile, RegisterDto,
    RegisterResponse, Result, SearchParams, UpdatePostDto, UpdateProfileDto, User, UserPosts,
};
use async_trait::async_trait;

/// Production [`BlogApi`].
#[derive(Debug, Clone)]
pub struct HttpBlogApi {
    client: HttpClient,
}

impl HttpBlogApi {
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &HttpClient {
        &self.client
    }
}

/// Multipart body for a new post.
///
/// # Errors
///
/// Returns a decode error if the tag list cannot be serialized.
pub fn create_post_form(data: &CreatePostDto) -> Result<MultipartBody> {
    Ok(MultipartBody::new()
        .text("title", data.title.as_str())
        .text("content", data.content.as_str())
        .text("tags", serde_json::to_string(&data.tags)?)
        .file_opt("image", data.image.as_ref()))
}

/// Multipart body for a partial post update. Absent fields are omitted.
///
/// # Errors
///
/// Returns a decode error if the tag list cannot be serialized.
pub fn update_post_form(data: &UpdatePostDto) -> Result<MultipartBody> {
    let tags = data.tags.as_ref().map(serde_json::to_string).transpose()?;
    let mut body = MultipartBody::new()
        .text_opt("title", data.title.as_deref())
        .text_opt("content", data.content.as_deref())
        .text_opt("tags", tags.as_deref())
        .file_opt("image", data.image.as_ref());
    if data.remove_image {
        body = body.text("removeImage", "true");
    }
    Ok(body)
}

/// Multipart body for a partial profile update. Absent fields are omitted.
#[must_use]
pub fn update_profile_form(data: &UpdateProfileDto) -> MultipartBody {
    MultipartBody::new()
        .text_opt("name", data.name.as_deref())
        .text_opt("headline", data.headline.as_deref())
        .text_opt("bio", data.bio.as_deref())
        .file_opt("avatar", data.avatar.as_ref())
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn login(&self, credentials: &LoginDto) -> Result<AuthResponse> {
        self.client.post_json(&endpoints::login(), credentials).await
    }

    async fn register(&self, data: &RegisterDto) -> Result<RegisterResponse> {
        self.client.post_json(&endpoints::register(), data).await
    }

    async fn my_profile(&self) -> Result<User> {
        self.client.get(&endpoints::me(), &[]).await
    }

    async fn public_profile(&self, username: &str, page: PageParams) -> Result<PublicProfile> {
        self.client
            .get(&endpoints::user_by_username(username), &page.query_pairs())
            .await
    }

    async fn user_by_id(&self, id: Id) -> Result<User> {
        self.client.get(&endpoints::user_by_id(id), &[]).await
    }

    async fn update_profile(&self, data: &UpdateProfileDto) -> Result<User> {
        self.client
            .patch_multipart(&endpoints::update_profile(), update_profile_form(data))
            .await
    }

    async fn change_password(&self, data: &ChangePasswordDto) -> Result<PasswordChangeResponse> {
        self.client.patch_json(&endpoints::change_password(), data).await
    }

    async fn recommended_posts(&self, page: PageParams) -> Result<Paginated<Post>> {
        self.client.get(&endpoints::recommended(), &page.query_pairs()).await
    }

    async fn most_liked_posts(&self, page: PageParams) -> Result<Paginated<Post>> {
        self.client.get(&endpoints::most_liked(), &page.query_pairs()).await
    }

    async fn my_posts(&self, page: PageParams) -> Result<Paginated<Post>> {
        self.client.get(&endpoints::my_posts(), &page.query_pairs()).await
    }

    async fn search_posts(&self, params: &SearchParams) -> Result<Paginated<Post>> {
        let [limit, page] = params.page.query_pairs();
        let query = [("query", params.query.clone()), limit, page];
        self.client.get(&endpoints::search(), &query).await
    }

    async fn posts_by_username(&self, username: &str, page: PageParams) -> Result<UserPosts> {
        self.client
            .get(&endpoints::posts_by_username(username), &page.query_pairs())
            .await
    }

    async fn posts_by_user(&self, user_id: Id, page: PageParams) -> Result<UserPosts> {
        self.client
            .get(&endpoints::posts_by_user(user_id), &page.query_pairs())
            .await
    }

    async fn post(&self, id: Id) -> Result<Post> {
        self.client.get(&endpoints::post(id), &[]).await
    }

    async fn create_post(&self, data: &CreatePostDto) -> Result<Post> {
        self.client
            .post_multipart(&endpoints::posts(), create_post_form(data)?)
            .await
    }

    async fn update_post(&self, id: Id, data: &UpdatePostDto) -> Result<Post> {
        self.client
            .patch_multipart(&endpoints::post(id), update_post_form(data)?)
            .await
    }

    async fn delete_post(&self, id: Id) -> Result<()> {
        self.client.delete(&endpoints::post(id)).await
    }

    async fn toggle_like(&self, id: Id) -> Result<Post> {
        self.client.post_empty(&endpoints::like(id)).await
    }

    async fn post_likes(&self, id: Id) -> Result<Vec<LikeUser>> {
        self.client.get(&endpoints::likes(id), &[]).await
    }

    async fn comments(&self, post_id: Id) -> Result<Vec<Comment>> {
        self.client.get(&endpoints::comments(post_id), &[]).await
    }

    async fn create_comment(&self, post_id: Id, data: &CreateCommentDto) -> Result<Comment> {
        self.client.post_json(&endpoints::comments(post_id), data).await
    }

    async fn delete_comment(&self, comment_id: Id) -> Result<()> {
        self.client.delete(&endpoints::comment(comment_id)).await
    }

    async fn health(&self) -> Result<()> {
        self.client
            .get::<serde_json::Value>(&endpoints::health(), &[])
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::FormValue;
    use crate::domain::ImageUpload;

    #[test]
    fn new_post_sends_tags_as_json_text() {
        let body = create_post_form(&CreatePostDto {
            title: "Hello".into(),
            content: "First post body".into(),
            tags: vec!["rust".into(), "web".into()],
            image: Some(ImageUpload::new("a.png", "image/png", vec![1, 2])),
        })
        .unwrap();

        assert_eq!(
            body.get("tags"),
            Some(&FormValue::Text(r#"["rust","web"]"#.to_string()))
        );
        assert!(matches!(body.get("image"), Some(FormValue::File(_))));
    }

    #[test]
    fn partial_update_sends_only_present_fields() {
        let body = update_post_form(&UpdatePostDto {
            content: Some("Rewritten content".into()),
            remove_image: true,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(body.names().collect::<Vec<_>>(), vec!["content", "removeImage"]);
        assert_eq!(body.get("removeImage"), Some(&FormValue::Text("true".to_string())));
    }

    #[test]
    fn profile_update_omits_missing_fields() {
        let body = update_profile_form(&UpdateProfileDto {
            headline: Some("Engineer".into()),
            ..Default::default()
        });
        assert_eq!(body.names().collect::<Vec<_>>(), vec!["headline"]);
        assert!(update_profile_form(&UpdateProfileDto::default()).is_empty());
    }
}
