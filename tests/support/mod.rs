//! In-memory blog server shared by the integration tests.
//!
//! `FakeApi` implements `BlogApi` over a small mutable world: users, posts,
//! comments and likes. Calls that need a session check the bearer token the
//! store's session shares with it, and answer 401 when it is missing or has
//! been revoked. Every call is counted so tests can assert what was sent.

#![allow(dead_code)]

use async_trait::async_trait;
use blogline::api::BlogApi;
use blogline::app::{SessionContext, Store};
use blogline::domain::{
    AuthResponse, AuthorSummary, BloglineError, ChangePasswordDto, Comment, CreateCommentDto,
    CreatePostDto, Credentials, Id, LikeUser, LoginDto, PageParams, Paginated,
    PasswordChangeResponse, Post, PublicProfile, RegisterDto, RegisterResponse, Result,
    SearchParams, UpdatePostDto, UpdateProfileDto, User, UserPosts,
};
use blogline::storage::MemoryTokenStore;
use chrono::Utc;
use rstest::fixture;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct-horse";
pub const TOKEN: &str = "token-ada";

pub fn user(id: Id, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        username: Some(name.to_lowercase()),
        headline: None,
        avatar_url: None,
        bio: None,
    }
}

pub fn post(id: Id, title: &str, author: User) -> Post {
    Post {
        id,
        title: title.to_string(),
        content: format!("{title} in more than ten characters"),
        tags: vec!["rust".to_string()],
        image_url: None,
        author,
        created_at: Utc::now(),
        updated_at: None,
        likes: 0,
        comments: 0,
    }
}

#[derive(Default)]
struct World {
    me: Option<User>,
    posts: Vec<Post>,
    comments: Vec<(Id, Comment)>,
    liked: HashSet<Id>,
    revoked: bool,
    calls: HashMap<&'static str, usize>,
    /// Artificial latency per search query.
    delays: HashMap<String, Duration>,
    next_id: Id,
}

impl World {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }
}

/// A fake server sharing the session's credentials.
#[derive(Clone)]
pub struct FakeApi {
    world: Arc<Mutex<World>>,
    credentials: Credentials,
}

impl FakeApi {
    pub fn new(credentials: Credentials) -> Self {
        let me = user(1, "Ada");
        let world = World {
            posts: vec![post(10, "Ownership explained", user(2, "Grace"))],
            me: Some(me),
            next_id: 100,
            ..World::default()
        };
        Self {
            world: Arc::new(Mutex::new(world)),
            credentials,
        }
    }

    fn world(&self) -> MutexGuard<'_, World> {
        self.world.lock().unwrap()
    }

    /// How many times `operation` reached the server.
    pub fn calls(&self, operation: &str) -> usize {
        self.world().calls.get(operation).copied().unwrap_or(0)
    }

    /// Replaces the stored posts.
    pub fn set_posts(&self, posts: Vec<Post>) {
        self.world().posts = posts;
    }

    pub fn set_comment_count(&self, post_id: Id, count: u64) {
        if let Some(post) = self.world().posts.iter_mut().find(|p| p.id == post_id) {
            post.comments = count;
        }
    }

    /// Makes the server reject the current token from now on.
    pub fn revoke_session(&self) {
        self.world().revoked = true;
    }

    pub fn delay_search(&self, query: &str, delay: Duration) {
        self.world().delays.insert(query.to_string(), delay);
    }

    fn record(&self, operation: &'static str) {
        *self.world().calls.entry(operation).or_default() += 1;
    }

    fn authorize(&self) -> Result<User> {
        let world = self.world();
        let valid = self.credentials.token().as_deref() == Some(TOKEN) && !world.revoked;
        match (&world.me, valid) {
            (Some(me), true) => Ok(me.clone()),
            _ => Err(BloglineError::Unauthorized {
                message: "Unauthorized".to_string(),
            }),
        }
    }

    fn not_found(what: &str) -> BloglineError {
        BloglineError::Api {
            status: 404,
            message: format!("{what} not found"),
        }
    }

    fn page_of(posts: Vec<Post>, page: PageParams) -> Paginated<Post> {
        let total = posts.len() as u64;
        let limit = page.limit as usize;
        let last_page = posts.len().div_ceil(limit).max(1) as u32;
        let data = posts
            .into_iter()
            .skip((page.page as usize - 1) * limit)
            .take(limit)
            .collect();
        Paginated {
            data,
            total,
            page: page.page,
            last_page,
        }
    }
}

#[async_trait]
impl BlogApi for FakeApi {
    async fn login(&self, credentials: &LoginDto) -> Result<AuthResponse> {
        self.record("login");
        if credentials.email == EMAIL && credentials.password == PASSWORD {
            self.world().revoked = false;
            Ok(AuthResponse {
                token: TOKEN.to_string(),
            })
        } else {
            Err(BloglineError::Unauthorized {
                message: "Invalid credentials".to_string(),
            })
        }
    }

    async fn register(&self, data: &RegisterDto) -> Result<RegisterResponse> {
        self.record("register");
        if data.email == EMAIL {
            return Err(BloglineError::Api {
                status: 409,
                message: "Email already registered".to_string(),
            });
        }
        let id = self.world().next_id();
        Ok(RegisterResponse {
            id,
            email: data.email.clone(),
            username: data.username.clone(),
        })
    }

    async fn my_profile(&self) -> Result<User> {
        self.record("my_profile");
        self.authorize()
    }

    async fn public_profile(&self, username: &str, page: PageParams) -> Result<PublicProfile> {
        self.record("public_profile");
        let world = self.world();
        let author = world
            .posts
            .iter()
            .map(|p| &p.author)
            .find(|a| a.username.as_deref() == Some(username))
            .cloned()
            .ok_or_else(|| Self::not_found("User"))?;
        let posts: Vec<Post> = world
            .posts
            .iter()
            .filter(|p| p.author.id == author.id)
            .cloned()
            .collect();
        Ok(PublicProfile {
            id: author.id,
            name: author.name.clone(),
            username: username.to_string(),
            headline: None,
            avatar_url: None,
            bio: None,
            posts: Some(Self::page_of(posts, page)),
        })
    }

    async fn user_by_id(&self, id: Id) -> Result<User> {
        self.record("user_by_id");
        let world = self.world();
        world
            .posts
            .iter()
            .map(|p| &p.author)
            .chain(world.me.iter())
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("User"))
    }

    async fn update_profile(&self, data: &UpdateProfileDto) -> Result<User> {
        self.record("update_profile");
        let mut me = self.authorize()?;
        if let Some(name) = &data.name {
            me.name.clone_from(name);
        }
        if let Some(headline) = &data.headline {
            me.headline = Some(headline.clone());
        }
        if let Some(bio) = &data.bio {
            me.bio = Some(bio.clone());
        }
        self.world().me = Some(me.clone());
        Ok(me)
    }

    async fn change_password(&self, data: &ChangePasswordDto) -> Result<PasswordChangeResponse> {
        self.record("change_password");
        self.authorize()?;
        if data.current_password != PASSWORD {
            return Err(BloglineError::Api {
                status: 400,
                message: "Current password is incorrect".to_string(),
            });
        }
        Ok(PasswordChangeResponse {
            success: true,
            message: String::new(),
        })
    }

    async fn recommended_posts(&self, page: PageParams) -> Result<Paginated<Post>> {
        self.record("recommended_posts");
        let posts = self.world().posts.clone();
        Ok(Self::page_of(posts, page))
    }

    async fn most_liked_posts(&self, page: PageParams) -> Result<Paginated<Post>> {
        self.record("most_liked_posts");
        let mut posts = self.world().posts.clone();
        posts.sort_by(|a, b| b.likes.cmp(&a.likes));
        Ok(Self::page_of(posts, page))
    }

    async fn my_posts(&self, page: PageParams) -> Result<Paginated<Post>> {
        self.record("my_posts");
        let me = self.authorize()?;
        let posts: Vec<Post> = self
            .world()
            .posts
            .iter()
            .filter(|p| p.author.id == me.id)
            .cloned()
            .collect();
        Ok(Self::page_of(posts, page))
    }

    async fn search_posts(&self, params: &SearchParams) -> Result<Paginated<Post>> {
        self.record("search_posts");
        let delay = self.world().delays.get(&params.query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let needle = params.query.to_lowercase();
        let posts: Vec<Post> = self
            .world()
            .posts
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::page_of(posts, params.page))
    }

    async fn posts_by_username(&self, username: &str, page: PageParams) -> Result<UserPosts> {
        self.record("posts_by_username");
        let profile = self.public_profile(username, page).await?;
        Ok(UserPosts {
            page: profile.posts.unwrap_or_default(),
            user: AuthorSummary {
                id: profile.id,
                name: profile.name,
                username: profile.username,
                headline: None,
                avatar_url: None,
            },
        })
    }

    async fn posts_by_user(&self, user_id: Id, page: PageParams) -> Result<UserPosts> {
        self.record("posts_by_user");
        let author = self.user_by_id(user_id).await?;
        let posts: Vec<Post> = self
            .world()
            .posts
            .iter()
            .filter(|p| p.author.id == user_id)
            .cloned()
            .collect();
        Ok(UserPosts {
            page: Self::page_of(posts, page),
            user: AuthorSummary {
                id: author.id,
                name: author.name.clone(),
                username: author.handle().to_string(),
                headline: None,
                avatar_url: None,
            },
        })
    }

    async fn post(&self, id: Id) -> Result<Post> {
        self.record("post");
        self.world()
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Post"))
    }

    async fn create_post(&self, data: &CreatePostDto) -> Result<Post> {
        self.record("create_post");
        let me = self.authorize()?;
        let mut world = self.world();
        let id = world.next_id();
        let created = Post {
            tags: data.tags.clone(),
            content: data.content.clone(),
            image_url: data.image.as_ref().map(|i| format!("/uploads/{}", i.file_name)),
            ..post(id, &data.title, me)
        };
        world.posts.insert(0, created.clone());
        Ok(created)
    }

    async fn update_post(&self, id: Id, data: &UpdatePostDto) -> Result<Post> {
        self.record("update_post");
        let me = self.authorize()?;
        let mut world = self.world();
        let post = world
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::not_found("Post"))?;
        if post.author.id != me.id {
            return Err(BloglineError::Api {
                status: 403,
                message: "You can only edit your own posts".to_string(),
            });
        }
        if let Some(title) = &data.title {
            post.title.clone_from(title);
        }
        if let Some(content) = &data.content {
            post.content.clone_from(content);
        }
        if let Some(tags) = &data.tags {
            post.tags.clone_from(tags);
        }
        post.updated_at = Some(Utc::now());
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Id) -> Result<()> {
        self.record("delete_post");
        self.authorize()?;
        let mut world = self.world();
        let before = world.posts.len();
        world.posts.retain(|p| p.id != id);
        if world.posts.len() == before {
            return Err(Self::not_found("Post"));
        }
        Ok(())
    }

    async fn toggle_like(&self, id: Id) -> Result<Post> {
        self.record("toggle_like");
        self.authorize()?;
        let mut world = self.world();
        let liked = !world.liked.remove(&id);
        if liked {
            world.liked.insert(id);
        }
        let post = world
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::not_found("Post"))?;
        post.likes = if liked {
            post.likes + 1
        } else {
            post.likes.saturating_sub(1)
        };
        Ok(post.clone())
    }

    async fn post_likes(&self, id: Id) -> Result<Vec<LikeUser>> {
        self.record("post_likes");
        let world = self.world();
        let me = world.me.clone();
        Ok(me
            .filter(|_| world.liked.contains(&id))
            .map(|u| LikeUser {
                id: u.id,
                name: u.name,
                headline: None,
                avatar_url: None,
            })
            .into_iter()
            .collect())
    }

    async fn comments(&self, post_id: Id) -> Result<Vec<Comment>> {
        self.record("comments");
        Ok(self
            .world()
            .comments
            .iter()
            .filter(|(p, _)| *p == post_id)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn create_comment(&self, post_id: Id, data: &CreateCommentDto) -> Result<Comment> {
        self.record("create_comment");
        let me = self.authorize()?;
        let mut world = self.world();
        let id = world.next_id();
        let comment = Comment {
            id,
            content: data.content.clone(),
            author: me,
            post: None,
            created_at: Utc::now(),
        };
        world.comments.push((post_id, comment.clone()));
        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: Id) -> Result<()> {
        self.record("delete_comment");
        self.authorize()?;
        self.world().comments.retain(|(_, c)| c.id != comment_id);
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        self.record("health");
        Ok(())
    }
}

/// A signed-out store over a fresh fake server.
#[fixture]
pub fn store() -> Store<FakeApi> {
    let credentials = Credentials::default();
    let session = SessionContext::new(Box::new(MemoryTokenStore::new()), credentials.clone()).unwrap();
    Store::new(FakeApi::new(credentials), session)
}

/// A store whose session starts with a valid stored token.
#[fixture]
pub fn signed_in() -> Store<FakeApi> {
    let credentials = Credentials::default();
    let session =
        SessionContext::new(Box::new(MemoryTokenStore::with_token(TOKEN)), credentials.clone()).unwrap();
    Store::new(FakeApi::new(credentials), session)
}
