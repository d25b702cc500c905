//! Render-ready view models computed from application state.
//!
//! View models hold display strings and flags only: counters already grouped,
//! timestamps already relative, ownership already decided. A front end (the
//! CLI here) prints them without consulting the state again.
//!
//! The quick filter narrows the loaded page locally. Every whitespace-separated
//! token must fuzzy-match the post's title or one of its tags; the matched
//! characters of the title are reported as highlight ranges.
//!
//! # Example
//!
//! ```rust
//! use blogline::app::AppState;
//! use blogline::ui::viewmodel::feed_view;
//!
//! let state = AppState::default();
//! let feed = feed_view(&state);
//! assert!(feed.cards.is_empty());
//! assert_eq!(feed.empty_state.unwrap().message, "No posts yet");
//! ```

use crate::app::AppState;
use crate::domain::{Comment, Id, Post, PublicProfile, User};
use crate::ui::format;
use crate::worker::Feed;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Characters of content shown on a card.
pub const EXCERPT_CHARS: usize = 150;
/// Tags shown on a card before the rest are counted.
pub const CARD_TAGS: usize = 3;
/// Up to this many pages every page number is listed.
const FULL_WINDOW: u32 = 5;

/// One post in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: Id,
    pub title: String,
    pub excerpt: String,
    pub author_name: String,
    pub author_handle: String,
    pub author_initials: String,
    pub avatar_url: Option<String>,
    pub image_url: Option<String>,
    /// Relative creation time, e.g. "3h ago".
    pub posted: String,
    pub tags: Vec<String>,
    /// Tags left off the card.
    pub more_tags: usize,
    pub likes: String,
    pub comments: String,
    /// Whether the signed-in user wrote it.
    pub is_own: bool,
    /// Character ranges `(start, end)` of the title matched by the quick filter.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// One entry of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    /// Elided pages, shown as "...".
    Gap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current: u32,
    pub last: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub links: Vec<PageLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// The post list with its bar and empty state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedView {
    pub title: String,
    pub cards: Vec<PostCard>,
    /// Absent when everything fits on one page.
    pub pagination: Option<PaginationView>,
    pub empty_state: Option<EmptyState>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentItem {
    pub id: Id,
    pub author_name: String,
    pub author_initials: String,
    pub avatar_url: Option<String>,
    pub body: String,
    pub posted: String,
    pub can_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetailView {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub author_name: String,
    pub author_handle: String,
    pub author_initials: String,
    pub posted: String,
    pub edited: bool,
    pub likes: String,
    pub comment_count: String,
    /// Names of the users who liked it, when loaded.
    pub liked_by: Vec<String>,
    /// Edit and delete are offered.
    pub is_own: bool,
    pub comments: Vec<CommentItem>,
    pub comments_empty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHeader {
    pub name: String,
    pub handle: String,
    pub initials: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// Absent when the profile came without its posts.
    pub post_count: Option<String>,
    pub is_own: bool,
}

/// Coalesces the matched character indices into `(start, end)` ranges, end exclusive.
fn highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let mut start = None;
    let mut prev = None;

    for &idx in &indices {
        match (start, prev) {
            (None, _) => {
                start = Some(idx);
                prev = Some(idx);
            }
            (Some(_), Some(p)) if idx == p + 1 => {
                prev = Some(idx);
            }
            (Some(s), Some(p)) => {
                ranges.push((s, p + 1));
                start = Some(idx);
                prev = Some(idx);
            }
            _ => {}
        }
    }

    if let (Some(s), Some(p)) = (start, prev) {
        ranges.push((s, p + 1));
    }
    ranges
}

fn matches_filter(post: &Post, tokens: &[String], matcher: &SkimMatcherV2) -> bool {
    tokens.iter().all(|token| {
        matcher.fuzzy_match(&post.title, token).is_some()
            || post.tags.iter().any(|tag| matcher.fuzzy_match(tag, token).is_some())
    })
}

/// Card for `post`; `viewer` is the signed-in user's id.
#[must_use]
pub fn post_card(post: &Post, viewer: Option<Id>) -> PostCard {
    PostCard {
        id: post.id,
        title: post.title.clone(),
        excerpt: format::excerpt(&post.content, EXCERPT_CHARS),
        author_name: post.author.name.clone(),
        author_handle: post.author.handle().to_string(),
        author_initials: format::initials(&post.author.name),
        avatar_url: post.author.avatar_url.clone(),
        image_url: post.image_url.clone(),
        posted: format::time_ago(post.created_at),
        tags: post.tags.iter().take(CARD_TAGS).cloned().collect(),
        more_tags: post.tags.len().saturating_sub(CARD_TAGS),
        likes: format::format_number(post.likes),
        comments: format::format_number(post.comments),
        is_own: viewer.is_some_and(|id| post.is_authored_by(id)),
        highlight_ranges: Vec::new(),
    }
}

/// Page numbers to show around `current`: all of them up to five pages,
/// otherwise the first, the last, the neighbours of `current`, and gaps.
#[must_use]
pub fn pagination_window(current: u32, last: u32) -> Vec<PageLink> {
    if last <= FULL_WINDOW {
        return (1..=last).map(PageLink::Page).collect();
    }

    let mut links = vec![PageLink::Page(1)];
    if current > 3 {
        links.push(PageLink::Gap);
    }
    let from = current.saturating_sub(1).max(2);
    let to = current.saturating_add(1).min(last - 1);
    links.extend((from..=to).map(PageLink::Page));
    if current < last.saturating_sub(2) {
        links.push(PageLink::Gap);
    }
    links.push(PageLink::Page(last));
    links
}

#[must_use]
pub fn pagination_view(current: u32, last: u32) -> Option<PaginationView> {
    (last > 1).then(|| PaginationView {
        current,
        last,
        has_previous: current > 1,
        has_next: current < last,
        links: pagination_window(current, last),
    })
}

fn feed_title(feed: Option<&Feed>) -> String {
    match feed {
        None | Some(Feed::Recommended) => "Recommended".to_string(),
        Some(Feed::MostLiked) => "Most liked".to_string(),
        Some(Feed::Mine) => "My posts".to_string(),
        Some(Feed::Search(query)) => format!("Results for \"{query}\""),
        Some(Feed::Author(username)) => format!("Posts by @{username}"),
        Some(Feed::AuthorId(id)) => format!("Posts by user {id}"),
    }
}

fn feed_empty_state(feed: Option<&Feed>, filtered: bool) -> EmptyState {
    let (message, subtitle) = match feed {
        _ if filtered => ("No matching posts", "Try a different filter"),
        Some(Feed::Search(_)) => (
            "No posts found",
            "Try adjusting your search terms or browse all posts",
        ),
        Some(Feed::Mine) => (
            "No posts yet",
            "You haven't created any posts yet. Share your thoughts!",
        ),
        _ => ("No posts yet", "No posts available at the moment."),
    };
    EmptyState {
        message: message.to_string(),
        subtitle: subtitle.to_string(),
    }
}

/// The loaded post list, narrowed by the quick filter.
#[must_use]
pub fn feed_view(state: &AppState) -> FeedView {
    let posts = &state.posts;
    let _span = tracing::debug_span!(
        "feed_view",
        posts = posts.posts.len(),
        filter_len = posts.quick_filter.len()
    )
    .entered();

    let query = posts.quick_filter.trim();
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    let matcher = (!tokens.is_empty()).then(SkimMatcherV2::default);
    let viewer = state.current_user_id();

    let cards: Vec<PostCard> = posts
        .posts
        .iter()
        .filter(|post| matcher.as_ref().map_or(true, |m| matches_filter(post, &tokens, m)))
        .map(|post| {
            let mut card = post_card(post, viewer);
            if let Some(m) = &matcher {
                card.highlight_ranges = highlight_ranges(&post.title, query, m);
            }
            card
        })
        .collect();

    let empty_state = (cards.is_empty() && !posts.is_loading)
        .then(|| feed_empty_state(posts.feed.as_ref(), matcher.is_some()));

    FeedView {
        title: feed_title(posts.feed.as_ref()),
        cards,
        pagination: pagination_view(posts.page, posts.last_page),
        empty_state,
        is_loading: posts.is_loading,
        error: posts.error.clone(),
    }
}

fn comment_item(comment: &Comment, viewer: Option<Id>) -> CommentItem {
    CommentItem {
        id: comment.id,
        author_name: comment.author.name.clone(),
        author_initials: format::initials(&comment.author.name),
        avatar_url: comment.author.avatar_url.clone(),
        body: comment.content.clone(),
        posted: format::time_ago(comment.created_at),
        can_delete: viewer == Some(comment.author.id),
    }
}

/// The open post with its comments, or `None` if no post is loaded.
#[must_use]
pub fn post_detail_view(state: &AppState) -> Option<PostDetailView> {
    let post = state.posts.current_post.as_ref()?;
    let viewer = state.current_user_id();

    let comments: Vec<CommentItem> = if state.comments.post_id == Some(post.id) {
        state
            .comments
            .comments
            .iter()
            .map(|c| comment_item(c, viewer))
            .collect()
    } else {
        Vec::new()
    };
    let comments_empty = (comments.is_empty() && !state.comments.is_loading)
        .then(|| "No comments yet. Be the first to comment!".to_string());

    Some(PostDetailView {
        id: post.id,
        title: post.title.clone(),
        content: post.content.clone(),
        tags: post.tags.clone(),
        image_url: post.image_url.clone(),
        author_name: post.author.name.clone(),
        author_handle: post.author.handle().to_string(),
        author_initials: format::initials(&post.author.name),
        posted: format::time_ago(post.created_at),
        edited: post.updated_at.is_some_and(|at| at > post.created_at),
        likes: format::count_label(post.likes, "like"),
        comment_count: format::count_label(post.comments, "comment"),
        liked_by: state
            .posts
            .likes_of(post.id)
            .unwrap_or_default()
            .iter()
            .map(|u| u.name.clone())
            .collect(),
        is_own: viewer.is_some_and(|id| post.is_authored_by(id)),
        comments,
        comments_empty,
    })
}

/// Header for another user's profile.
#[must_use]
pub fn public_profile_header(profile: &PublicProfile, viewer: Option<Id>) -> ProfileHeader {
    ProfileHeader {
        name: profile.name.clone(),
        handle: format!("@{}", profile.username),
        initials: format::initials(&profile.name),
        headline: profile.headline.clone(),
        bio: profile.bio.clone(),
        avatar_url: profile.avatar_url.clone(),
        post_count: profile
            .posts
            .as_ref()
            .map(|page| format::count_label(page.total, "post")),
        is_own: viewer == Some(profile.id),
    }
}

/// Header for the signed-in user's own profile.
#[must_use]
pub fn my_profile_header(user: &User) -> ProfileHeader {
    ProfileHeader {
        name: user.name.clone(),
        handle: format!("@{}", user.handle()),
        initials: format::initials(&user.name),
        headline: user.headline.clone(),
        bio: user.bio.clone(),
        avatar_url: user.avatar_url.clone(),
        post_count: None,
        is_own: true,
    }
}
