//! Display layer: view models and text formatting.
//!
//! Nothing here draws. The view models turn application state into
//! display-ready strings and flags that any front end can print:
//!
//! ```text
//! AppState → feed_view / post_detail_view / *_profile_header → view model → front end
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Post cards, pagination window, post detail, profile header
//! - [`format`]: Relative times, truncation, initials, grouped numbers

pub mod format;
pub mod viewmodel;

pub use viewmodel::{
    feed_view, my_profile_header, pagination_view, post_detail_view, public_profile_header,
    CommentItem, EmptyState, FeedView, PageLink, PaginationView, PostCard, PostDetailView,
    ProfileHeader,
};
