//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the hooks (and the CLI behind them) and the
//! domain/storage/worker layers. It implements a unidirectional data flow:
//!
//! ```text
//! Hook call → Event → handle_event → slice reducers → Actions → Store
//!                          ↑                                      ↓
//!                          └──────── worker ApiResponse ──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects emitted by the event handler
//! - [`forms`]: Form drafts with per-field validation
//! - [`handler`]: Event processing and cross-slice reactions
//! - [`routes`]: Pages and login redirects
//! - [`session`]: Token ownership across file and memory
//! - [`slices`]: Auth, posts, comments and profile state
//! - [`state`]: The state container
//! - [`store`]: Executes actions and settles requests
//!
//! # Example
//!
//! ```rust
//! use blogline::app::{handle_event, AppState, Event, LoginField};
//!
//! let mut state = AppState::default();
//! handle_event(&mut state, Event::SetLoginField {
//!     field: LoginField::Email,
//!     value: "ada@example.com".into(),
//! })?;
//! assert!(state.auth.login_form.email.touched);
//! # Ok::<(), blogline::domain::BloglineError>(())
//! ```

pub mod actions;
pub mod forms;
pub mod handler;
pub mod routes;
pub mod session;
pub mod slices;
pub mod state;
pub mod store;

pub use actions::Action;
pub use forms::{Field, LoginField, LoginForm, PasswordForm, PostComposer, RegisterField, RegisterForm};
pub use handler::{handle_event, Event};
pub use routes::Route;
pub use session::SessionContext;
pub use state::AppState;
pub use store::Store;
