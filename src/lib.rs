//! Blogline: a typed client for a blog platform's REST API.
//!
//! Blogline keeps the whole client-side state of the platform in one place:
//! - Sign-in, registration and a bearer token persisted across runs
//! - Post feeds (recommended, most liked, mine, search, by author) with paging
//! - Post detail with likes, comments, and the composer for writing and editing
//! - The signed-in user's profile, other users' profiles, and password changes
//! - Client-side validation of every form before anything is sent

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Command-line shim (main.rs)                        │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Hooks (hooks/)                                     │  ← Per-slice facades
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling and slice reducers                │
//! │  - Action dispatching, routes, session              │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - View models │   │ - Token file  │   │ - Requests    │
//! │ - Formatting  │   │ - In-memory   │   │ - Replies     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                   │
//! ┌─────────────────────────────────────────────────────┐
//! │  API (api/)                                         │  ← REST over reqwest
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Entities, payloads, validation, errors (domain/) │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing                            │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: The [`BlogApi`](api::BlogApi) trait and its HTTP implementation
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Entities, payloads, validation rules and errors
//! - [`hooks`]: Per-slice facades with async operations
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`storage`]: Token persistence
//! - [`ui`]: View models and display formatting
//! - [`worker`]: Executes API requests and answers with replies
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! Settings come from an optional TOML file, then `BLOGLINE_*` environment
//! variables:
//!
//! ```toml
//! # ~/.config/blogline/config.toml
//! api_base_url = "https://blog.example.com/api"
//! request_timeout_secs = 10
//! data_dir = "~/.local/share/blogline"
//! default_page_limit = 10
//! trace_level = "debug"
//! ```
//!
//! `BLOGLINE_API_BASE_URL`, `BLOGLINE_REQUEST_TIMEOUT_SECS`,
//! `BLOGLINE_DATA_DIR`, `BLOGLINE_DEFAULT_PAGE_LIMIT` and
//! `BLOGLINE_TRACE_LEVEL` override the file. Values that do not parse are
//! ignored.
//!
//! # Request Flow
//!
//! 1. A hook dispatches an [`Event`] to the [`Store`](app::Store)
//! 2. [`handle_event`] runs the pending reducer and emits [`Action`]s
//! 3. Requests are executed by the worker; several may be in flight
//! 4. Each reply returns as `Event::Response` and runs the fulfilled or
//!    rejected reducer, in whatever order replies arrive
//! 5. Fetch replies overtaken by a newer fetch of the same slice are dropped
//! 6. A 401 anywhere except the login call clears the token and redirects to
//!    the login page
//!
//! # Design Patterns
//!
//! ## Centralized State
//!
//! All state lives in [`AppState`], split into auth, posts, comments and
//! profile slices. Only [`handle_event`] changes it, so every transition is a
//! plain function of state and event and is tested without a network.
//!
//! ## Request Messages
//!
//! Event handling never awaits. It describes calls as messages; the store
//! sends them and feeds the replies back as events.
//!
//! ## Immutable View Models
//!
//! Display uses computed view models:
//! - Clear separation between state and display
//! - Counters, relative times and ownership flags are precomputed
//! - Quick-filter highlight ranges come with each card

pub mod api;
pub mod app;
pub mod domain;
pub mod hooks;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, Route, SessionContext, Store};
pub use domain::{BloglineError, Result};

use api::{HttpBlogApi, HttpClient};
use domain::pagination::{DEFAULT_LIMIT, MAX_LIMIT};
use domain::{Credentials, PageParams};
use infrastructure::paths;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::JsonTokenStore;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "BLOGLINE_";

/// Client configuration.
///
/// Every field has a default, so an empty file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL every endpoint path is joined onto.
    pub api_base_url: String,

    /// Deadline for each request, in seconds. Default: 10
    pub request_timeout_secs: u64,

    /// Where the token file and trace log live.
    ///
    /// A leading `~` is expanded. Default: the XDG data directory.
    pub data_dir: PathBuf,

    /// Page size for list requests, clamped to `1..=50`. Default: 10
    pub default_page_limit: u32,

    /// Tracing level for OpenTelemetry spans.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_dir: paths::get_data_dir(),
            default_page_limit: DEFAULT_LIMIT,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BloglineError::Config`] if the document is not valid TOML or
    /// a value has the wrong type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blogline::Config;
    ///
    /// let config = Config::from_toml_str("default_page_limit = 20")?;
    /// assert_eq!(config.default_page_limit, 20);
    /// assert_eq!(config.request_timeout_secs, 10);
    /// # Ok::<(), blogline::BloglineError>(())
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(source)
            .map_err(|e| BloglineError::Config(format!("invalid configuration: {e}")))?;
        config.data_dir = expand_path(&config.data_dir);
        config.default_page_limit = config.default_page_limit.clamp(1, MAX_LIMIT);
        Ok(config)
    }

    /// Applies string overrides keyed by field name.
    ///
    /// # Parsing Rules
    ///
    /// - `api_base_url`, `trace_level`: used when not blank
    /// - `request_timeout_secs`: positive integer, else ignored
    /// - `default_page_limit`: integer in `1..=50`, else ignored
    /// - `data_dir`: used when not blank, `~` expanded
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use blogline::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("request_timeout_secs".to_string(), "30".to_string());
    /// map.insert("default_page_limit".to_string(), "many".to_string());
    ///
    /// let config = Config::default().with_overrides(&map);
    /// assert_eq!(config.request_timeout_secs, 30);
    /// assert_eq!(config.default_page_limit, 10);
    /// ```
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            overrides
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        if let Some(url) = text("api_base_url") {
            self.api_base_url = url;
        }
        if let Some(secs) = text("request_timeout_secs")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
        {
            self.request_timeout_secs = secs;
        }
        if let Some(dir) = text("data_dir") {
            self.data_dir = paths::expand_tilde(&dir);
        }
        if let Some(limit) = text("default_page_limit")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|limit| (1..=MAX_LIMIT).contains(limit))
        {
            self.default_page_limit = limit;
        }
        if let Some(level) = text("trace_level") {
            self.trace_level = Some(level);
        }
        self
    }

    /// Loads `path` (or the default config file if it exists), then applies
    /// `BLOGLINE_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be read, or if any
    /// file read does not parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(std::fs::read_to_string(path)?),
            None => match paths::config_file().filter(|p| p.is_file()) {
                Some(default) => Some(std::fs::read_to_string(default)?),
                None => None,
            },
        };
        let config = match file {
            Some(source) => Self::from_toml_str(&source)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(&env_overrides()))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Page `page` at the configured page size.
    #[must_use]
    pub fn page(&self, page: u32) -> PageParams {
        PageParams::new(page, self.default_page_limit)
    }

    #[must_use]
    pub fn token_file(&self) -> PathBuf {
        paths::token_file(&self.data_dir)
    }
}

fn expand_path(path: &Path) -> PathBuf {
    path.to_str()
        .map_or_else(|| path.to_path_buf(), paths::expand_tilde)
}

/// `BLOGLINE_*` variables keyed by the lower-cased rest of their name.
fn env_overrides() -> BTreeMap<String, String> {
    std::env::vars()
        .filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|field| (field.to_lowercase(), value))
        })
        .collect()
}

/// Builds a store talking HTTP, with the session persisted in the data
/// directory.
///
/// # Side Effects
///
/// - Creates the data directory if it doesn't exist
/// - Restores a token saved by a previous run
///
/// # Errors
///
/// Returns an error if the data directory or token file is unusable, or if the
/// base URL is invalid.
///
/// # Example
///
/// ```no_run
/// use blogline::{initialize, Config};
///
/// let store = initialize(&Config::default())?;
/// println!("signed in: {}", store.state().is_authenticated());
/// # Ok::<(), blogline::BloglineError>(())
/// ```
pub fn initialize(config: &Config) -> Result<Store<HttpBlogApi>> {
    tracing::debug!(api = %config.api_base_url, "initializing blogline client");

    std::fs::create_dir_all(&config.data_dir)?;
    let token_store = JsonTokenStore::new(config.token_file())?;
    let session = SessionContext::new(Box::new(token_store), Credentials::default())?;
    let client = HttpClient::new(
        &config.api_base_url,
        config.request_timeout(),
        session.credentials().clone(),
    )?;

    Ok(Store::new(HttpBlogApi::new(client), session))
}
