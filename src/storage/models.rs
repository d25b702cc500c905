//! Storage record models for the persistence layer.
//!
//! These are the on-disk shapes, kept separate from the domain [`Session`] so
//! that the file format can evolve without touching the rest of the crate.
//!
//! [`Session`]: crate::domain::Session

use serde::{Deserialize, Serialize};

/// Current on-disk format version.
pub const TOKEN_FILE_VERSION: u32 = 1;

/// The persisted bearer token.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "token": "eyJhbGciOi...",
///   "saved_at": 1714557600
/// }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Version of the storage format for future migrations.
    pub version: u32,

    /// The bearer token, `None` once cleared.
    #[serde(default)]
    pub token: Option<String>,

    /// Unix timestamp of the last save.
    #[serde(default)]
    pub saved_at: Option<i64>,
}

impl TokenRecord {
    /// A record holding `token`, stamped with the current time.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            version: TOKEN_FILE_VERSION,
            token: Some(token.into()),
            saved_at: Some(chrono::Utc::now().timestamp()),
        }
    }
}

impl Default for TokenRecord {
    fn default() -> Self {
        Self {
            version: TOKEN_FILE_VERSION,
            token: None,
            saved_at: None,
        }
    }
}

impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("version", &self.version)
            .field("has_token", &self.token.is_some())
            .field("saved_at", &self.saved_at)
            .finish()
    }
}
