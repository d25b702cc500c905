//! Token store abstraction.
//!
//! The only durable client state is the bearer token. [`TokenStore`] hides
//! where it lives so the session owner can run against a file in production
//! and an in-memory store in tests.

use crate::domain::error::Result;

/// Durable home of the bearer token.
///
/// # Implementations
///
/// - [`JsonTokenStore`](crate::storage::JsonTokenStore): JSON file with atomic writes (default)
/// - [`MemoryTokenStore`](crate::storage::MemoryTokenStore): process-local, for tests and ephemeral runs
///
/// # Examples
///
/// ```no_run
/// use blogline::storage::{JsonTokenStore, TokenStore};
/// use std::path::PathBuf;
///
/// let mut store = JsonTokenStore::new(PathBuf::from("/tmp/blogline/session.json"))?;
/// store.save("token")?;
/// assert_eq!(store.load()?.as_deref(), Some("token"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait TokenStore: Send {
    /// Returns the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&mut self, token: &str) -> Result<()>;

    /// Removes the stored token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn clear(&mut self) -> Result<()>;
}
