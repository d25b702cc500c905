//! Owner of the bearer token.
//!
//! The token lives in two places: the durable [`TokenStore`] and the shared
//! [`Credentials`] the HTTP client reads on every request. [`SessionContext`]
//! keeps them in step.

use crate::domain::error::Result;
use crate::domain::Credentials;
use crate::storage::TokenStore;

pub struct SessionContext {
    store: Box<dyn TokenStore>,
    credentials: Credentials,
}

impl SessionContext {
    /// Loads any token left by a previous run into `credentials`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store cannot be read.
    pub fn new(store: Box<dyn TokenStore>, credentials: Credentials) -> Result<Self> {
        if let Some(token) = store.load()? {
            tracing::debug!("restored stored session token");
            credentials.set(token);
        }
        Ok(Self { store, credentials })
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.credentials.token()
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Stores `token` durably and for outgoing requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be written. The in-memory token is
    /// set regardless, so the current run stays signed in.
    pub fn establish(&mut self, token: &str) -> Result<()> {
        self.credentials.set(token);
        self.store.save(token)
    }

    /// Forgets the token everywhere.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable copy cannot be removed.
    pub fn teardown(&mut self) -> Result<()> {
        self.credentials.clear();
        self.store.clear()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("has_token", &self.credentials.is_present())
            .finish_non_exhaustive()
    }
}
