//! Session and shared bearer credentials.
//!
//! A [`Session`] is created by a successful login and lives until logout or
//! until the server answers 401. The live token is shared between the HTTP
//! client and the session owner through [`Credentials`], so that invalidation
//! by either side is seen by the other.

use super::user::Id;
use std::sync::{Arc, RwLock};

/// An authenticated session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<Id>,
    pub token: String,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            user_id: None,
            token: token.into(),
        }
    }

    /// Whether the session carries a usable token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("is_authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// In-memory bearer token shared by every clone.
///
/// A poisoned lock is treated as "no token" on read and recovered on write.
#[derive(Clone, Default)]
pub struct Credentials {
    token: Arc<RwLock<Option<String>>>,
}

impl Credentials {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token)),
        }
    }

    /// Current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.token().is_some()
    }

    pub fn set(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Some(token.into());
    }

    /// Drops the token. Returns whether one was present.
    pub fn clear(&self) -> bool {
        let mut guard = self.token.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.take().is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("present", &self.is_present())
            .finish()
    }
}
