//! Process-local token store.

use crate::domain::error::Result;
use crate::storage::backend::TokenStore;

/// Keeps the token in memory only; nothing survives the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.token = None;
        Ok(())
    }
}
