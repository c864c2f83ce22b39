//! Durable bearer-token storage.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// Storage that keeps the bearer token across process restarts.
///
/// Only [`SessionHandle`](super::SessionHandle) writes through this trait;
/// everything else reads the token from the handle.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the persisted token, if any.
    async fn load(&self) -> Result<Option<String>>;

    async fn save(&self, token: &str) -> Result<()>;

    /// Removes the persisted token. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<()>;
}

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`, as if left by a previous run.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Synchronous peek used by tests and diagnostics.
    pub fn peek(&self) -> Option<String> {
        self.token.lock().ok().and_then(|token| token.clone())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.peek())
    }

    async fn save(&self, token: &str) -> Result<()> {
        let mut slot = self
            .token
            .lock()
            .map_err(|e| crate::error::RcapError::internal(format!("Token lock poisoned: {}", e)))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut slot = self
            .token
            .lock()
            .map_err(|e| crate::error::RcapError::internal(format!("Token lock poisoned: {}", e)))?;
        *slot = None;
        Ok(())
    }
}
