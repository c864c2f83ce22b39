//! File-backed bearer token persistence.

use super::atomic::write_atomic;
use async_trait::async_trait;
use rcap_core::error::{RcapError, Result};
use rcap_core::session::TokenStore;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
}

/// Keeps the token in `session.json`, readable by the owner only.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }

        let stored: StoredToken = serde_json::from_str(&content)?;
        Ok(Some(stored.token).filter(|token| !token.is_empty()))
    }

    async fn save(&self, token: &str) -> Result<()> {
        let contents = serde_json::to_vec(&StoredToken {
            token: token.to_string(),
        })?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, &contents, Some(0o600)))
            .await
            .map_err(|e| RcapError::internal(format!("Token write task failed: {}", e)))??;

        tracing::debug!("[FileTokenStore] Token saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("[FileTokenStore] Token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
