//! Path management for rcap configuration files.
//!
//! ```text
//! ~/.config/rcap/
//! ├── config.toml      # ClientConfig
//! ├── session.json     # Persisted bearer token (0600)
//! └── logs/            # Rolling CLI logs
//!     └── rcap.log.YYYY-MM-DD
//! ```

use rcap_core::error::{RcapError, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "rcap";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcapPaths {
    root: PathBuf,
}

impl RcapPaths {
    /// Resolves the platform config directory (XDG on Linux).
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| RcapError::config("Cannot find the user config directory"))?;
        Ok(Self {
            root: base.join(APP_DIR),
        })
    }

    /// Uses `root` in place of the platform directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Creates the config and log directories if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
