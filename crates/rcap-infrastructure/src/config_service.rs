//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml`, applies environment overrides
//! and caches the result.

use crate::paths::RcapPaths;
use crate::storage::atomic::write_atomic;
use rcap_core::config::ClientConfig;
use rcap_core::error::{RcapError, Result};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub const ENV_API_URL: &str = "RCAP_API_URL";
pub const ENV_POLL_INTERVAL_SECS: &str = "RCAP_POLL_INTERVAL_SECS";
pub const ENV_LOG_LEVEL: &str = "RCAP_LOG_LEVEL";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<ClientConfig>>>,
    env: EnvLookup,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
            env: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    pub fn from_paths(paths: &RcapPaths) -> Self {
        Self::new(paths.config_file())
    }

    /// Replaces the process environment as the source of overrides.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// Returns the configuration, loading it on first access.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Some(cached) = self
            .config
            .read()
            .map_err(|e| RcapError::internal(format!("Config cache poisoned: {}", e)))?
            .as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = self.apply_env(self.load_file()?);

        *self
            .config
            .write()
            .map_err(|e| RcapError::internal(format!("Config cache poisoned: {}", e)))? =
            Some(loaded.clone());
        Ok(loaded)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cached) = self.config.write() {
            *cached = None;
        }
    }

    /// Writes `config` to the config file and drops the cache.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let contents = toml::to_string_pretty(config)?;
        write_atomic(&self.path, contents.as_bytes(), None)?;
        self.invalidate_cache();
        Ok(())
    }

    fn load_file(&self) -> Result<ClientConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    "[ConfigService] No config at {}, using defaults",
                    self.path.display()
                );
                return Ok(ClientConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: ClientConfig = toml::from_str(&content).map_err(|e| {
            RcapError::config(format!("Invalid {}: {}", self.path.display(), e))
        })?;
        Ok(config)
    }

    fn apply_env(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(api_url) = (self.env)(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_url(api_url);
        }

        if let Some(raw) = (self.env)(ENV_POLL_INTERVAL_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.poll_interval_secs = secs,
                _ => tracing::warn!(
                    "[ConfigService] Ignoring {}={:?}: expected a positive number of seconds",
                    ENV_POLL_INTERVAL_SECS,
                    raw
                ),
            }
        }

        if let Some(level) = (self.env)(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            config.log_level = level;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service =
            ConfigService::new(temp_dir.path().join("config.toml")).with_env_lookup(no_env);

        assert_eq!(service.get_config().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_file_then_env_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://file.example/api/v1\"\npoll_interval_secs = 10\n",
        )
        .unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "https://env.example/api/v1/"),
            (ENV_LOG_LEVEL, "debug"),
        ]);
        let service = ConfigService::new(path)
            .with_env_lookup(move |key| env.get(key).map(|v| v.to_string()));

        let config = service.get_config().unwrap();
        assert_eq!(config.api_url, "https://env.example/api/v1");
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_poll_interval_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"))
            .with_env_lookup(|key| (key == ENV_POLL_INTERVAL_SECS).then(|| "soon".to_string()));

        assert_eq!(service.get_config().unwrap().poll_interval_secs, 30);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "poll_interval_secs = \"often\"").unwrap();

        let service = ConfigService::new(path).with_env_lookup(no_env);
        assert!(matches!(service.get_config(), Err(RcapError::Config(_))));
    }

    #[test]
    fn test_cache_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::new(path.clone()).with_env_lookup(no_env);
        assert_eq!(service.get_config().unwrap().poll_interval_secs, 30);

        std::fs::write(&path, "poll_interval_secs = 5").unwrap();
        assert_eq!(service.get_config().unwrap().poll_interval_secs, 30);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().poll_interval_secs, 5);
    }

    #[test]
    fn test_save_round_trips_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let service =
            ConfigService::new(temp_dir.path().join("config.toml")).with_env_lookup(no_env);
        let config = ClientConfig::default().with_api_url("https://saved.example/api/v1");

        service.save(&config).unwrap();

        assert_eq!(service.get_config().unwrap(), config);
    }
}
